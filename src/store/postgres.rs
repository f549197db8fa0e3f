// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;

use super::{AppointmentStore, PatientStore, StoreError};
use crate::models::{
    Appointment, AppointmentId, NewAppointment, Patient, PatientDraft, PatientId,
};

/* -------------------------
   DB Row Models
--------------------------*/

#[derive(Debug, sqlx::FromRow)]
struct PatientRow {
    patient_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    address: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
}

impl From<PatientRow> for Patient {
    fn from(r: PatientRow) -> Self {
        Patient {
            id: r.patient_id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone_number: r.phone_number,
            address: r.address,
            date_of_birth: r.date_of_birth,
            gender: r.gender,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    appointment_id: i64,
    patient_id: i64,
    doctor_name: String,
    appointment_date_time: NaiveDateTime,
    reason: Option<String>,
    status: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = StoreError;

    fn try_from(r: AppointmentRow) -> Result<Self, Self::Error> {
        let status = r
            .status
            .parse()
            .map_err(|e| StoreError::database("decode appointment", e))?;
        Ok(Appointment {
            id: r.appointment_id,
            patient_id: r.patient_id,
            doctor_name: r.doctor_name,
            appointment_date_time: r.appointment_date_time,
            reason: r.reason,
            status,
        })
    }
}

fn decode_all(rows: Vec<AppointmentRow>) -> Result<Vec<Appointment>, StoreError> {
    rows.into_iter().map(Appointment::try_from).collect()
}

/* -------------------------
   Patients
--------------------------*/

pub struct PgPatientStore {
    db: PgPool,
}

impl PgPatientStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    /// Email uniqueness holds at creation only, so it is checked here under
    /// a per-email transaction lock rather than by a table constraint that
    /// would also bind updates.
    async fn create(&self, patient: PatientDraft) -> Result<Patient, StoreError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("create patient", e))?;

        sqlx::query(r#"SELECT pg_advisory_xact_lock(hashtext($1))"#)
            .bind(&patient.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::database("create patient", e))?;

        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO patient (first_name, last_name, email, phone_number, address, date_of_birth, gender)
            SELECT $1, $2, $3, $4, $5, $6::date, $7
            WHERE NOT EXISTS (SELECT 1 FROM patient WHERE email = $3)
            RETURNING patient_id, first_name, last_name, email, phone_number, address, date_of_birth, gender
            "#,
        )
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(&patient.email)
        .bind(patient.phone_number.as_deref())
        .bind(patient.address.as_deref())
        .bind(patient.date_of_birth)
        .bind(patient.gender.as_deref())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::database("create patient", e))?;

        let Some(row) = row else {
            return Err(StoreError::DuplicateEmail(patient.email));
        };

        tx.commit()
            .await
            .map_err(|e| StoreError::database("create patient", e))?;

        Ok(row.into())
    }

    async fn read(&self, id: PatientId) -> Result<Patient, StoreError> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT patient_id, first_name, last_name, email, phone_number, address, date_of_birth, gender
            FROM patient
            WHERE patient_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::database("read patient", e))?
        .map(Patient::from)
        .ok_or_else(|| StoreError::patient_not_found(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT patient_id, first_name, last_name, email, phone_number, address, date_of_birth, gender
            FROM patient
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::database("find patient by email", e))?;

        Ok(row.map(Patient::from))
    }

    async fn update(&self, id: PatientId, patient: PatientDraft) -> Result<Patient, StoreError> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            UPDATE patient
            SET first_name = $1,
                last_name = $2,
                email = $3,
                phone_number = $4,
                address = $5,
                date_of_birth = $6,
                gender = $7
            WHERE patient_id = $8
            RETURNING patient_id, first_name, last_name, email, phone_number, address, date_of_birth, gender
            "#,
        )
        .bind(patient.first_name)
        .bind(patient.last_name)
        .bind(patient.email)
        .bind(patient.phone_number)
        .bind(patient.address)
        .bind(patient.date_of_birth)
        .bind(patient.gender)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::database("update patient", e))?
        .map(Patient::from)
        .ok_or_else(|| StoreError::patient_not_found(id))
    }

    async fn delete(&self, id: PatientId) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM patient WHERE patient_id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| StoreError::database("delete patient", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::patient_not_found(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Patient>, StoreError> {
        let rows = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT patient_id, first_name, last_name, email, phone_number, address, date_of_birth, gender
            FROM patient
            ORDER BY patient_id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| StoreError::database("list patients", e))?;

        Ok(rows.into_iter().map(Patient::from).collect())
    }
}

/* -------------------------
   Appointments
--------------------------*/

pub struct PgAppointmentStore {
    db: PgPool,
}

impl PgAppointmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        sqlx::query_as::<_, AppointmentRow>(
            r#"
            INSERT INTO appointment (patient_id, doctor_name, appointment_date_time, reason, status)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING appointment_id, patient_id, doctor_name, appointment_date_time, reason, status
            "#,
        )
        .bind(appointment.patient_id)
        .bind(appointment.doctor_name)
        .bind(appointment.appointment_date_time)
        .bind(appointment.reason)
        .bind(appointment.status.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::database("create appointment", e))?
        .try_into()
    }

    async fn read(&self, id: AppointmentId) -> Result<Appointment, StoreError> {
        sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT appointment_id, patient_id, doctor_name, appointment_date_time, reason, status
            FROM appointment
            WHERE appointment_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::database("read appointment", e))?
        .ok_or_else(|| StoreError::appointment_not_found(id))?
        .try_into()
    }

    async fn update(
        &self,
        id: AppointmentId,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        sqlx::query_as::<_, AppointmentRow>(
            r#"
            UPDATE appointment
            SET doctor_name = $1,
                appointment_date_time = $2,
                reason = $3,
                status = $4
            WHERE appointment_id = $5
            RETURNING appointment_id, patient_id, doctor_name, appointment_date_time, reason, status
            "#,
        )
        .bind(appointment.doctor_name)
        .bind(appointment.appointment_date_time)
        .bind(appointment.reason)
        .bind(appointment.status.as_str())
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::database("update appointment", e))?
        .ok_or_else(|| StoreError::appointment_not_found(id))?
        .try_into()
    }

    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT appointment_id, patient_id, doctor_name, appointment_date_time, reason, status
            FROM appointment
            ORDER BY appointment_id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| StoreError::database("list appointments", e))?;

        decode_all(rows)
    }

    async fn list_by_patient_id(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<Appointment>, StoreError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT appointment_id, patient_id, doctor_name, appointment_date_time, reason, status
            FROM appointment
            WHERE patient_id = $1
            ORDER BY appointment_id ASC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| StoreError::database("list appointments by patient", e))?;

        decode_all(rows)
    }
}
