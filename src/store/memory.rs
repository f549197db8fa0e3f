//! In-process stores used when no `DATABASE_URL` is configured, and by tests.
//!
//! Each store keeps its rows in a `BTreeMap` keyed by id behind a single
//! `RwLock`; id assignment happens under the write lock, so ids are never
//! handed out twice.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AppointmentStore, PatientStore, StoreError};
use crate::models::{
    Appointment, AppointmentId, NewAppointment, Patient, PatientDraft, PatientId,
};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
pub struct MemoryPatientStore {
    table: RwLock<Table<Patient>>,
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn create(&self, patient: PatientDraft) -> Result<Patient, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|p| p.email == patient.email) {
            return Err(StoreError::DuplicateEmail(patient.email));
        }
        let id = table.next_id();
        let stored = patient.into_patient(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn read(&self, id: PatientId) -> Result<Patient, StoreError> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::patient_not_found(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn update(&self, id: PatientId, patient: PatientDraft) -> Result<Patient, StoreError> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::patient_not_found(id))?;
        *slot = patient.into_patient(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: PatientId) -> Result<(), StoreError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::patient_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Patient>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryAppointmentStore {
    table: RwLock<Table<Appointment>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let stored = Appointment {
            id,
            patient_id: appointment.patient_id,
            doctor_name: appointment.doctor_name,
            appointment_date_time: appointment.appointment_date_time,
            reason: appointment.reason,
            status: appointment.status,
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn read(&self, id: AppointmentId) -> Result<Appointment, StoreError> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::appointment_not_found(id))
    }

    async fn update(
        &self,
        id: AppointmentId,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut table = self.table.write().await;
        let slot = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::appointment_not_found(id))?;
        *slot = Appointment { id, ..appointment };
        Ok(slot.clone())
    }

    async fn list(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn list_by_patient_id(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }
}
