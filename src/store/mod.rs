//! Persistence ports for the two services and their implementations.

use async_trait::async_trait;

use crate::models::{
    Appointment, AppointmentId, NewAppointment, Patient, PatientDraft, PatientId,
};

pub mod memory;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("patient with email {0} already exists")]
    DuplicateEmail(String),

    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn patient_not_found(id: PatientId) -> Self {
        StoreError::NotFound {
            entity: "patient",
            id,
        }
    }

    pub fn appointment_not_found(id: AppointmentId) -> Self {
        StoreError::NotFound {
            entity: "appointment",
            id,
        }
    }

    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        StoreError::Database {
            operation,
            message: message.to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create(&self, patient: PatientDraft) -> Result<Patient, StoreError>;
    async fn read(&self, id: PatientId) -> Result<Patient, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError>;
    async fn update(&self, id: PatientId, patient: PatientDraft) -> Result<Patient, StoreError>;
    async fn delete(&self, id: PatientId) -> Result<(), StoreError>;
    async fn list(&self) -> Result<Vec<Patient>, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;
    async fn read(&self, id: AppointmentId) -> Result<Appointment, StoreError>;
    async fn update(
        &self,
        id: AppointmentId,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError>;
    async fn list(&self) -> Result<Vec<Appointment>, StoreError>;
    async fn list_by_patient_id(&self, patient_id: PatientId)
    -> Result<Vec<Appointment>, StoreError>;
}
