use std::sync::Arc;

use tracing::{info, warn};

use crate::lookup::{LookupOutcome, PatientLookup};
use crate::models::{
    Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, NewAppointment, PatientId,
};
use crate::status::{AppointmentStatus, InvalidTransition, TransitionPolicy};
use crate::store::{AppointmentStore, StoreError};

/// Why a patient could not be confirmed while scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    Absent,
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// The patient could not be confirmed. This covers both a patient that
    /// does not exist and a patient service that could not be reached, so a
    /// transient outage looks the same to the caller as bad data. `cause`
    /// keeps the distinction for logs and for callers that want it.
    #[error("cannot schedule appointment: patient not found with id {patient_id}")]
    PatientNotFound {
        patient_id: PatientId,
        cause: LookupFailure,
    },

    #[error("appointment not found with id {0}")]
    AppointmentNotFound(AppointmentId),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for SchedulingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound {
                entity: "appointment",
                id,
            } => SchedulingError::AppointmentNotFound(id),
            other => SchedulingError::Store(other),
        }
    }
}

/// Admits appointments only for patients the patient service confirms, and
/// owns every status change after that.
pub struct AppointmentScheduler {
    lookup: Arc<dyn PatientLookup>,
    store: Arc<dyn AppointmentStore>,
    policy: TransitionPolicy,
}

impl AppointmentScheduler {
    pub fn new(
        lookup: Arc<dyn PatientLookup>,
        store: Arc<dyn AppointmentStore>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            lookup,
            store,
            policy,
        }
    }

    pub async fn schedule(&self, draft: AppointmentDraft) -> Result<Appointment, SchedulingError> {
        let patient_id = draft.patient_id;

        let cause = match self.lookup.resolve(patient_id).await {
            LookupOutcome::Found(_) => None,
            LookupOutcome::NotFound => Some(LookupFailure::Absent),
            LookupOutcome::Unavailable(reason) => Some(LookupFailure::Unavailable(reason)),
        };
        if let Some(cause) = cause {
            warn!(patient_id, ?cause, "rejecting appointment: patient not confirmed");
            return Err(SchedulingError::PatientNotFound { patient_id, cause });
        }

        let stored = self
            .store
            .create(NewAppointment {
                patient_id,
                doctor_name: draft.doctor_name,
                appointment_date_time: draft.appointment_date_time,
                reason: draft.reason,
                status: AppointmentStatus::Scheduled,
            })
            .await?;

        info!(appointment_id = stored.id, patient_id, "appointment scheduled");
        Ok(stored)
    }

    /// Replaces doctor, time, reason and status. The patient is not looked up
    /// again.
    pub async fn update(
        &self,
        id: AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Appointment, SchedulingError> {
        let mut existing = self.store.read(id).await?;

        existing.status = existing.status.transition_to(changes.status, self.policy)?;
        existing.doctor_name = changes.doctor_name;
        existing.appointment_date_time = changes.appointment_date_time;
        existing.reason = changes.reason;

        let stored = self.store.update(id, existing).await?;
        info!(appointment_id = id, status = %stored.status, "appointment updated");
        Ok(stored)
    }

    pub async fn cancel(&self, id: AppointmentId) -> Result<Appointment, SchedulingError> {
        let mut existing = self.store.read(id).await?;
        existing.status = existing
            .status
            .transition_to(AppointmentStatus::Cancelled, self.policy)?;

        let stored = self.store.update(id, existing).await?;
        info!(appointment_id = id, "appointment cancelled");
        Ok(stored)
    }

    pub async fn get(&self, id: AppointmentId) -> Result<Appointment, SchedulingError> {
        Ok(self.store.read(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.store.list().await?)
    }

    pub async fn list_for_patient(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.store.list_by_patient_id(patient_id).await?)
    }
}
