use std::sync::Arc;

use tracing::info;

use crate::models::{Patient, PatientDraft, PatientId};
use crate::store::{PatientStore, StoreError};

/// Patient records as the patient service owns them. Email uniqueness is
/// only checked when a patient is created.
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: PatientDraft) -> Result<Patient, StoreError> {
        if self.store.find_by_email(&draft.email).await?.is_some() {
            return Err(StoreError::DuplicateEmail(draft.email));
        }
        let patient = self.store.create(draft).await?;
        info!(patient_id = patient.id, "patient created");
        Ok(patient)
    }

    pub async fn update(&self, id: PatientId, draft: PatientDraft) -> Result<Patient, StoreError> {
        let patient = self.store.update(id, draft).await?;
        info!(patient_id = id, "patient updated");
        Ok(patient)
    }

    /// Appointments that reference the patient are left as they are.
    pub async fn delete(&self, id: PatientId) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        info!(patient_id = id, "patient deleted");
        Ok(())
    }

    pub async fn get(&self, id: PatientId) -> Result<Patient, StoreError> {
        self.store.read(id).await
    }

    pub async fn list(&self) -> Result<Vec<Patient>, StoreError> {
        self.store.list().await
    }
}
