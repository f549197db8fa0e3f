//! Patient lookup across the service boundary.
//!
//! The appointment service never reads the patient table. It asks the patient
//! service over HTTP and gets one of three answers back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::models::{Patient, PatientId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Patient),
    /// The patient service answered and the patient does not exist.
    NotFound,
    /// No definitive answer: transport failure, timeout, remote error or a
    /// body that did not decode.
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientLookup: Send + Sync {
    async fn resolve(&self, patient_id: PatientId) -> LookupOutcome;
}

/// Default lookup timeout.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2000);

/// Calls `GET {base_url}/api/patients/{id}` on the patient service.
#[derive(Clone)]
pub struct HttpPatientLookup {
    client: Client,
    base_url: String,
}

impl HttpPatientLookup {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PatientLookup for HttpPatientLookup {
    async fn resolve(&self, patient_id: PatientId) -> LookupOutcome {
        let url = format!("{}/api/patients/{}", self.base_url, patient_id);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return LookupOutcome::Unavailable(format!("patient lookup timed out: {e}"));
            }
            Err(e) => return LookupOutcome::Unavailable(format!("patient lookup failed: {e}")),
        };

        match response.status() {
            StatusCode::NOT_FOUND => LookupOutcome::NotFound,
            s if s.is_success() => match response.json::<Patient>().await {
                Ok(patient) => LookupOutcome::Found(patient),
                Err(e) => LookupOutcome::Unavailable(format!("malformed patient body: {e}")),
            },
            s => LookupOutcome::Unavailable(format!("patient service returned {s}")),
        }
    }
}
