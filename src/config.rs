use std::env;
use std::time::Duration;

use anyhow::{Context, anyhow};

use crate::status::TransitionPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceKind {
    Patient,
    Appointment,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub service: ServiceKind,
    pub bind_addr: String,
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    pub patient_service_url: String,
    pub lookup_timeout: Duration,
    pub transition_policy: TransitionPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let service = match var("SERVICE").as_deref().map(str::trim) {
            Some("patient") => ServiceKind::Patient,
            Some("appointment") => ServiceKind::Appointment,
            Some(other) => return Err(anyhow!("SERVICE must be patient or appointment, got {other:?}")),
            None => return Err(anyhow!("SERVICE is not set")),
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| {
            match service {
                ServiceKind::Patient => "127.0.0.1:8081",
                ServiceKind::Appointment => "127.0.0.1:8082",
            }
            .to_string()
        });

        let database_url = var("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let patient_service_url =
            var("PATIENT_SERVICE_URL").unwrap_or_else(|| "http://127.0.0.1:8081".to_string());

        let lookup_timeout = match var("PATIENT_LOOKUP_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.trim()
                    .parse::<u64>()
                    .context("PATIENT_LOOKUP_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            None => crate::lookup::DEFAULT_LOOKUP_TIMEOUT,
        };

        let strict = match var("STRICT_STATUS_TRANSITIONS") {
            Some(v) => v
                .trim()
                .parse::<bool>()
                .context("STRICT_STATUS_TRANSITIONS must be true or false")?,
            None => false,
        };
        let transition_policy = if strict {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        };

        Ok(Self {
            service,
            bind_addr,
            database_url,
            patient_service_url,
            lookup_timeout,
            transition_policy,
        })
    }
}
