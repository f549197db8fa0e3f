use crate::models::{AppointmentState, PatientState};
use axum::Router;

pub mod appointment_routes;
pub mod patient_routes;

pub fn patient_router(state: PatientState) -> Router {
    Router::new()
        .nest("/api", patient_routes::router())
        .with_state(state)
}

pub fn appointment_router(state: AppointmentState) -> Router {
    Router::new()
        .nest("/api", appointment_routes::router())
        .with_state(state)
}

/// Trims a required text field, rejecting it when blank.
pub(crate) fn required(field: &str, value: String) -> Result<String, crate::error::ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::ApiError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
