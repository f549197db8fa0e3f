// src/routes/patient_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use super::required;
use crate::{
    error::ApiError,
    models::{Patient, PatientDraft, PatientId, PatientState},
};

pub fn router() -> Router<PatientState> {
    Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/{patient_id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
}

fn validate(req: PatientDraft) -> Result<PatientDraft, ApiError> {
    Ok(PatientDraft {
        first_name: required("firstName", req.first_name)?,
        last_name: required("lastName", req.last_name)?,
        email: required("email", req.email)?,
        ..req
    })
}

pub async fn list_patients(
    State(state): State<PatientState>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.patients.list().await?))
}

pub async fn create_patient(
    State(state): State<PatientState>,
    Json(req): Json<PatientDraft>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = state.patients.create(validate(req)?).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn get_patient(
    State(state): State<PatientState>,
    Path(patient_id): Path<PatientId>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patients.get(patient_id).await?))
}

pub async fn update_patient(
    State(state): State<PatientState>,
    Path(patient_id): Path<PatientId>,
    Json(req): Json<PatientDraft>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patients.update(patient_id, validate(req)?).await?))
}

pub async fn delete_patient(
    State(state): State<PatientState>,
    Path(patient_id): Path<PatientId>,
) -> Result<StatusCode, ApiError> {
    state.patients.delete(patient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
