// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use super::required;
use crate::{
    error::ApiError,
    models::{
        Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, AppointmentState,
        PatientId,
    },
};

pub fn router() -> Router<AppointmentState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(schedule_appointment))
        .route(
            "/appointments/{appointment_id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(cancel_appointment),
        )
        .route(
            "/appointments/patient/{patient_id}",
            get(list_patient_appointments),
        )
}

/* ============================================================
   Reads
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppointmentState>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(state.scheduler.list().await?))
}

pub async fn get_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(state.scheduler.get(appointment_id).await?))
}

pub async fn list_patient_appointments(
    State(state): State<AppointmentState>,
    Path(patient_id): Path<PatientId>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(state.scheduler.list_for_patient(patient_id).await?))
}

/* ============================================================
   POST /appointments
   ============================================================ */

pub async fn schedule_appointment(
    State(state): State<AppointmentState>,
    Json(req): Json<AppointmentDraft>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let draft = AppointmentDraft {
        doctor_name: required("doctorName", req.doctor_name)?,
        ..req
    };
    let appointment = state.scheduler.schedule(draft).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/* ============================================================
   PUT /appointments/{id}
   ============================================================ */

pub async fn update_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<AppointmentId>,
    Json(req): Json<AppointmentChanges>,
) -> Result<Json<Appointment>, ApiError> {
    let changes = AppointmentChanges {
        doctor_name: required("doctorName", req.doctor_name)?,
        ..req
    };
    Ok(Json(state.scheduler.update(appointment_id, changes).await?))
}

/* ============================================================
   DELETE /appointments/{id}  (cancel, never a hard delete)
   ============================================================ */

pub async fn cancel_appointment(
    State(state): State<AppointmentState>,
    Path(appointment_id): Path<AppointmentId>,
) -> Result<StatusCode, ApiError> {
    state.scheduler.cancel(appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::lookup::{LookupOutcome, MockPatientLookup};
    use crate::models::{AppointmentState, Patient};
    use crate::routes::appointment_router;
    use crate::scheduler::AppointmentScheduler;
    use crate::status::TransitionPolicy;
    use crate::store::memory::MemoryAppointmentStore;

    /// Patient 42 exists, 99 does not, anything else cannot be reached.
    fn app() -> axum::Router {
        let mut lookup = MockPatientLookup::new();
        lookup.expect_resolve().returning(|id| match id {
            42 => LookupOutcome::Found(Patient {
                id,
                first_name: "Ada".into(),
                last_name: "Byron".into(),
                email: "ada@example.com".into(),
                phone_number: None,
                address: None,
                date_of_birth: None,
                gender: None,
            }),
            99 => LookupOutcome::NotFound,
            _ => LookupOutcome::Unavailable("connection refused".into()),
        });

        appointment_router(AppointmentState {
            scheduler: Arc::new(AppointmentScheduler::new(
                Arc::new(lookup),
                Arc::new(MemoryAppointmentStore::new()),
                TransitionPolicy::Permissive,
            )),
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn booking(patient_id: i64) -> Value {
        json!({
            "patientId": patient_id,
            "doctorName": "Dr. Lee",
            "appointmentDateTime": "2026-11-02T09:30:00",
            "reason": "annual check-up",
            "status": "COMPLETED"
        })
    }

    #[tokio::test]
    async fn scheduling_for_a_known_patient_returns_the_stored_record() {
        let response = app()
            .oneshot(json_request("POST", "/api/appointments", booking(42)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({
                "id": 1,
                "patientId": 42,
                "doctorName": "Dr. Lee",
                "appointmentDateTime": "2026-11-02T09:30:00",
                "reason": "annual check-up",
                "status": "SCHEDULED"
            })
        );
    }

    #[tokio::test]
    async fn browser_form_payload_is_scheduled() {
        // patientId comes from a <select>, the time from toISOString()
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/appointments",
                json!({
                    "patientId": "42",
                    "doctorName": "Dr. Lee",
                    "appointmentDateTime": "2026-11-02T09:00:00.000Z",
                    "reason": "",
                    "status": "BOOKED"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["patientId"], 42);
        assert_eq!(body["appointmentDateTime"], "2026-11-02T09:00:00");
        assert_eq!(body["reason"], Value::Null);
        assert_eq!(body["status"], "SCHEDULED");
    }

    #[tokio::test]
    async fn missing_and_unreachable_patients_look_the_same() {
        let app = app();

        let missing = app
            .clone()
            .oneshot(json_request("POST", "/api/appointments", booking(99)))
            .await
            .unwrap();
        let unreachable = app
            .clone()
            .oneshot(json_request("POST", "/api/appointments", booking(5)))
            .await
            .unwrap();

        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unreachable.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(missing).await["error"]["code"], "PATIENT_NOT_FOUND");
        assert_eq!(body_json(unreachable).await["error"]["code"], "PATIENT_NOT_FOUND");

        let all = app.oneshot(empty_request("GET", "/api/appointments")).await.unwrap();
        assert_eq!(body_json(all).await, json!([]));
    }

    #[tokio::test]
    async fn blank_doctor_name_is_rejected() {
        let mut body = booking(42);
        body["doctorName"] = json!("");

        let response = app()
            .oneshot(json_request("POST", "/api/appointments", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cancel_then_read_shows_cancelled() {
        let app = app();
        app.clone()
            .oneshot(json_request("POST", "/api/appointments", booking(42)))
            .await
            .unwrap();

        let cancelled = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/appointments/1"))
            .await
            .unwrap();
        assert_eq!(cancelled.status(), StatusCode::NO_CONTENT);

        let read = app.oneshot(empty_request("GET", "/api/appointments/1")).await.unwrap();
        assert_eq!(body_json(read).await["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn unknown_appointment_is_not_found() {
        let app = app();

        let cancel = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/appointments/777"))
            .await
            .unwrap();
        assert_eq!(cancel.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(cancel).await["error"]["code"], "NOT_FOUND");

        let update = app
            .oneshot(json_request(
                "PUT",
                "/api/appointments/777",
                json!({
                    "doctorName": "Dr. Lee",
                    "appointmentDateTime": "2026-11-02T10:00:00",
                    "status": "COMPLETED"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(update.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_patient_listing_filters() {
        let app = app();
        for _ in 0..2 {
            app.clone()
                .oneshot(json_request("POST", "/api/appointments", booking(42)))
                .await
                .unwrap();
        }

        let updated = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/appointments/2",
                json!({
                    "doctorName": "Dr. Okafor",
                    "appointmentDateTime": "2026-11-03T14:00:00",
                    "reason": null,
                    "status": "COMPLETED"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        let updated = body_json(updated).await;
        assert_eq!(updated["doctorName"], "Dr. Okafor");
        assert_eq!(updated["patientId"], 42);
        assert_eq!(updated["reason"], Value::Null);
        assert_eq!(updated["status"], "COMPLETED");

        let for_patient = app
            .clone()
            .oneshot(empty_request("GET", "/api/appointments/patient/42"))
            .await
            .unwrap();
        let ids: Vec<i64> = body_json(for_patient)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let none = app
            .oneshot(empty_request("GET", "/api/appointments/patient/7"))
            .await
            .unwrap();
        assert_eq!(body_json(none).await, json!([]));
    }
}
