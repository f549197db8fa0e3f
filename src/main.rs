use std::sync::Arc;

use axum::Router;
use axum::http::header;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clinic_services::{
    config::{Config, ServiceKind},
    db,
    lookup::HttpPatientLookup,
    models::{AppointmentState, PatientState},
    patients::PatientService,
    routes,
    scheduler::AppointmentScheduler,
    store::{
        AppointmentStore, PatientStore,
        memory::{MemoryAppointmentStore, MemoryPatientStore},
        postgres::{PgAppointmentStore, PgPatientStore},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;

    let app = match cfg.service {
        ServiceKind::Patient => patient_app(&cfg).await?,
        ServiceKind::Appointment => appointment_app(&cfg).await?,
    };

    // The browser client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    tracing::info!(service = ?cfg.service, "Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn patient_app(cfg: &Config) -> anyhow::Result<Router> {
    let store: Arc<dyn PatientStore> = match &cfg.database_url {
        Some(url) => Arc::new(PgPatientStore::new(
            db::connect_pg(url, &db::PATIENT_MIGRATIONS).await?,
        )),
        None => {
            tracing::warn!("DATABASE_URL not set, patients are kept in memory");
            Arc::new(MemoryPatientStore::new())
        }
    };

    Ok(routes::patient_router(PatientState {
        patients: Arc::new(PatientService::new(store)),
    }))
}

async fn appointment_app(cfg: &Config) -> anyhow::Result<Router> {
    let store: Arc<dyn AppointmentStore> = match &cfg.database_url {
        Some(url) => Arc::new(PgAppointmentStore::new(
            db::connect_pg(url, &db::APPOINTMENT_MIGRATIONS).await?,
        )),
        None => {
            tracing::warn!("DATABASE_URL not set, appointments are kept in memory");
            Arc::new(MemoryAppointmentStore::new())
        }
    };

    let lookup = HttpPatientLookup::new(&cfg.patient_service_url, cfg.lookup_timeout)?;
    tracing::info!(
        patient_service = %cfg.patient_service_url,
        timeout = ?cfg.lookup_timeout,
        policy = ?cfg.transition_policy,
        "patient lookup configured"
    );

    Ok(routes::appointment_router(AppointmentState {
        scheduler: Arc::new(AppointmentScheduler::new(
            Arc::new(lookup),
            store,
            cfg.transition_policy,
        )),
    }))
}
