use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub static PATIENT_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/patient");
pub static APPOINTMENT_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/appointment");

pub async fn connect_pg(database_url: &str, migrations: &Migrator) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    migrations.run(&pool).await?;
    tracing::info!("database ready");
    Ok(pool)
}
