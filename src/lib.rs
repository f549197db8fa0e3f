pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod models;
pub mod patients;
pub mod routes;
pub mod scheduler;
pub mod status;
pub mod store;
