pub mod client;
pub mod compose;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod protocol;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
