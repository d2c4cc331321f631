pub mod backup;
pub mod config;
pub mod database;
pub mod error;
pub mod restore;
pub mod telemetry;
pub mod verify;

pub use config::OpsConfig;
pub use database::Database;
pub use error::OpsError;
