use thiserror::Error;

impl From<sqlx::Error> for OpsError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<std::io::Error> for OpsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OpsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(format!("JSON serialization error: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum OpsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("External process error: {0}")]
    Process(String),

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Restore error: {0}")]
    Restore(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("{0}")]
    Selection(String),
}

pub type Result<T> = std::result::Result<T, OpsError>;

impl OpsError {
    pub fn missing_env(key: &str) -> Self {
        Self::Config(format!("{} environment variable is required", key))
    }

    pub fn invalid_value(key: &str, value: &str) -> Self {
        Self::Config(format!("Invalid value for {}: {:?}", key, value))
    }

    pub fn process_failed(program: &str, stderr: &str) -> Self {
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Self::Process(format!("{} exited with a failure status", program))
        } else {
            Self::Process(format!("{} failed: {}", program, stderr))
        }
    }

    pub fn unknown_migration(name: &str, known: &[&str]) -> Self {
        Self::Migration(format!(
            "Unknown migration '{}'. Known migrations: {}",
            name,
            known.join(", ")
        ))
    }
}
