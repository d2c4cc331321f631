pub mod migrations;
pub mod models;
pub mod queries;
pub mod schema;
pub mod seed;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{redact_url, OpsConfig};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// One tool run's connection to the voting database.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &OpsConfig) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(&config.database_url, config.max_connections).await
    }

    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_url, 1).await
    }

    async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        debug!("Connecting to {}", redact_url(database_url));
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        info!("Database connected");
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn server_version(&self) -> Result<String, sqlx::Error> {
        queries::Queries::server_version(&self.pool).await
    }

    /// Close the pool and report it on the console.
    pub async fn close(self) {
        self.pool.close().await;
        println!("Connection closed.");
    }

    /// Close the pool without console output, for machine-readable runs.
    pub async fn close_quietly(self) {
        self.pool.close().await;
        debug!("Connection closed");
    }
}
