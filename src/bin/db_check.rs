//! Connectivity check for the voting database.

use tracing::error;

use ballot_ops::telemetry::init_tracing;
use ballot_ops::{Database, OpsConfig};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("Database check failed: {:#}", e);
        println!("❌ Failed to connect to the database: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = OpsConfig::load()?;
    let database = Database::connect(&config).await?;
    println!("✅ Database connection successful. The DB is up and running!");

    let version = database.server_version().await;
    database.close().await;
    println!("Connected to: {}", version?);
    Ok(())
}
