//! Creates the sample President and Vice President candidates.

use anyhow::Result;
use tracing::error;

use ballot_ops::database::seed::seed_sample_candidates;
use ballot_ops::telemetry::init_tracing;
use ballot_ops::{Database, OpsConfig};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("Seeding failed: {:#}", e);
        println!("❌ Setup failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("Creating sample candidates for President and Vice President...");
    println!("Started at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    let config = OpsConfig::load()?;
    let database = Database::connect(&config).await?;

    let result = seed_sample_candidates(&database).await;
    database.close().await;
    result?;

    println!(
        "\nSetup completed at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
