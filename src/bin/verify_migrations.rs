//! Verifies that the migrations have been applied correctly. Read-only.

use anyhow::Result;
use clap::Parser;
use tracing::error;

use ballot_ops::telemetry::init_tracing;
use ballot_ops::verify::VerificationReport;
use ballot_ops::{Database, OpsConfig};

#[derive(Parser)]
#[command(name = "verify-migrations")]
#[command(about = "Run read-only verification queries against the voting database")]
struct Cli {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli.json).await {
        error!("Verification failed: {:#}", e);
        println!("❌ Verification failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(json: bool) -> Result<()> {
    let config = OpsConfig::load()?;
    let database = Database::connect(&config).await?;

    let report = VerificationReport::collect(&database).await;

    if json {
        database.close_quietly().await;
        println!("{}", serde_json::to_string_pretty(&report?)?);
    } else {
        if let Ok(report) = &report {
            for line in report.render() {
                println!("{}", line);
            }
        }
        database.close().await;
        report?;
    }
    Ok(())
}
