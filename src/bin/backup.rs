//! Automated backup: dump, compress, rotate, verify.

use tracing::error;

use ballot_ops::backup::run_backup;
use ballot_ops::telemetry::init_tracing;
use ballot_ops::OpsConfig;

#[tokio::main]
async fn main() {
    init_tracing();
    println!("🚀 Starting automated backup process...");

    let result = match OpsConfig::load() {
        Ok(config) => run_backup(&config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => println!("🎉 Backup process completed successfully!"),
        Err(e) => {
            error!("Backup failed: {}", e);
            println!("❌ Backup process failed: {}", e);
            std::process::exit(1);
        }
    }
}
