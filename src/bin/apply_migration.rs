//! Applies one named migration on its own and describes the tables it touches.

use anyhow::Result;
use clap::Parser;
use tracing::error;

use ballot_ops::database::migrations::MigrationRunner;
use ballot_ops::database::schema::migration_names;
use ballot_ops::telemetry::init_tracing;
use ballot_ops::{Database, OpsConfig};

#[derive(Parser)]
#[command(name = "apply-migration")]
#[command(about = "Apply a single schema migration outside the normal sequence")]
struct Cli {
    /// Migration name, e.g. 004_add_election_management_tables
    #[arg(default_value = "004_add_election_management_tables")]
    name: String,

    /// List known migrations and exit
    #[arg(short, long)]
    list: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.list {
        for name in migration_names() {
            println!("{}", name);
        }
        return;
    }

    if let Err(e) = run(&cli.name).await {
        error!("apply-migration failed: {:#}", e);
        println!("❌ Migration failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(name: &str) -> Result<()> {
    let started = chrono::Local::now();
    println!("Applying migration {}...", name);
    println!("Started at: {}", started.format("%Y-%m-%d %H:%M:%S"));

    let config = OpsConfig::load()?;
    let database = Database::connect(&config).await?;

    let result = async {
        MigrationRunner::new(&database).apply_named(name).await?;
        println!("\nConnected to: {}", database.server_version().await?);
        Ok::<_, anyhow::Error>(())
    }
    .await;
    database.close().await;
    result?;

    println!(
        "\nMigration completed at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
