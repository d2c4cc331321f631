//! Schema Migration Tool
//!
//! Applies pending migrations to the voting database, or inspects and rewinds
//! the migration tracking table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

use ballot_ops::database::migrations::{status_lines, MigrationRunner};
use ballot_ops::telemetry::init_tracing;
use ballot_ops::{Database, OpsConfig};

#[derive(Parser)]
#[command(name = "migrate")]
#[command(about = "Apply schema migrations to the voting database")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Run all pending migrations (default)
    Migrate,
    /// Forget the most recent migration
    Rollback,
    /// Show applied and pending migrations
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command.unwrap_or(Commands::Migrate)).await {
        error!("Migration tool failed: {:#}", e);
        println!("❌ Migration error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = OpsConfig::load()?;
    let database = Database::connect(&config).await?;

    let result = execute(&database, command).await;
    if matches!(command, Commands::Status { json: true }) {
        database.close_quietly().await;
    } else {
        database.close().await;
    }
    result
}

async fn execute(database: &Database, command: Commands) -> Result<()> {
    let runner = MigrationRunner::new(database);

    match command {
        Commands::Migrate => {
            runner.migrate().await?;
            println!("Connected to: {}", database.server_version().await?);
        }
        Commands::Rollback => {
            runner.rollback().await?;
        }
        Commands::Status { json } => {
            let report = runner.status().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in status_lines(&report) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
