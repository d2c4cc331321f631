//! Database restore
//!
//! Replays a plain-SQL dump through `psql`. Archives are expanded to a
//! temporary sibling file first, which is removed once the restore finishes.

pub mod picker;

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::backup::compression::{decompress_file, is_gzip};
use crate::config::OpsConfig;
use crate::database::queries::Queries;
use crate::database::Database;
use crate::error::{OpsError, Result};

pub use picker::{confirm, print_backups, prompt_selection, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct RestoreCommand {
    pub program: String,
    pub database_url: String,
    pub input: PathBuf,
}

impl RestoreCommand {
    pub fn new(program: &str, database_url: &str, input: &Path) -> Self {
        Self {
            program: program.to_string(),
            database_url: database_url.to_string(),
            input: input.to_path_buf(),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            self.database_url.clone(),
            "--no-password".to_string(),
            "-f".to_string(),
            self.input.to_string_lossy().into_owned(),
        ]
    }

    /// Run the restore and return its stdout.
    pub async fn run(&self) -> Result<String> {
        info!("Running {} with {:?}", self.program, self.input);

        let output = Command::new(&self.program)
            .args(self.args())
            .output()
            .await
            .map_err(|e| OpsError::Process(format!("Failed to start {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(OpsError::process_failed(
                &self.program,
                &String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run `work` unless `interrupt` completes first, in which case `None`.
pub async fn unless_interrupted<W, I>(work: W, interrupt: I) -> Option<W::Output>
where
    W: Future,
    I: Future,
{
    tokio::select! {
        out = work => Some(out),
        _ = interrupt => None,
    }
}

/// Resolves on Ctrl+C. Never resolves when the signal cannot be watched.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Wait out the grace period. `false` when the operator pressed Ctrl+C.
async fn grace_period(grace: Duration) -> bool {
    if grace.is_zero() {
        return true;
    }

    println!(
        "Press Ctrl+C within {} seconds to cancel...",
        grace.as_secs()
    );
    tokio::select! {
        _ = tokio::time::sleep(grace) => true,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Unable to listen for Ctrl+C: {}", e);
                tokio::time::sleep(grace).await;
                return true;
            }
            false
        }
    }
}

/// Restore the database from `backup`, which may be gzipped or plain SQL.
pub async fn restore_from_backup(config: &OpsConfig, backup: &Path) -> Result<RestoreOutcome> {
    println!("🔄 Restoring from backup: {}", backup.display());
    println!("⚠️ WARNING: This will overwrite existing data!");

    if !grace_period(config.restore_grace()).await {
        println!("\n⚠️ Restore cancelled by user");
        return Ok(RestoreOutcome::Cancelled);
    }

    let (sql_file, temporary) = if is_gzip(backup) {
        println!("📦 Decompressing {}...", backup.display());
        (decompress_file(backup)?, true)
    } else {
        (backup.to_path_buf(), false)
    };

    println!("🔄 Executing restore...");
    let result = RestoreCommand::new(&config.psql_bin, &config.database_url, &sql_file)
        .run()
        .await;

    if temporary {
        match fs::remove_file(&sql_file) {
            Ok(()) => println!("🗑️ Cleaned up temporary file: {}", sql_file.display()),
            Err(e) => warn!("Failed to remove {:?}: {}", sql_file, e),
        }
    }

    let stdout = result?;
    println!("✅ Database restored successfully!");
    debug!("psql output: {}", stdout.trim());
    if !stdout.trim().is_empty() {
        println!("{}", stdout.trim_end());
    }

    Ok(RestoreOutcome::Restored)
}

/// Reconnect and count voters to confirm the restored database answers.
pub async fn verify_restore(config: &OpsConfig) -> Result<i64> {
    println!("🔍 Verifying restore...");
    let database = Database::connect(config).await?;
    let users = Queries::user_count(database.pool()).await;
    database.close().await;

    let users = users?;
    println!("✅ Database connection verified");
    println!("Users in restored database: {}", users);
    Ok(users)
}
