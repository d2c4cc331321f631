//! Interactive restore from a local backup archive.
//!
//! WARNING: restoring overwrites existing data.

use anyhow::Result;
use std::io::{self, Write};
use tracing::error;

use ballot_ops::backup::{list_backups, BackupFile};
use ballot_ops::restore::{
    confirm, ctrl_c, print_backups, prompt_selection, restore_from_backup, unless_interrupted,
    verify_restore, RestoreOutcome, Selection,
};
use ballot_ops::telemetry::init_tracing;
use ballot_ops::{OpsConfig, OpsError};

#[tokio::main]
async fn main() {
    init_tracing();
    println!("🚨 DATABASE RESTORE UTILITY");
    println!("⚠️ WARNING: This will overwrite existing data!");

    if let Err(e) = run().await {
        error!("Restore failed: {:#}", e);
        match e.downcast_ref::<OpsError>() {
            Some(OpsError::Selection(message)) => println!("❌ {}", message),
            _ => println!("❌ Restore failed: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = OpsConfig::load()?;

    if !config.backup_dir.is_dir() {
        println!("❌ No backup directory found!");
    }
    let backups = list_backups(&config.backup_dir)?;
    if backups.is_empty() {
        anyhow::bail!("No backup files available for restore");
    }

    // Prompts block on stdin, so they run off the runtime while Ctrl+C is watched.
    let prompts = tokio::task::spawn_blocking(move || choose_backup(backups));
    let selected = match unless_interrupted(prompts, ctrl_c()).await {
        Some(chosen) => chosen??,
        None => {
            println!("\n⚠️ Operation cancelled");
            std::process::exit(0);
        }
    };
    let Some(selected) = selected else {
        println!("Restore cancelled");
        return Ok(());
    };

    match restore_from_backup(&config, &selected.path).await? {
        RestoreOutcome::Cancelled => Ok(()),
        RestoreOutcome::Restored => {
            verify_restore(&config).await?;
            println!("🎉 Restore completed and verified successfully!");
            Ok(())
        }
    }
}

/// List, select and confirm. `None` when the operator backs out.
fn choose_backup(backups: Vec<BackupFile>) -> ballot_ops::error::Result<Option<BackupFile>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    print_backups(&backups, &mut output)?;

    let index = match prompt_selection(&backups, &mut input, &mut output)? {
        Selection::Chosen(index) => index,
        Selection::Quit => return Ok(None),
    };

    let selected = backups.into_iter().nth(index);
    if let Some(backup) = &selected {
        println!("Selected: {}", backup.name);
    }

    if !confirm(&mut input, &mut output)? {
        return Ok(None);
    }
    output.flush()?;
    Ok(selected)
}
