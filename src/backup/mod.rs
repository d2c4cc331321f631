//! Database backups
//!
//! A backup run dumps the database with `pg_dump`, gzips the dump, rotates
//! archives past the retention window and checks the newest archive.

pub mod catalog;
pub mod compression;
pub mod dump;
pub mod rotation;

use chrono::Local;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{info, warn};

use crate::config::OpsConfig;
use crate::error::{OpsError, Result};

pub use catalog::{list_backups, verify_latest, BackupFile};
pub use dump::DumpCommand;

#[derive(Debug, Clone)]
pub struct BackupOutcome {
    /// Final artifact: the `.gz` archive, or the plain dump when compression failed.
    pub path: PathBuf,
    pub compressed: bool,
    pub rotated: Vec<String>,
}

/// Dump, compress and rotate. A compression failure keeps the plain dump and
/// still counts as success; rotation only runs after a successful compression.
pub async fn create_backup(config: &OpsConfig) -> Result<BackupOutcome> {
    fs::create_dir_all(&config.backup_dir).map_err(|e| {
        OpsError::Backup(format!(
            "Failed to create backup directory {:?}: {}",
            config.backup_dir, e
        ))
    })?;

    let dump_path = config
        .backup_dir
        .join(dump::backup_file_name(&Local::now()));
    println!("🔄 Creating backup: {}", dump_path.display());

    DumpCommand::new(&config.pg_dump_bin, &config.database_url, &dump_path)
        .run()
        .await?;
    println!("✅ Backup created successfully: {}", dump_path.display());

    match compression::compress_file(&dump_path) {
        Ok(archive) => {
            println!("✅ Backup compressed: {}", archive.display());
            let rotated =
                rotation::cleanup_old_backups(&config.backup_dir, config.retention(), SystemTime::now());
            Ok(BackupOutcome {
                path: archive,
                compressed: true,
                rotated,
            })
        }
        Err(e) => {
            warn!("Compression of {:?} failed: {}", dump_path, e);
            println!("⚠️ Backup created but compression failed: {}", e);
            Ok(BackupOutcome {
                path: dump_path,
                compressed: false,
                rotated: Vec::new(),
            })
        }
    }
}

/// Full backup run: create, then verify the newest archive.
pub async fn run_backup(config: &OpsConfig) -> Result<BackupOutcome> {
    let outcome = create_backup(config).await?;
    verify_latest(&config.backup_dir)?;
    info!("Backup run finished: {:?}", outcome.path);
    Ok(outcome)
}
