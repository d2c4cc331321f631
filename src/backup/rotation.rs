//! Age-based removal of old compressed backups.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

use crate::backup::catalog;

/// Delete `*.gz` backups in `dir` last modified before `now - retention`.
///
/// Returns the names removed. Failures are logged and skipped; rotation never
/// fails a backup run.
pub fn cleanup_old_backups(dir: &Path, retention: Duration, now: SystemTime) -> Vec<String> {
    let Some(cutoff) = now.checked_sub(retention) else {
        return Vec::new();
    };

    let files = match catalog::scan(dir) {
        Ok(files) => files,
        Err(e) => {
            warn!("Cleanup skipped: {}", e);
            println!("⚠️ Cleanup warning: {}", e);
            return Vec::new();
        }
    };

    let mut removed = Vec::new();
    for file in files.into_iter().filter(|f| f.modified < cutoff) {
        match fs::remove_file(&file.path) {
            Ok(()) => {
                println!("🗑️ Removed old backup: {}", file.name);
                removed.push(file.name);
            }
            Err(e) => {
                warn!("Failed to remove {:?}: {}", file.path, e);
                println!("⚠️ Cleanup warning: {}: {}", file.name, e);
            }
        }
    }

    if !removed.is_empty() {
        info!("Rotated {} old backups", removed.len());
    }
    removed
}
