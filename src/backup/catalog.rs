//! Compressed backups on local disk.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;

use crate::backup::compression::GZIP_EXTENSION;
use crate::error::{OpsError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct BackupFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

impl BackupFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified()?,
        })
    }

    /// `  <n>. <name> (<size> bytes, <YYYY-mm-dd HH:MM>)`, `n` 1-based.
    pub fn listing_line(&self, number: usize) -> String {
        let modified: DateTime<Local> = self.modified.into();
        format!(
            "  {}. {} ({} bytes, {})",
            number,
            self.name,
            self.size,
            modified.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Every `*.gz` file directly inside `dir`, in no particular order.
/// A missing directory yields an empty list.
pub fn scan(dir: &Path) -> Result<Vec<BackupFile>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        GZIP_EXTENSION
    );

    let paths = glob::glob(&pattern)
        .map_err(|e| OpsError::Backup(format!("Invalid backup pattern {}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => files.push(BackupFile::from_path(&path)?),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable backup entry: {}", e),
        }
    }
    Ok(files)
}

/// Backups for the restore picker: newest name first.
pub fn list_backups(dir: &Path) -> Result<Vec<BackupFile>> {
    let mut files = scan(dir)?;
    files.sort_by(|a, b| b.name.cmp(&a.name));
    Ok(files)
}

/// The most recently modified backup, if any.
pub fn latest(dir: &Path) -> Result<Option<BackupFile>> {
    Ok(scan(dir)?.into_iter().max_by_key(|f| f.modified))
}

/// Check that the newest backup exists and is non-empty.
pub fn verify_latest(dir: &Path) -> Result<BackupFile> {
    if !dir.is_dir() {
        return Err(OpsError::Backup("No backup directory found".to_string()));
    }

    let newest = latest(dir)?
        .ok_or_else(|| OpsError::Backup("No backup files found".to_string()))?;

    if newest.size == 0 {
        return Err(OpsError::Backup(format!(
            "Backup file is empty: {}",
            newest.name
        )));
    }

    println!(
        "✅ Most recent backup verified: {} ({} bytes)",
        newest.name, newest.size
    );
    Ok(newest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn write_with_age(dir: &Path, name: &str, body: &[u8], age: Duration) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        path
    }

    #[test]
    fn test_scan_only_gzip_files() {
        let dir = tempfile::tempdir().unwrap();
        write_with_age(dir.path(), "a.sql.gz", b"x", Duration::ZERO);
        write_with_age(dir.path(), "b.sql", b"x", Duration::ZERO);
        write_with_age(dir.path(), "notes.txt", b"x", Duration::ZERO);

        let files = scan(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.sql.gz");
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_by_name_descending() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "voting_backup_20251018_010000.sql.gz",
            "voting_backup_20251020_010000.sql.gz",
            "voting_backup_20251019_010000.sql.gz",
        ] {
            write_with_age(dir.path(), name, b"x", Duration::ZERO);
        }

        let names: Vec<String> = list_backups(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "voting_backup_20251020_010000.sql.gz",
                "voting_backup_20251019_010000.sql.gz",
                "voting_backup_20251018_010000.sql.gz",
            ]
        );
    }

    #[test]
    fn test_latest_uses_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        write_with_age(dir.path(), "z_old.sql.gz", b"x", Duration::from_secs(3600));
        write_with_age(dir.path(), "a_new.sql.gz", b"x", Duration::from_secs(10));

        assert_eq!(latest(dir.path()).unwrap().unwrap().name, "a_new.sql.gz");
    }

    #[test]
    fn test_verify_latest_rejects_empty_newest() {
        let dir = tempfile::tempdir().unwrap();
        write_with_age(dir.path(), "old.sql.gz", b"data", Duration::from_secs(3600));
        write_with_age(dir.path(), "new.sql.gz", b"", Duration::ZERO);

        let err = verify_latest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_verify_latest_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_latest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No backup files found"));

        let err = verify_latest(&dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("No backup directory found"));
    }

    #[test]
    fn test_listing_line() {
        let file = BackupFile {
            name: "voting_backup_20251019_070509.sql.gz".to_string(),
            path: PathBuf::from("backups/voting_backup_20251019_070509.sql.gz"),
            size: 2048,
            modified: SystemTime::now(),
        };
        let line = file.listing_line(1);
        assert!(line.starts_with("  1. voting_backup_20251019_070509.sql.gz (2048 bytes, "));
        assert!(line.ends_with(')'));
    }
}
