//! `pg_dump` invocation.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{OpsError, Result};

pub const BACKUP_PREFIX: &str = "voting_backup_";
pub const DUMP_EXTENSION: &str = "sql";

/// `voting_backup_<YYYYmmdd_HHMMSS>.sql`
pub fn backup_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}{}.{}",
        BACKUP_PREFIX,
        at.format("%Y%m%d_%H%M%S"),
        DUMP_EXTENSION
    )
}

#[derive(Debug, Clone)]
pub struct DumpCommand {
    pub program: String,
    pub database_url: String,
    pub output: PathBuf,
}

impl DumpCommand {
    pub fn new(program: &str, database_url: &str, output: &Path) -> Self {
        Self {
            program: program.to_string(),
            database_url: database_url.to_string(),
            output: output.to_path_buf(),
        }
    }

    /// Plain-SQL dump with DROP ... IF EXISTS so a restore replaces objects.
    pub fn args(&self) -> Vec<String> {
        vec![
            self.database_url.clone(),
            "--no-password".to_string(),
            "--clean".to_string(),
            "--if-exists".to_string(),
            "--verbose".to_string(),
            "-f".to_string(),
            self.output.to_string_lossy().into_owned(),
        ]
    }

    pub async fn run(&self) -> Result<()> {
        info!("Running {} into {:?}", self.program, self.output);

        let output = Command::new(&self.program)
            .args(self.args())
            .output()
            .await
            .map_err(|e| OpsError::Process(format!("Failed to start {}: {}", self.program, e)))?;

        // pg_dump --verbose reports progress on stderr
        debug!("{} stderr: {}", self.program, String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(OpsError::process_failed(
                &self.program,
                &String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_backup_file_name_format() {
        let at = Utc.with_ymd_and_hms(2025, 10, 19, 7, 5, 9).unwrap();
        assert_eq!(backup_file_name(&at), "voting_backup_20251019_070509.sql");
    }

    #[test]
    fn test_dump_args() {
        let cmd = DumpCommand::new(
            "pg_dump",
            "postgres://u:p@db/votes",
            Path::new("backups/voting_backup_20251019_070509.sql"),
        );

        assert_eq!(
            cmd.args(),
            vec![
                "postgres://u:p@db/votes",
                "--no-password",
                "--clean",
                "--if-exists",
                "--verbose",
                "-f",
                "backups/voting_backup_20251019_070509.sql",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_process_error() {
        let cmd = DumpCommand::new(
            "/nonexistent/pg_dump",
            "postgres://localhost/votes",
            Path::new("out.sql"),
        );
        let err = cmd.run().await.unwrap_err();
        assert!(matches!(err, OpsError::Process(_)));
    }
}
