//! Restores against a stand-in `psql`.

#![cfg(unix)]

use ballot_ops::backup::compression::compress_file;
use ballot_ops::backup::list_backups;
use ballot_ops::restore::{restore_from_backup, RestoreOutcome};
use ballot_ops::OpsError;
use std::fs;

mod common;
use common::*;

const DUMP: &str = "DROP TABLE IF EXISTS \"Vote\";\nCREATE TABLE \"Vote\" (id SERIAL PRIMARY KEY);\n";

/// psql stand-in that copies its `-f` input to `record`.
fn recording_psql(dir: &std::path::Path, record: &std::path::Path) -> String {
    let body = format!(
        r#"in=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-f" ]; then shift; in="$1"; fi
  shift
done
cp "$in" '{}'
echo 'CREATE TABLE'"#,
        record.display()
    );
    fake_tool(dir, "psql", &body).to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_restore_from_archive() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempfile::tempdir()?;
    let backups = tempfile::tempdir()?;
    let record = tools.path().join("replayed.sql");

    let plain = backups.path().join("voting_backup_20251019_070509.sql");
    fs::write(&plain, DUMP)?;
    let archive = compress_file(&plain)?;

    let mut config = test_config(backups.path());
    config.psql_bin = recording_psql(tools.path(), &record);

    let listed = list_backups(backups.path())?;
    assert_eq!(listed.len(), 1);

    let outcome = restore_from_backup(&config, &listed[0].path).await?;

    assert_eq!(outcome, RestoreOutcome::Restored);
    assert_eq!(fs::read_to_string(&record)?, DUMP);
    // temporary expansion removed, archive kept
    assert!(!plain.exists());
    assert!(archive.exists());
    Ok(())
}

#[tokio::test]
async fn test_restore_plain_dump_is_left_in_place() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempfile::tempdir()?;
    let backups = tempfile::tempdir()?;
    let record = tools.path().join("replayed.sql");

    let plain = backups.path().join("manual.sql");
    fs::write(&plain, DUMP)?;

    let mut config = test_config(backups.path());
    config.psql_bin = recording_psql(tools.path(), &record);

    let outcome = restore_from_backup(&config, &plain).await?;

    assert_eq!(outcome, RestoreOutcome::Restored);
    assert!(plain.exists());
    Ok(())
}

#[tokio::test]
async fn test_failed_restore_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempfile::tempdir()?;
    let backups = tempfile::tempdir()?;

    let plain = backups.path().join("voting_backup_20251019_070509.sql");
    fs::write(&plain, DUMP)?;
    let archive = compress_file(&plain)?;

    let mut config = test_config(backups.path());
    config.psql_bin = fake_tool(
        tools.path(),
        "psql",
        "echo 'ERROR: relation \"User\" does not exist' >&2\nexit 3",
    )
    .to_string_lossy()
    .into_owned();

    let err = restore_from_backup(&config, &archive).await.unwrap_err();

    assert!(matches!(err, OpsError::Process(_)));
    assert!(err.to_string().contains("does not exist"));
    assert!(!plain.exists());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_archive_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
    let tools = tempfile::tempdir()?;
    let backups = tempfile::tempdir()?;
    let record = tools.path().join("replayed.sql");

    let archive = backups.path().join("voting_backup_20251019_070509.sql.gz");
    fs::write(&archive, "truncated, not gzip")?;

    let mut config = test_config(backups.path());
    config.psql_bin = recording_psql(tools.path(), &record);

    let err = restore_from_backup(&config, &archive).await.unwrap_err();

    assert!(matches!(err, OpsError::Restore(_)));
    assert!(!backups.path().join("voting_backup_20251019_070509.sql").exists());
    assert!(archive.exists());
    // psql never ran
    assert!(!record.exists());
    Ok(())
}
