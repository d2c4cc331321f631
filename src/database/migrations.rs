//! Migration runner
//!
//! Applies the embedded migration catalog in order and records each applied
//! migration in the `schema_migrations` table. Every migration runs in its own
//! transaction, so a failure leaves earlier migrations applied and the failing
//! one absent.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

use crate::database::models::{ColumnInfo, MigrationRecord, TableDescription, UserSample};
use crate::database::queries::Queries;
use crate::database::schema::{
    find_migration, migration_key, migration_names, Migration, MIGRATIONS, MIGRATIONS_TABLE,
    USER_CREATED_AT_MIGRATION,
};
use crate::database::Database;
use crate::error::{OpsError, Result};

/// Columns shown per table after an ad-hoc apply.
const PREVIEW_COLUMNS: usize = 3;

/// Users listed after adding `User.created_at`.
const SAMPLE_USERS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MigrationState {
    Applied { checksum_matches: bool },
    Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    pub name: String,
    #[serde(flatten)]
    pub state: MigrationState,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    pub migrations: Vec<MigrationStatus>,
    /// Applied names that no longer exist in the catalog.
    pub unknown: Vec<String>,
}

impl StatusReport {
    pub fn pending_count(&self) -> usize {
        self.migrations
            .iter()
            .filter(|m| m.state == MigrationState::Pending)
            .count()
    }

    pub fn drifted(&self) -> Vec<&str> {
        self.migrations
            .iter()
            .filter(|m| {
                m.state
                    == MigrationState::Applied {
                        checksum_matches: false,
                    }
            })
            .map(|m| m.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
}

/// Catalog entries not yet applied, in catalog order. Applied names may carry
/// a `.sql` suffix.
pub fn pending<'a>(catalog: &'a [Migration], applied: &[&str]) -> Vec<&'a Migration> {
    let applied: HashSet<&str> = applied.iter().map(|name| migration_key(name)).collect();
    catalog
        .iter()
        .filter(|m| !applied.contains(m.name))
        .collect()
}

/// Compare the catalog against the tracking table. Records written by older
/// runners carry no checksum and are treated as matching.
pub fn compute_status(catalog: &[Migration], records: &[MigrationRecord]) -> StatusReport {
    let by_name: HashMap<&str, &MigrationRecord> = records
        .iter()
        .map(|r| (migration_key(&r.migration_name), r))
        .collect();

    let migrations = catalog
        .iter()
        .map(|migration| {
            let state = match by_name.get(migration.name) {
                Some(record) => MigrationState::Applied {
                    checksum_matches: record
                        .checksum
                        .as_deref()
                        .map_or(true, |stored| stored == migration.checksum()),
                },
                None => MigrationState::Pending,
            };
            MigrationStatus {
                name: migration.name.to_string(),
                state,
            }
        })
        .collect();

    let known: HashSet<&str> = catalog.iter().map(|m| m.name).collect();
    let unknown = records
        .iter()
        .filter(|r| !known.contains(migration_key(&r.migration_name)))
        .map(|r| r.migration_name.clone())
        .collect();

    StatusReport { migrations, unknown }
}

/// Console lines for a status report.
pub fn status_lines(report: &StatusReport) -> Vec<String> {
    let mut lines = vec!["📋 Migration status:".to_string()];
    for migration in &report.migrations {
        lines.push(match migration.state {
            MigrationState::Applied {
                checksum_matches: true,
            } => format!("  ✅ {}", migration.name),
            MigrationState::Applied {
                checksum_matches: false,
            } => format!("  ⚠️ {} (applied, SQL changed since)", migration.name),
            MigrationState::Pending => format!("  ⏳ {} (pending)", migration.name),
        });
    }
    for name in &report.unknown {
        lines.push(format!("  ⚠️ {} (applied, not in catalog)", name));
    }
    lines.push(format!(
        "{} applied, {} pending",
        report.migrations.len() - report.pending_count(),
        report.pending_count()
    ));
    lines
}

/// Console lines confirming `User.created_at` and showing a few users.
pub fn user_created_at_lines(
    column: Option<&ColumnInfo>,
    total_users: i64,
    samples: &[UserSample],
) -> Vec<String> {
    let mut lines = vec![match column {
        Some(column) => format!(
            "  ✅ created_at column: {}, nullable: {}",
            column.data_type,
            if column.nullable() { "yes" } else { "no" }
        ),
        None => "  ⚠️ created_at column not found".to_string(),
    }];
    lines.push(format!("  Total users in system: {}", total_users));

    if !samples.is_empty() {
        lines.push("  Sample users with created_at:".to_string());
        for user in samples {
            let created = user
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "     ID: {}, Voucher: {}, Created: {}",
                user.id, user.voucher, created
            ));
        }
    }
    lines
}

/// Console lines describing one table after a migration touched it.
pub fn describe_lines(table: &TableDescription) -> Vec<String> {
    if !table.exists {
        return vec![format!("  ❌ {} table not found", table.table_name)];
    }

    let mut lines = vec![
        format!("  ✅ {} table present", table.table_name),
        format!("     Columns: {}", table.columns.len()),
    ];
    for column in table.columns.iter().take(PREVIEW_COLUMNS) {
        lines.push(format!("       - {}: {}", column.column_name, column.data_type));
    }
    if table.columns.len() > PREVIEW_COLUMNS {
        lines.push(format!(
            "       ... and {} more columns",
            table.columns.len() - PREVIEW_COLUMNS
        ));
    }
    lines
}

pub struct MigrationRunner<'a> {
    database: &'a Database,
    catalog: &'a [Migration],
}

impl<'a> MigrationRunner<'a> {
    pub fn new(database: &'a Database) -> Self {
        Self {
            database,
            catalog: MIGRATIONS,
        }
    }

    /// Create the tracking table when missing.
    pub async fn initialize(&self) -> Result<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id SERIAL PRIMARY KEY,
                migration_name VARCHAR(255) NOT NULL UNIQUE,
                executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_migration_name ON {table}(migration_name);
            ALTER TABLE {table} ADD COLUMN IF NOT EXISTS checksum VARCHAR(64);
            "#,
            table = MIGRATIONS_TABLE
        );

        sqlx::raw_sql(&sql).execute(self.database.pool()).await?;
        debug!("Migration tracking table ready");
        Ok(())
    }

    pub async fn executed(&self) -> Result<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT migration_name, checksum, executed_at FROM {} ORDER BY migration_name",
            MIGRATIONS_TABLE
        );
        let records = sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(self.database.pool())
            .await?;
        Ok(records)
    }

    async fn applied_names(&self) -> Result<Vec<String>> {
        Ok(self
            .executed()
            .await?
            .into_iter()
            .map(|r| r.migration_name)
            .collect())
    }

    /// Apply one migration and record it, atomically.
    pub async fn run(&self, migration: &Migration) -> Result<()> {
        println!("🔄 Running migration: {}", migration.name);

        let mut tx = self.database.pool().begin().await?;

        if let Err(e) = sqlx::raw_sql(migration.sql).execute(&mut *tx).await {
            error!("Migration {} failed: {}", migration.name, e);
            tx.rollback().await?;
            println!("❌ Migration failed: {}", migration.name);
            return Err(OpsError::Migration(format!("{}: {}", migration.name, e)));
        }

        let insert = format!(
            "INSERT INTO {} (migration_name, checksum) VALUES ($1, $2)",
            MIGRATIONS_TABLE
        );
        sqlx::query(&insert)
            .bind(migration.name)
            .bind(migration.checksum())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Recorded migration {}", migration.name);
        println!("✅ Migration completed: {}", migration.name);
        Ok(())
    }

    /// Apply every pending migration. Returns the names applied.
    pub async fn migrate(&self) -> Result<Vec<&'static str>> {
        println!("🚀 Starting database migrations...");
        self.initialize().await?;

        let applied = self.applied_names().await?;
        let applied: Vec<&str> = applied.iter().map(String::as_str).collect();
        let todo = pending(self.catalog, &applied);

        if todo.is_empty() {
            println!("✅ No pending migrations");
            return Ok(Vec::new());
        }

        println!("📋 Found {} pending migrations", todo.len());
        let mut ran = Vec::with_capacity(todo.len());
        for migration in todo {
            self.run(migration).await?;
            ran.push(migration.name);
        }

        println!("🎉 All migrations completed successfully!");
        Ok(ran)
    }

    /// Forget the last applied migration. The schema itself is left as is.
    pub async fn rollback(&self) -> Result<Option<String>> {
        self.initialize().await?;
        let applied = self.applied_names().await?;

        let Some(last) = applied.last() else {
            println!("❌ No migrations to rollback");
            return Ok(None);
        };

        println!("🔄 Rolling back migration: {}", last);
        let sql = format!("DELETE FROM {} WHERE migration_name = $1", MIGRATIONS_TABLE);
        sqlx::query(&sql)
            .bind(last.as_str())
            .execute(self.database.pool())
            .await?;
        warn!("Tracking row for {} removed; schema objects remain", last);
        println!("✅ Rolled back migration: {}", last);
        Ok(Some(last.clone()))
    }

    /// Compare the catalog with the tracking table. Prints nothing; see
    /// [`status_lines`].
    pub async fn status(&self) -> Result<StatusReport> {
        self.initialize().await?;
        let records = self.executed().await?;
        Ok(compute_status(self.catalog, &records))
    }

    /// Apply a single named migration outside the normal sequence, then
    /// describe the tables it touches.
    pub async fn apply_named(&self, name: &str) -> Result<ApplyOutcome> {
        let migration = find_migration(name)
            .ok_or_else(|| OpsError::unknown_migration(name, &migration_names()))?;

        self.initialize().await?;
        let applied = self.applied_names().await?;

        let outcome = if applied.iter().any(|n| migration_key(n) == migration.name) {
            println!("✅ {} is already applied; nothing to do", migration.name);
            ApplyOutcome::AlreadyApplied
        } else {
            self.run(migration).await?;
            ApplyOutcome::Applied
        };

        println!("\nVerifying tables:");
        for table in migration.tables {
            let description = Queries::describe_table(self.database.pool(), table).await?;
            for line in describe_lines(&description) {
                println!("{}", line);
            }
        }

        if migration.name == USER_CREATED_AT_MIGRATION {
            self.report_user_created_at().await?;
        }

        Ok(outcome)
    }

    async fn report_user_created_at(&self) -> Result<()> {
        let pool = self.database.pool();
        let column = Queries::column(pool, "User", "created_at").await?;
        let total = Queries::user_count(pool).await?;
        let samples = match column {
            Some(_) => Queries::sample_users(pool, SAMPLE_USERS).await?,
            None => Vec::new(),
        };

        println!();
        for line in user_created_at_lines(column.as_ref(), total, &samples) {
            println!("{}", line);
        }
        Ok(())
    }
}
