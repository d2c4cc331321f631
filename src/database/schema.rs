// Embedded schema migrations, applied in catalog order.

use sha2::{Digest, Sha256};

pub const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");
pub const USER_CREATED_AT: &str = include_str!("../../migrations/002_add_user_created_at.sql");
pub const PRESIDENT_VICE_PRESIDENT: &str =
    include_str!("../../migrations/003_setup_president_vice_president.sql");
pub const ELECTION_MANAGEMENT: &str =
    include_str!("../../migrations/004_add_election_management_tables.sql");

/// Name of the table recording applied migrations.
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

pub const USER_CREATED_AT_MIGRATION: &str = "002_add_user_created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
    /// Tables this migration creates or alters.
    pub tables: &'static [&'static str],
}

impl Migration {
    /// Hex SHA-256 of the embedded SQL.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.sql.as_bytes());
        hex::encode(hasher.finalize())
    }
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "001_initial_schema",
        sql: INITIAL_SCHEMA,
        tables: &[
            "AdminUser",
            "AuditLog",
            "RateLimit",
            "User",
            "Position",
            "Candidate",
            "Vote",
        ],
    },
    Migration {
        name: USER_CREATED_AT_MIGRATION,
        sql: USER_CREATED_AT,
        tables: &["User"],
    },
    Migration {
        name: "003_setup_president_vice_president",
        sql: PRESIDENT_VICE_PRESIDENT,
        tables: &["Position"],
    },
    Migration {
        name: "004_add_election_management_tables",
        sql: ELECTION_MANAGEMENT,
        tables: &[
            "ElectionStatus",
            "RunoffElection",
            "RunoffCandidate",
            "RunoffVote",
        ],
    },
];

/// Catalog name for `name`. Older runners recorded the file name, so
/// `001_initial_schema.sql` and `001_initial_schema` are the same migration.
pub fn migration_key(name: &str) -> &str {
    name.trim().trim_end_matches(".sql")
}

pub fn find_migration(name: &str) -> Option<&'static Migration> {
    let name = migration_key(name);
    MIGRATIONS.iter().find(|m| m.name == name)
}

pub fn migration_names() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|m| m.name).collect()
}
