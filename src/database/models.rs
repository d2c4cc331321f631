use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
    pub column_default: Option<String>,
}

impl ColumnInfo {
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("YES")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub id: i32,
    pub position_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub position_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteSample {
    pub voucher: String,
    pub candidate_id: i32,
    pub position_id: i32,
    pub verification_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSample {
    pub id: i32,
    pub voucher: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MigrationRecord {
    pub migration_name: String,
    pub checksum: Option<String>,
    pub executed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescription {
    pub table_name: String,
    pub exists: bool,
    pub columns: Vec<ColumnInfo>,
}
