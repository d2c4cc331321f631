//! Read-only verification of the migrated schema and its contents.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::database::models::{ColumnInfo, Position, VoteSample};
use crate::database::queries::Queries;
use crate::database::seed::{PRESIDENT, VICE_PRESIDENT};
use crate::database::Database;
use crate::error::Result;

const SAMPLE_VOTES: i64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub user_created_at: Option<ColumnInfo>,
    pub positions: Vec<Position>,
    pub has_required_positions: bool,
    pub vote_columns: Vec<ColumnInfo>,
    pub vote_count: i64,
    pub sample_votes: Vec<VoteSample>,
    pub user_count: i64,
    pub server_version: String,
}

pub fn has_required_positions(positions: &[Position]) -> bool {
    let has = |name: &str| positions.iter().any(|p| p.position_name == name);
    has(PRESIDENT) && has(VICE_PRESIDENT)
}

impl VerificationReport {
    pub async fn collect(database: &Database) -> Result<Self> {
        let started_at = Local::now();
        let pool = database.pool();

        let user_created_at = Queries::column(pool, "User", "created_at").await?;
        let positions = Queries::positions(pool).await?;
        let has_required_positions = has_required_positions(&positions);
        let vote_columns = Queries::table_columns(pool, "Vote").await?;
        let vote_count = Queries::vote_count(pool).await?;
        let sample_votes = if vote_count > 0 {
            Queries::sample_votes(pool, SAMPLE_VOTES).await?
        } else {
            Vec::new()
        };
        let user_count = Queries::user_count(pool).await?;
        let server_version = database.server_version().await?;

        info!(
            "Verification collected: {} positions, {} votes, {} users",
            positions.len(),
            vote_count,
            user_count
        );

        Ok(Self {
            started_at,
            finished_at: Local::now(),
            user_created_at,
            positions,
            has_required_positions,
            vote_columns,
            vote_count,
            sample_votes,
            user_count,
            server_version,
        })
    }

    pub fn render(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.push("Verifying database migrations...".to_string());
        out.push(format!(
            "Started at: {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S")
        ));

        out.push("\n1. Checking User table structure...".to_string());
        match &self.user_created_at {
            Some(column) => out.push(format!(
                "   ✅ User.created_at column exists: {}",
                column.data_type
            )),
            None => out.push("   ❌ User.created_at column missing!".to_string()),
        }

        out.push("\n2. Checking Position table contents...".to_string());
        out.push(format!("   Found {} positions:", self.positions.len()));
        for position in &self.positions {
            out.push(format!("     - ID {}: '{}'", position.id, position.position_name));
        }
        if self.has_required_positions {
            out.push("   ✅ President and Vice President positions exist!".to_string());
        } else {
            out.push("   ❌ President or Vice President positions missing!".to_string());
        }

        out.push("\n3. Checking Vote table structure...".to_string());
        out.push(format!("   Vote table has {} columns:", self.vote_columns.len()));
        for column in &self.vote_columns {
            out.push(format!(
                "     - {}: {} (nullable: {})",
                column.column_name, column.data_type, column.is_nullable
            ));
        }

        out.push("\n4. Checking existing votes...".to_string());
        out.push(format!("   Total votes in system: {}", self.vote_count));
        if !self.sample_votes.is_empty() {
            out.push("   Sample votes:".to_string());
            for vote in &self.sample_votes {
                out.push(format!(
                    "     - Voucher: {}, Candidate: {}, Position: {}, Code: {}",
                    vote.voucher, vote.candidate_id, vote.position_id, vote.verification_code
                ));
            }
        }

        out.push("\n5. Checking User table...".to_string());
        out.push(format!("   Total users in system: {}", self.user_count));

        out.push(format!("\nConnected to: {}", self.server_version));
        out.push(format!(
            "\nVerification completed at: {}",
            self.finished_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out
    }
}
