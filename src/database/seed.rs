//! Sample ballot data for exercising the voting flow.

use sqlx::Row;
use tracing::info;

use crate::database::models::Candidate;
use crate::database::queries::Queries;
use crate::database::Database;
use crate::error::{OpsError, Result};

pub const PRESIDENT: &str = "President";
pub const VICE_PRESIDENT: &str = "Vice President";

pub const PRESIDENT_CANDIDATES: &[(&str, &str)] = &[
    (
        "Alice Johnson",
        "Experienced leader focused on student welfare and academic excellence.",
    ),
    (
        "Bob Smith",
        "Tech-savvy innovator dedicated to modernizing club operations.",
    ),
    (
        "Carol Williams",
        "Community organizer with strong communication skills.",
    ),
];

pub const VICE_PRESIDENT_CANDIDATES: &[(&str, &str)] = &[
    (
        "David Brown",
        "Detail-oriented organizer with project management expertise.",
    ),
    (
        "Emma Davis",
        "Creative thinker focused on event planning and member engagement.",
    ),
    (
        "Frank Wilson",
        "Analytical problem-solver with financial management skills.",
    ),
];

/// Insert the sample candidates for both positions in one transaction and
/// return the full candidate list afterwards.
pub async fn seed_sample_candidates(database: &Database) -> Result<Vec<Candidate>> {
    let positions = Queries::positions(database.pool()).await?;
    let find = |name: &str| positions.iter().find(|p| p.position_name == name).map(|p| p.id);

    let (Some(president_id), Some(vice_president_id)) = (find(PRESIDENT), find(VICE_PRESIDENT))
    else {
        return Err(OpsError::Database(
            "President and Vice President positions not found".to_string(),
        ));
    };

    println!("President Position ID: {}", president_id);
    println!("Vice President Position ID: {}", vice_president_id);

    let mut tx = database.pool().begin().await?;

    for (label, position_id, candidates) in [
        (PRESIDENT, president_id, PRESIDENT_CANDIDATES),
        (VICE_PRESIDENT, vice_president_id, VICE_PRESIDENT_CANDIDATES),
    ] {
        println!("\nCreating {} candidates...", label);
        for &(name, manifesto) in candidates {
            let row = sqlx::query(
                r#"INSERT INTO "Candidate" (name, position_id, manifesto) VALUES ($1, $2, $3) RETURNING id, name"#,
            )
            .bind(name)
            .bind(position_id)
            .bind(manifesto)
            .fetch_one(&mut *tx)
            .await?;

            let id: i32 = row.try_get("id")?;
            let created: String = row.try_get("name")?;
            println!("  Created {} candidate: {} (ID: {})", label, created, id);
        }
    }

    tx.commit().await?;
    info!("Sample candidates committed");

    let candidates = Queries::candidates(database.pool()).await?;
    println!("\nAll candidates:");
    for candidate in &candidates {
        println!(
            "  ID {}: {} ({})",
            candidate.id, candidate.name, candidate.position_name
        );
    }

    Ok(candidates)
}
