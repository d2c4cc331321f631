//! Read-only queries shared by the verification and migration tools.
//!
//! `information_schema` columns are cast to `text` so they decode as `String`
//! regardless of the server's identifier domain types.

use sqlx::PgPool;

use crate::database::models::*;

pub struct Queries;

impl Queries {
    pub async fn server_version(pool: &PgPool) -> Result<String, sqlx::Error> {
        sqlx::query_scalar("SELECT version()").fetch_one(pool).await
    }

    pub async fn table_exists(pool: &PgPool, table: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await
    }

    pub async fn table_columns(pool: &PgPool, table: &str) -> Result<Vec<ColumnInfo>, sqlx::Error> {
        sqlx::query_as::<_, ColumnInfo>(
            r#"
            SELECT column_name::text AS column_name,
                   data_type::text AS data_type,
                   is_nullable::text AS is_nullable,
                   column_default::text AS column_default
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .fetch_all(pool)
        .await
    }

    pub async fn column(
        pool: &PgPool,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnInfo>, sqlx::Error> {
        sqlx::query_as::<_, ColumnInfo>(
            r#"
            SELECT column_name::text AS column_name,
                   data_type::text AS data_type,
                   is_nullable::text AS is_nullable,
                   column_default::text AS column_default
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2
            "#,
        )
        .bind(table)
        .bind(column)
        .fetch_optional(pool)
        .await
    }

    pub async fn describe_table(
        pool: &PgPool,
        table: &str,
    ) -> Result<TableDescription, sqlx::Error> {
        let exists = Self::table_exists(pool, table).await?;
        let columns = if exists {
            Self::table_columns(pool, table).await?
        } else {
            Vec::new()
        };

        Ok(TableDescription {
            table_name: table.to_string(),
            exists,
            columns,
        })
    }

    pub async fn positions(pool: &PgPool) -> Result<Vec<Position>, sqlx::Error> {
        sqlx::query_as::<_, Position>(r#"SELECT id, position_name FROM "Position" ORDER BY id"#)
            .fetch_all(pool)
            .await
    }

    pub async fn candidates(pool: &PgPool) -> Result<Vec<Candidate>, sqlx::Error> {
        sqlx::query_as::<_, Candidate>(
            r#"
            SELECT c.id, c.name, p.position_name
            FROM "Candidate" c
            JOIN "Position" p ON c.position_id = p.id
            ORDER BY p.id, c.id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn vote_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Vote""#)
            .fetch_one(pool)
            .await
    }

    pub async fn sample_votes(pool: &PgPool, limit: i64) -> Result<Vec<VoteSample>, sqlx::Error> {
        sqlx::query_as::<_, VoteSample>(
            r#"
            SELECT voucher, candidate_id, position_id, verification_code
            FROM "Vote"
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn user_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "User""#)
            .fetch_one(pool)
            .await
    }

    /// Assumes `User.created_at` exists.
    pub async fn sample_users(pool: &PgPool, limit: i64) -> Result<Vec<UserSample>, sqlx::Error> {
        sqlx::query_as::<_, UserSample>(
            r#"SELECT id, voucher, created_at FROM "User" ORDER BY id LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
