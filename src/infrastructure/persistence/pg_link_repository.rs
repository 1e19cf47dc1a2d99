//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, LinkTotals};
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection and type safety.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    long_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    last_clicked_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.code,
            r.long_url,
            r.clicks,
            r.created_at,
            r.last_clicked_at,
        )
    }
}

fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && matches!(db_err.constraint(), Some("links_code_key"))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (id, code, long_url)
            VALUES ($1, $2, $3)
            RETURNING id, code, long_url, clicks, created_at, last_clicked_at
            "#,
        )
        .bind(new_link.id)
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                AppError::persistence(
                    "Short code already exists",
                    json!({ "code": new_link.code }),
                )
            } else {
                e.into()
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, long_url, clicks, created_at, last_clicked_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_destination_by_code(&self, code: &str) -> Result<Option<String>, AppError> {
        let long_url = sqlx::query_scalar::<_, String>("SELECT long_url FROM links WHERE code = $1")
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(long_url)
    }

    async fn record_click(&self, code: &str, clicked_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                last_clicked_at = GREATEST(last_clicked_at, $2)
            WHERE code = $1
            "#,
        )
        .bind(code)
        .bind(clicked_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn totals(&self) -> Result<LinkTotals, AppError> {
        let (links, clicks) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(clicks), 0)::BIGINT FROM links",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkTotals { links, clicks })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
