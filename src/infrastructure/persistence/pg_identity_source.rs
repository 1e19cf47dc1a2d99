//! PostgreSQL sequence used as the link identity source.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::IdentitySource;
use crate::error::AppError;

/// Sequence backing `links.id`.
pub const LINKS_ID_SEQUENCE: &str = "links_id_seq";

/// Draws identities from a PostgreSQL sequence.
///
/// `nextval` is atomic across every connection and every instance sharing the
/// database, and never hands out a value twice, even if the surrounding
/// transaction rolls back.
pub struct PgIdentitySource {
    pool: Arc<PgPool>,
}

impl PgIdentitySource {
    /// Creates an identity source over the `links_id_seq` sequence.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentitySource for PgIdentitySource {
    async fn next_identity(&self) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT nextval($1::regclass)")
            .bind(LINKS_ID_SEQUENCE)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(id)
    }
}
