use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::history::repo_types::{HistoryRecord, NewHistoryRecord};

/// Append-only, owner-scoped history store.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<()>;

    /// All records of `owner_email`, most recent first.
    async fn list_by_owner(&self, owner_email: &str) -> anyhow::Result<Vec<HistoryRecord>>;
}

#[derive(Clone)]
pub struct PgHistoryStore {
    db: PgPool,
}

impl PgHistoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO search_history (user_email, search_url, search_response, recorded_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.user_email)
        .bind(&record.search_url)
        .bind(&record.search_response)
        .bind(record.recorded_at)
        .execute(&self.db)
        .await
        .context("insert search history")?;
        Ok(())
    }

    async fn list_by_owner(&self, owner_email: &str) -> anyhow::Result<Vec<HistoryRecord>> {
        let rows = sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT id, user_email, search_url, search_response, recorded_at
            FROM search_history
            WHERE user_email = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(owner_email)
        .fetch_all(&self.db)
        .await
        .context("list search history by owner")?;
        Ok(rows)
    }
}
