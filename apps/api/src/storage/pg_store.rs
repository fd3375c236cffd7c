use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::storage::{KeyValueStore, StoreError};

/// Postgres-backed store over a single `kv_entries` table. Expired rows read
/// as absent and are purged on startup.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the table if needed and clears out expired rows.
    pub async fn init(self) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                expires_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        let purged = sqlx::query("DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at <= now()")
            .execute(&self.pool)
            .await?
            .rows_affected();
        info!("kv_entries ready ({purged} expired rows purged)");

        Ok(self)
    }
}

fn expiry(ttl: Option<Duration>) -> Result<Option<DateTime<Utc>>, StoreError> {
    ttl.map(|ttl| {
        chrono::Duration::from_std(ttl)
            .map(|ttl| Utc::now() + ttl)
            .map_err(|e| StoreError::Backend(format!("TTL out of range: {e}")))
    })
    .transpose()
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT value FROM kv_entries WHERE key = $1 AND (expires_at IS NULL OR expires_at > now())",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, expires_at, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value,
                    expires_at = EXCLUDED.expires_at,
                    updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expiry(ttl)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
