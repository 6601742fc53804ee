//! # RedisCounterStore
//!
//! Redis-backed implementation of the `CounterStore` port, pooled through
//! deadpool. Values are read leniently: a missing hash field resolves to
//! zero and an unparsable count is treated as zero rather than an error,
//! since this tier is best-effort cache state.

use std::collections::HashMap;

use async_trait::async_trait;
use deadpool_redis::redis::{cmd, AsyncCommands, RedisError};
use deadpool_redis::{Config as RedisConfig, Connection, Pool, Runtime};

use domains::{CounterStore, DomainError, Result};

pub struct RedisCounterStore {
    pool: Pool,
}

impl RedisCounterStore {
    /// Builds the connection pool. Connections are established lazily, so
    /// an unreachable server surfaces per-operation, not here.
    pub fn connect(url: &str) -> Result<Self> {
        let pool = RedisConfig::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| DomainError::StoreUnavailable(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| DomainError::StoreUnavailable(err.to_string()))
    }
}

fn unavailable(err: RedisError) -> DomainError {
    DomainError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr_hash_field(&self, key: &str, field: &str, delta: i64) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: i64 = conn.hincr(key, field, delta).await.map_err(unavailable)?;
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: i64 = conn.sadd(key, member).await.map_err(unavailable)?;
        Ok(())
    }

    async fn multi_get_hash_fields(
        &self,
        key: &str,
        fields: &[String],
    ) -> Result<HashMap<String, i64>> {
        let mut counts = HashMap::with_capacity(fields.len());
        if fields.is_empty() {
            return Ok(counts);
        }
        let mut conn = self.conn().await?;
        // One HMGET keeps the join at a single round trip for any list size.
        let values: Vec<Option<String>> = cmd("HMGET")
            .arg(key)
            .arg(fields)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        for (field, value) in fields.iter().zip(values) {
            let count = value.and_then(|v| v.parse().ok()).unwrap_or(0);
            counts.insert(field.clone(), count);
        }
        Ok(counts)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.smembers(key).await.map_err(unavailable)
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        conn.hget(key, field).await.map_err(unavailable)
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: () = conn.hset(key, field, value).await.map_err(unavailable)?;
        Ok(())
    }

    async fn delete_hash_field(&self, key: &str, field: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: i64 = conn.hdel(key, field).await.map_err(unavailable)?;
        Ok(())
    }
}
