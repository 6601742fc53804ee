//! # Ports
//!
//! Storage contracts the adapter crates implement. The review store is the
//! durable, authoritative document repository; the counter store is the
//! ephemeral key-value tier for like counts, per-user liked sets, and
//! pinned pointers. There is no transaction spanning the two.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Review, ReviewDraft, ReviewFilter, ReviewSort};

/// Durable document repository for reviews.
///
/// All operations are single-document or single-query; no cross-document
/// transactions are required or used.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Inserts a new review and returns the store-assigned id.
    async fn insert(&self, draft: ReviewDraft) -> Result<Uuid>;

    /// Point lookup by id. `NotFound` when no document exists.
    async fn get(&self, id: Uuid) -> Result<Review>;

    /// Removes a document by id. `NotFound` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Filtered, optionally sorted list query.
    async fn find(&self, filter: ReviewFilter, sort: ReviewSort) -> Result<Vec<Review>>;

    /// Flips the persisted pinned flag. `NotFound` when nothing matched.
    async fn update_pin_flag(&self, id: Uuid, pinned: bool) -> Result<()>;
}

/// Ephemeral counter/set store.
///
/// Treated as best-effort cache state: readers degrade on unavailability,
/// mutating operations surface the failure.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically adds `delta` to one hash field, creating it at 0 first
    /// if absent.
    async fn incr_hash_field(&self, key: &str, field: &str, delta: i64) -> Result<()>;

    /// Adds a member to a set; a no-op if already present.
    async fn set_add(&self, key: &str, member: &str) -> Result<()>;

    /// Fetches many hash fields in a single round trip. Missing fields
    /// resolve to 0, never an error.
    async fn multi_get_hash_fields(
        &self,
        key: &str,
        fields: &[String],
    ) -> Result<HashMap<String, i64>>;

    /// All members of a set; empty (not an error) when the key is absent.
    async fn set_members(&self, key: &str) -> Result<Vec<String>>;

    /// Single hash field; `None` when the key or field is absent.
    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Writes a single hash field, overwriting any previous value.
    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<()>;

    /// Removes a single hash field; a no-op if absent.
    async fn delete_hash_field(&self, key: &str, field: &str) -> Result<()>;
}
