//! In-memory implementations of both storage ports, faithful to the real
//! adapters' observable behavior: the review fake keeps insertion order
//! and assigns ids; the counter fake keeps hash values as strings and can
//! simulate a total outage.

#![allow(dead_code)] // not every test file exercises every helper

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use domains::{
    CounterStore, DomainError, Result, Review, ReviewDraft, ReviewFilter, ReviewSort, ReviewStore,
};

#[derive(Default)]
pub struct InMemoryReviewStore {
    rows: Mutex<Vec<Review>>,
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, draft: ReviewDraft) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let review = Review {
            id,
            content: draft.content,
            author_id: draft.author_id,
            product_id: draft.product_id,
            parent_id: draft.parent_id,
            stars: draft.stars,
            is_anonymous: draft.is_anonymous,
            pic_info: draft.pic_info,
            created_at: draft.created_at,
            is_pinned: false,
        };
        self.rows.lock().unwrap().push(review);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Review> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| DomainError::review_not_found(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(DomainError::review_not_found(id));
        }
        Ok(())
    }

    async fn find(&self, filter: ReviewFilter, sort: ReviewSort) -> Result<Vec<Review>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Review> = rows
            .iter()
            .filter(|r| {
                filter.product_id.is_none_or(|p| r.product_id == p)
                    && filter.author_id.is_none_or(|a| r.author_id == a)
                    && filter.stars.is_none_or(|s| r.stars == s)
            })
            .cloned()
            .collect();
        if sort == ReviewSort::CreatedDesc {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(matched)
    }

    async fn update_pin_flag(&self, id: Uuid, pinned: bool) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.is_pinned = pinned;
                Ok(())
            }
            None => Err(DomainError::review_not_found(id)),
        }
    }
}

#[derive(Default)]
pub struct InMemoryCounterStore {
    hashes: Mutex<HashMap<String, HashMap<String, String>>>,
    sets: Mutex<HashMap<String, HashSet<String>>>,
    unavailable: AtomicBool,
}

impl InMemoryCounterStore {
    /// Simulates a total counter-store outage; every port method fails
    /// until cleared.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable(
                "counter store down".to_string(),
            ));
        }
        Ok(())
    }

    /// Direct hash inspection for assertions, bypassing the port.
    pub fn hash_field(&self, key: &str, field: &str) -> Option<String> {
        self.hashes
            .lock()
            .unwrap()
            .get(key)
            .and_then(|hash| hash.get(field).cloned())
    }

    pub fn set_contains(&self, key: &str, member: &str) -> bool {
        self.sets
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|set| set.contains(member))
    }

    pub fn set_len(&self, key: &str) -> usize {
        self.sets
            .lock()
            .unwrap()
            .get(key)
            .map_or(0, |set| set.len())
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn incr_hash_field(&self, key: &str, field: &str, delta: i64) -> Result<()> {
        self.check_available()?;
        let mut hashes = self.hashes.lock().unwrap();
        let entry = hashes
            .entry(key.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(|| "0".to_string());
        let current: i64 = entry.parse().unwrap_or(0);
        *entry = (current + delta).to_string();
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<()> {
        self.check_available()?;
        self.sets
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn multi_get_hash_fields(
        &self,
        key: &str,
        fields: &[String],
    ) -> Result<HashMap<String, i64>> {
        self.check_available()?;
        let hashes = self.hashes.lock().unwrap();
        let hash = hashes.get(key);
        Ok(fields
            .iter()
            .map(|field| {
                let count = hash
                    .and_then(|h| h.get(field))
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                (field.clone(), count)
            })
            .collect())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        self.check_available()?;
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.hash_field(key, field))
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.hashes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_hash_field(&self, key: &str, field: &str) -> Result<()> {
        self.check_available()?;
        if let Some(hash) = self.hashes.lock().unwrap().get_mut(key) {
            hash.remove(field);
        }
        Ok(())
    }
}
