//! # Domain Models
//!
//! Core entities of the review service. Review ids are UUID v7 for
//! time-ordered, globally unique identification; they are assigned by the
//! review store at insert time and never change afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-authored comment/rating attached to a product, optionally a
/// reply to another review. This is the durable document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub content: String,
    pub author_id: i64,
    pub product_id: i64,
    /// `None` for top-level reviews, the parent review for threaded replies.
    pub parent_id: Option<Uuid>,
    pub stars: i16,
    pub is_anonymous: bool,
    /// References to uploaded pictures, handled by an external media tier.
    pub pic_info: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Mirror of the pinned pointer held in the counter store, persisted
    /// on the document for query convenience.
    pub is_pinned: bool,
}

/// A review as handed to the store for insertion: everything but the id,
/// which the store assigns. New reviews are never pinned.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub content: String,
    pub author_id: i64,
    pub product_id: i64,
    pub parent_id: Option<Uuid>,
    pub stars: i16,
    pub is_anonymous: bool,
    pub pic_info: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A `Review` joined with its live like count and the requesting user's
/// liked flag. Never persisted; computed per request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewInfo {
    pub id: Uuid,
    pub content: String,
    pub author_id: i64,
    pub product_id: i64,
    pub parent_id: Option<Uuid>,
    pub stars: i16,
    pub is_anonymous: bool,
    pub pic_info: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub is_pinned: bool,
    pub likes: i64,
    pub current_user_liked: bool,
}

impl ReviewInfo {
    pub fn from_review(review: Review, likes: i64, current_user_liked: bool) -> Self {
        Self {
            id: review.id,
            content: review.content,
            author_id: review.author_id,
            product_id: review.product_id,
            parent_id: review.parent_id,
            stars: review.stars,
            is_anonymous: review.is_anonymous,
            pic_info: review.pic_info,
            created_at: review.created_at,
            is_pinned: review.is_pinned,
            likes,
            current_user_liked,
        }
    }
}

/// Result of a per-product listing: the filtered reviews plus the one
/// pinned review for the product, if any.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReviews {
    pub reviews: Vec<ReviewInfo>,
    pub pinned: Option<ReviewInfo>,
}

/// Equality filter for review queries. An unset field matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub product_id: Option<i64>,
    pub author_id: Option<i64>,
    pub stars: Option<i16>,
}

/// Sort order for review queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSort {
    /// Store-native order, no explicit sort clause.
    Unsorted,
    /// Newest first, by creation timestamp.
    CreatedDesc,
}
