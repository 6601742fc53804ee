//! # ReviewService
//!
//! The dual-store consistency layer. Review documents live in the durable
//! review store; like counts, per-user liked sets, and pinned pointers live
//! in the ephemeral counter store. The two back ends fail independently and
//! no transaction spans them: each multi-step operation here has a fixed
//! step order chosen so that a crash mid-way degrades to a safe state
//! (missing pin, drifted counter) instead of a contradictory one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use domains::{
    CounterStore, DomainError, ProductReviews, Result, Review, ReviewDraft, ReviewFilter,
    ReviewInfo, ReviewSort, ReviewStore,
};

/// Hash mapping review-id to its like count.
pub const REVIEW_LIKES_KEY: &str = "review_likes";

/// Hash mapping stringified product-id to the pinned review-id.
pub const PINNED_REVIEWS_KEY: &str = "pinned_reviews";

/// Set of review-ids one user has liked.
fn user_likes_key(user_id: i64) -> String {
    format!("user:{user_id}:likes")
}

fn parse_review_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| DomainError::InvalidArgument(format!("malformed review id: {raw}")))
}

/// Validated creation parameters, as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct CreateReviewRequest {
    pub product_id: i64,
    pub content: String,
    pub parent_id: Option<Uuid>,
    pub stars: i16,
    pub pic_info: Vec<String>,
    pub is_anonymous: bool,
}

/// Aggregation service over the two stores. Holds no mutable state and no
/// locks; all coordination is delegated to the stores' own atomicity.
pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    counters: Arc<dyn CounterStore>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewStore>, counters: Arc<dyn CounterStore>) -> Self {
        Self { reviews, counters }
    }

    /// Creates a review with a server-assigned timestamp. A brand-new
    /// review has zero likes and cannot be pinned yet, so the counter
    /// store is not touched; either the insert lands or nothing does.
    pub async fn create_review(&self, req: CreateReviewRequest, author_id: i64) -> Result<Uuid> {
        let draft = ReviewDraft {
            content: req.content,
            author_id,
            product_id: req.product_id,
            parent_id: req.parent_id,
            stars: req.stars,
            is_anonymous: req.is_anonymous,
            pic_info: req.pic_info,
            created_at: Utc::now(),
        };
        let id = self.reviews.insert(draft).await?;
        info!(review_id = %id, product_id = req.product_id, "review created");
        Ok(id)
    }

    /// Two-step, non-atomic like: counter increment first, then the
    /// membership add. A failed increment skips the add; a failed add
    /// leaves the counter incremented with no compensation. The increment
    /// is not gated on existing membership, so repeated likes by one user
    /// keep inflating the count.
    pub async fn like(&self, review_id: &str, user_id: i64) -> Result<()> {
        let id = parse_review_id(review_id)?;
        let field = id.to_string();

        self.counters
            .incr_hash_field(REVIEW_LIKES_KEY, &field, 1)
            .await?;
        self.counters
            .set_add(&user_likes_key(user_id), &field)
            .await?;
        Ok(())
    }

    /// Reviews authored by one user, joined with the same user's counters.
    pub async fn get_list_by_user(&self, user_id: i64) -> Result<Vec<ReviewInfo>> {
        let filter = ReviewFilter {
            author_id: Some(user_id),
            ..Default::default()
        };
        let reviews = self.reviews.find(filter, ReviewSort::Unsorted).await?;
        Ok(self.build_review_infos(reviews, user_id).await)
    }

    /// All reviews for a product plus the product's pinned review, if any.
    pub async fn get_list_by_product(
        &self,
        product_id: i64,
        user_id: i64,
    ) -> Result<ProductReviews> {
        let filter = ReviewFilter {
            product_id: Some(product_id),
            ..Default::default()
        };
        let raw = self.reviews.find(filter, ReviewSort::Unsorted).await?;
        let reviews = self.build_review_infos(raw, user_id).await;

        let pinned = match self.pinned_review_id(product_id).await {
            Some(id) => self.pinned_detail(id, user_id).await?,
            None => None,
        };

        Ok(ProductReviews { reviews, pinned })
    }

    /// Reviews for a product, optionally narrowed to one star rating
    /// (stars == 0 means any), newest first.
    pub async fn get_list_by_query(
        &self,
        product_id: i64,
        stars: i16,
        user_id: i64,
    ) -> Result<Vec<ReviewInfo>> {
        let filter = ReviewFilter {
            product_id: (product_id > 0).then_some(product_id),
            stars: (stars > 0).then_some(stars),
            ..Default::default()
        };
        let reviews = self.reviews.find(filter, ReviewSort::CreatedDesc).await?;
        Ok(self.build_review_infos(reviews, user_id).await)
    }

    /// Pins one review for its product, displacing any previous holder.
    ///
    /// Fixed order: unpin-old, pin-new, overwrite-pointer. Any failure
    /// aborts the remaining steps, so a crash degrades to "no pin
    /// recorded" rather than two documents flagged pinned.
    pub async fn pin_review(&self, review_id: &str) -> Result<()> {
        let id = parse_review_id(review_id)?;
        let review = self.reviews.get(id).await?;
        let field = review.product_id.to_string();

        let previous = match self.counters.get_hash_field(PINNED_REVIEWS_KEY, &field).await? {
            Some(raw) if !raw.is_empty() => match Uuid::parse_str(&raw) {
                Ok(old_id) => Some(old_id),
                Err(_) => {
                    warn!(
                        pointer = %raw,
                        product_id = review.product_id,
                        "overwriting malformed pinned pointer"
                    );
                    None
                }
            },
            _ => None,
        };

        if let Some(old_id) = previous {
            if old_id != id {
                match self.reviews.update_pin_flag(old_id, false).await {
                    Ok(()) => {}
                    // The pointer outlived its document (interrupted
                    // delete); nothing is pinned twice, so proceed.
                    Err(DomainError::NotFound(..)) => {}
                    Err(err) => return Err(err),
                }
            }
        }

        self.reviews.update_pin_flag(id, true).await?;
        self.counters
            .set_hash_field(PINNED_REVIEWS_KEY, &field, &id.to_string())
            .await?;
        info!(review_id = %id, product_id = review.product_id, "review pinned");
        Ok(())
    }

    /// Deletes a review and cascades into the ephemeral store: drops the
    /// like counter entry and clears the pinned pointer if it referenced
    /// the deleted review. A failure after the document delete leaves a
    /// stale counter/pointer entry, which every read path tolerates.
    pub async fn delete_review(&self, review_id: &str) -> Result<()> {
        let id = parse_review_id(review_id)?;
        // The product id is needed for pointer cleanup, so read first.
        let review = self.reviews.get(id).await?;

        self.reviews.delete(id).await?;

        let field = id.to_string();
        self.counters
            .delete_hash_field(REVIEW_LIKES_KEY, &field)
            .await?;

        let product_field = review.product_id.to_string();
        let pinned = self
            .counters
            .get_hash_field(PINNED_REVIEWS_KEY, &product_field)
            .await?;
        if pinned.as_deref() == Some(field.as_str()) {
            self.counters
                .delete_hash_field(PINNED_REVIEWS_KEY, &product_field)
                .await?;
        }

        info!(review_id = %id, product_id = review.product_id, "review deleted");
        Ok(())
    }

    /// Joins raw documents with live counters in two counter-store round
    /// trips total — one HMGET for every like count and one SMEMBERS for
    /// the caller's liked set — regardless of list length.
    ///
    /// Counter-store unavailability degrades counts to 0 and liked flags
    /// to false instead of failing the listing.
    async fn build_review_infos(&self, reviews: Vec<Review>, user_id: i64) -> Vec<ReviewInfo> {
        if reviews.is_empty() {
            return Vec::new();
        }

        let ids: Vec<String> = reviews.iter().map(|r| r.id.to_string()).collect();

        let likes = match self
            .counters
            .multi_get_hash_fields(REVIEW_LIKES_KEY, &ids)
            .await
        {
            Ok(counts) => counts,
            Err(err) => {
                warn!(%err, "like counters unavailable, serving counts as zero");
                HashMap::new()
            }
        };

        let liked: HashSet<String> = match self.counters.set_members(&user_likes_key(user_id)).await
        {
            Ok(members) => members.into_iter().collect(),
            Err(err) => {
                warn!(%err, user_id, "liked set unavailable, serving liked flags as false");
                HashSet::new()
            }
        };

        reviews
            .into_iter()
            .map(|review| {
                let key = review.id.to_string();
                let count = likes.get(&key).copied().unwrap_or(0);
                let current_user_liked = liked.contains(&key);
                ReviewInfo::from_review(review, count, current_user_liked)
            })
            .collect()
    }

    /// Resolves the pinned pointer for a product on the read path.
    /// Unavailability or a malformed pointer value degrades to "no pin".
    async fn pinned_review_id(&self, product_id: i64) -> Option<Uuid> {
        let field = product_id.to_string();
        let raw = match self.counters.get_hash_field(PINNED_REVIEWS_KEY, &field).await {
            Ok(value) => value?,
            Err(err) => {
                warn!(%err, product_id, "pinned pointer unavailable, serving list without pin");
                return None;
            }
        };
        if raw.is_empty() {
            return None;
        }
        match Uuid::parse_str(&raw) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(pointer = %raw, product_id, "malformed pinned pointer, serving list without pin");
                None
            }
        }
    }

    /// Builds the full `ReviewInfo` for a pinned review: one document
    /// point lookup plus one counter and one set lookup. A pointer whose
    /// document is gone (interrupted delete) resolves to no pin.
    async fn pinned_detail(&self, id: Uuid, user_id: i64) -> Result<Option<ReviewInfo>> {
        let review = match self.reviews.get(id).await {
            Ok(review) => review,
            Err(DomainError::NotFound(..)) => return Ok(None),
            Err(err) => return Err(err),
        };

        let field = id.to_string();
        let likes = match self.counters.get_hash_field(REVIEW_LIKES_KEY, &field).await {
            Ok(value) => value.and_then(|v| v.parse().ok()).unwrap_or(0),
            Err(err) => {
                warn!(%err, review_id = %id, "like counter unavailable for pinned review");
                0
            }
        };

        let current_user_liked = match self.counters.set_members(&user_likes_key(user_id)).await {
            Ok(members) => members.iter().any(|m| m == &field),
            Err(err) => {
                warn!(%err, user_id, "liked set unavailable for pinned review");
                false
            }
        };

        Ok(Some(ReviewInfo::from_review(review, likes, current_user_liked)))
    }
}
