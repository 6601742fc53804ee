//! # services
//!
//! The review aggregation service: composes durable review documents with
//! live counters and pointers from the ephemeral store, and owns every
//! cross-store consistency rule in the system.

pub mod review;

pub use review::{CreateReviewRequest, ReviewService, PINNED_REVIEWS_KEY, REVIEW_LIKES_KEY};
