//! Wire-format DTOs. Field names match the service's existing JSON
//! contract (`review_list`, `pinned_review`, `pic_info`, ...), so clients
//! of the previous deployment keep working unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domains::{ProductReviews, ReviewInfo};

#[derive(Debug, Deserialize)]
pub struct CreateReviewBody {
    pub product_id: i64,
    pub content: String,
    /// `"0"`, empty, or absent all mean a top-level review.
    #[serde(default)]
    pub parent_id: Option<String>,
    pub stars: i16,
    #[serde(default)]
    pub pic_info: Vec<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct LikeBody {
    pub review_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PinBody {
    pub review_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub product_id: i64,
    /// 0 means any star rating.
    #[serde(default)]
    pub stars: i16,
}

#[derive(Debug, Serialize)]
pub struct ReviewInfoBody {
    pub id: String,
    pub content: String,
    pub user_id: i64,
    pub product_id: i64,
    pub parent_id: Option<String>,
    pub stars: i16,
    pub is_anonymous: bool,
    pub pic_info: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub current_user_liked: bool,
    pub is_pinned: bool,
}

impl From<ReviewInfo> for ReviewInfoBody {
    fn from(info: ReviewInfo) -> Self {
        Self {
            id: info.id.to_string(),
            content: info.content,
            user_id: info.author_id,
            product_id: info.product_id,
            parent_id: info.parent_id.map(|id| id.to_string()),
            stars: info.stars,
            is_anonymous: info.is_anonymous,
            pic_info: info.pic_info,
            created_at: info.created_at,
            likes: info.likes,
            current_user_liked: info.current_user_liked,
            is_pinned: info.is_pinned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListReviewBody {
    pub review_list: Vec<ReviewInfoBody>,
    pub pinned_review: Option<ReviewInfoBody>,
}

impl From<ProductReviews> for ListReviewBody {
    fn from(listing: ProductReviews) -> Self {
        Self {
            review_list: listing.reviews.into_iter().map(Into::into).collect(),
            pinned_review: listing.pinned.map(Into::into),
        }
    }
}
