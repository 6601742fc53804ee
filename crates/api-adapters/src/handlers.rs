//! Route table and handlers. Each handler parses, delegates to
//! `ReviewService`, and serializes — no business rules live here.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use services::{CreateReviewRequest, ReviewService};

use crate::dto::{
    CreateReviewBody, CreatedBody, LikeBody, ListQuery, ListReviewBody, PinBody, ReviewInfoBody,
};
use crate::error::ApiError;

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<ReviewService>,
}

/// Builds the application router. Customer routes carry the end-user
/// surface; merchant routes carry moderation.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/customer/reviews",
            post(create_review).get(list_by_query),
        )
        .route("/v1/customer/reviews/like", post(like_review))
        .route("/v1/customer/reviews/mine", get(list_mine))
        .route(
            "/v1/customer/products/{product_id}/reviews",
            get(list_by_product),
        )
        .route("/v1/merchant/reviews/pin", post(pin_review))
        .route("/v1/merchant/reviews/{review_id}", delete(delete_review))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Caller identity, injected by the upstream gateway as an `x-user-id`
/// header. Missing or non-numeric values are rejected before any handler
/// logic runs.
pub struct CurrentUser(pub i64);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::bad_request("missing x-user-id header"))?;
        let user_id = raw
            .parse()
            .map_err(|_| ApiError::bad_request("x-user-id must be an integer"))?;
        Ok(CurrentUser(user_id))
    }
}

fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw {
        None | Some("") | Some("0") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| ApiError::bad_request("parent_id must be a review id")),
    }
}

async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<CreateReviewBody>,
) -> Result<Json<CreatedBody>, ApiError> {
    let parent_id = parse_parent_id(body.parent_id.as_deref())?;
    let request = CreateReviewRequest {
        product_id: body.product_id,
        content: body.content,
        parent_id,
        stars: body.stars,
        pic_info: body.pic_info,
        is_anonymous: body.is_anonymous,
    };
    let id = state.reviews.create_review(request, user_id).await?;
    Ok(Json(CreatedBody { id: id.to_string() }))
}

async fn like_review(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<LikeBody>,
) -> Result<StatusCode, ApiError> {
    state.reviews.like(&body.review_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<ReviewInfoBody>>, ApiError> {
    let list = state.reviews.get_list_by_user(user_id).await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

async fn list_by_product(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<i64>,
) -> Result<Json<ListReviewBody>, ApiError> {
    let listing = state.reviews.get_list_by_product(product_id, user_id).await?;
    Ok(Json(listing.into()))
}

async fn list_by_query(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ReviewInfoBody>>, ApiError> {
    let list = state
        .reviews
        .get_list_by_query(query.product_id, query.stars, user_id)
        .await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

async fn pin_review(
    State(state): State<AppState>,
    Json(body): Json<PinBody>,
) -> Result<StatusCode, ApiError> {
    state.reviews.pin_review(&body.review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete_review(&review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
