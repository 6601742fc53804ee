//! HTTP-level tests: drive the router with `tower::ServiceExt::oneshot`
//! against the service over mocked stores, and check status mapping,
//! identity handling, and the JSON wire format.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use api_adapters::{router, AppState};
use domains::{DomainError, MockCounterStore, MockReviewStore, Review};
use services::ReviewService;

fn app(reviews: MockReviewStore, counters: MockCounterStore) -> Router {
    let service = Arc::new(ReviewService::new(Arc::new(reviews), Arc::new(counters)));
    router(AppState { reviews: service })
}

fn sample_review(id: Uuid, product_id: i64) -> Review {
    Review {
        id,
        content: "great glaze".to_string(),
        author_id: 123,
        product_id,
        parent_id: None,
        stars: 5,
        is_anonymous: false,
        pic_info: vec!["a.jpg".to_string()],
        created_at: Utc::now(),
        is_pinned: false,
    }
}

#[tokio::test]
async fn create_review_returns_store_assigned_id() {
    let id = Uuid::now_v7();
    let mut reviews = MockReviewStore::new();
    reviews.expect_insert().times(1).returning(move |_| Ok(id));

    let response = app(reviews, MockCounterStore::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/customer/reviews")
                .header("x-user-id", "123")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "product_id": 42,
                        "content": "great glaze",
                        "stars": 5,
                        "pic_info": ["a.jpg"]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn requests_without_identity_header_are_rejected() {
    let response = app(MockReviewStore::new(), MockCounterStore::new())
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/v1/customer/reviews/mine")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn like_with_malformed_review_id_is_rejected_before_any_store_call() {
    // No mock expectations: a store call would panic.
    let response = app(MockReviewStore::new(), MockCounterStore::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/customer/reviews/like")
                .header("x-user-id", "77")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "review_id": "not-a-review-id" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_unknown_review_maps_to_not_found() {
    let mut reviews = MockReviewStore::new();
    reviews
        .expect_get()
        .times(1)
        .returning(|id| Err(DomainError::review_not_found(id)));

    let response = app(reviews, MockCounterStore::new())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/merchant/reviews/{}", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_listing_keeps_the_original_wire_names() {
    let review = sample_review(Uuid::now_v7(), 42);
    let mut reviews = MockReviewStore::new();
    let found = vec![review.clone()];
    reviews
        .expect_find()
        .times(1)
        .returning(move |_, _| Ok(found.clone()));

    let mut counters = MockCounterStore::new();
    counters
        .expect_multi_get_hash_fields()
        .times(1)
        .returning(|_, _| Ok(HashMap::new()));
    counters
        .expect_set_members()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    counters
        .expect_get_hash_field()
        .times(1)
        .returning(|_, _| Ok(None));

    let response = app(reviews, counters)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/v1/customer/products/42/reviews")
                .header("x-user-id", "9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert!(body["pinned_review"].is_null());
    let listed = &body["review_list"][0];
    assert_eq!(listed["user_id"], 123);
    assert_eq!(listed["pic_info"][0], "a.jpg");
    assert_eq!(listed["likes"], 0);
    assert_eq!(listed["current_user_liked"], false);
    assert_eq!(listed["is_pinned"], false);
}

#[tokio::test]
async fn review_store_outage_maps_to_bad_gateway() {
    let mut reviews = MockReviewStore::new();
    reviews
        .expect_find()
        .times(1)
        .returning(|_, _| Err(DomainError::StoreUnavailable("connection refused".to_string())));

    let response = app(reviews, MockCounterStore::new())
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/v1/customer/reviews?product_id=42")
                .header("x-user-id", "9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
