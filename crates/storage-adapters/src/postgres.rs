//! # PgReviewStore
//!
//! Postgres-backed implementation of the `ReviewStore` port. Maps SQL rows
//! back to domain models by hand; picture references ride in a JSONB
//! column. Ids are UUID v7, assigned here at insert time so the identifier
//! stays a store concern.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::debug;
use uuid::Uuid;

use domains::{
    DomainError, Result, Review, ReviewDraft, ReviewFilter, ReviewSort, ReviewStore,
};

const COLUMNS: &str =
    "id, content, author_id, product_id, parent_id, stars, is_anonymous, pic_info, created_at, is_pinned";

pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    /// Connects, sizes the pool, and applies pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(unavailable)?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|err| DomainError::StoreUnavailable(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool; used by callers that manage their own.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drains the pool. Part of the explicit shutdown sequence.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn unavailable(err: sqlx::Error) -> DomainError {
    DomainError::StoreUnavailable(err.to_string())
}

fn row_to_review(row: &PgRow) -> Review {
    Review {
        id: row.get("id"),
        content: row.get("content"),
        author_id: row.get("author_id"),
        product_id: row.get("product_id"),
        parent_id: row.get("parent_id"),
        stars: row.get("stars"),
        is_anonymous: row.get("is_anonymous"),
        pic_info: row.get::<Json<Vec<String>>, _>("pic_info").0,
        created_at: row.get("created_at"),
        is_pinned: row.get("is_pinned"),
    }
}

/// Assembles the filtered list query. `WHERE TRUE` keeps the clause
/// grammar uniform as equality conditions are appended.
fn build_find_query(filter: &ReviewFilter, sort: ReviewSort) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM reviews WHERE TRUE"));
    if let Some(product_id) = filter.product_id {
        qb.push(" AND product_id = ").push_bind(product_id);
    }
    if let Some(author_id) = filter.author_id {
        qb.push(" AND author_id = ").push_bind(author_id);
    }
    if let Some(stars) = filter.stars {
        qb.push(" AND stars = ").push_bind(stars);
    }
    if sort == ReviewSort::CreatedDesc {
        qb.push(" ORDER BY created_at DESC");
    }
    qb
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert(&self, draft: ReviewDraft) -> Result<Uuid> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO reviews (id, content, author_id, product_id, parent_id, stars, is_anonymous, pic_info, created_at, is_pinned) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE)",
        )
        .bind(id)
        .bind(&draft.content)
        .bind(draft.author_id)
        .bind(draft.product_id)
        .bind(draft.parent_id)
        .bind(draft.stars)
        .bind(draft.is_anonymous)
        .bind(Json(&draft.pic_info))
        .bind(draft.created_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        debug!(review_id = %id, "review inserted");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Review> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM reviews WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        match row {
            Some(row) => Ok(row_to_review(&row)),
            None => Err(DomainError::review_not_found(id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let done = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if done.rows_affected() == 0 {
            return Err(DomainError::review_not_found(id));
        }
        Ok(())
    }

    async fn find(&self, filter: ReviewFilter, sort: ReviewSort) -> Result<Vec<Review>> {
        let mut qb = build_find_query(&filter, sort);
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(rows.iter().map(row_to_review).collect())
    }

    async fn update_pin_flag(&self, id: Uuid, pinned: bool) -> Result<()> {
        let done = sqlx::query("UPDATE reviews SET is_pinned = $2 WHERE id = $1")
            .bind(id)
            .bind(pinned)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if done.rows_affected() == 0 {
            return Err(DomainError::review_not_found(id));
        }
        Ok(())
    }
}
