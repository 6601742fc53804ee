//! # storage-adapters
//!
//! Concrete implementations of the `domains` storage ports. The Postgres
//! adapter backs the durable review store; the Redis adapter backs the
//! ephemeral counter/set store. Each is gated behind its own feature so a
//! deployment compiles only the back ends it runs.

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "db-postgres")]
pub use postgres::PgReviewStore;

#[cfg(feature = "redis")]
pub use redis::RedisCounterStore;
