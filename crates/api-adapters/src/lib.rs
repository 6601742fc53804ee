//! # api-adapters
//!
//! HTTP transport glue for the review service: routing, identity
//! extraction, DTO shaping, and error mapping. Validation happens here;
//! handlers hand already-parsed parameters to the service and serialize
//! whatever it returns.

#[cfg(feature = "web-axum")]
pub mod dto;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use handlers::{router, AppState};
