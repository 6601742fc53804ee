//! # domains
//!
//! Domain models, error taxonomy, and port definitions for the review
//! service. Adapter crates implement the ports; `services` consumes them.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
