//! # Minicommerce - Mini commerce REST API
//!
//! A small shop backend served over HTTP/JSON and persisted in SQLite.
//!
//! Minicommerce provides:
//! - Users, categories, products, orders and reviews with CRUD endpoints
//! - Stock accounting for orders and an order status lifecycle
//! - Field-level request validation with uniform error bodies
//! - A generated OpenAPI document and a browsable docs page

pub mod money;
pub mod slug;
pub mod validation;
pub mod user;
pub mod category;
pub mod product;
pub mod order;
pub mod review;
pub mod dto;
pub mod storage;
pub mod service;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use money::Money;
pub use order::OrderStatus;
pub use storage::SqliteStore;
pub use validation::{FieldErrors, Validate};

/// Result type alias for Minicommerce operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Minicommerce operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(entity: &str) -> Self {
        Error::NotFound(format!("{} not found", entity))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict(message.into())
    }

    /// Validation error carrying a single field message
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Error::Validation(errors)
    }
}
