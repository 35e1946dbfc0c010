//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - users(id, name, email, created_at)
//! - categories(id, name, slug, created_at)
//! - products(id, name, sku, price_cents, stock, category_id, created_at)
//! - orders(id, user_id, status, created_at)
//! - order_items(id, order_id, product_id, quantity, unit_price_cents)
//! - reviews(id, user_id, product_id, rating, comment, created_at)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};
