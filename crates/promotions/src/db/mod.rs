//! Database operations for the promotion engine `PostgreSQL` schema.
//!
//! All access is read-only; the engine performs no writes. Conditions,
//! actions, and translations are stored as JSONB on the promotion row, so
//! one query returns everything the engine needs.
//!
//! ## Tables
//!
//! - `promotion` - discount rules with JSONB `conditions`/`actions`/
//!   `translations`, activation window, priority score, soft-delete marker
//! - `promotion_channel` - channel scoping for promotions
//! - `customer_group_member` - customer-group memberships
//! - `"order"` - active orders with minor-unit subtotals
//! - `product` - `discount_by` custom field
//! - `product_collection` / `collection` - collection memberships with a
//!   privacy flag

mod customers;
mod orders;
mod products;
mod promotions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerGroupRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use promotions::PromotionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
