//! Unified error handling for the promotion engine.
//!
//! Both exposure points (product variant and search result) surface the same
//! typed result: `Result<Option<DiscountResult>, EvaluationError>`. Callers
//! that prefer to suppress promotional pricing on upstream failure can do so
//! explicitly; the engine never swallows errors itself.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors a discount evaluation can surface.
///
/// Malformed condition/action arguments are *not* errors: they evaluate as
/// "does not match" or "contributes zero" so that a misconfigured promotion
/// can never block pricing.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// An upstream read (promotions, customer groups, order, product) failed.
    #[error("promotion data read failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result type alias for `EvaluationError`.
pub type Result<T> = std::result::Result<T, EvaluationError>;
