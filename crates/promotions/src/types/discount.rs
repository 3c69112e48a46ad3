//! Discount result types returned by the engine.

use serde::{Deserialize, Serialize};

/// One promotion's contribution to the effective price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountLine {
    /// Discount amount in minor units (the last contributing action's value).
    pub price: i64,
    /// Translated promotion name (empty when no translation exists).
    pub name: String,
    /// Translated promotion description (empty when no translation exists).
    pub description: String,
    /// Whether the promotion qualified through a customer-group condition.
    pub is_customer_group: bool,
}

/// Effective price plus the per-promotion discount breakdown.
///
/// Invariants: `value >= 1`; `metadata` contains no zero-price entries. A
/// request with no active promotions yields no `DiscountResult` at all rather
/// than one with an empty breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountResult {
    /// Effective price in minor units, floored at 1.
    pub value: i64,
    /// Non-zero discount contributions, in application order.
    pub metadata: Vec<DiscountLine>,
}
