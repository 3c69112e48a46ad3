//! Action parsing and the per-promotion accumulator fold.
//!
//! Actions, like conditions, arrive as `(code, args)` pairs and are parsed
//! into an [`ActionKind`] before execution. The executor folds a promotion's
//! actions left-to-right over the running price accumulator; the accumulator
//! is threaded across promotions by the engine, so an earlier promotion's
//! discount is visible to a later promotion's full-price-only actions.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use bramble_core::{CollectionId, floor_percentage, to_minor_units};

use crate::context::EvaluationContext;
use crate::types::{Promotion, PromotionAction, arg_value};

// Action codes understood by the engine.
pub(crate) const LINE_FIXED_DISCOUNT: &str = "line_fixed_discount";
pub(crate) const LINE_PERCENTAGE_DISCOUNT: &str = "line_percentage_discount";
pub(crate) const LINE_FIXED_DISCOUNT_FULL_PRICE: &str = "line_fixed_discount_full_price";
pub(crate) const LINE_PERCENTAGE_DISCOUNT_FULL_PRICE: &str = "line_percentage_discount_full_price";
pub(crate) const LINE_FIXED_DISCOUNT_BY: &str = "line_fixed_discountBy";
pub(crate) const ALL_COLLECTIONS: &str = "all_collections";

/// Shape of one entry in the `collectionsID` JSON argument.
#[derive(Debug, Deserialize)]
struct CollectionRef {
    id: String,
}

// =============================================================================
// ActionKind
// =============================================================================

/// A parsed promotion action.
///
/// Fixed discounts and thresholds are stored in minor units; percentages stay
/// decimal so `floor(base * pct / 100)` matches the declared formula exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Subtract a fixed amount when the accumulator meets the threshold.
    FixedDiscount {
        /// Amount to subtract, in minor units.
        discount: i64,
        /// Minimum accumulator value for the discount to fire, minor units.
        min_threshold: i64,
    },
    /// Subtract `floor(base_price * pct / 100)` when the accumulator meets
    /// the threshold.
    PercentageDiscount {
        /// Percentage in major units (20 means 20%).
        pct: Decimal,
        /// Minimum accumulator value for the discount to fire, minor units.
        min_threshold: i64,
    },
    /// As [`ActionKind::FixedDiscount`], but only on an undiscounted line
    /// (accumulator still equals the base price).
    FixedDiscountFullPrice {
        /// Amount to subtract, in minor units.
        discount: i64,
        /// Minimum accumulator value for the discount to fire, minor units.
        min_threshold: i64,
    },
    /// As [`ActionKind::PercentageDiscount`], but only on an undiscounted
    /// line.
    PercentageDiscountFullPrice {
        /// Percentage in major units.
        pct: Decimal,
        /// Minimum accumulator value for the discount to fire, minor units.
        min_threshold: i64,
    },
    /// Subtract the product's precomputed `discount_by` custom-field value
    /// (internal/admin-only use).
    FixedDiscountBy,
    /// Subtract `floor(base_price * pct / 100)` when the product belongs to
    /// one of the listed collections and the exclusivity gate is off.
    CollectionPercentageDiscount {
        /// Collections the discount is scoped to.
        collections: Vec<CollectionId>,
        /// Percentage in major units.
        pct: Decimal,
    },
    /// Unrecognized code or unparsable arguments; leaves the accumulator
    /// untouched.
    Unknown,
}

impl ActionKind {
    /// Parse a stored action.
    ///
    /// Unrecognized codes and malformed arguments parse to
    /// [`ActionKind::Unknown`] (logged, never an error).
    #[must_use]
    pub fn parse(action: &PromotionAction) -> Self {
        match action.code.as_str() {
            LINE_FIXED_DISCOUNT => Self::parse_fixed(action, false),
            LINE_FIXED_DISCOUNT_FULL_PRICE => Self::parse_fixed(action, true),
            LINE_PERCENTAGE_DISCOUNT => Self::parse_percentage(action, false),
            LINE_PERCENTAGE_DISCOUNT_FULL_PRICE => Self::parse_percentage(action, true),
            LINE_FIXED_DISCOUNT_BY => Self::FixedDiscountBy,
            ALL_COLLECTIONS => Self::parse_collections(action),
            other => {
                debug!(code = other, "unrecognized promotion action");
                Self::Unknown
            }
        }
    }

    fn parse_fixed(action: &PromotionAction, full_price_only: bool) -> Self {
        let Some(discount) = parse_minor_units(action, "discount") else {
            warn!(code = %action.code, "unparsable discount argument");
            return Self::Unknown;
        };
        let min_threshold = parse_minor_units(action, "minThreshold").unwrap_or(0);
        if full_price_only {
            Self::FixedDiscountFullPrice {
                discount,
                min_threshold,
            }
        } else {
            Self::FixedDiscount {
                discount,
                min_threshold,
            }
        }
    }

    fn parse_percentage(action: &PromotionAction, full_price_only: bool) -> Self {
        let Some(pct) = parse_decimal(action, "discount") else {
            warn!(code = %action.code, "unparsable discount argument");
            return Self::Unknown;
        };
        let min_threshold = parse_minor_units(action, "minThreshold").unwrap_or(0);
        if full_price_only {
            Self::PercentageDiscountFullPrice { pct, min_threshold }
        } else {
            Self::PercentageDiscount { pct, min_threshold }
        }
    }

    fn parse_collections(action: &PromotionAction) -> Self {
        let Some(pct) = parse_decimal(action, "discount") else {
            warn!(code = ALL_COLLECTIONS, "unparsable discount argument");
            return Self::Unknown;
        };
        let Some(raw) = arg_value(&action.args, "collectionsID") else {
            warn!(code = ALL_COLLECTIONS, "missing collectionsID argument");
            return Self::Unknown;
        };
        match serde_json::from_str::<Vec<CollectionRef>>(raw) {
            Ok(refs) => {
                let collections: Vec<CollectionId> =
                    refs.iter().filter_map(|r| r.id.parse().ok()).collect();
                Self::CollectionPercentageDiscount { collections, pct }
            }
            Err(error) => {
                warn!(code = ALL_COLLECTIONS, %error, "unparsable collectionsID argument");
                Self::Unknown
            }
        }
    }

    /// Apply this action to the running accumulator.
    ///
    /// Returns `Some((new_acc, value))` when the action fired (possibly with
    /// a zero value), `None` when it did not (unknown code, threshold not
    /// met, line already discounted, collection/gate mismatch). A `None`
    /// leaves both the accumulator and the promotion's recorded contribution
    /// untouched.
    #[must_use]
    pub fn apply(
        &self,
        ctx: &EvaluationContext,
        acc: i64,
        exclusive_group_active: bool,
    ) -> Option<(i64, i64)> {
        let base = ctx.base_price;
        match self {
            Self::FixedDiscount {
                discount,
                min_threshold,
            } => (acc >= *min_threshold).then(|| (acc - discount, *discount)),
            Self::PercentageDiscount { pct, min_threshold } => (acc >= *min_threshold)
                .then(|| {
                    let value = floor_percentage(base, *pct).unwrap_or(0);
                    (acc - value, value)
                }),
            Self::FixedDiscountFullPrice {
                discount,
                min_threshold,
            } => {
                (acc == base && acc >= *min_threshold).then(|| (acc - discount, *discount))
            }
            Self::PercentageDiscountFullPrice { pct, min_threshold } => {
                (acc == base && acc >= *min_threshold).then(|| {
                    let value = floor_percentage(base, *pct).unwrap_or(0);
                    (acc - value, value)
                })
            }
            Self::FixedDiscountBy => {
                let value = ctx.product_discount_by;
                Some((acc - value, value))
            }
            Self::CollectionPercentageDiscount { collections, pct } => {
                let in_scope = !exclusive_group_active
                    && collections
                        .iter()
                        .any(|id| ctx.product_collections.contains(id));
                in_scope.then(|| {
                    let value = floor_percentage(base, *pct).unwrap_or(0);
                    (acc - value, value)
                })
            }
            Self::Unknown => None,
        }
    }
}

fn parse_decimal(action: &PromotionAction, name: &str) -> Option<Decimal> {
    arg_value(&action.args, name).and_then(|raw| raw.parse::<Decimal>().ok())
}

fn parse_minor_units(action: &PromotionAction, name: &str) -> Option<i64> {
    parse_decimal(action, name).and_then(to_minor_units)
}

// =============================================================================
// Per-promotion execution
// =============================================================================

/// Outcome of running one promotion's actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Accumulator after all actions ran.
    pub acc: i64,
    /// Contribution of the last action that fired (zero when none fired).
    /// Only the last contribution is recorded per promotion even when
    /// several actions changed the price; downstream consumers rely on this.
    pub last_value: i64,
}

/// Fold a qualifying promotion's actions left-to-right over `acc`.
#[must_use]
pub fn apply_actions(
    promotion: &Promotion,
    ctx: &EvaluationContext,
    mut acc: i64,
    exclusive_group_active: bool,
) -> ActionOutcome {
    let mut last_value = 0;
    for action in &promotion.actions {
        let kind = ActionKind::parse(action);
        if let Some((next_acc, value)) = kind.apply(ctx, acc, exclusive_group_active) {
            acc = next_acc;
            last_value = value;
        }
    }
    ActionOutcome { acc, last_value }
}
