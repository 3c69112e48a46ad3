//! Condition parsing and evaluation, plus the exclusivity gate.
//!
//! Conditions arrive as `(code, args)` pairs and are parsed into a
//! [`ConditionKind`] before evaluation, so unknown or malformed codes become
//! a typed no-op instead of an implicit fallthrough. Evaluation is
//! side-effect-free and never short-circuits: every condition of a promotion
//! is parsed and checked, and the promotion qualifies when any of them
//! matched.
//!
//! The exclusivity gate is computed once per request, before any promotion
//! is evaluated: it is true when the customer belongs to *any* group
//! targeted by *any* active promotion's `customer_group` condition, and it
//! suppresses all general (non-group) conditions and the collection-scoped
//! action for the whole request. Note the suppression is channel-wide, not
//! per-product: a group promotion for group A also suppresses an unrelated
//! general promotion B. Whether that should be narrowed to group promotions
//! relevant to the product at hand is an open product question; the current
//! behavior is intentional until answered.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use bramble_core::{CustomerGroupId, to_minor_units};

use crate::context::EvaluationContext;
use crate::types::{Promotion, PromotionCondition, arg_value};

// Condition codes understood by the engine.
pub(crate) const ALL_PRODUCTS: &str = "all_products";
pub(crate) const MINIMUM_ORDER_AMOUNT: &str = "minimum_order_amount";
pub(crate) const CUSTOMER_GROUP: &str = "customer_group";

// =============================================================================
// ConditionKind
// =============================================================================

/// A parsed promotion condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionKind {
    /// Matches whenever no customer-group promotion applies to this customer.
    AllProducts,
    /// Matches when the active order's relevant subtotal meets the threshold
    /// and no customer-group promotion applies to this customer.
    MinimumOrderAmount {
        /// Threshold in minor units.
        amount: i64,
        /// Compare against the tax-inclusive subtotal when true.
        tax_inclusive: bool,
    },
    /// Matches when the active customer belongs to the group. The only
    /// condition that feeds the exclusivity gate.
    CustomerGroup {
        /// Targeted customer group.
        group: CustomerGroupId,
    },
    /// Unrecognized code or unparsable arguments; never matches.
    Unknown,
}

impl ConditionKind {
    /// Parse a stored condition.
    ///
    /// Unrecognized codes and malformed arguments parse to
    /// [`ConditionKind::Unknown`] (logged, never an error).
    #[must_use]
    pub fn parse(condition: &PromotionCondition) -> Self {
        match condition.code.as_str() {
            ALL_PRODUCTS => Self::AllProducts,
            MINIMUM_ORDER_AMOUNT => {
                let amount = arg_value(&condition.args, "amount")
                    .and_then(|raw| raw.parse::<Decimal>().ok())
                    .and_then(to_minor_units);
                let tax_inclusive = arg_value(&condition.args, "taxInclusive")
                    .is_some_and(|raw| raw.eq_ignore_ascii_case("true"));
                amount.map_or_else(
                    || {
                        warn!(code = MINIMUM_ORDER_AMOUNT, "unparsable amount argument");
                        Self::Unknown
                    },
                    |amount| Self::MinimumOrderAmount {
                        amount,
                        tax_inclusive,
                    },
                )
            }
            CUSTOMER_GROUP => arg_value(&condition.args, "customerGroupId")
                .and_then(|raw| raw.parse::<CustomerGroupId>().ok())
                .map_or_else(
                    || {
                        warn!(code = CUSTOMER_GROUP, "unparsable customerGroupId argument");
                        Self::Unknown
                    },
                    |group| Self::CustomerGroup { group },
                ),
            other => {
                debug!(code = other, "unrecognized promotion condition");
                Self::Unknown
            }
        }
    }

    /// Whether this condition matches the context.
    ///
    /// `exclusive_group_active` is the request-wide gate from
    /// [`exclusive_group_active`].
    #[must_use]
    pub fn matches(&self, ctx: &EvaluationContext, exclusive_group_active: bool) -> bool {
        match self {
            Self::AllProducts => !exclusive_group_active,
            Self::MinimumOrderAmount {
                amount,
                tax_inclusive,
            } => {
                !exclusive_group_active
                    && ctx.active_order.is_some_and(|order| {
                        let relevant = if *tax_inclusive {
                            order.sub_total_with_tax
                        } else {
                            order.sub_total
                        };
                        relevant >= *amount
                    })
            }
            Self::CustomerGroup { group } => ctx.customer_groups.contains(group),
            Self::Unknown => false,
        }
    }
}

// =============================================================================
// Exclusivity gate
// =============================================================================

/// Compute the request-wide exclusivity gate.
///
/// True iff at least one active promotion carries a `customer_group`
/// condition whose target group the customer belongs to. Computed once per
/// request and passed to every subsequent condition/action evaluation; no
/// state is shared between the two passes.
#[must_use]
pub fn exclusive_group_active(
    promotions: &[Promotion],
    customer_groups: &HashSet<CustomerGroupId>,
) -> bool {
    if customer_groups.is_empty() {
        return false;
    }
    promotions.iter().any(|promotion| {
        promotion.conditions.iter().any(|condition| {
            matches!(
                ConditionKind::parse(condition),
                ConditionKind::CustomerGroup { group } if customer_groups.contains(&group)
            )
        })
    })
}

// =============================================================================
// Per-promotion evaluation
// =============================================================================

/// Outcome of evaluating one promotion's conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionOutcome {
    /// Whether the promotion's actions should run.
    pub should_apply: bool,
    /// Whether qualification came from a customer-group condition (tags the
    /// promotion's metadata entry).
    pub is_customer_group: bool,
}

/// Evaluate a promotion's conditions left-to-right.
///
/// Every condition is evaluated (no short-circuit); the promotion qualifies
/// when any condition matched.
#[must_use]
pub fn evaluate_conditions(
    promotion: &Promotion,
    ctx: &EvaluationContext,
    exclusive_group_active: bool,
) -> ConditionOutcome {
    let mut should_apply = false;
    let mut is_customer_group = false;

    for condition in &promotion.conditions {
        let kind = ConditionKind::parse(condition);
        let matched = kind.matches(ctx, exclusive_group_active);
        if matched && matches!(kind, ConditionKind::CustomerGroup { .. }) {
            is_customer_group = true;
        }
        should_apply = should_apply || matched;
    }

    ConditionOutcome {
        should_apply,
        is_customer_group,
    }
}
