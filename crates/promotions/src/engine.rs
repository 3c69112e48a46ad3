//! The discount-stacking fold.
//!
//! `evaluate_discounts` is the single pure function behind both exposure
//! points (product variant and search result). It folds the active
//! promotions over the base price in ascending `priority_score` order and
//! produces the effective price plus the per-promotion breakdown.

use crate::actions::apply_actions;
use crate::conditions::{evaluate_conditions, exclusive_group_active};
use crate::context::EvaluationContext;
use crate::types::{DiscountLine, DiscountResult, Promotion};

/// Evaluate all active promotions against one pricing context.
///
/// Returns `None` when `promotions` is empty: "no promotional pricing
/// applies" is distinct from "applies with zero discount". Otherwise:
///
/// 1. The exclusivity gate is computed once over the whole active set.
/// 2. Promotions are folded in ascending `priority_score` (stable on ties,
///    preserving fetch order). For each, conditions are evaluated against
///    the gate; qualifying promotions run their actions over the shared
///    accumulator and append one metadata entry carrying their last
///    contribution.
/// 3. The result is floored at 1 minor unit and zero-value metadata entries
///    are dropped.
#[must_use]
pub fn evaluate_discounts(
    ctx: &EvaluationContext,
    promotions: &[Promotion],
) -> Option<DiscountResult> {
    if promotions.is_empty() {
        return None;
    }

    let gate = exclusive_group_active(promotions, &ctx.customer_groups);

    let mut ordered: Vec<&Promotion> = promotions.iter().collect();
    ordered.sort_by_key(|promotion| promotion.priority_score);

    let mut acc = ctx.base_price;
    let mut metadata: Vec<DiscountLine> = Vec::new();

    for promotion in ordered {
        let outcome = evaluate_conditions(promotion, ctx, gate);
        if !outcome.should_apply {
            continue;
        }

        let applied = apply_actions(promotion, ctx, acc, gate);
        acc = applied.acc;

        let (name, description) = promotion.translation(&ctx.language);
        metadata.push(DiscountLine {
            price: applied.last_value,
            name: name.to_string(),
            description: description.to_string(),
            is_customer_group: outcome.is_customer_group,
        });
    }

    metadata.retain(|line| line.price != 0);

    Some(DiscountResult {
        value: acc.max(1),
        metadata,
    })
}
