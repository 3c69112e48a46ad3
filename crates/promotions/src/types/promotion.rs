//! Promotion domain types.
//!
//! A promotion is a time-boxed, channel-scoped discount rule with ordered
//! conditions (gating) and actions (price mutation). Conditions and actions
//! are stored as `(code, args)` pairs so that new codes can ship without a
//! schema change; codes the engine does not know are silently ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bramble_core::{LanguageCode, PromotionId};

// =============================================================================
// Configurable arguments
// =============================================================================

/// A single named argument of a condition or action.
///
/// Values are strings regardless of their logical type; each code parses its
/// own arguments (amounts as decimals, flags as booleans, id lists as JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigArg {
    /// Argument name as declared by the condition/action definition.
    pub name: String,
    /// Raw argument value.
    pub value: String,
}

/// Look up an argument value by name.
#[must_use]
pub fn arg_value<'a>(args: &'a [ConfigArg], name: &str) -> Option<&'a str> {
    args.iter()
        .find(|arg| arg.name == name)
        .map(|arg| arg.value.as_str())
}

// =============================================================================
// Conditions and actions
// =============================================================================

/// A promotion condition: a predicate gating the promotion's actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionCondition {
    /// Condition code (e.g., `customer_group`).
    pub code: String,
    /// Ordered arguments.
    pub args: Vec<ConfigArg>,
}

/// A promotion action: a price-mutating step keyed by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionAction {
    /// Action code (e.g., `line_fixed_discount`).
    pub code: String,
    /// Ordered arguments.
    pub args: Vec<ConfigArg>,
}

// =============================================================================
// Translations
// =============================================================================

/// Per-language name and description of a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionTranslation {
    /// Language this translation is for.
    pub language: LanguageCode,
    /// Customer-facing promotion name.
    pub name: String,
    /// Customer-facing promotion description.
    pub description: String,
}

// =============================================================================
// Promotion
// =============================================================================

/// A time-boxed, channel-scoped discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Promotion ID.
    pub id: PromotionId,
    /// Whether the promotion is switched on.
    pub enabled: bool,
    /// Start of the activation window (unbounded when absent).
    pub starts_at: Option<DateTime<Utc>>,
    /// End of the activation window (unbounded when absent).
    pub ends_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Ascending sort key: lower scores are folded over the price first.
    pub priority_score: i32,
    /// Ordered gating conditions.
    pub conditions: Vec<PromotionCondition>,
    /// Ordered price-mutating actions.
    pub actions: Vec<PromotionAction>,
    /// Per-language name/description.
    pub translations: Vec<PromotionTranslation>,
}

impl Promotion {
    /// Whether the promotion is eligible at the given instant.
    ///
    /// Eligible means enabled, not soft-deleted, and the activation window
    /// contains `instant`. Callers evaluating against a cached promotion list
    /// pass `now - cache_ttl` so that a promotion does not flicker off before
    /// the cache expires.
    #[must_use]
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.enabled
            && self.deleted_at.is_none()
            && self.starts_at.is_none_or(|starts| starts <= instant)
            && self.ends_at.is_none_or(|ends| ends >= instant)
    }

    /// The promotion's name and description for a language.
    ///
    /// Falls back to empty strings when no translation exists for the
    /// requested language.
    #[must_use]
    pub fn translation(&self, language: &LanguageCode) -> (&str, &str) {
        self.translations
            .iter()
            .find(|t| &t.language == language)
            .map_or(("", ""), |t| (t.name.as_str(), t.description.as_str()))
    }
}
