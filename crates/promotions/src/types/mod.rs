//! Domain types for the promotion engine.

pub mod discount;
pub mod promotion;

pub use discount::{DiscountLine, DiscountResult};
pub use promotion::{
    ConfigArg, Promotion, PromotionAction, PromotionCondition, PromotionTranslation, arg_value,
};
