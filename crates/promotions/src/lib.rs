//! Bramble Promotions - the promotion discount-stacking engine.
//!
//! Given a product variant (or search result) and the current request context
//! (customer, active order, channel), the engine determines which promotions
//! are currently active, evaluates each promotion's conditions, applies each
//! promotion's actions in priority order, and produces a single effective
//! price plus a breakdown of which promotions contributed how much.
//!
//! # Architecture
//!
//! The engine itself ([`engine::evaluate_discounts`]) is a pure function of
//! `(EvaluationContext, &[Promotion])`. Everything async lives at the edges:
//!
//! - [`sources`] - read-only collaborator traits (promotions, customer
//!   groups, orders, products)
//! - [`db`] - `PostgreSQL` implementations of the source traits, with a
//!   TTL-bounded cache for the active-promotion list
//! - [`context`] - assembles an [`context::EvaluationContext`] from the
//!   sources with concurrent reads
//! - [`pricing`] - the two exposure points (product variant and search
//!   result), both thin adapters over the same engine
//!
//! The engine holds no persistent state and performs no writes; pricing
//! always resolves to *some* price, and `Ok(None)` means "no promotional
//! pricing applies" as opposed to "applies with zero discount".

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod conditions;
pub mod config;
pub mod context;
pub mod db;
pub mod engine;
pub mod error;
pub mod pricing;
pub mod sources;
pub mod types;
