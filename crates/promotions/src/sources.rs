//! Read-only collaborator traits.
//!
//! The engine consumes four upstream data sets, each behind a trait so that
//! the `PostgreSQL` implementations in [`crate::db`] and in-memory fakes in
//! tests are interchangeable. All sources are read-only; the engine performs
//! no writes.

use std::collections::HashSet;

use bramble_core::{ChannelId, CollectionId, CustomerGroupId, OrderId, ProductId, UserId};

use crate::context::OrderTotals;
use crate::db::RepositoryError;
use crate::types::Promotion;

/// Supplies the promotions currently active for a channel.
///
/// "Active" means enabled, not soft-deleted, and with an activation window
/// containing `now - cache_ttl` (the staleness tolerance for cached lists).
/// Promotions are returned with their ordered conditions, actions, and
/// translations.
pub trait PromotionSource {
    /// Fetch the active promotions for `channel`.
    fn active_promotions(
        &self,
        channel: ChannelId,
    ) -> impl Future<Output = Result<Vec<Promotion>, RepositoryError>> + Send;
}

/// Supplies the customer-group memberships of a user.
pub trait CustomerGroupSource {
    /// Fetch the set of groups `user` belongs to.
    fn groups_for_user(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<HashSet<CustomerGroupId>, RepositoryError>> + Send;
}

/// Supplies the minimal aggregate of an active order.
pub trait OrderSource {
    /// Fetch the totals of `order`, or `None` when the order does not exist
    /// or is no longer active.
    fn active_order_totals(
        &self,
        order: OrderId,
    ) -> impl Future<Output = Result<Option<OrderTotals>, RepositoryError>> + Send;
}

/// A product's promotion-relevant profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDiscountProfile {
    /// The precomputed `discount_by` custom-field value, in minor units.
    pub discount_by: i64,
    /// Non-private collections the product belongs to.
    pub collections: HashSet<CollectionId>,
}

/// Supplies per-product discount inputs.
pub trait ProductSource {
    /// Fetch the discount profile for `product`.
    ///
    /// Unknown products resolve to the default profile (no `discount_by`,
    /// no collections) rather than an error.
    fn discount_profile(
        &self,
        product: ProductId,
    ) -> impl Future<Output = Result<ProductDiscountProfile, RepositoryError>> + Send;
}
