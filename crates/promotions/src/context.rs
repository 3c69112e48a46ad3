//! Evaluation context assembly.
//!
//! One pricing request needs four independent upstream reads: the active
//! customer's group memberships, the active order's totals, the target
//! product's discount profile, and the channel's active promotions. The
//! first three are assembled here into an [`EvaluationContext`]; the
//! promotion list is fetched alongside by the caller (see
//! [`crate::pricing::PricingService`]). All reads are issued concurrently;
//! the engine fold itself never suspends.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use bramble_core::{ChannelId, CollectionId, CustomerGroupId, LanguageCode, OrderId, ProductId, UserId};

use crate::error::EvaluationError;
use crate::sources::{CustomerGroupSource, OrderSource, ProductSource};

// =============================================================================
// Request and order aggregates
// =============================================================================

/// Per-request ambient state, extracted from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated customer, when there is one.
    pub active_user_id: Option<UserId>,
    /// The customer's open order, when there is one.
    pub active_order_id: Option<OrderId>,
    /// Channel the request is scoped to.
    pub channel_id: ChannelId,
    /// Language for translated promotion names/descriptions.
    pub language: LanguageCode,
}

/// Minimal aggregate of an active order, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Order subtotal excluding tax.
    pub sub_total: i64,
    /// Order subtotal including tax.
    pub sub_total_with_tax: i64,
}

// =============================================================================
// Evaluation context
// =============================================================================

/// Everything the pure engine fold needs for one pricing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Undiscounted tax-inclusive price of the unit being priced, in minor
    /// units. The accumulator starts here.
    pub base_price: i64,
    /// Authenticated customer, when there is one.
    pub active_user_id: Option<UserId>,
    /// Customer-group memberships of the active customer (empty for guests).
    pub customer_groups: HashSet<CustomerGroupId>,
    /// Totals of the customer's active order, when one exists.
    pub active_order: Option<OrderTotals>,
    /// The product's precomputed `discount_by` custom-field value, in minor
    /// units (internal/admin-only pricing input).
    pub product_discount_by: i64,
    /// Non-private collections the product belongs to.
    pub product_collections: HashSet<CollectionId>,
    /// Language for translated promotion metadata.
    pub language: LanguageCode,
}

// =============================================================================
// Context resolver
// =============================================================================

/// Assembles an [`EvaluationContext`] from the read-only sources.
///
/// Sources are injected explicitly; the resolver owns no connections of its
/// own and holds no state between requests.
#[derive(Debug)]
pub struct ContextResolver<'a, C, O, P> {
    customer_groups: &'a C,
    orders: &'a O,
    products: &'a P,
}

impl<'a, C, O, P> ContextResolver<'a, C, O, P>
where
    C: CustomerGroupSource,
    O: OrderSource,
    P: ProductSource,
{
    /// Create a resolver over the given sources.
    #[must_use]
    pub const fn new(customer_groups: &'a C, orders: &'a O, products: &'a P) -> Self {
        Self {
            customer_groups,
            orders,
            products,
        }
    }

    /// Resolve the context for pricing one unit of `product_id` at
    /// `base_price`.
    ///
    /// The three upstream reads run concurrently. Guests resolve to an empty
    /// group set; a missing active order resolves to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Repository`] when any upstream read fails.
    pub async fn resolve(
        &self,
        request: &RequestContext,
        product_id: ProductId,
        base_price: i64,
    ) -> Result<EvaluationContext, EvaluationError> {
        let groups = async {
            match request.active_user_id {
                Some(user_id) => self.customer_groups.groups_for_user(user_id).await,
                None => Ok(HashSet::new()),
            }
        };
        let order = async {
            match request.active_order_id {
                Some(order_id) => self.orders.active_order_totals(order_id).await,
                None => Ok(None),
            }
        };
        let profile = self.products.discount_profile(product_id);

        let (customer_groups, active_order, profile) = tokio::try_join!(groups, order, profile)?;

        Ok(EvaluationContext {
            base_price,
            active_user_id: request.active_user_id,
            customer_groups,
            active_order,
            product_discount_by: profile.discount_by,
            product_collections: profile.collections,
            language: request.language.clone(),
        })
    }
}
