//! The two exposure points of the engine.
//!
//! A product variant's `discounted_price` and a search result's
//! `discounted_price` run the identical algorithm over different base-price
//! sources; both are thin adapters over [`evaluate_discounts`]. Given equal
//! inputs the two paths must produce identical results, which is a
//! correctness requirement, not an implementation detail.

use tracing::instrument;

use bramble_core::ProductId;

use crate::context::{ContextResolver, RequestContext};
use crate::engine::evaluate_discounts;
use crate::error::EvaluationError;
use crate::sources::{CustomerGroupSource, OrderSource, ProductSource, PromotionSource};
use crate::types::DiscountResult;

/// A search result's tax-inclusive price, which may be a range when the
/// underlying variants differ. The engine prices the range's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResultPrice {
    /// All variants share one price.
    Value(i64),
    /// Variant prices span a range.
    Range {
        /// Cheapest variant price.
        min: i64,
        /// Most expensive variant price.
        max: i64,
    },
}

impl SearchResultPrice {
    /// The price the engine evaluates: the value, or `min` for a range.
    #[must_use]
    pub const fn effective(&self) -> i64 {
        match self {
            Self::Value(value) => *value,
            Self::Range { min, .. } => *min,
        }
    }
}

/// Promotional pricing service: both exposure points over one engine.
///
/// Sources are injected at construction; the service holds no per-request
/// state. Both methods surface the same typed result - callers that prefer
/// the old swallow-on-error behavior for search results can suppress the
/// error on their side.
#[derive(Debug)]
pub struct PricingService<P, C, O, R> {
    promotions: P,
    customer_groups: C,
    orders: O,
    products: R,
}

impl<P, C, O, R> PricingService<P, C, O, R>
where
    P: PromotionSource,
    C: CustomerGroupSource,
    O: OrderSource,
    R: ProductSource,
{
    /// Create a pricing service over the given sources.
    pub const fn new(promotions: P, customer_groups: C, orders: O, products: R) -> Self {
        Self {
            promotions,
            customer_groups,
            orders,
            products,
        }
    }

    /// Discounted price of a product variant, from its tax-inclusive unit
    /// price.
    ///
    /// Returns `Ok(None)` when no promotions are active for the channel.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Repository`] when any upstream read fails.
    #[instrument(skip(self, request), fields(channel = %request.channel_id))]
    pub async fn variant_discounted_price(
        &self,
        request: &RequestContext,
        product_id: ProductId,
        price_with_tax: i64,
    ) -> Result<Option<DiscountResult>, EvaluationError> {
        self.discounted_price(request, product_id, price_with_tax)
            .await
    }

    /// Discounted price of a search result, from its tax-inclusive price or
    /// price range (the range's minimum is evaluated).
    ///
    /// Returns `Ok(None)` when no promotions are active for the channel.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Repository`] when any upstream read fails.
    #[instrument(skip(self, request), fields(channel = %request.channel_id))]
    pub async fn search_result_discounted_price(
        &self,
        request: &RequestContext,
        product_id: ProductId,
        price: SearchResultPrice,
    ) -> Result<Option<DiscountResult>, EvaluationError> {
        self.discounted_price(request, product_id, price.effective())
            .await
    }

    async fn discounted_price(
        &self,
        request: &RequestContext,
        product_id: ProductId,
        base_price: i64,
    ) -> Result<Option<DiscountResult>, EvaluationError> {
        let resolver = ContextResolver::new(&self.customer_groups, &self.orders, &self.products);

        // The promotion list read is independent of the context reads; run
        // them concurrently. Nothing below the join suspends.
        let (promotions, ctx) = tokio::try_join!(
            async {
                self.promotions
                    .active_promotions(request.channel_id)
                    .await
                    .map_err(EvaluationError::from)
            },
            resolver.resolve(request, product_id, base_price),
        )?;

        Ok(evaluate_discounts(&ctx, &promotions))
    }
}
