//! In-memory implementations of the promotion source traits.

use std::collections::HashSet;

use bramble_core::{ChannelId, CustomerGroupId, OrderId, ProductId, UserId};
use bramble_promotions::context::OrderTotals;
use bramble_promotions::db::RepositoryError;
use bramble_promotions::sources::{
    CustomerGroupSource, OrderSource, ProductDiscountProfile, ProductSource, PromotionSource,
};
use bramble_promotions::types::Promotion;

/// Serves a fixed promotion list for every channel.
#[derive(Debug, Clone, Default)]
pub struct FakePromotions {
    /// Promotions returned by every `active_promotions` call.
    pub promotions: Vec<Promotion>,
    /// When true, every read fails with a database-shaped error.
    pub fail: bool,
}

impl PromotionSource for FakePromotions {
    async fn active_promotions(
        &self,
        _channel: ChannelId,
    ) -> Result<Vec<Promotion>, RepositoryError> {
        if self.fail {
            return Err(RepositoryError::DataCorruption(
                "injected promotion read failure".to_string(),
            ));
        }
        Ok(self.promotions.clone())
    }
}

/// Serves a fixed group set for every user.
#[derive(Debug, Clone, Default)]
pub struct FakeCustomerGroups {
    /// Groups returned for any user.
    pub groups: HashSet<CustomerGroupId>,
}

impl CustomerGroupSource for FakeCustomerGroups {
    async fn groups_for_user(
        &self,
        _user: UserId,
    ) -> Result<HashSet<CustomerGroupId>, RepositoryError> {
        Ok(self.groups.clone())
    }
}

/// Serves a fixed order aggregate for every order id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeOrders {
    /// Totals returned for any order.
    pub totals: Option<OrderTotals>,
}

impl OrderSource for FakeOrders {
    async fn active_order_totals(
        &self,
        _order: OrderId,
    ) -> Result<Option<OrderTotals>, RepositoryError> {
        Ok(self.totals)
    }
}

/// Serves a fixed discount profile for every product.
#[derive(Debug, Clone, Default)]
pub struct FakeProducts {
    /// Profile returned for any product.
    pub profile: ProductDiscountProfile,
}

impl ProductSource for FakeProducts {
    async fn discount_profile(
        &self,
        _product: ProductId,
    ) -> Result<ProductDiscountProfile, RepositoryError> {
        Ok(self.profile.clone())
    }
}
