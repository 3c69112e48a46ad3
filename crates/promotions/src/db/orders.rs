//! Active-order aggregate lookups.

use sqlx::{PgPool, Row};

use bramble_core::OrderId;

use crate::context::OrderTotals;
use crate::sources::OrderSource;

use super::RepositoryError;

/// Repository for minimal order aggregates.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OrderSource for OrderRepository {
    async fn active_order_totals(
        &self,
        order: OrderId,
    ) -> Result<Option<OrderTotals>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT sub_total, sub_total_with_tax
            FROM "order"
            WHERE id = $1 AND state = 'active'
            "#,
        )
        .bind(order)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(OrderTotals {
                sub_total: r.try_get("sub_total")?,
                sub_total_with_tax: r.try_get("sub_total_with_tax")?,
            })
        })
        .transpose()
    }
}
