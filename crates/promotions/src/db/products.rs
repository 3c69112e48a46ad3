//! Per-product discount inputs.

use std::collections::HashSet;

use sqlx::{PgPool, Row};

use bramble_core::{CollectionId, ProductId};

use crate::sources::{ProductDiscountProfile, ProductSource};

use super::RepositoryError;

/// Repository for product discount profiles.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn discount_by(&self, product: ProductId) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT discount_by
            FROM product
            WHERE id = $1
            ",
        )
        .bind(product)
        .fetch_optional(&self.pool)
        .await?;

        // Unknown products price without a discount_by baseline
        row.map_or(Ok(0), |r| r.try_get("discount_by").map_err(Into::into))
    }

    async fn collections(&self, product: ProductId) -> Result<HashSet<CollectionId>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT pc.collection_id
            FROM product_collection pc
            JOIN collection c ON c.id = pc.collection_id
            WHERE pc.product_id = $1
              AND c.is_private = FALSE
            ",
        )
        .bind(product)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<CollectionId, _>("collection_id").map_err(Into::into))
            .collect()
    }
}

impl ProductSource for ProductRepository {
    async fn discount_profile(
        &self,
        product: ProductId,
    ) -> Result<ProductDiscountProfile, RepositoryError> {
        let (discount_by, collections) =
            tokio::try_join!(self.discount_by(product), self.collections(product))?;

        Ok(ProductDiscountProfile {
            discount_by,
            collections,
        })
    }
}
