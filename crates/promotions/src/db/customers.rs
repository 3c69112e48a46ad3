//! Customer-group membership lookups.

use std::collections::HashSet;

use sqlx::{PgPool, Row};

use bramble_core::{CustomerGroupId, UserId};

use crate::sources::CustomerGroupSource;

use super::RepositoryError;

/// Repository for customer-group memberships.
#[derive(Debug, Clone)]
pub struct CustomerGroupRepository {
    pool: PgPool,
}

impl CustomerGroupRepository {
    /// Create a new customer-group repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CustomerGroupSource for CustomerGroupRepository {
    async fn groups_for_user(
        &self,
        user: UserId,
    ) -> Result<HashSet<CustomerGroupId>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT group_id
            FROM customer_group_member
            WHERE customer_id = $1
            ",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<CustomerGroupId, _>("group_id").map_err(Into::into))
            .collect()
    }
}
