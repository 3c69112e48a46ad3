//! Promotion repository with a TTL-bounded cache of the active list.
//!
//! Active-promotion reads are cached per channel with `moka` using the
//! configured TTL. The activation-window check in SQL is evaluated at
//! `now - ttl`, not `now`: a list served from the cache may be up to one TTL
//! old, and a promotion must stay eligible for as long as a cached list can
//! still reference it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use bramble_core::{ChannelId, PromotionId};

use crate::sources::PromotionSource;
use crate::types::{Promotion, PromotionAction, PromotionCondition, PromotionTranslation};

use super::RepositoryError;

/// Repository for channel-scoped active promotions.
#[derive(Clone)]
pub struct PromotionRepository {
    pool: PgPool,
    cache: Cache<i64, Arc<Vec<Promotion>>>,
    cache_ttl: Duration,
}

impl PromotionRepository {
    /// Create a new promotion repository.
    ///
    /// `cache_ttl` bounds both the cache entry lifetime and the staleness
    /// offset applied to the activation-window check.
    #[must_use]
    pub fn new(pool: PgPool, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(cache_ttl)
            .build();
        Self {
            pool,
            cache,
            cache_ttl,
        }
    }

    /// The instant the activation window is checked against.
    fn staleness_horizon(&self) -> DateTime<Utc> {
        let offset = TimeDelta::from_std(self.cache_ttl).unwrap_or_else(|_| TimeDelta::zero());
        Utc::now() - offset
    }

    #[instrument(skip(self))]
    async fn fetch_active(&self, channel: ChannelId) -> Result<Vec<Promotion>, RepositoryError> {
        let as_of = self.staleness_horizon();
        let rows = sqlx::query(
            r"
            SELECT p.id, p.enabled, p.starts_at, p.ends_at, p.deleted_at,
                   p.priority_score, p.conditions, p.actions, p.translations
            FROM promotion p
            JOIN promotion_channel pc ON pc.promotion_id = p.id
            WHERE pc.channel_id = $1
              AND p.enabled = TRUE
              AND p.deleted_at IS NULL
              AND (p.starts_at IS NULL OR p.starts_at <= $2)
              AND (p.ends_at IS NULL OR p.ends_at >= $2)
            ORDER BY p.priority_score ASC, p.id ASC
            ",
        )
        .bind(channel)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        let mut promotions = Vec::with_capacity(rows.len());
        for row in rows {
            promotions.push(map_promotion_row(&row)?);
        }
        debug!(
            channel = %channel,
            count = promotions.len(),
            "fetched active promotions"
        );
        Ok(promotions)
    }
}

impl PromotionSource for PromotionRepository {
    async fn active_promotions(
        &self,
        channel: ChannelId,
    ) -> Result<Vec<Promotion>, RepositoryError> {
        let key = channel.as_i64();
        if let Some(cached) = self.cache.get(&key).await {
            return Ok((*cached).clone());
        }

        let fetched = self.fetch_active(channel).await?;
        self.cache.insert(key, Arc::new(fetched.clone())).await;
        Ok(fetched)
    }
}

fn map_promotion_row(row: &sqlx::postgres::PgRow) -> Result<Promotion, RepositoryError> {
    let id: PromotionId = row.try_get("id")?;
    let conditions: Vec<PromotionCondition> = decode_jsonb(row, "conditions")?;
    let actions: Vec<PromotionAction> = decode_jsonb(row, "actions")?;
    let translations: Vec<PromotionTranslation> = decode_jsonb(row, "translations")?;

    Ok(Promotion {
        id,
        enabled: row.try_get("enabled")?,
        starts_at: row.try_get("starts_at")?,
        ends_at: row.try_get("ends_at")?,
        deleted_at: row.try_get("deleted_at")?,
        priority_score: row.try_get("priority_score")?,
        conditions,
        actions,
        translations,
    })
}

fn decode_jsonb<T: serde::de::DeserializeOwned>(
    row: &sqlx::postgres::PgRow,
    column: &str,
) -> Result<T, RepositoryError> {
    let value: serde_json::Value = row.try_get(column)?;
    serde_json::from_value(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid {column} JSON in database: {e}"))
    })
}
