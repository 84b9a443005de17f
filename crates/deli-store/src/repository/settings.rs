//! # Settings Repository
//!
//! Per-store pricing configuration. One row per store; a missing row means
//! the caller falls back to [`StoreSettings::fallback`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use deli_core::StoreSettings;

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    tax_enabled: bool,
    tax_rate_bps: u32,
    tax_name: String,
    cash_discount_enabled: bool,
    cash_discount_bps: u32,
}

impl From<SettingsRow> for StoreSettings {
    fn from(row: SettingsRow) -> Self {
        StoreSettings {
            tax_enabled: row.tax_enabled,
            tax_rate_bps: row.tax_rate_bps,
            tax_name: row.tax_name,
            cash_discount_enabled: row.cash_discount_enabled,
            cash_discount_bps: row.cash_discount_bps,
        }
    }
}

/// Repository for store settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads a store's settings, if configured.
    pub async fn get(&self, store_id: &str) -> StoreResult<Option<StoreSettings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT tax_enabled, tax_rate_bps, tax_name,
                   cash_discount_enabled, cash_discount_bps
            FROM store_settings
            WHERE store_id = ?1
            "#,
        )
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoreSettings::from))
    }

    /// Creates or replaces a store's settings.
    pub async fn upsert(&self, store_id: &str, settings: &StoreSettings) -> StoreResult<()> {
        debug!(store_id = %store_id, "Upserting store settings");

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO store_settings (
                store_id, tax_enabled, tax_rate_bps, tax_name,
                cash_discount_enabled, cash_discount_bps, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (store_id) DO UPDATE SET
                tax_enabled = excluded.tax_enabled,
                tax_rate_bps = excluded.tax_rate_bps,
                tax_name = excluded.tax_name,
                cash_discount_enabled = excluded.cash_discount_enabled,
                cash_discount_bps = excluded.cash_discount_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(store_id)
        .bind(settings.tax_enabled)
        .bind(settings.tax_rate_bps)
        .bind(&settings.tax_name)
        .bind(settings.cash_discount_enabled)
        .bind(settings.cash_discount_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use deli_core::DEFAULT_STORE_ID;

    #[tokio::test]
    async fn test_missing_row_returns_none() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let settings = store.settings().get(DEFAULT_STORE_ID).await.unwrap();
        assert!(settings.is_none());
    }

    #[tokio::test]
    async fn test_upsert_round_trip() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.settings();

        let mut settings = StoreSettings::fallback();
        settings.cash_discount_enabled = true;
        settings.cash_discount_bps = 350;

        repo.upsert(DEFAULT_STORE_ID, &settings).await.unwrap();
        let loaded = repo.get(DEFAULT_STORE_ID).await.unwrap().unwrap();
        assert_eq!(loaded, settings);

        // Second upsert replaces
        settings.tax_rate_bps = 875;
        repo.upsert(DEFAULT_STORE_ID, &settings).await.unwrap();
        let loaded = repo.get(DEFAULT_STORE_ID).await.unwrap().unwrap();
        assert_eq!(loaded.tax_rate_bps, 875);
    }
}
