//! # Saved-Cart Repository
//!
//! Write-through snapshots of the in-progress cart, one row per store, so a
//! register restart mid-sale picks up where it left off.
//!
//! Saving an empty cart deletes the row rather than storing an empty list:
//! "no saved cart" and "empty cart" are indistinguishable on reload.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use deli_core::CartLine;

/// Repository for per-store cart snapshots.
#[derive(Debug, Clone)]
pub struct SavedCartRepository {
    pool: SqlitePool,
}

impl SavedCartRepository {
    /// Creates a new SavedCartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SavedCartRepository { pool }
    }

    /// Loads the saved cart for a store, if any.
    pub async fn load(&self, store_id: &str) -> StoreResult<Option<Vec<CartLine>>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM saved_carts WHERE store_id = ?1")
                .bind(store_id)
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(json) => {
                let lines: Vec<CartLine> =
                    serde_json::from_str(&json).map_err(|e| StoreError::CorruptPayload {
                        entity: "saved cart".to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Some(lines))
            }
            None => Ok(None),
        }
    }

    /// Writes the full cart through. An empty snapshot removes the row.
    pub async fn save(&self, store_id: &str, lines: &[CartLine]) -> StoreResult<()> {
        if lines.is_empty() {
            return self.clear(store_id).await;
        }

        let payload = serde_json::to_string(lines).map_err(|e| StoreError::CorruptPayload {
            entity: "saved cart".to_string(),
            message: e.to_string(),
        })?;

        debug!(store_id = %store_id, lines = lines.len(), "Saving cart snapshot");

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO saved_carts (store_id, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (store_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(store_id)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes the saved cart for a store.
    pub async fn clear(&self, store_id: &str) -> StoreResult<()> {
        debug!(store_id = %store_id, "Clearing cart snapshot");

        sqlx::query("DELETE FROM saved_carts WHERE store_id = ?1")
            .bind(store_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
