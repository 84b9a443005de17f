//! # Transaction Repository
//!
//! Database operations for completed sales.
//!
//! ## Create Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Idempotent Transaction Create                           │
//! │                                                                         │
//! │  insert(txn, items)                                                    │
//! │       │                                                                 │
//! │       ├── idempotency_key already stored? ──► return the EXISTING row  │
//! │       │    (a retried completion call after a lost response must not   │
//! │       │     ring the sale twice)                                       │
//! │       │                                                                 │
//! │       └── otherwise: header + all line snapshots in ONE transaction;   │
//! │           either everything lands or nothing does                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::StoreResult;
use deli_core::{Transaction, TransactionItem};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Persists a completed sale with its line snapshots, atomically.
    ///
    /// Safe to retry: if the idempotency key has been seen, the previously
    /// stored transaction is returned and nothing is written.
    pub async fn insert(
        &self,
        txn: &Transaction,
        items: &[TransactionItem],
    ) -> StoreResult<Transaction> {
        if let Some(existing) = self.get_by_idempotency_key(&txn.idempotency_key).await? {
            debug!(
                idempotency_key = %txn.idempotency_key,
                transaction_id = %existing.id,
                "Duplicate create suppressed"
            );
            return Ok(existing);
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, store_id, transaction_number,
                subtotal_cents, tax_cents, total_cents, processing_fee_cents,
                payment_method, cash_given_cents, change_cents,
                idempotency_key, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&txn.id)
        .bind(&txn.store_id)
        .bind(&txn.transaction_number)
        .bind(txn.subtotal_cents)
        .bind(txn.tax_cents)
        .bind(txn.total_cents)
        .bind(txn.processing_fee_cents)
        .bind(txn.payment_method)
        .bind(txn.cash_given_cents)
        .bind(txn.change_cents)
        .bind(&txn.idempotency_key)
        .bind(txn.created_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, upc_snapshot, name_snapshot,
                    unit_price_cents, quantity, weight_lb, line_total_cents,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.transaction_id)
            .bind(&item.upc_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.weight_lb)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            transaction_id = %txn.id,
            transaction_number = %txn.transaction_number,
            total = %txn.total_cents,
            items = items.len(),
            "Transaction recorded"
        );

        Ok(txn.clone())
    }

    /// Gets a transaction by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Transaction>> {
        let txn = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, store_id, transaction_number,
                   subtotal_cents, tax_cents, total_cents, processing_fee_cents,
                   payment_method, cash_given_cents, change_cents,
                   idempotency_key, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    /// Gets a transaction by its idempotency key.
    pub async fn get_by_idempotency_key(&self, key: &str) -> StoreResult<Option<Transaction>> {
        let txn = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, store_id, transaction_number,
                   subtotal_cents, tax_cents, total_cents, processing_fee_cents,
                   payment_method, cash_given_cents, change_cents,
                   idempotency_key, created_at
            FROM transactions
            WHERE idempotency_key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    /// Gets the line snapshots for a transaction.
    pub async fn get_items(&self, transaction_id: &str) -> StoreResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, upc_snapshot, name_snapshot,
                   unit_price_cents, quantity, weight_lb, line_total_cents,
                   created_at
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Most recent transactions for a store, newest first (receipt recall).
    pub async fn recent(&self, store_id: &str, limit: u32) -> StoreResult<Vec<Transaction>> {
        let txns = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, store_id, transaction_number,
                   subtotal_cents, tax_cents, total_cents, processing_fee_cents,
                   payment_method, cash_given_cents, change_cents,
                   idempotency_key, created_at
            FROM transactions
            WHERE store_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(txns)
    }

    /// Counts transactions for a store (for diagnostics and tests).
    pub async fn count(&self, store_id: &str) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE store_id = ?1")
                .bind(store_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use chrono::Utc;
    use deli_core::{PaymentMethod, DEFAULT_STORE_ID};
    use uuid::Uuid;

    fn sample_transaction(idempotency_key: &str) -> (Transaction, Vec<TransactionItem>) {
        let txn_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let txn = Transaction {
            id: txn_id.clone(),
            store_id: DEFAULT_STORE_ID.to_string(),
            transaction_number: "250806-120000-0001".to_string(),
            subtotal_cents: 150,
            tax_cents: 12,
            total_cents: 162,
            processing_fee_cents: 0,
            payment_method: PaymentMethod::Cash,
            cash_given_cents: Some(200),
            change_cents: Some(38),
            idempotency_key: idempotency_key.to_string(),
            created_at: now,
        };

        let items = vec![TransactionItem {
            id: Uuid::new_v4().to_string(),
            transaction_id: txn_id,
            upc_snapshot: Some("001".to_string()),
            name_snapshot: "Soda".to_string(),
            unit_price_cents: 150,
            quantity: 1,
            weight_lb: None,
            line_total_cents: 150,
            created_at: now,
        }];

        (txn, items)
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.transactions();

        let (txn, items) = sample_transaction("key-1");
        repo.insert(&txn, &items).await.unwrap();

        let found = repo.get_by_id(&txn.id).await.unwrap().unwrap();
        assert_eq!(found.total_cents, 162);
        assert_eq!(found.payment_method, PaymentMethod::Cash);
        assert_eq!(found.change_cents, Some(38));

        let stored_items = repo.get_items(&txn.id).await.unwrap();
        assert_eq!(stored_items.len(), 1);
        assert_eq!(stored_items[0].name_snapshot, "Soda");
    }

    #[tokio::test]
    async fn test_duplicate_create_is_suppressed() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.transactions();

        let (txn, items) = sample_transaction("key-1");
        let first = repo.insert(&txn, &items).await.unwrap();

        // A retry with the same key (even a rebuilt record with a new id)
        // must not write a second sale.
        let (mut retry, retry_items) = sample_transaction("key-1");
        retry.id = Uuid::new_v4().to_string();
        let second = repo.insert(&retry, &retry_items).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.count(DEFAULT_STORE_ID).await.unwrap(), 1);
    }
}
