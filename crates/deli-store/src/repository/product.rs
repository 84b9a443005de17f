//! # Product Repository
//!
//! Database operations for the scannable catalog.
//!
//! ## Key Operations
//! - Exact UPC lookup (the scanner hot path)
//! - Name search for the on-screen keyboard flow
//! - Full catalog listing for the similarity pass on lookup misses
//!
//! A deli catalog is a few thousand rows, so name search is a plain
//! indexed LIKE; no full-text index to maintain.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use deli_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// // Scanner hot path
/// let product = repo.get_by_upc(store_id, "049000050103").await?;
///
/// // Cashier typing at the search box
/// let results = repo.search_name(store_id, "soda", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Exact lookup by UPC, the path every barcode scan takes.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No such UPC in this store (callers run the
    ///   similarity pass next)
    pub async fn get_by_upc(&self, store_id: &str, upc: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, upc, name, price_cents, inventory,
                   is_active, created_at, updated_at
            FROM products
            WHERE store_id = ?1 AND upc = ?2 AND is_active = 1
            "#,
        )
        .bind(store_id)
        .bind(upc)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Case-insensitive name search for the manual search flow.
    /// An empty query lists active products sorted by name.
    pub async fn search_name(
        &self,
        store_id: &str,
        query: &str,
        limit: u32,
    ) -> StoreResult<Vec<Product>> {
        let query = query.trim();
        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_active(store_id, limit).await;
        }

        let pattern = format!("%{}%", query);
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, upc, name, price_cents, inventory,
                   is_active, created_at, updated_at
            FROM products
            WHERE store_id = ?1 AND is_active = 1 AND name LIKE ?2
            ORDER BY name
            LIMIT ?3
            "#,
        )
        .bind(store_id)
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Every active product in the store, in catalog order.
    ///
    /// ## When To Use
    /// The similarity pass on a lookup miss needs the full UPC universe;
    /// "first match in catalog order" is part of its contract.
    pub async fn list_all(&self, store_id: &str) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, upc, name, price_cents, inventory,
                   is_active, created_at, updated_at
            FROM products
            WHERE store_id = ?1 AND is_active = 1
            ORDER BY created_at, id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list_active(&self, store_id: &str, limit: u32) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, upc, name, price_cents, inventory,
                   is_active, created_at, updated_at
            FROM products
            WHERE store_id = ?1 AND is_active = 1
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(store_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(StoreError::UniqueViolation)` - UPC already exists in store
    pub async fn insert(&self, product: &Product) -> StoreResult<Product> {
        debug!(upc = %product.upc, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, store_id, upc, name, price_cents, inventory,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.upc)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.inventory)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Adjusts stock by a delta (negative for sales, positive for
    /// receiving). Untracked products (NULL inventory) are left untracked.
    pub async fn adjust_inventory(&self, id: &str, delta: i64) -> StoreResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting inventory");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET inventory = inventory + ?2,
                updated_at = ?3
            WHERE id = ?1 AND inventory IS NOT NULL
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either missing or untracked; verify which for a useful error
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            if exists.is_none() {
                return Err(StoreError::not_found("Product", id));
            }
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self, store_id: &str) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE store_id = ?1 AND is_active = 1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use deli_core::DEFAULT_STORE_ID;

    fn product(upc: &str, price_cents: i64, inventory: Option<i64>) -> Product {
        Product {
            id: generate_product_id(),
            store_id: DEFAULT_STORE_ID.to_string(),
            upc: upc.to_string(),
            name: format!("Product {upc}"),
            price_cents,
            inventory,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_by_upc() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.products();

        repo.insert(&product("001", 150, Some(5))).await.unwrap();

        let found = repo
            .get_by_upc(DEFAULT_STORE_ID, "001")
            .await
            .unwrap()
            .expect("product should be found");
        assert_eq!(found.price_cents, 150);
        assert_eq!(found.inventory, Some(5));

        assert!(repo
            .get_by_upc(DEFAULT_STORE_ID, "999")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_upc_rejected() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.products();

        repo.insert(&product("001", 150, None)).await.unwrap();
        let err = repo.insert(&product("001", 200, None)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_name() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.products();

        let mut soda = product("001", 150, None);
        soda.name = "Orange Soda".to_string();
        repo.insert(&soda).await.unwrap();

        let mut chips = product("002", 249, None);
        chips.name = "Potato Chips".to_string();
        repo.insert(&chips).await.unwrap();

        let hits = repo.search_name(DEFAULT_STORE_ID, "soda", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Orange Soda");

        // Empty query lists everything
        let all = repo.search_name(DEFAULT_STORE_ID, "", 20).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_inventory() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.products();

        let p = product("001", 150, Some(10));
        repo.insert(&p).await.unwrap();

        repo.adjust_inventory(&p.id, -3).await.unwrap();
        let found = repo
            .get_by_upc(DEFAULT_STORE_ID, "001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.inventory, Some(7));

        // Untracked products stay untracked
        let untracked = product("002", 100, None);
        repo.insert(&untracked).await.unwrap();
        repo.adjust_inventory(&untracked.id, -1).await.unwrap();
        let found = repo
            .get_by_upc(DEFAULT_STORE_ID, "002")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.inventory, None);
    }
}
