//! # Seed Data Generator
//!
//! Populates the database with demo products and settings for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p deli-store --bin seed
//!
//! # Specify database path
//! cargo run -p deli-store --bin seed -- --db ./data/deli.db
//! ```
//!
//! ## Generated Data
//! - A shelf of scannable grocery staples with real-looking UPCs
//! - A handful of tracked-inventory items (including one at zero stock, to
//!   exercise the override-sale message)
//! - Store settings: 8% tax, cash-discount program at 3.5%

use chrono::Utc;
use std::env;
use uuid::Uuid;

use deli_core::{Product, StoreSettings, DEFAULT_STORE_ID};
use deli_store::{Store, StoreConfig};

/// (upc, name, price_cents, inventory)
const SHELF: &[(&str, &str, i64, Option<i64>)] = &[
    ("049000050103", "Cola 20oz", 229, Some(48)),
    ("049000028911", "Diet Cola 20oz", 229, Some(36)),
    ("012000161155", "Lemon-Lime Soda 20oz", 219, Some(24)),
    ("028400090896", "Classic Potato Chips", 249, Some(30)),
    ("028400433303", "Nacho Tortilla Chips", 299, Some(18)),
    ("038000138416", "Toasted Oat Cereal", 499, Some(12)),
    ("016000275270", "Granola Bars 6ct", 389, Some(20)),
    ("041196910759", "Chicken Noodle Soup", 189, Some(40)),
    ("073296069068", "Whole Milk Gallon", 459, Some(8)),
    ("011110038364", "Large Eggs Dozen", 379, Some(0)),
    ("072250007645", "White Bread Loaf", 329, Some(15)),
    ("021000615260", "American Cheese Singles", 449, Some(10)),
    ("051500255162", "Grape Jelly 18oz", 349, None),
    ("037600110754", "Yellow Mustard 14oz", 229, None),
    ("041497091027", "Seltzer 1L", 129, Some(60)),
    ("818290011234", "Energy Drink 16oz", 329, Some(22)),
    ("070462098563", "Paper Towels Single Roll", 249, None),
    ("039400016014", "Baked Beans 16oz", 219, Some(26)),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "./deli.db".to_string());
    println!("Seeding database at {db_path}");

    let store = match Store::open(StoreConfig::new(&db_path)).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = seed(&store).await {
        eprintln!("Seed failed: {e}");
        std::process::exit(1);
    }

    let count = store
        .products()
        .count(DEFAULT_STORE_ID)
        .await
        .unwrap_or(0);
    println!("Done. {count} active products in store {DEFAULT_STORE_ID}");
}

async fn seed(store: &Store) -> Result<(), deli_store::StoreError> {
    let products = store.products();
    let now = Utc::now();

    for (upc, name, price_cents, inventory) in SHELF {
        // Skip items already present so the seed is re-runnable
        if products.get_by_upc(DEFAULT_STORE_ID, upc).await?.is_some() {
            continue;
        }

        products
            .insert(&Product {
                id: Uuid::new_v4().to_string(),
                store_id: DEFAULT_STORE_ID.to_string(),
                upc: (*upc).to_string(),
                name: (*name).to_string(),
                price_cents: *price_cents,
                inventory: *inventory,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    store
        .settings()
        .upsert(
            DEFAULT_STORE_ID,
            &StoreSettings {
                tax_enabled: true,
                tax_rate_bps: 800,
                tax_name: "Sales Tax".to_string(),
                cash_discount_enabled: true,
                cash_discount_bps: 350,
            },
        )
        .await?;

    Ok(())
}

fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
