//! # deli-store: Database Layer for Deli POS
//!
//! This crate provides database access for the Deli POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Deli POS Data Flow                               │
//! │                                                                         │
//! │  Register session (scan dispatch, checkout completion)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     deli-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Product       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Transaction   │    │ 001_init.sql │  │   │
//! │  │   │ WAL mode      │    │ Settings      │    │              │  │   │
//! │  │   │               │    │ SavedCart     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (deli.db, WAL mode)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deli_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("path/to/deli.db")).await?;
//! let product = store.products().get_by_upc(store_id, "049000050103").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::StoreError;
pub use pool::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::cart::SavedCartRepository;
pub use repository::product::ProductRepository;
pub use repository::settings::SettingsRepository;
pub use repository::transaction::TransactionRepository;
