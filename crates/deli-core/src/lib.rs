//! # deli-core: Pure Business Logic for Deli POS
//!
//! This crate is the **heart** of Deli POS. It contains all business logic
//! as pure functions and state machines with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Deli POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Register Front End (web)                       │   │
//! │  │    Scan field ──► Cart panel ──► Tender screen ──► Change       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    deli-register (session)                      │   │
//! │  │    keystrokes, lookups, persistence side effects                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ deli-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │  ┌───────┐ ┌───────┐ ┌─────────┐ ┌──────┐ ┌──────┐ ┌────────┐ │   │
//! │  │  │ money │ │ cart  │ │ pricing │ │ menu │ │ scan │ │checkout│ │   │
//! │  │  └───────┘ └───────┘ └─────────┘ └──────┘ └──────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    deli-store (SQLite layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StoreSettings, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart aggregate and its merge rules
//! - [`pricing`] - Dual cash/card totals derivation
//! - [`menu`] - Composed-item definitions and option/modifier resolution
//! - [`scan`] - Scanner keystroke state machine and UPC similarity search
//! - [`checkout`] - Payment flow state machine
//! - [`error`] - Domain error types
//! - [`validation`] - Operator-input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use deli_core::money::Money;
//! use deli_core::types::Rate;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(150); // $1.50
//!
//! // Apply the store's 8% tax rate
//! let tax = subtotal.apply_rate(Rate::from_bps(800));
//! assert_eq!(tax.cents(), 12);
//!
//! // The cash total is the canonical price
//! assert_eq!((subtotal + tax).cents(), 162);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod menu;
pub mod money;
pub mod pricing;
pub mod scan;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use deli_core::Money` instead of
// `use deli_core::money::Money`

pub use cart::{Cart, CartLine, LineKey, LinePricing, StockStatus};
pub use checkout::{CheckoutFlow, CheckoutState};
pub use error::{CoreError, ValidationError};
pub use menu::{MenuCatalog, MenuEntry, Modifier};
pub use money::Money;
pub use pricing::Totals;
pub use scan::{PendingScan, ScanMachine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default store ID for v0.1 (single-store runtime with multi-store schema)
///
/// ## Why a constant?
/// v0.1 runs one register in one store, but every row carries a store_id so
/// a second location never requires a schema change. This constant is used
/// throughout the codebase until dynamic store resolution lands.
pub const DEFAULT_STORE_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ringing (e.g., keying 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
