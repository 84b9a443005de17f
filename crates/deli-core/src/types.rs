//! # Domain Types
//!
//! Core domain types used throughout Deli POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Transaction    │   │ TransactionItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  upc (business) │   │  txn_number     │   │  name_snapshot  │       │
//! │  │  name           │   │  total_cents    │   │  line_total     │       │
//! │  │  price_cents    │   │  payment_method │   │  quantity/weight│       │
//! │  │  inventory      │   │  cash_given     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Rate        │   │ StoreSettings   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  bps (u32)      │   │  tax on/off     │                             │
//! │  │  800 = 8.00%    │   │  cash discount  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (upc, transaction_number) - human-readable, scannable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8.00% (the default sales tax); 350 bps = a 3.5% cash-discount
/// program rate. Both rates in the system share this representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A scannable catalog product.
///
/// Identity for cart-merge purposes is the `upc` within a store; the UUID is
/// for database relations only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store this product belongs to.
    pub store_id: String,

    /// Universal Product Code - the barcode identity.
    pub upc: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Stock on hand. `None` means inventory is not tracked for this item.
    pub inventory: Option<i64>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Per-store pricing configuration.
///
/// Read-only input to the pricing engine. The register loads this once at
/// session open; failures fall back to [`StoreSettings::fallback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreSettings {
    /// Whether sales tax is applied at all.
    pub tax_enabled: bool,

    /// Sales tax rate in basis points (800 = 8.00%).
    pub tax_rate_bps: u32,

    /// Display name of the tax line ("Sales Tax", "NYC Tax", ...).
    pub tax_name: String,

    /// Whether the dual cash/card pricing program is active.
    pub cash_discount_enabled: bool,

    /// Card surcharge rate in basis points when the program is active.
    pub cash_discount_bps: u32,
}

impl StoreSettings {
    /// Defaults used when the settings provider fails or has no row:
    /// tax enabled at 8.00%, cash discount disabled.
    pub fn fallback() -> Self {
        StoreSettings {
            tax_enabled: true,
            tax_rate_bps: 800,
            tax_name: "Sales Tax".to_string(),
            cash_discount_enabled: false,
            cash_discount_bps: 0,
        }
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps)
    }

    /// Returns the cash-discount (card surcharge) rate.
    #[inline]
    pub fn cash_discount_rate(&self) -> Rate {
        Rate::from_bps(self.cash_discount_bps)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a completed transaction was paid.
///
/// `Card` means the total was keyed into an external terminal by the
/// operator; there is no gateway integration in the register itself.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment, reconciled against tendered amount.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale.
///
/// Immutable once created. Uses the snapshot pattern: every line carries the
/// name and price at time of sale, so later catalog edits never rewrite
/// history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub store_id: String,
    /// Human-readable receipt identifier (YYMMDD-HHMMSS-NNNN).
    pub transaction_number: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    /// Card processing fee recovered through the cash-discount program
    /// (0 for cash payments or when the program is disabled).
    pub processing_fee_cents: i64,
    pub payment_method: PaymentMethod,
    /// For cash: amount the customer handed over.
    pub cash_given_cents: Option<i64>,
    /// For cash: change returned to the customer.
    pub change_cents: Option<i64>,
    /// Client-generated key making the create call safe to retry.
    pub idempotency_key: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Transaction Item
// =============================================================================

/// A line item snapshot inside a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    /// UPC at time of sale, when the line came from a scanned product.
    pub upc_snapshot: Option<String>,
    /// Display name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of sale (weighed lines store their
    /// computed total here with quantity 1).
    pub unit_price_cents: i64,
    /// Quantity sold (always 1 for weighed lines).
    pub quantity: i64,
    /// Scale weight in pounds for weighed lines.
    pub weight_lb: Option<f64>,
    /// Line subtotal before tax.
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl TransactionItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
