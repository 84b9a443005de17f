//! # Pricing Engine
//!
//! Pure functions deriving subtotal, tax, and the dual cash/card totals from
//! the cart and the store settings. Recomputed from scratch on every cart
//! mutation; there is no cached state to drift.
//!
//! ## Dual Pricing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cash-Discount Pricing                                │
//! │                                                                         │
//! │  subtotal = Σ line totals                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  tax = tax_enabled ? subtotal × tax_rate : 0                           │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CASH TOTAL = subtotal + tax          ← the canonical "true" price     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CARD TOTAL = cash total                                               │
//! │             + cash total × discount rate   (program surcharge)         │
//! │             + $0.30                        (fixed per-transaction fee) │
//! │                                                                         │
//! │  With the program disabled, card total == cash total, always.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::{PaymentMethod, StoreSettings};

/// Fixed per-transaction card fee in cents, recovered on top of the
/// percentage surcharge when the cash-discount program is active.
pub const CARD_TRANSACTION_FEE_CENTS: i64 = 30;

// =============================================================================
// Totals
// =============================================================================

/// The four derived figures displayed on every cart render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub cash_total_cents: i64,
    pub card_total_cents: i64,
}

impl Totals {
    /// Computes totals for a cart under the given settings.
    ///
    /// A `None` settings value means the provider never answered; pricing
    /// degrades to safe defaults (no tax, no card surcharge) rather than
    /// failing the render.
    pub fn compute(cart: &Cart, settings: Option<&StoreSettings>) -> Totals {
        let subtotal = Money::from_cents(cart.subtotal_cents());

        let tax = match settings {
            Some(s) if s.tax_enabled => subtotal.apply_rate(s.tax_rate()),
            _ => Money::zero(),
        };

        let cash_total = subtotal + tax;

        let card_total = match settings {
            Some(s) if s.cash_discount_enabled => {
                cash_total
                    + cash_total.apply_rate(s.cash_discount_rate())
                    + Money::from_cents(CARD_TRANSACTION_FEE_CENTS)
            }
            _ => cash_total,
        };

        Totals {
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            cash_total_cents: cash_total.cents(),
            card_total_cents: card_total.cents(),
        }
    }

    /// Total owed for a payment method; no method yet means the cash total
    /// (the canonical price shown before the customer chooses).
    pub fn total_for(&self, method: Option<PaymentMethod>) -> i64 {
        match method {
            Some(PaymentMethod::Card) => self.card_total_cents,
            Some(PaymentMethod::Cash) | None => self.cash_total_cents,
        }
    }

    /// Cash total as Money.
    #[inline]
    pub fn cash_total(&self) -> Money {
        Money::from_cents(self.cash_total_cents)
    }

    /// Card total as Money.
    #[inline]
    pub fn card_total(&self) -> Money {
        Money::from_cents(self.card_total_cents)
    }
}

// =============================================================================
// Processing Fee
// =============================================================================

/// The portion of a card payment that covers processing costs, recorded on
/// the transaction for reporting. Zero for cash, and zero whenever the
/// cash-discount program is off (the store eats the fee silently then).
pub fn processing_fee_cents(
    totals: &Totals,
    settings: Option<&StoreSettings>,
    method: PaymentMethod,
) -> i64 {
    match (method, settings) {
        (PaymentMethod::Card, Some(s)) if s.cash_discount_enabled => {
            totals.cash_total().apply_rate(s.cash_discount_rate()).cents()
                + CARD_TRANSACTION_FEE_CENTS
        }
        _ => 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use crate::DEFAULT_STORE_ID;
    use chrono::Utc;

    fn product(upc: &str, price_cents: i64) -> Product {
        Product {
            id: format!("id-{upc}"),
            store_id: DEFAULT_STORE_ID.to_string(),
            upc: upc.to_string(),
            name: format!("Product {upc}"),
            price_cents,
            inventory: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn settings(tax_bps: u32, discount_bps: Option<u32>) -> StoreSettings {
        StoreSettings {
            tax_enabled: tax_bps > 0,
            tax_rate_bps: tax_bps,
            tax_name: "Sales Tax".to_string(),
            cash_discount_enabled: discount_bps.is_some(),
            cash_discount_bps: discount_bps.unwrap_or(0),
        }
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 150)).unwrap();
        cart.add_weighed("Potato Salad", 599, 0.66).unwrap();

        let s = settings(800, Some(350));
        let a = Totals::compute(&cart, Some(&s));
        let b = Totals::compute(&cart, Some(&s));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tax_and_cash_total() {
        // The canonical scenario: $1.50 at 8% → $0.12 tax → $1.62 cash total
        let mut cart = Cart::new();
        cart.add_product(&product("001", 150)).unwrap();

        let totals = Totals::compute(&cart, Some(&settings(800, None)));
        assert_eq!(totals.subtotal_cents, 150);
        assert_eq!(totals.tax_cents, 12);
        assert_eq!(totals.cash_total_cents, 162);
    }

    #[test]
    fn test_card_equals_cash_when_program_disabled() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 150)).unwrap();
        cart.add_product(&product("002", 1237)).unwrap();

        let totals = Totals::compute(&cart, Some(&settings(800, None)));
        assert_eq!(totals.card_total_cents, totals.cash_total_cents);
    }

    #[test]
    fn test_card_surcharge_when_program_enabled() {
        // $10.00 cart, no tax, 3.5% program rate:
        // card = 1000 + 35 + 30 = $10.65
        let mut cart = Cart::new();
        cart.add_product(&product("001", 1000)).unwrap();

        let totals = Totals::compute(&cart, Some(&settings(0, Some(350))));
        assert_eq!(totals.cash_total_cents, 1000);
        assert_eq!(totals.card_total_cents, 1065);
    }

    #[test]
    fn test_missing_settings_degrade_safely() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 1000)).unwrap();

        let totals = Totals::compute(&cart, None);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.cash_total_cents, 1000);
        assert_eq!(totals.card_total_cents, 1000);
    }

    #[test]
    fn test_total_for_dispatch() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 1000)).unwrap();

        let totals = Totals::compute(&cart, Some(&settings(0, Some(350))));
        assert_eq!(totals.total_for(None), 1000);
        assert_eq!(totals.total_for(Some(PaymentMethod::Cash)), 1000);
        assert_eq!(totals.total_for(Some(PaymentMethod::Card)), 1065);
    }

    #[test]
    fn test_processing_fee() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 1000)).unwrap();

        let s = settings(0, Some(350));
        let totals = Totals::compute(&cart, Some(&s));

        assert_eq!(
            processing_fee_cents(&totals, Some(&s), PaymentMethod::Card),
            65
        );
        assert_eq!(
            processing_fee_cents(&totals, Some(&s), PaymentMethod::Cash),
            0
        );

        let no_program = settings(0, None);
        let totals = Totals::compute(&cart, Some(&no_program));
        assert_eq!(
            processing_fee_cents(&totals, Some(&no_program), PaymentMethod::Card),
            0
        );
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = Cart::new();
        let totals = Totals::compute(&cart, Some(&settings(800, Some(350))));
        assert_eq!(totals.subtotal_cents, 0);
        assert_eq!(totals.cash_total_cents, 0);
        // flat card fee applies unconditionally; empty carts never reach checkout
        assert_eq!(totals.card_total_cents, 30);
    }
}
