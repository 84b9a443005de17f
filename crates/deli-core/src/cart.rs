//! # Cart Aggregate
//!
//! The mutable in-memory collection of line items for the current
//! transaction, independent of how each line was produced (scan, search,
//! manual key-in, composed food item, weighed deli item).
//!
//! ## Merge Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Line Identity & Merge                               │
//! │                                                                         │
//! │  Scanned / manual product  ──► key = UPC      ──► same UPC: qty += 1   │
//! │                                                                         │
//! │  Composed food item        ──► key = full     ──► same name: qty += 1  │
//! │  (options + modifiers          display name       (identical builds    │
//! │   encoded in the name)                             merge; different    │
//! │                                                    builds stay apart)  │
//! │                                                                         │
//! │  Weighed deli item         ──► key = name     ──► same name: REPLACE   │
//! │                                                    weight & total      │
//! │                                                    (re-weighing        │
//! │                                                     supersedes)        │
//! │                                                                         │
//! │  Combo upcharge            ──► synthetic line inserted directly        │
//! │                                after its parent, independently         │
//! │                                removable                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No zero/negative-quantity lines ever persist (dropping to 0 removes)
//! - New lines are prepended (newest scan shows on top)
//! - Weighed lines keep `quantity = 1`; weight is the variable dimension
//! - Inventory is advisory: adds never block, they only return a
//!   [`StockStatus`] for messaging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::menu::{modifier_summary, ComposedItem, Modifier};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Line Identity
// =============================================================================

/// Merge identity of a cart line.
///
/// Scanned and manually keyed products merge by UPC; composed, open, and
/// weighed items merge by their fully-qualified display name, because two
/// different option builds of the same base item must remain distinct lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum LineKey {
    Upc(String),
    Name(String),
}

// =============================================================================
// Line Pricing
// =============================================================================

/// How a line is priced.
///
/// Unit price, weight, and the stored line total are distinct fields; a
/// weighed line's total can never be mistaken for a per-unit price and
/// multiplied again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "camelCase")]
#[ts(export)]
pub enum LinePricing {
    /// Per-unit price multiplied by the line quantity.
    Unit { unit_price_cents: i64 },

    /// By-the-pound item: the total is computed once at weigh-in and stored;
    /// `quantity` stays 1.
    Weighed {
        price_per_pound_cents: i64,
        weight_lb: f64,
        line_total_cents: i64,
    },
}

// =============================================================================
// Composed Origin
// =============================================================================

/// Enough of a composed item's build to re-open the "Customize" editor:
/// the base entry, its resolved base price, and the per-option counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ComposedOrigin {
    pub base_name: String,
    pub base_price_cents: i64,
    pub selections: Vec<(String, u32)>,
}

// =============================================================================
// Cart Line
// =============================================================================

/// A single line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Merge identity (kept in sync with `name`/`modifiers`).
    pub key: LineKey,

    /// Display name including option selections, excluding modifiers.
    pub name: String,

    /// UPC snapshot when the line came from a scanned/manual product.
    pub upc: Option<String>,

    /// Pricing mode and figures.
    pub pricing: LinePricing,

    /// Count of units (always 1 for weighed lines).
    pub quantity: i64,

    /// Flattened modifiers, one entry per unit ("3x Extra Cheese" is three
    /// entries), so summation and grouped display stay uniform.
    pub modifiers: Vec<Modifier>,

    /// Present on composed lines; used to re-seed the customize editor.
    pub composed: Option<ComposedOrigin>,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// The fully-qualified display name: base name plus the grouped modifier
    /// summary. This is the merge identity for name-keyed lines.
    pub fn qualified_name(&self) -> String {
        if self.modifiers.is_empty() {
            self.name.clone()
        } else {
            format!("{} + {}", self.name, modifier_summary(&self.modifiers))
        }
    }

    /// Per-unit price including modifiers (unit lines only; weighed lines
    /// report their stored total).
    pub fn unit_price_cents(&self) -> i64 {
        match &self.pricing {
            LinePricing::Unit { unit_price_cents } => {
                unit_price_cents + self.modifiers.iter().map(|m| m.price_cents).sum::<i64>()
            }
            LinePricing::Weighed {
                line_total_cents, ..
            } => *line_total_cents,
        }
    }

    /// Line subtotal before tax.
    pub fn line_total_cents(&self) -> i64 {
        match &self.pricing {
            LinePricing::Unit { .. } => self.unit_price_cents() * self.quantity,
            LinePricing::Weighed {
                line_total_cents, ..
            } => *line_total_cents,
        }
    }

    /// Line subtotal as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }

    fn refresh_key(&mut self) {
        if matches!(self.key, LineKey::Name(_)) {
            self.key = LineKey::Name(self.qualified_name());
        }
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Advisory stock outcome of adding a scanned product.
///
/// The register always allows the add (an item physically on the counter is
/// sellable no matter what the book count says); these variants only drive
/// the confirmation message shown to the cashier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "camelCase")]
#[ts(export)]
pub enum StockStatus {
    /// Normal add.
    Ok,
    /// The add pushed the in-cart quantity past the book count.
    Low { on_hand: i64, in_cart: i64 },
    /// Book count was already zero or negative; this is an override sale.
    OutOfStock { on_hand: i64 },
}

// =============================================================================
// Cart
// =============================================================================

/// The cart aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a cart from a persisted snapshot.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart {
            lines,
            created_at: Utc::now(),
        }
    }

    /// Lines in display order (newest first, combos under their parent).
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Subtotal (before tax) across all lines.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Units of a given UPC currently in the cart.
    pub fn quantity_of_upc(&self, upc: &str) -> i64 {
        self.lines
            .iter()
            .filter(|l| l.upc.as_deref() == Some(upc))
            .map(|l| l.quantity)
            .sum()
    }

    /// Finds a line by key.
    pub fn find(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key == key)
    }

    // -------------------------------------------------------------------------
    // Adds
    // -------------------------------------------------------------------------

    /// Adds a scanned/searched product, merging by UPC.
    ///
    /// ## Behavior
    /// - Already in cart: quantity increases by 1
    /// - Not in cart: prepended as a new line with a frozen price
    /// - Never blocked by stock; the returned [`StockStatus`] drives the
    ///   cashier message only
    pub fn add_product(&mut self, product: &Product) -> CoreResult<StockStatus> {
        let key = LineKey::Upc(product.upc.clone());

        let new_qty = if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            let qty = line.quantity + 1;
            if qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = qty;
            qty
        } else {
            self.check_capacity()?;
            self.lines.insert(
                0,
                CartLine {
                    key,
                    name: product.name.clone(),
                    upc: Some(product.upc.clone()),
                    pricing: LinePricing::Unit {
                        unit_price_cents: product.price_cents,
                    },
                    quantity: 1,
                    modifiers: Vec::new(),
                    composed: None,
                    added_at: Utc::now(),
                },
            );
            1
        };

        Ok(match product.inventory {
            Some(on_hand) if on_hand <= 0 => StockStatus::OutOfStock { on_hand },
            Some(on_hand) if new_qty > on_hand => StockStatus::Low {
                on_hand,
                in_cart: new_qty,
            },
            _ => StockStatus::Ok,
        })
    }

    /// Adds a committed composed food item, merging by fully-qualified name.
    pub fn add_composed(&mut self, item: ComposedItem) -> CoreResult<()> {
        let key = LineKey::Name(item.name.clone());

        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            let qty = line.quantity + 1;
            if qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = qty;
            return Ok(());
        }

        self.check_capacity()?;
        self.lines.insert(
            0,
            CartLine {
                key,
                name: item.name,
                upc: None,
                pricing: LinePricing::Unit {
                    unit_price_cents: item.unit_price_cents,
                },
                quantity: 1,
                modifiers: Vec::new(),
                composed: item.origin,
                added_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Adds a by-the-pound line.
    ///
    /// ## Replace, Not Increment
    /// Re-submitting a weight for the same name replaces the stored
    /// weight/total: re-weighing the same physical item supersedes the prior
    /// weight rather than stacking on top of it.
    pub fn add_weighed(
        &mut self,
        name: &str,
        price_per_pound_cents: i64,
        weight_lb: f64,
    ) -> CoreResult<()> {
        crate::validation::validate_weight_lb(weight_lb)?;

        let line_total_cents =
            Money::from_weight(Money::from_cents(price_per_pound_cents), weight_lb).cents();
        let pricing = LinePricing::Weighed {
            price_per_pound_cents,
            weight_lb,
            line_total_cents,
        };

        let key = LineKey::Name(name.to_string());
        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            line.pricing = pricing;
            line.quantity = 1;
            return Ok(());
        }

        self.check_capacity()?;
        self.lines.insert(
            0,
            CartLine {
                key,
                name: name.to_string(),
                upc: None,
                pricing,
                quantity: 1,
                modifiers: Vec::new(),
                composed: None,
                added_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Adds a manually keyed line: a not-found UPC sold as a one-off, or an
    /// "open" arbitrary-price item with no UPC at all.
    pub fn add_manual(
        &mut self,
        upc: Option<&str>,
        name: &str,
        price_cents: i64,
    ) -> CoreResult<()> {
        crate::validation::validate_item_name(name)?;
        crate::validation::validate_price_cents(price_cents)?;

        let key = match upc {
            Some(code) => LineKey::Upc(code.to_string()),
            None => LineKey::Name(name.to_string()),
        };

        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            let qty = line.quantity + 1;
            if qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = qty;
            return Ok(());
        }

        self.check_capacity()?;
        self.lines.insert(
            0,
            CartLine {
                key,
                name: name.to_string(),
                upc: upc.map(str::to_string),
                pricing: LinePricing::Unit {
                    unit_price_cents: price_cents,
                },
                quantity: 1,
                modifiers: Vec::new(),
                composed: None,
                added_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Inserts a combo upcharge as a separate synthetic line directly after
    /// its parent, so the fee stays independently removable.
    pub fn add_combo(&mut self, parent: &LineKey, fee_cents: i64) -> CoreResult<()> {
        let parent_idx = self
            .lines
            .iter()
            .position(|l| &l.key == parent)
            .ok_or_else(|| CoreError::LineNotInCart(describe_key(parent)))?;

        let combo_name = format!("  → Combo for {}", self.lines[parent_idx].name);
        let key = LineKey::Name(combo_name.clone());

        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            line.quantity += 1;
            return Ok(());
        }

        self.check_capacity()?;
        self.lines.insert(
            parent_idx + 1,
            CartLine {
                key,
                name: combo_name,
                upc: None,
                pricing: LinePricing::Unit {
                    unit_price_cents: fee_cents,
                },
                quantity: 1,
                modifiers: Vec::new(),
                composed: None,
                added_at: Utc::now(),
            },
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adjusts a line's quantity by a delta; dropping to zero or below
    /// removes the line entirely.
    pub fn update_quantity(&mut self, key: &LineKey, delta: i64) -> CoreResult<()> {
        let idx = self
            .lines
            .iter()
            .position(|l| &l.key == key)
            .ok_or_else(|| CoreError::LineNotInCart(describe_key(key)))?;

        let line = &mut self.lines[idx];

        if delta > 0 {
            if let LinePricing::Weighed { .. } = line.pricing {
                // Weight is the variable dimension; re-weigh instead.
                return Err(CoreError::WrongPricingMode {
                    entry: line.name.clone(),
                    expected: "per unit",
                });
            }
            let qty = line.quantity + delta;
            if qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = qty;
            return Ok(());
        }

        if line.quantity + delta <= 0 {
            self.lines.remove(idx);
        } else {
            line.quantity += delta;
        }
        Ok(())
    }

    /// Removes a line by key.
    pub fn remove(&mut self, key: &LineKey) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| &l.key != key);

        if self.lines.len() == before {
            Err(CoreError::LineNotInCart(describe_key(key)))
        } else {
            Ok(())
        }
    }

    /// Replaces a composed line in place after a "Customize" re-commit.
    ///
    /// The edited build replaces the old one (never duplicates); quantity is
    /// preserved, modifiers are dropped since the name they were grouped
    /// under no longer exists.
    pub fn replace_line(&mut self, key: &LineKey, item: ComposedItem) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.key == key)
            .ok_or_else(|| CoreError::LineNotInCart(describe_key(key)))?;

        line.name = item.name.clone();
        line.pricing = LinePricing::Unit {
            unit_price_cents: item.unit_price_cents,
        };
        line.modifiers.clear();
        line.composed = item.origin;
        line.key = LineKey::Name(item.name);
        Ok(())
    }

    /// Replaces a line's modifier list with a freshly flattened one and
    /// refreshes its merge identity.
    pub fn set_modifiers(&mut self, key: &LineKey, modifiers: Vec<Modifier>) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.key == key)
            .ok_or_else(|| CoreError::LineNotInCart(describe_key(key)))?;

        if let LinePricing::Weighed { .. } = line.pricing {
            return Err(CoreError::WrongPricingMode {
                entry: line.name.clone(),
                expected: "per unit",
            });
        }

        line.modifiers = modifiers;
        line.refresh_key();
        Ok(())
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    fn check_capacity(&self) -> CoreResult<()> {
        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        Ok(())
    }
}

fn describe_key(key: &LineKey) -> String {
    match key {
        LineKey::Upc(upc) => format!("UPC {upc}"),
        LineKey::Name(name) => name.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_STORE_ID;

    fn product(upc: &str, price_cents: i64, inventory: Option<i64>) -> Product {
        Product {
            id: format!("id-{upc}"),
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

    fn composed(name: &str, price_cents: i64) -> ComposedItem {
        ComposedItem {
            name: name.to_string(),
            unit_price_cents: price_cents,
            origin: None,
        }
    }

    #[test]
    fn test_add_same_upc_merges() {
        let mut cart = Cart::new();
        let soda = product("001", 150, Some(5));

        cart.add_product(&soda).unwrap();
        cart.add_product(&soda).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.subtotal_cents(), 300);
    }

    #[test]
    fn test_new_lines_are_prepended() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 100, None)).unwrap();
        cart.add_product(&product("002", 200, None)).unwrap();

        assert_eq!(cart.lines()[0].upc.as_deref(), Some("002"));
        assert_eq!(cart.lines()[1].upc.as_deref(), Some("001"));
    }

    #[test]
    fn test_stock_status_variants() {
        let mut cart = Cart::new();

        // Untracked inventory: always Ok
        assert_eq!(
            cart.add_product(&product("100", 100, None)).unwrap(),
            StockStatus::Ok
        );

        // Out of stock: override sale
        assert_eq!(
            cart.add_product(&product("101", 100, Some(0))).unwrap(),
            StockStatus::OutOfStock { on_hand: 0 }
        );

        // Low stock: second unit oversells a count of 1
        let scarce = product("102", 100, Some(1));
        assert_eq!(cart.add_product(&scarce).unwrap(), StockStatus::Ok);
        assert_eq!(
            cart.add_product(&scarce).unwrap(),
            StockStatus::Low {
                on_hand: 1,
                in_cart: 2
            }
        );
    }

    #[test]
    fn test_update_quantity_removes_at_zero() {
        let mut cart = Cart::new();
        let soda = product("001", 150, None);
        cart.add_product(&soda).unwrap();
        cart.add_product(&soda).unwrap();

        let key = LineKey::Upc("001".to_string());
        cart.update_quantity(&key, -1).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.update_quantity(&key, -1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_weighed_replaces_not_increments() {
        let mut cart = Cart::new();

        cart.add_weighed("Ham Off The Bone", 899, 0.50).unwrap();
        cart.add_weighed("Ham Off The Bone", 899, 0.75).unwrap();

        assert_eq!(cart.len(), 1);
        let line = &cart.lines()[0];
        assert_eq!(line.quantity, 1);
        match &line.pricing {
            LinePricing::Weighed {
                weight_lb,
                line_total_cents,
                ..
            } => {
                assert!((weight_lb - 0.75).abs() < 1e-9);
                // 0.75 × $8.99 = $6.74 (674.25 rounds down)
                assert_eq!(*line_total_cents, 674);
            }
            _ => panic!("expected weighed pricing"),
        }
    }

    #[test]
    fn test_weighed_rejects_quantity_increment() {
        let mut cart = Cart::new();
        cart.add_weighed("Potato Salad", 599, 1.0).unwrap();

        let key = LineKey::Name("Potato Salad".to_string());
        assert!(cart.update_quantity(&key, 1).is_err());
        // but removal still works
        cart.update_quantity(&key, -1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_composed_merges_by_full_name() {
        let mut cart = Cart::new();

        cart.add_composed(composed("Gyro (Lamb)", 1099)).unwrap();
        cart.add_composed(composed("Gyro (Lamb)", 1099)).unwrap();
        cart.add_composed(composed("Gyro (Chicken)", 999)).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal_cents(), 2 * 1099 + 999);
    }

    #[test]
    fn test_combo_sits_under_parent() {
        let mut cart = Cart::new();
        cart.add_composed(composed("Gyro (Lamb)", 1099)).unwrap();
        cart.add_product(&product("001", 150, None)).unwrap();
        // display order now: [001, Gyro]

        let gyro_key = LineKey::Name("Gyro (Lamb)".to_string());
        cart.add_combo(&gyro_key, 399).unwrap();

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.lines()[1].name, "Gyro (Lamb)");
        assert_eq!(cart.lines()[2].name, "  → Combo for Gyro (Lamb)");
        assert_eq!(cart.lines()[2].line_total_cents(), 399);

        // combo is independently removable
        let combo_key = cart.lines()[2].key.clone();
        cart.remove(&combo_key).unwrap();
        assert_eq!(cart.len(), 2);
        assert!(cart.find(&gyro_key).is_some());
    }

    #[test]
    fn test_modifiers_fold_into_identity_and_total() {
        let mut cart = Cart::new();
        cart.add_composed(composed("Cheeseburger", 899)).unwrap();

        let key = LineKey::Name("Cheeseburger".to_string());
        cart.set_modifiers(
            &key,
            vec![
                Modifier {
                    name: "Extra Cheese".to_string(),
                    price_cents: 75,
                },
                Modifier {
                    name: "Extra Cheese".to_string(),
                    price_cents: 75,
                },
                Modifier {
                    name: "Bacon".to_string(),
                    price_cents: 150,
                },
            ],
        )
        .unwrap();

        let line = &cart.lines()[0];
        assert_eq!(
            line.qualified_name(),
            "Cheeseburger + 2x Extra Cheese, Bacon"
        );
        assert_eq!(line.key, LineKey::Name(line.qualified_name()));
        assert_eq!(line.line_total_cents(), 899 + 75 + 75 + 150);
    }

    #[test]
    fn test_open_item_merges_by_name() {
        let mut cart = Cart::new();
        cart.add_manual(None, "Misc Grocery", 250).unwrap();
        cart.add_manual(None, "Misc Grocery", 250).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_quantity_of_upc() {
        let mut cart = Cart::new();
        let soda = product("001", 150, None);
        cart.add_product(&soda).unwrap();
        cart.add_product(&soda).unwrap();

        assert_eq!(cart.quantity_of_upc("001"), 2);
        assert_eq!(cart.quantity_of_upc("999"), 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = Cart::new();
        cart.add_product(&product("001", 150, Some(5))).unwrap();
        cart.add_weighed("Potato Salad", 599, 0.66).unwrap();

        let json = serde_json::to_string(cart.lines()).unwrap();
        let lines: Vec<CartLine> = serde_json::from_str(&json).unwrap();
        let restored = Cart::from_lines(lines);

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.subtotal_cents(), cart.subtotal_cents());
    }
}
