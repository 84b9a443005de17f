//! # Menu & Composition
//!
//! Static composed-item definitions (food categories, option groups,
//! modifier groups) and the logic that turns user selections into a
//! finalized line-item name and price.
//!
//! ## Composition Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     From Menu Tap to Cart Line                          │
//! │                                                                         │
//! │  Flat entry, no options ──────────────────────► commit immediately     │
//! │                                                                         │
//! │  By-the-pound entry ──────► weight entry ─────► weighed cart line      │
//! │                                                                         │
//! │  Single-select options ───► choosing IS the ──► "Gyro (Lamb)" $10.99   │
//! │  (protein, bread, ...)      commit action                               │
//! │                                                                         │
//! │  Size-then-custom ────────► pick size ────────► ingredient             │
//! │  (fresh juices)             (no commit yet)     multi-select           │
//! │                                                      │                  │
//! │  Multi-select ────────────► tap/minus counts ──► explicit "Add to     │
//! │  (ingredients)              beyond max_free      Cart" commit          │
//! │                             cost extra                                  │
//! │                                                                         │
//! │  Modifiers ───────────────► layered onto an already-committed line,   │
//! │                             flattened one entry per unit               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deterministic Names
//! A composed item's display name encodes every selected option and every
//! applied modifier (repetition collapsed to an "Nx " prefix), so two carts
//! built from the same selections produce identical merge keys.
//!
//! Option groups are a tagged enum and modifier groups are an explicit tag
//! on each menu entry; nothing is inferred from name substrings at runtime.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::ComposedOrigin;
use crate::error::{CoreError, CoreResult};
use crate::validation;

/// Flat fee for upgrading a composed item to a combo. The fee is its own
/// synthetic cart line rather than a price bump on the parent, so it stays
/// independently removable.
pub const COMBO_UPCHARGE_CENTS: i64 = 399;

// =============================================================================
// Modifier
// =============================================================================

/// A priced add-on layered onto an already-committed composed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Modifier {
    pub name: String,
    pub price_cents: i64,
}

/// Groups a flattened modifier list for display: repeated names collapse to
/// an "Nx " prefix, entries joined by ", ", first-appearance order.
///
/// ## Example
/// ```rust
/// use deli_core::menu::{modifier_summary, Modifier};
///
/// let mods = vec![
///     Modifier { name: "Extra Cheese".into(), price_cents: 75 },
///     Modifier { name: "Extra Cheese".into(), price_cents: 75 },
///     Modifier { name: "Bacon".into(), price_cents: 150 },
/// ];
/// assert_eq!(modifier_summary(&mods), "2x Extra Cheese, Bacon");
/// ```
pub fn modifier_summary(modifiers: &[Modifier]) -> String {
    let mut grouped: Vec<(&str, u32)> = Vec::new();
    for m in modifiers {
        match grouped.iter_mut().find(|(name, _)| *name == m.name) {
            Some((_, count)) => *count += 1,
            None => grouped.push((&m.name, 1)),
        }
    }

    grouped
        .iter()
        .map(|(name, count)| {
            if *count > 1 {
                format!("{count}x {name}")
            } else {
                (*name).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Modifier Groups
// =============================================================================

/// Which add-on table applies to a menu entry.
///
/// Set explicitly at catalog-definition time; never inferred from the
/// entry's name at runtime, and there is no fallback group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ModifierGroup {
    Burger,
    Sandwich,
    Gyro,
    Salad,
    Breakfast,
}

impl ModifierGroup {
    /// The fixed add-on table for this group: (name, price in cents).
    pub fn table(&self) -> &'static [(&'static str, i64)] {
        match self {
            ModifierGroup::Burger => &[
                ("Extra Cheese", 75),
                ("Bacon", 150),
                ("Fried Egg", 125),
                ("Extra Patty", 250),
                ("Avocado", 175),
                ("Grilled Onions", 50),
            ],
            ModifierGroup::Sandwich => &[
                ("Extra Cheese", 75),
                ("Bacon", 150),
                ("Avocado", 175),
                ("Double Meat", 300),
            ],
            ModifierGroup::Gyro => &[
                ("Extra Tzatziki", 50),
                ("Extra Meat", 300),
                ("Feta", 100),
                ("Grilled Onions", 50),
            ],
            ModifierGroup::Salad => &[
                ("Grilled Chicken", 350),
                ("Feta", 100),
                ("Avocado", 175),
                ("Extra Dressing", 50),
            ],
            ModifierGroup::Breakfast => &[
                ("Extra Egg", 100),
                ("Bacon", 150),
                ("Sausage", 150),
                ("Cheese", 75),
            ],
        }
    }
}

// =============================================================================
// Modifier Session
// =============================================================================

/// Counting state for the modifier picker on one cart line.
///
/// Each tap increments a per-modifier counter; `apply` flattens the counts
/// into one [`Modifier`] entry per unit so downstream summation stays
/// uniform. Arbitrary custom-priced add-ons become "Custom Add-On" entries.
#[derive(Debug, Clone)]
pub struct ModifierSession {
    choices: Vec<(String, i64)>,
    counts: Vec<u32>,
    custom_cents: Vec<i64>,
}

impl ModifierSession {
    /// Opens a picker over a group's fixed table.
    pub fn for_group(group: ModifierGroup) -> Self {
        let choices: Vec<(String, i64)> = group
            .table()
            .iter()
            .map(|(name, price)| ((*name).to_string(), *price))
            .collect();
        let counts = vec![0; choices.len()];
        ModifierSession {
            choices,
            counts,
            custom_cents: Vec::new(),
        }
    }

    /// The available (name, price) choices, for rendering.
    pub fn choices(&self) -> &[(String, i64)] {
        &self.choices
    }

    /// Increments a modifier's count.
    pub fn tap(&mut self, name: &str) -> CoreResult<()> {
        let idx = self.index_of(name)?;
        self.counts[idx] += 1;
        Ok(())
    }

    /// Decrements a modifier's count (floors at zero).
    pub fn minus(&mut self, name: &str) -> CoreResult<()> {
        let idx = self.index_of(name)?;
        self.counts[idx] = self.counts[idx].saturating_sub(1);
        Ok(())
    }

    /// Adds a free-form priced add-on.
    pub fn add_custom(&mut self, price_cents: i64) -> CoreResult<()> {
        validation::validate_price_cents(price_cents)?;
        self.custom_cents.push(price_cents);
        Ok(())
    }

    /// Flattens the current counts into one entry per unit, table order
    /// first, custom add-ons last.
    pub fn apply(&self) -> Vec<Modifier> {
        let mut flattened = Vec::new();
        for (i, (name, price)) in self.choices.iter().enumerate() {
            for _ in 0..self.counts[i] {
                flattened.push(Modifier {
                    name: name.clone(),
                    price_cents: *price,
                });
            }
        }
        for price in &self.custom_cents {
            flattened.push(Modifier {
                name: "Custom Add-On".to_string(),
                price_cents: *price,
            });
        }
        flattened
    }

    fn index_of(&self, name: &str) -> CoreResult<usize> {
        self.choices
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| CoreError::UnknownOption {
                option: name.to_string(),
                group: "modifiers".to_string(),
            })
    }
}

// =============================================================================
// Menu Pricing & Option Groups
// =============================================================================

/// How a menu entry is priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "camelCase")]
#[ts(export)]
pub enum MenuPrice {
    /// One flat price regardless of options (options affect naming only).
    Flat { price_cents: i64 },
    /// Price depends on the chosen variant (size, protein, ...).
    ByVariant { prices: Vec<(String, i64)> },
    /// Sold by weight at the scale.
    PerPound { price_per_pound_cents: i64 },
}

impl MenuPrice {
    fn variant_price(&self, entry: &str, variant: &str) -> CoreResult<i64> {
        match self {
            MenuPrice::Flat { price_cents } => Ok(*price_cents),
            MenuPrice::ByVariant { prices } => prices
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(variant))
                .map(|(_, cents)| *cents)
                .ok_or_else(|| CoreError::MissingVariantPrice {
                    entry: entry.to_string(),
                    variant: variant.to_string(),
                }),
            MenuPrice::PerPound { .. } => Err(CoreError::WrongPricingMode {
                entry: entry.to_string(),
                expected: "per unit",
            }),
        }
    }
}

/// A single-choice option group. Choosing an option IS the commit action:
/// price and name are finalized and the item goes to the cart in one tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SingleSelect {
    pub title: String,
    pub options: Vec<String>,
}

/// A counted multi-select group with a free allowance: every unit beyond
/// `max_free` costs `extra_charge_cents`. Commit is a separate explicit
/// action, disabled while nothing is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MultiSelect {
    pub title: String,
    pub options: Vec<String>,
    pub max_free: u32,
    pub extra_charge_cents: i64,
}

/// Option groups, keyed by shape rather than by a magic string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum OptionSelect {
    Single(SingleSelect),
    Multi(MultiSelect),
    /// Two-stage build (fresh juices): choosing the size does NOT commit;
    /// it opens the ingredient multi-select for that size.
    SizeThenCustom { size_title: String, custom: MultiSelect },
}

// =============================================================================
// Menu Entry & Catalog
// =============================================================================

/// A composable food-menu entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuEntry {
    pub name: String,
    pub price: MenuPrice,
    pub options: Option<OptionSelect>,
    pub modifier_group: Option<ModifierGroup>,
}

/// A finalized composed item, ready for the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedItem {
    /// Fully-qualified display name (base + selections).
    pub name: String,
    /// Final per-unit price including option charges.
    pub unit_price_cents: i64,
    /// Build record for the "Customize" editor (multi-select items only).
    pub origin: Option<ComposedOrigin>,
}

/// What tapping a menu entry should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    /// Flat entry with no options: committed immediately.
    Commit(ComposedItem),
    /// By-the-pound entry: open the weight-entry flow.
    Weigh { price_per_pound_cents: i64 },
    /// Entry needs its option group resolved first.
    Options(OptionSelect),
}

impl MenuEntry {
    /// Resolves the first tap on this entry.
    pub fn activate(&self) -> CoreResult<MenuAction> {
        if let Some(options) = &self.options {
            return Ok(MenuAction::Options(options.clone()));
        }

        match &self.price {
            MenuPrice::Flat { price_cents } => Ok(MenuAction::Commit(ComposedItem {
                name: self.name.clone(),
                unit_price_cents: *price_cents,
                origin: None,
            })),
            MenuPrice::PerPound {
                price_per_pound_cents,
            } => Ok(MenuAction::Weigh {
                price_per_pound_cents: *price_per_pound_cents,
            }),
            MenuPrice::ByVariant { .. } => Err(CoreError::WrongPricingMode {
                entry: self.name.clone(),
                expected: "with an option group",
            }),
        }
    }

    /// Resolves a single-select choice into a committed item.
    ///
    /// Name is `"{base} ({option})"`; price comes from the variant table
    /// when the entry is variant-priced, or the flat price when the option
    /// only affects naming (bread choice on a flat-priced sandwich).
    pub fn resolve_single(&self, option: &str) -> CoreResult<ComposedItem> {
        let group = match &self.options {
            Some(OptionSelect::Single(group)) => group,
            _ => {
                return Err(CoreError::WrongPricingMode {
                    entry: self.name.clone(),
                    expected: "with a single-select group",
                })
            }
        };

        if !group.options.iter().any(|o| o.eq_ignore_ascii_case(option)) {
            return Err(CoreError::UnknownOption {
                option: option.to_string(),
                group: group.title.clone(),
            });
        }

        Ok(ComposedItem {
            name: format!("{} ({})", self.name, option),
            unit_price_cents: self.price.variant_price(&self.name, option)?,
            origin: None,
        })
    }

    /// Resolves the size stage of a size-then-custom entry. Does not commit:
    /// the returned session is the ingredient picker for the chosen size.
    pub fn choose_size(&self, size: &str) -> CoreResult<MultiSelectSession> {
        let custom = match &self.options {
            Some(OptionSelect::SizeThenCustom { custom, .. }) => custom,
            _ => {
                return Err(CoreError::WrongPricingMode {
                    entry: self.name.clone(),
                    expected: "with a size-then-custom group",
                })
            }
        };

        let base_price = self.price.variant_price(&self.name, size)?;
        Ok(MultiSelectSession::new(
            format!("{} ({})", self.name, size),
            base_price,
            custom.clone(),
        ))
    }

    /// Opens the multi-select picker for a plain multi-select entry.
    pub fn begin_multi(&self) -> CoreResult<MultiSelectSession> {
        let config = match &self.options {
            Some(OptionSelect::Multi(config)) => config,
            _ => {
                return Err(CoreError::WrongPricingMode {
                    entry: self.name.clone(),
                    expected: "with a multi-select group",
                })
            }
        };

        match &self.price {
            MenuPrice::Flat { price_cents } => Ok(MultiSelectSession::new(
                self.name.clone(),
                *price_cents,
                config.clone(),
            )),
            _ => Err(CoreError::WrongPricingMode {
                entry: self.name.clone(),
                expected: "flat",
            }),
        }
    }
}

// =============================================================================
// Multi-Select Session
// =============================================================================

/// Counting state for a multi-select build (juice ingredients and the like).
///
/// No upper bound is enforced at selection time; units beyond the free
/// allowance are charged at commit. Commit requires at least one unit.
#[derive(Debug, Clone)]
pub struct MultiSelectSession {
    base_name: String,
    base_price_cents: i64,
    config: MultiSelect,
    counts: Vec<u32>,
}

impl MultiSelectSession {
    fn new(base_name: String, base_price_cents: i64, config: MultiSelect) -> Self {
        let counts = vec![0; config.options.len()];
        MultiSelectSession {
            base_name,
            base_price_cents,
            config,
            counts,
        }
    }

    /// Re-opens the picker pre-seeded with a committed line's selections
    /// (the "Customize" flow). Selections that no longer exist in the
    /// config are dropped.
    pub fn seed_from(origin: &ComposedOrigin, config: MultiSelect) -> Self {
        let mut session = MultiSelectSession::new(
            origin.base_name.clone(),
            origin.base_price_cents,
            config,
        );
        for (option, count) in &origin.selections {
            if let Some(idx) = session
                .config
                .options
                .iter()
                .position(|o| o.eq_ignore_ascii_case(option))
            {
                session.counts[idx] = *count;
            }
        }
        session
    }

    /// The option names, for rendering.
    pub fn options(&self) -> &[String] {
        &self.config.options
    }

    /// Current count for one option.
    pub fn count_of(&self, option: &str) -> u32 {
        self.index_of(option)
            .map(|idx| self.counts[idx])
            .unwrap_or(0)
    }

    /// Increments an option's count. No upper bound here; price handles it.
    pub fn tap(&mut self, option: &str) -> CoreResult<()> {
        let idx = self.index_of(option).ok_or_else(|| self.unknown(option))?;
        self.counts[idx] += 1;
        Ok(())
    }

    /// Decrements an option's count (floors at zero).
    pub fn minus(&mut self, option: &str) -> CoreResult<()> {
        let idx = self.index_of(option).ok_or_else(|| self.unknown(option))?;
        self.counts[idx] = self.counts[idx].saturating_sub(1);
        Ok(())
    }

    /// Total selected units across all options.
    pub fn total_selected(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Commit is disabled while nothing is selected.
    pub fn can_commit(&self) -> bool {
        self.total_selected() > 0
    }

    /// Final price: base + max(0, total − max_free) × extra_charge.
    pub fn price_cents(&self) -> i64 {
        let total = self.total_selected() as i64;
        let free = self.config.max_free as i64;
        let billable = (total - free).max(0);
        self.base_price_cents + billable * self.config.extra_charge_cents
    }

    /// Final display name: base, then each selected option in config order
    /// with an "Nx " prefix when its count exceeds one, joined by ", ".
    pub fn display_name(&self) -> String {
        let parts: Vec<String> = self
            .config
            .options
            .iter()
            .zip(&self.counts)
            .filter(|(_, count)| **count > 0)
            .map(|(option, count)| {
                if *count > 1 {
                    format!("{count}x {option}")
                } else {
                    option.clone()
                }
            })
            .collect();
        format!("{}: {}", self.base_name, parts.join(", "))
    }

    /// Finalizes the build.
    pub fn commit(&self) -> CoreResult<ComposedItem> {
        if !self.can_commit() {
            return Err(CoreError::NothingSelected {
                entry: self.base_name.clone(),
            });
        }

        let selections: Vec<(String, u32)> = self
            .config
            .options
            .iter()
            .zip(&self.counts)
            .filter(|(_, count)| **count > 0)
            .map(|(option, count)| (option.clone(), *count))
            .collect();

        Ok(ComposedItem {
            name: self.display_name(),
            unit_price_cents: self.price_cents(),
            origin: Some(ComposedOrigin {
                base_name: self.base_name.clone(),
                base_price_cents: self.base_price_cents,
                selections,
            }),
        })
    }

    fn index_of(&self, option: &str) -> Option<usize> {
        self.config
            .options
            .iter()
            .position(|o| o.eq_ignore_ascii_case(option))
    }

    fn unknown(&self, option: &str) -> CoreError {
        CoreError::UnknownOption {
            option: option.to_string(),
            group: self.config.title.clone(),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A named group of menu entries, as rendered on the food screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuCategory {
    pub name: String,
    pub entries: Vec<MenuEntry>,
}

/// The store's static food menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuCatalog {
    pub categories: Vec<MenuCategory>,
}

impl MenuCatalog {
    /// Finds an entry by name across all categories.
    pub fn find_entry(&self, name: &str) -> Option<&MenuEntry> {
        self.categories
            .iter()
            .flat_map(|c| &c.entries)
            .find(|e| e.name == name)
    }

    /// The standard deli menu.
    pub fn standard() -> Self {
        let bread = |title: &str| {
            OptionSelect::Single(SingleSelect {
                title: title.to_string(),
                options: vec![
                    "Roll".to_string(),
                    "White".to_string(),
                    "Wheat".to_string(),
                ],
            })
        };

        MenuCatalog {
            categories: vec![
                MenuCategory {
                    name: "Sandwiches".to_string(),
                    entries: vec![
                        MenuEntry {
                            name: "Turkey Club".to_string(),
                            price: MenuPrice::Flat { price_cents: 1049 },
                            options: Some(bread("Bread")),
                            modifier_group: Some(ModifierGroup::Sandwich),
                        },
                        MenuEntry {
                            name: "Italian Combo".to_string(),
                            price: MenuPrice::Flat { price_cents: 1149 },
                            options: Some(bread("Bread")),
                            modifier_group: Some(ModifierGroup::Sandwich),
                        },
                    ],
                },
                MenuCategory {
                    name: "Burgers".to_string(),
                    entries: vec![
                        MenuEntry {
                            name: "Cheeseburger".to_string(),
                            price: MenuPrice::Flat { price_cents: 899 },
                            options: None,
                            modifier_group: Some(ModifierGroup::Burger),
                        },
                        MenuEntry {
                            name: "Deluxe Burger".to_string(),
                            price: MenuPrice::Flat { price_cents: 1099 },
                            options: None,
                            modifier_group: Some(ModifierGroup::Burger),
                        },
                    ],
                },
                MenuCategory {
                    name: "Gyros".to_string(),
                    entries: vec![MenuEntry {
                        name: "Gyro".to_string(),
                        price: MenuPrice::ByVariant {
                            prices: vec![
                                ("Lamb".to_string(), 1099),
                                ("Chicken".to_string(), 999),
                            ],
                        },
                        options: Some(OptionSelect::Single(SingleSelect {
                            title: "Protein".to_string(),
                            options: vec!["Lamb".to_string(), "Chicken".to_string()],
                        })),
                        modifier_group: Some(ModifierGroup::Gyro),
                    }],
                },
                MenuCategory {
                    name: "Fresh Juices".to_string(),
                    entries: vec![MenuEntry {
                        name: "Fresh Juice".to_string(),
                        price: MenuPrice::ByVariant {
                            prices: vec![
                                ("Small".to_string(), 499),
                                ("Medium".to_string(), 599),
                                ("Large".to_string(), 699),
                            ],
                        },
                        options: Some(OptionSelect::SizeThenCustom {
                            size_title: "Size".to_string(),
                            custom: MultiSelect {
                                title: "Ingredients".to_string(),
                                options: vec![
                                    "Apple".to_string(),
                                    "Orange".to_string(),
                                    "Carrot".to_string(),
                                    "Ginger".to_string(),
                                    "Kale".to_string(),
                                    "Beet".to_string(),
                                    "Celery".to_string(),
                                ],
                                max_free: 3,
                                extra_charge_cents: 150,
                            },
                        }),
                        modifier_group: None,
                    }],
                },
                MenuCategory {
                    name: "Salads by the Pound".to_string(),
                    entries: vec![
                        MenuEntry {
                            name: "Potato Salad".to_string(),
                            price: MenuPrice::PerPound {
                                price_per_pound_cents: 599,
                            },
                            options: None,
                            modifier_group: None,
                        },
                        MenuEntry {
                            name: "Macaroni Salad".to_string(),
                            price: MenuPrice::PerPound {
                                price_per_pound_cents: 549,
                            },
                            options: None,
                            modifier_group: None,
                        },
                        MenuEntry {
                            name: "Chicken Salad".to_string(),
                            price: MenuPrice::PerPound {
                                price_per_pound_cents: 899,
                            },
                            options: None,
                            modifier_group: None,
                        },
                    ],
                },
                MenuCategory {
                    name: "Breakfast".to_string(),
                    entries: vec![MenuEntry {
                        name: "Bacon Egg & Cheese".to_string(),
                        price: MenuPrice::Flat { price_cents: 649 },
                        options: Some(OptionSelect::Single(SingleSelect {
                            title: "Bread".to_string(),
                            options: vec![
                                "Roll".to_string(),
                                "Bagel".to_string(),
                                "Croissant".to_string(),
                            ],
                        })),
                        modifier_group: Some(ModifierGroup::Breakfast),
                    }],
                },
            ],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn juice_entry() -> MenuEntry {
        MenuCatalog::standard()
            .find_entry("Fresh Juice")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_flat_entry_commits_immediately() {
        let entry = MenuCatalog::standard()
            .find_entry("Cheeseburger")
            .unwrap()
            .clone();

        match entry.activate().unwrap() {
            MenuAction::Commit(item) => {
                assert_eq!(item.name, "Cheeseburger");
                assert_eq!(item.unit_price_cents, 899);
            }
            other => panic!("expected immediate commit, got {other:?}"),
        }
    }

    #[test]
    fn test_per_pound_entry_opens_weight_flow() {
        let entry = MenuCatalog::standard()
            .find_entry("Potato Salad")
            .unwrap()
            .clone();

        assert_eq!(
            entry.activate().unwrap(),
            MenuAction::Weigh {
                price_per_pound_cents: 599
            }
        );
    }

    #[test]
    fn test_single_select_resolves_variant_price_and_name() {
        let entry = MenuCatalog::standard().find_entry("Gyro").unwrap().clone();

        let lamb = entry.resolve_single("Lamb").unwrap();
        assert_eq!(lamb.name, "Gyro (Lamb)");
        assert_eq!(lamb.unit_price_cents, 1099);

        // case-folded variant lookup
        let chicken = entry.resolve_single("chicken").unwrap();
        assert_eq!(chicken.unit_price_cents, 999);

        assert!(entry.resolve_single("Tofu").is_err());
    }

    #[test]
    fn test_single_select_name_only_keeps_flat_price() {
        let entry = MenuCatalog::standard()
            .find_entry("Turkey Club")
            .unwrap()
            .clone();

        let on_wheat = entry.resolve_single("Wheat").unwrap();
        assert_eq!(on_wheat.name, "Turkey Club (Wheat)");
        assert_eq!(on_wheat.unit_price_cents, 1049);
    }

    #[test]
    fn test_size_then_custom_does_not_commit_on_size() {
        let entry = juice_entry();

        // Choosing the size yields a picker, not a committed item.
        let mut session = entry.choose_size("Large").unwrap();
        assert!(!session.can_commit());

        session.tap("Apple").unwrap();
        session.tap("Ginger").unwrap();
        let item = session.commit().unwrap();
        assert_eq!(item.name, "Fresh Juice (Large): Apple, Ginger");
        assert_eq!(item.unit_price_cents, 699);
    }

    #[test]
    fn test_multi_select_excess_units_are_charged() {
        // max_free 3, extra $1.50: 5 units → base + $3.00
        let entry = juice_entry();
        let mut session = entry.choose_size("Small").unwrap();

        session.tap("Apple").unwrap();
        session.tap("Apple").unwrap();
        session.tap("Carrot").unwrap();
        session.tap("Carrot").unwrap();
        session.tap("Kale").unwrap();

        assert_eq!(session.total_selected(), 5);
        assert_eq!(session.price_cents(), 499 + 300);

        let item = session.commit().unwrap();
        assert_eq!(item.name, "Fresh Juice (Small): 2x Apple, 2x Carrot, Kale");
    }

    #[test]
    fn test_multi_select_name_is_deterministic() {
        // Same selections in different tap order produce identical names,
        // so identical builds merge in the cart.
        let entry = juice_entry();

        let mut a = entry.choose_size("Small").unwrap();
        a.tap("Ginger").unwrap();
        a.tap("Apple").unwrap();

        let mut b = entry.choose_size("Small").unwrap();
        b.tap("Apple").unwrap();
        b.tap("Ginger").unwrap();

        assert_eq!(a.commit().unwrap().name, b.commit().unwrap().name);
    }

    #[test]
    fn test_multi_select_minus_and_empty_commit() {
        let entry = juice_entry();
        let mut session = entry.choose_size("Medium").unwrap();

        session.tap("Beet").unwrap();
        session.minus("Beet").unwrap();
        assert!(!session.can_commit());
        assert!(session.commit().is_err());

        // minus floors at zero
        session.minus("Beet").unwrap();
        assert_eq!(session.count_of("Beet"), 0);
    }

    #[test]
    fn test_customize_seeds_previous_selections() {
        let entry = juice_entry();
        let mut session = entry.choose_size("Large").unwrap();
        session.tap("Apple").unwrap();
        session.tap("Apple").unwrap();
        session.tap("Kale").unwrap();
        let item = session.commit().unwrap();

        let origin = item.origin.expect("multi-select items carry an origin");
        let custom = match entry.options.as_ref().unwrap() {
            OptionSelect::SizeThenCustom { custom, .. } => custom.clone(),
            _ => unreachable!(),
        };

        let mut reopened = MultiSelectSession::seed_from(&origin, custom);
        assert_eq!(reopened.count_of("Apple"), 2);
        assert_eq!(reopened.count_of("Kale"), 1);

        reopened.minus("Apple").unwrap();
        let edited = reopened.commit().unwrap();
        assert_eq!(edited.name, "Fresh Juice (Large): Apple, Kale");
    }

    #[test]
    fn test_modifier_session_flattens_counts() {
        let mut session = ModifierSession::for_group(ModifierGroup::Burger);
        session.tap("Extra Cheese").unwrap();
        session.tap("Extra Cheese").unwrap();
        session.tap("Extra Cheese").unwrap();
        session.tap("Bacon").unwrap();
        session.add_custom(200).unwrap();

        let mods = session.apply();
        assert_eq!(mods.len(), 5);
        assert_eq!(
            mods.iter().filter(|m| m.name == "Extra Cheese").count(),
            3
        );
        assert_eq!(mods.last().unwrap().name, "Custom Add-On");
        assert_eq!(mods.iter().map(|m| m.price_cents).sum::<i64>(), 75 * 3 + 150 + 200);

        assert_eq!(
            modifier_summary(&mods),
            "3x Extra Cheese, Bacon, Custom Add-On"
        );
    }

    #[test]
    fn test_modifier_session_rejects_unknown_name() {
        let mut session = ModifierSession::for_group(ModifierGroup::Gyro);
        assert!(session.tap("Extra Patty").is_err());
    }

    #[test]
    fn test_standard_catalog_is_well_formed() {
        let catalog = MenuCatalog::standard();
        assert!(catalog.find_entry("Gyro").is_some());
        assert!(catalog.find_entry("Fresh Juice").is_some());
        assert!(catalog.find_entry("Nope").is_none());

        // Every variant-priced entry carries an option group to resolve it.
        for entry in catalog.categories.iter().flat_map(|c| &c.entries) {
            if matches!(entry.price, MenuPrice::ByVariant { .. }) {
                assert!(entry.options.is_some(), "{} needs options", entry.name);
            }
        }
    }
}
