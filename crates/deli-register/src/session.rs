//! # Register Session
//!
//! The owned aggregate behind the checkout screen: one session per register,
//! holding the live cart, the scan machine, the checkout flow, and the
//! operator message slot, wired to the store layer for lookups and
//! persistence.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Scan, End to End                               │
//! │                                                                         │
//! │  keystrokes ──► ScanMachine ──Enter──► lookup by UPC                   │
//! │                                          │                              │
//! │                       ┌──────────────────┼──────────────────┐          │
//! │                       ▼                  ▼                  ▼          │
//! │                    found            miss + similar     miss, nothing   │
//! │                       │             candidate          close           │
//! │                       ▼                  │                  │          │
//! │               Cart.add_product     "did you mean?"     Blocked:        │
//! │               + stock message      (Blocked until      add / manual    │
//! │               + persist cart        yes/no)            / cancel        │
//! │                                                                         │
//! │  Every cart mutation writes the snapshot through to the store;         │
//! │  an emptied cart deletes the row instead.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All store failures degrade to an operator message and leave the
//! interactive state unchanged; the only silent path is the benign
//! scan-buffer expiry inside `tick`.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use deli_core::cart::ComposedOrigin;
use deli_core::menu::{ComposedItem, MenuCatalog, MultiSelectSession, OptionSelect, COMBO_UPCHARGE_CENTS};
use deli_core::pricing::{processing_fee_cents, Totals};
use deli_core::scan::{find_similar, KeyOutcome, PendingScan, ScanMachine};
use deli_core::{
    Cart, CartLine, CheckoutFlow, CheckoutState, LineKey, LinePricing, Modifier, PaymentMethod,
    Product, StockStatus, StoreSettings, Transaction, TransactionItem,
};
use deli_store::Store;

use crate::messages::{MessageCenter, MessageLevel, OperatorMessage};

// =============================================================================
// View DTO
// =============================================================================

/// What the front end renders on every state change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: Totals,
}

// =============================================================================
// Session
// =============================================================================

/// A live register session for one store.
pub struct RegisterSession {
    store_id: String,
    store: Store,
    settings: StoreSettings,
    menu: MenuCatalog,
    cart: Cart,
    scan: ScanMachine,
    checkout: CheckoutFlow,
    messages: MessageCenter,
    /// The catalog product behind a pending "did you mean?" prompt.
    similar_candidate: Option<Product>,
    /// Idempotency key for the in-progress completion cycle; reused across
    /// retries so a lost response can never ring the sale twice.
    completion_key: Option<String>,
}

impl RegisterSession {
    /// Opens a session: loads settings (falling back to defaults when the
    /// provider fails) and rehydrates any saved cart for this store.
    pub async fn open(store: Store, store_id: &str) -> Self {
        let settings = match store.settings().get(store_id).await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!(store_id = %store_id, "No settings row, using defaults");
                StoreSettings::fallback()
            }
            Err(e) => {
                warn!(store_id = %store_id, error = %e, "Settings load failed, using defaults");
                StoreSettings::fallback()
            }
        };

        let cart = match store.saved_carts().load(store_id).await {
            Ok(Some(lines)) => {
                info!(store_id = %store_id, lines = lines.len(), "Rehydrated saved cart");
                Cart::from_lines(lines)
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(store_id = %store_id, error = %e, "Saved cart load failed, starting empty");
                Cart::new()
            }
        };

        RegisterSession {
            store_id: store_id.to_string(),
            store,
            settings,
            menu: MenuCatalog::standard(),
            cart,
            scan: ScanMachine::new(),
            checkout: CheckoutFlow::new(),
            messages: MessageCenter::new(),
            similar_candidate: None,
            completion_key: None,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// The cart and its derived totals, for rendering.
    pub fn view(&self) -> CartView {
        CartView {
            lines: self.cart.lines().to_vec(),
            totals: self.totals(),
        }
    }

    /// Current pricing-engine output.
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.cart, Some(&self.settings))
    }

    /// The live cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Store settings in effect for this session.
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// The static food menu.
    pub fn menu(&self) -> &MenuCatalog {
        &self.menu
    }

    /// Where the checkout flow currently is.
    pub fn checkout_state(&self) -> &CheckoutState {
        self.checkout.state()
    }

    /// The unresolved scan, if the register is blocked.
    pub fn pending_scan(&self) -> Option<&PendingScan> {
        self.scan.pending()
    }

    /// The "did you mean?" candidate, while one is pending.
    pub fn similar_candidate(&self) -> Option<&Product> {
        self.similar_candidate.as_ref()
    }

    /// The operator message on screen, if any.
    pub fn message(&self) -> Option<&OperatorMessage> {
        self.messages.current()
    }

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------

    /// Advances the session's deadline-based timers: stale scan buffers are
    /// discarded silently, expired messages dismissed.
    pub fn tick(&mut self, now: Instant) {
        if self.scan.expire_stale(now) {
            debug!("Stale scan buffer discarded");
        }
        self.messages.tick(now);
    }

    // -------------------------------------------------------------------------
    // Scanning
    // -------------------------------------------------------------------------

    /// Feeds one raw keystroke from the scanner/keyboard stream.
    pub async fn key_input(&mut self, ch: char, now: Instant) {
        match self.scan.on_key(ch, now) {
            KeyOutcome::Dispatch(code) => self.lookup_scanned(&code).await,
            KeyOutcome::RejectedWhileBlocked => {
                self.say(
                    MessageLevel::Error,
                    "Finish resolving the pending item before scanning again",
                );
            }
            KeyOutcome::Buffered | KeyOutcome::Ignored => {}
        }
    }

    /// Looks up a completed code: exact hit adds to cart; a miss runs the
    /// similarity pass before falling through to the not-found flow.
    async fn lookup_scanned(&mut self, code: &str) {
        debug!(upc = %code, "Dispatching scanned code");

        match self.store.products().get_by_upc(&self.store_id, code).await {
            Ok(Some(product)) => {
                self.add_product_internal(&product).await;
            }
            Ok(None) => {
                let catalog = match self.store.products().list_all(&self.store_id).await {
                    Ok(catalog) => catalog,
                    Err(e) => {
                        warn!(error = %e, "Catalog listing failed during similarity pass");
                        Vec::new()
                    }
                };

                if let Some(candidate) = find_similar(code, &catalog) {
                    let candidate = candidate.clone();
                    self.say(
                        MessageLevel::Warn,
                        format!(
                            "{} not found — did you mean {} ({})?",
                            code, candidate.name, candidate.upc
                        ),
                    );
                    self.scan.block_similar(code, candidate.upc.clone());
                    self.similar_candidate = Some(candidate);
                } else {
                    self.say(
                        MessageLevel::Warn,
                        format!("{code} is not in the system"),
                    );
                    self.scan.block_not_found(code);
                }
            }
            Err(e) => {
                // Lookup failure degrades to the not-found flow
                warn!(upc = %code, error = %e, "Catalog lookup failed");
                self.say(
                    MessageLevel::Error,
                    format!("Lookup failed for {code}; treat as not found"),
                );
                self.scan.block_not_found(code);
            }
        }
    }

    /// Accepts the "did you mean?" candidate: resolves the block and adds
    /// the candidate product.
    pub async fn accept_similar(&mut self) {
        if let Some(product) = self.similar_candidate.take() {
            self.scan.resolve();
            self.add_product_internal(&product).await;
        }
    }

    /// Declines the candidate: falls through to the not-found flow for the
    /// originally scanned code.
    pub fn decline_similar(&mut self) {
        if self.similar_candidate.take().is_some() {
            self.scan.decline_similar();
            if let Some(PendingScan::NotFound { upc }) = self.scan.pending() {
                let upc = upc.clone();
                self.say(MessageLevel::Warn, format!("{upc} is not in the system"));
            }
        }
    }

    /// Resolves a pending not-found code by cataloging it as a real product
    /// and adding it to the cart.
    pub async fn create_pending_product(
        &mut self,
        name: &str,
        price_cents: i64,
        inventory: Option<i64>,
    ) {
        let upc = match self.scan.pending() {
            Some(pending) => pending.scanned_upc().to_string(),
            None => return,
        };

        if let Err(e) = deli_core::validation::validate_item_name(name)
            .and_then(|_| deli_core::validation::validate_price_cents(price_cents))
        {
            self.say(MessageLevel::Error, e.to_string());
            return;
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            store_id: self.store_id.clone(),
            upc,
            name: name.trim().to_string(),
            price_cents,
            inventory,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        match self.store.products().insert(&product).await {
            Ok(product) => {
                self.scan.resolve();
                info!(upc = %product.upc, name = %product.name, "Product added to catalog");
                self.add_product_internal(&product).await;
            }
            Err(e) => {
                // Stay blocked; the operator may correct and retry
                self.say(MessageLevel::Error, format!("Could not save product: {e}"));
            }
        }
    }

    /// Resolves a pending not-found code by selling it once as a manual
    /// line, without cataloging it.
    pub async fn sell_pending_as_manual(&mut self, name: &str, price_cents: i64) {
        let upc = match self.scan.pending() {
            Some(pending) => pending.scanned_upc().to_string(),
            None => return,
        };

        match self.cart.add_manual(Some(&upc), name, price_cents) {
            Ok(()) => {
                self.scan.resolve();
                self.persist_cart().await;
                self.say(MessageLevel::Info, format!("Added {name}"));
            }
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Cancels the pending scan entirely.
    pub fn cancel_pending_scan(&mut self) {
        self.similar_candidate = None;
        self.scan.resolve();
        self.messages.clear();
    }

    // -------------------------------------------------------------------------
    // Search & direct adds
    // -------------------------------------------------------------------------

    /// Name search for the on-screen keyboard flow.
    pub async fn search_products(&mut self, query: &str) -> Vec<Product> {
        let query = match deli_core::validation::validate_search_query(query) {
            Ok(query) => query,
            Err(e) => {
                self.say(MessageLevel::Error, e.to_string());
                return Vec::new();
            }
        };

        match self
            .store
            .products()
            .search_name(&self.store_id, &query, 20)
            .await
        {
            Ok(products) => products,
            Err(e) => {
                self.say(MessageLevel::Error, format!("Search failed: {e}"));
                Vec::new()
            }
        }
    }

    /// Adds a product picked from search results.
    pub async fn add_product(&mut self, product: &Product) {
        self.add_product_internal(product).await;
    }

    /// Adds an open arbitrary-price item keyed in by the operator.
    pub async fn add_open_item(&mut self, name: &str, price_cents: i64) {
        match self.cart.add_manual(None, name, price_cents) {
            Ok(()) => {
                self.persist_cart().await;
                self.say(MessageLevel::Info, format!("Added {name}"));
            }
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    async fn add_product_internal(&mut self, product: &Product) {
        match self.cart.add_product(product) {
            Ok(StockStatus::Ok) => {
                self.say(MessageLevel::Info, format!("Added {}", product.name));
            }
            Ok(StockStatus::Low { on_hand, in_cart }) => {
                self.say(
                    MessageLevel::Warn,
                    format!(
                        "Added {} — only {} on hand, cart now has {}",
                        product.name, on_hand, in_cart
                    ),
                );
            }
            Ok(StockStatus::OutOfStock { .. }) => {
                self.say(
                    MessageLevel::Warn,
                    format!("Added {} — out of stock, override sale", product.name),
                );
            }
            Err(e) => {
                self.say(MessageLevel::Error, e.to_string());
                return;
            }
        }
        self.persist_cart().await;
    }

    // -------------------------------------------------------------------------
    // Menu composition
    // -------------------------------------------------------------------------

    /// Commits a finalized composed item to the cart.
    pub async fn commit_composed(&mut self, item: ComposedItem) {
        let name = item.name.clone();
        match self.cart.add_composed(item) {
            Ok(()) => {
                self.persist_cart().await;
                self.say(MessageLevel::Info, format!("Added {name}"));
            }
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Commits a weighed line from the scale flow.
    pub async fn commit_weighed(&mut self, name: &str, price_per_pound_cents: i64, weight_lb: f64) {
        match self.cart.add_weighed(name, price_per_pound_cents, weight_lb) {
            Ok(()) => {
                self.persist_cart().await;
                self.say(
                    MessageLevel::Info,
                    format!("Added {name} ({weight_lb:.2} lb)"),
                );
            }
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Re-opens the "Customize" editor for a committed multi-select line.
    pub fn customize(&mut self, key: &LineKey) -> Option<MultiSelectSession> {
        let line = self.cart.find(key)?;
        let origin: &ComposedOrigin = line.composed.as_ref()?;

        let entry = self
            .menu
            .categories
            .iter()
            .flat_map(|c| &c.entries)
            .find(|e| origin.base_name.starts_with(&e.name))?;

        let custom = match entry.options.as_ref()? {
            OptionSelect::Multi(custom) => custom.clone(),
            OptionSelect::SizeThenCustom { custom, .. } => custom.clone(),
            OptionSelect::Single(_) => return None,
        };

        Some(MultiSelectSession::seed_from(origin, custom))
    }

    /// Replaces an edited line on re-commit (never duplicates).
    pub async fn recommit_composed(&mut self, key: &LineKey, item: ComposedItem) {
        match self.cart.replace_line(key, item) {
            Ok(()) => self.persist_cart().await,
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Replaces a line's modifiers with a freshly applied set.
    pub async fn apply_modifiers(&mut self, key: &LineKey, modifiers: Vec<Modifier>) {
        match self.cart.set_modifiers(key, modifiers) {
            Ok(()) => self.persist_cart().await,
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Adds the flat combo upcharge under a composed line.
    pub async fn add_combo(&mut self, key: &LineKey) {
        match self.cart.add_combo(key, COMBO_UPCHARGE_CENTS) {
            Ok(()) => self.persist_cart().await,
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    // -------------------------------------------------------------------------
    // Cart mutations
    // -------------------------------------------------------------------------

    /// Adjusts a line's quantity by a delta (≤ 0 removes it).
    pub async fn adjust_quantity(&mut self, key: &LineKey, delta: i64) {
        match self.cart.update_quantity(key, delta) {
            Ok(()) => self.persist_cart().await,
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Removes a line.
    pub async fn remove_line(&mut self, key: &LineKey) {
        match self.cart.remove(key) {
            Ok(()) => self.persist_cart().await,
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Clears the sale.
    pub async fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart().await;
    }

    /// Writes the cart snapshot through; an empty cart deletes the row.
    async fn persist_cart(&mut self) {
        if let Err(e) = self
            .store
            .saved_carts()
            .save(&self.store_id, self.cart.lines())
            .await
        {
            warn!(error = %e, "Cart write-through failed");
            self.say(
                MessageLevel::Error,
                "Cart could not be saved; it will not survive a restart",
            );
        }
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// "Checkout" tap. An empty cart is a message, not a transition.
    pub fn begin_checkout(&mut self) {
        if let Err(e) = self.checkout.begin(self.cart.is_empty()) {
            self.say(MessageLevel::Warn, e.to_string());
        }
    }

    /// Backs out of payment selection.
    pub fn cancel_checkout(&mut self) {
        if let Err(e) = self.checkout.cancel() {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Chooses cash.
    pub fn select_cash(&mut self) {
        if let Err(e) = self.checkout.select_cash() {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Chooses card; the card total is displayed for the external terminal.
    pub fn select_card(&mut self) {
        if let Err(e) = self.checkout.select_card() {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Keys one digit into the tender amount.
    pub fn tender_digit(&mut self, digit: u8) {
        if let Err(e) = self.checkout.tender_digit(digit) {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Adds a quick-preset amount to the tender.
    pub fn tender_preset(&mut self, cents: i64) {
        if let Err(e) = self.checkout.tender_preset(cents) {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Clears the tender amount.
    pub fn tender_clear(&mut self) {
        if let Err(e) = self.checkout.tender_clear() {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Submits the tendered cash; insufficient amounts are rejected in
    /// place with a message.
    pub fn submit_tender(&mut self) {
        let cash_total = self.totals().cash_total_cents;
        if let Err(e) = self.checkout.submit_tender(cash_total) {
            self.say(MessageLevel::Warn, e.to_string());
        }
    }

    /// Answers the cash confirmation prompt; confirming fires completion.
    pub async fn confirm_cash(&mut self, confirm: bool) {
        match self.checkout.confirm_cash(confirm) {
            Ok(Some(method)) => self.complete_transaction(method).await,
            Ok(None) => {}
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Answers "did you collect payment?" on the card screen.
    pub async fn confirm_card(&mut self, collected: bool) {
        match self.checkout.confirm_card(collected) {
            Ok(Some(method)) => self.complete_transaction(method).await,
            Ok(None) => {}
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// "Next Transaction" on the change screen: only now is the cash sale's
    /// cart cleared.
    pub async fn next_transaction(&mut self) {
        match self.checkout.next_transaction() {
            Ok(()) => {
                self.cart.clear();
                self.persist_cart().await;
                self.messages.clear();
            }
            Err(e) => self.say(MessageLevel::Error, e.to_string()),
        }
    }

    /// Dismisses the card success screen.
    pub fn acknowledge_done(&mut self) {
        if let Err(e) = self.checkout.acknowledge_done() {
            self.say(MessageLevel::Error, e.to_string());
        }
    }

    /// Snapshots the cart into a transaction record and persists it.
    async fn complete_transaction(&mut self, method: PaymentMethod) {
        let totals = self.totals();
        let cash_total = totals.cash_total_cents;

        // One idempotency key per completion cycle: a retry after a lost
        // response reuses it, so the sale can never be rung twice.
        let idempotency_key = self
            .completion_key
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();

        let (cash_given_cents, change_cents) = match method {
            PaymentMethod::Cash => {
                let given = self.checkout.cash_given_cents().unwrap_or(0);
                (Some(given), Some(given - cash_total))
            }
            PaymentMethod::Card => (None, None),
        };

        let now = Utc::now();
        let txn_id = Uuid::new_v4().to_string();
        let txn = Transaction {
            id: txn_id.clone(),
            store_id: self.store_id.clone(),
            transaction_number: generate_transaction_number(),
            subtotal_cents: totals.subtotal_cents,
            tax_cents: totals.tax_cents,
            total_cents: totals.total_for(Some(method)),
            processing_fee_cents: processing_fee_cents(&totals, Some(&self.settings), method),
            payment_method: method,
            cash_given_cents,
            change_cents,
            idempotency_key,
            created_at: now,
        };

        let items: Vec<TransactionItem> = self
            .cart
            .lines()
            .iter()
            .map(|line| TransactionItem {
                id: Uuid::new_v4().to_string(),
                transaction_id: txn_id.clone(),
                upc_snapshot: line.upc.clone(),
                name_snapshot: line.qualified_name(),
                unit_price_cents: line.unit_price_cents(),
                quantity: line.quantity,
                weight_lb: match &line.pricing {
                    LinePricing::Weighed { weight_lb, .. } => Some(*weight_lb),
                    LinePricing::Unit { .. } => None,
                },
                line_total_cents: line.line_total_cents(),
                created_at: now,
            })
            .collect();

        match self.store.transactions().insert(&txn, &items).await {
            Ok(stored) => {
                self.completion_key = None;
                self.checkout.completion_succeeded(cash_total);

                if method == PaymentMethod::Card {
                    // Card sales clear immediately; cash waits for the
                    // change screen to be dismissed.
                    self.cart.clear();
                    self.persist_cart().await;
                }

                self.say(
                    MessageLevel::Info,
                    format!("Transaction {} complete", stored.transaction_number),
                );
            }
            Err(e) => {
                warn!(error = %e, "Transaction create failed");
                self.checkout.completion_failed();
                self.say(
                    MessageLevel::Error,
                    "Could not record the transaction — try again",
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn say(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.messages.set(level, text, Instant::now());
    }
}

/// Human-readable receipt identifier: YYMMDD-HHMMSS plus a collision guard.
fn generate_transaction_number() -> String {
    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let random: u16 = (nanos % 10000) as u16;
    format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), random)
}

// =============================================================================
// Unit Tests
// =============================================================================
