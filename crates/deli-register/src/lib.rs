//! # deli-register: Register Session for Deli POS
//!
//! The orchestration layer behind the checkout screen. Owns the live cart,
//! the scan-input state machine, and the checkout flow from `deli-core`,
//! and wires their effects (lookups, write-through persistence, transaction
//! creation) to `deli-store`.
//!
//! ## Module Organization
//! ```text
//! deli_register/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── session.rs      ◄─── RegisterSession: the owned aggregate
//! └── messages.rs     ◄─── Operator message slot with auto-dismiss
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deli_register::RegisterSession;
//! use deli_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("./deli.db")).await?;
//! let mut session = RegisterSession::open(store, store_id).await;
//!
//! // Scanner keystrokes flow straight in
//! for ch in "049000050103\n".chars() {
//!     session.key_input(ch, std::time::Instant::now()).await;
//! }
//!
//! // Totals are recomputed on every mutation
//! let totals = session.totals();
//! ```

pub mod messages;
pub mod session;

pub use messages::{MessageCenter, MessageLevel, OperatorMessage, MESSAGE_TTL};
pub use session::{CartView, RegisterSession};
