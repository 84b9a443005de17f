//! # Repositories
//!
//! One repository per aggregate: products (catalog), transactions
//! (completed sales), settings (pricing configuration), saved carts
//! (in-progress snapshots). Each is a thin handle over the shared pool;
//! cloning is cheap.

pub mod cart;
pub mod product;
pub mod settings;
pub mod transaction;
