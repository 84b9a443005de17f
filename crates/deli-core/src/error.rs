//! # Error Types
//!
//! Domain-specific error types for deli-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  deli-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  deli-store errors (separate crate)                                    │
//! │  └── StoreError       - Database operation failures                    │
//! │                                                                         │
//! │  Register session                                                      │
//! │  └── Failures surface as operator messages, never as panics            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (UPC, amounts, state names)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are caught by the register session and translated to operator
/// messages; the interactive state they came from is always preserved.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The referenced line is not in the cart.
    #[error("Line not in cart: {0}")]
    LineNotInCart(String),

    /// Checkout was started with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Cash handed over does not cover the cash total.
    ///
    /// ## Recovery
    /// The tender screen stays where it is; the operator asks for more cash
    /// or backs out to the payment selection.
    #[error("Insufficient cash: given {given_cents}, required {required_cents}")]
    InsufficientTender {
        given_cents: i64,
        required_cents: i64,
    },

    /// A checkout action was invoked from a state that does not accept it.
    ///
    /// ## When This Occurs
    /// - Tender digits arriving outside the cash-tender screen
    /// - Confirming a card collection with no card prompt open
    #[error("Cannot {action} while checkout is in the {state} state")]
    InvalidCheckoutAction {
        action: &'static str,
        state: &'static str,
    },

    /// The chosen option is not part of the option group.
    #[error("Option '{option}' is not offered for {group}")]
    UnknownOption { option: String, group: String },

    /// A variant-priced entry has no price row for the chosen variant.
    #[error("No price configured for {entry} variant '{variant}'")]
    MissingVariantPrice { entry: String, variant: String },

    /// A multi-select commit was attempted with nothing selected.
    #[error("Nothing selected for {entry}")]
    NothingSelected { entry: String },

    /// The menu entry does not support the requested flow
    /// (e.g. weight entry on a flat-priced item).
    #[error("{entry} is not priced {expected}")]
    WrongPricingMode {
        entry: String,
        expected: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-digit UPC).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientTender {
            given_cents: 999,
            required_cents: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient cash: given 999, required 1000"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
