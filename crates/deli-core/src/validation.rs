//! # Validation Module
//!
//! Input validation for operator-entered data: manual items, new products,
//! weight entry, search queries. Runs before any business logic; failures
//! block submission with an inline message and never mutate state.

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a UPC.
///
/// ## Rules
/// - Must not be empty
/// - Digits only (the scanner emits digits; manual entry goes through the
///   numpad)
/// - Must be at most 32 characters
///
/// ## Example
/// ```rust
/// use deli_core::validation::validate_upc;
///
/// assert!(validate_upc("049000050103").is_ok());
/// assert!(validate_upc("").is_err());
/// assert!(validate_upc("ABC-123").is_err());
/// ```
pub fn validate_upc(upc: &str) -> ValidationResult<()> {
    let upc = upc.trim();

    if upc.is_empty() {
        return Err(ValidationError::Required {
            field: "upc".to_string(),
        });
    }

    if upc.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "upc".to_string(),
            max: 32,
        });
    }

    if !upc.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "upc".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a product or line-item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search query. Empty is allowed (returns default results);
/// returns the trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value (1..=MAX_LINE_QUANTITY).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a scale weight in pounds.
///
/// ## Rules
/// - Must be positive and finite
/// - Capped at 99.99 lb (a deli scale's practical ceiling; anything larger
///   is a keying error)
pub fn validate_weight_lb(weight: f64) -> ValidationResult<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "weight".to_string(),
        });
    }

    if weight > 99.99 {
        return Err(ValidationError::OutOfRange {
            field: "weight".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates cart size (number of unique lines).
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upc() {
        assert!(validate_upc("049000050103").is_ok());
        assert!(validate_upc("001").is_ok());

        assert!(validate_upc("").is_err());
        assert!(validate_upc("   ").is_err());
        assert!(validate_upc("ABC123").is_err());
        assert!(validate_upc(&"9".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Turkey Club").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_weight_lb() {
        assert!(validate_weight_lb(0.33).is_ok());
        assert!(validate_weight_lb(12.5).is_ok());

        assert!(validate_weight_lb(0.0).is_err());
        assert!(validate_weight_lb(-1.0).is_err());
        assert!(validate_weight_lb(f64::NAN).is_err());
        assert!(validate_weight_lb(150.0).is_err());
    }
}
