//! # Validation Module
//!
//! Input validation for ledger postings and product registration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request parsing (outside this workspace)                     │
//! │  └── Type validation (deserialization into PostOrder, ...)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure, before any transaction opens)             │
//! │  ├── Non-empty, bounded detail lists                                   │
//! │  └── Per-line quantity, price and reference checks                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Inside the transaction (stockroom-db)                        │
//! │  ├── Referenced user / order / product exists                          │
//! │  └── Stock never goes negative (conditional UPDATE + CHECK)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_product_name, validate_line_qty};
//!
//! validate_product_name("Kopi Bubuk 200g").unwrap();
//! assert!(validate_line_qty(0).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DetailLine, NewProduct, PostOrder, PostOrderReturn, PostPurchase};
use crate::{MAX_DETAIL_LINES, MAX_LINE_QTY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest barcode accepted. Covers EAN-13, UPC-A and internal codes.
pub const MAX_BARCODE_LEN: usize = 50;

/// Longest product name accepted.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("productName"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "productName".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional barcode and returns its trimmed form.
///
/// A blank barcode is treated as "no barcode".
///
/// ```rust
/// use stockroom_core::validation::validate_barcode;
///
/// assert_eq!(validate_barcode(Some(" 8991234 ")).unwrap(), Some("8991234".to_string()));
/// assert_eq!(validate_barcode(Some("  ")).unwrap(), None);
/// assert!(validate_barcode(Some("has space")).is_err());
/// ```
pub fn validate_barcode(barcode: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(barcode) = barcode.map(str::trim).filter(|b| !b.is_empty()) else {
        return Ok(None);
    };

    if barcode.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if !barcode
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(Some(barcode.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a reference id (user, product, order, category, supplier).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(())
}

/// Validates the quantity of a detail line.
///
/// ## Rules
/// - Must be positive (> 0); the direction of the stock change comes from
///   the document kind, never from the sign of the quantity
/// - Must not exceed [`MAX_LINE_QTY`]
pub fn validate_line_qty(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("qty"));
    }

    if qty > MAX_LINE_QTY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_LINE_QTY,
        });
    }

    Ok(())
}

/// Validates the unit price of a detail line. Zero is allowed (free goods).
pub fn validate_line_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Posting Validators
// =============================================================================

/// Validates a detail list: non-empty, bounded, and every line well formed.
///
/// ## Flow
/// ```text
/// details ──► empty? ──► Empty { "details" }
///         ──► > 100? ──► TooManyLines
///         ──► each line: productId > 0, 0 < qty ≤ MAX_LINE_QTY, price ≥ 0
///         ──► qty × price and the document total fit in Money
/// ```
pub fn validate_details(details: &[DetailLine]) -> CoreResult<()> {
    if details.is_empty() {
        return Err(ValidationError::Empty {
            field: "details".to_string(),
        }
        .into());
    }

    if details.len() > MAX_DETAIL_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_DETAIL_LINES,
        });
    }

    let mut document_total = Money::zero();
    for line in details {
        validate_id("productId", line.product_id)?;
        validate_line_qty(line.qty)?;
        validate_line_price(line.price)?;

        let line_total = line
            .computed_total()
            .ok_or_else(|| amount_too_large("totalPrice"))?;
        document_total = document_total
            .checked_add(line_total)
            .ok_or_else(|| amount_too_large("details"))?;
    }

    Ok(())
}

fn amount_too_large(field: &str) -> ValidationError {
    ValidationError::AmountTooLarge {
        field: field.to_string(),
    }
}

/// Validates an order before its transaction opens.
pub fn validate_post_order(input: &PostOrder) -> CoreResult<()> {
    validate_id("userId", input.user_id)?;
    validate_details(&input.details)
}

/// Validates a purchase before its transaction opens.
pub fn validate_post_purchase(input: &PostPurchase) -> CoreResult<()> {
    validate_id("userId", input.user_id)?;
    validate_details(&input.details)
}

/// Validates an order return before its transaction opens.
pub fn validate_post_order_return(input: &PostOrderReturn) -> CoreResult<()> {
    validate_id("userId", input.user_id)?;
    validate_id("orderId", input.order_id)?;
    validate_details(&input.details)
}

// =============================================================================
// Product Registration
// =============================================================================

/// Validates a product registration.
///
/// ## Rules
/// - Name required
/// - Initial qty ≥ 0
/// - Price > 0
/// - Threshold ≥ 0
/// - Category and supplier ids > 0
/// - Barcode, when given, well formed
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.product_name)?;

    if product.qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "qty".to_string(),
        });
    }

    if !product.price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }

    if product.low_stock_threshold < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "lowStockThreshold".to_string(),
        });
    }

    validate_id("kategoryId", product.kategory_id)?;
    validate_id("supplierId", product.supplier_id)?;
    validate_barcode(product.barcode.as_deref())?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(product_id: i64, qty: i64, price: i64) -> DetailLine {
        DetailLine {
            product_id,
            product_name: String::new(),
            price: Money::from_cents(price),
            qty,
            total_price: None,
        }
    }

    fn new_product() -> NewProduct {
        NewProduct {
            product_name: "Beras 5kg".to_string(),
            barcode: None,
            qty: 0,
            price: Money::from_units(70_000),
            low_stock_threshold: 0,
            kategory_id: 1,
            supplier_id: 1,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Beras 5kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert_eq!(validate_barcode(None).unwrap(), None);
        assert_eq!(validate_barcode(Some("")).unwrap(), None);
        assert_eq!(
            validate_barcode(Some("8991002101234")).unwrap(),
            Some("8991002101234".to_string())
        );
        assert!(validate_barcode(Some(&"9".repeat(60))).is_err());
    }

    #[test]
    fn test_validate_line_values() {
        assert!(validate_line_qty(1).is_ok());
        assert!(validate_line_qty(0).is_err());
        assert!(validate_line_qty(-3).is_err());
        assert!(validate_line_qty(MAX_LINE_QTY).is_ok());
        assert!(matches!(
            validate_line_qty(MAX_LINE_QTY + 1),
            Err(ValidationError::OutOfRange { max: MAX_LINE_QTY, .. })
        ));
        assert!(validate_line_qty(i64::MAX).is_err());

        assert!(validate_line_price(Money::zero()).is_ok());
        assert!(validate_line_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_details_empty() {
        let err = validate_details(&[]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_validate_details_too_many() {
        let details: Vec<_> = (0..=MAX_DETAIL_LINES as i64).map(|_| line(1, 1, 100)).collect();
        let err = validate_details(&details).unwrap_err();
        assert!(matches!(err, CoreError::TooManyLines { max: 100 }));

        assert!(validate_details(&details[..MAX_DETAIL_LINES]).is_ok());
    }

    #[test]
    fn test_validate_details_rejects_bad_line() {
        assert!(validate_details(&[line(1, 2, 100), line(2, 0, 100)]).is_err());
        assert!(validate_details(&[line(0, 2, 100)]).is_err());
        assert!(validate_details(&[line(1, 2, -100)]).is_err());
    }

    #[test]
    fn test_validate_details_rejects_oversized_amounts() {
        let huge_price = line(1, MAX_LINE_QTY, i64::MAX / 2);
        assert!(matches!(
            validate_details(&[huge_price]).unwrap_err(),
            CoreError::Validation(ValidationError::AmountTooLarge { .. })
        ));

        let near_limit = line(1, 1, i64::MAX - 10);
        assert!(validate_details(&[near_limit.clone()]).is_ok());
        assert!(matches!(
            validate_details(&[near_limit.clone(), near_limit]).unwrap_err(),
            CoreError::Validation(ValidationError::AmountTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_post_order_return_requires_order() {
        let input = PostOrderReturn {
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            note: String::new(),
            order_id: 0,
            details: vec![line(9, 2, 500)],
        };
        assert!(validate_post_order_return(&input).is_err());

        let input = PostOrderReturn {
            order_id: 42,
            ..input
        };
        assert!(validate_post_order_return(&input).is_ok());
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&new_product()).is_ok());

        let mut product = new_product();
        product.price = Money::zero();
        assert!(validate_new_product(&product).is_err());

        let mut product = new_product();
        product.qty = -1;
        assert!(validate_new_product(&product).is_err());

        let mut product = new_product();
        product.supplier_id = 0;
        assert!(validate_new_product(&product).is_err());
    }
}
