//! # Document Codes
//!
//! Kinds of posted documents and the human-readable code format.
//!
//! ## Code Format
//! ```text
//!   ORDR-20261016-0007
//!   ├───┘├──────┘ ├──┘
//!   │    │        └── per-prefix, per-day counter (≥ 4 digits)
//!   │    └── document date bucket (YYYYMMDD)
//!   └── prefix (identifies the document kind)
//! ```
//!
//! The counter itself lives in the database (`document_sequences`); this
//! module only formats what the counter hands back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// The three document kinds the ledger posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DocumentKind {
    /// Sale; decrements stock.
    Order,
    /// Stock receipt; increments stock.
    Purchase,
    /// Goods returned against an order; increments stock.
    OrderReturn,
}

impl DocumentKind {
    /// Code prefix for this kind.
    pub const fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Order => "ORD-",
            DocumentKind::Purchase => "PUR-",
            DocumentKind::OrderReturn => "ORDR-",
        }
    }

    /// Sign applied to a line quantity to get the stock delta.
    pub const fn stock_direction(self) -> i64 {
        match self {
            DocumentKind::Order => -1,
            DocumentKind::Purchase | DocumentKind::OrderReturn => 1,
        }
    }
}

/// Rejects prefixes that would make codes ambiguous.
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.trim().is_empty() {
        return Err(ValidationError::required("prefix"));
    }
    Ok(())
}

/// Day bucket a counter is keyed by.
pub fn period_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Builds `<prefix><YYYYMMDD>-<NNNN>`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use stockroom_core::document::format_code;
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
/// assert_eq!(format_code("ORDR-", date, 7), "ORDR-20261016-0007");
/// ```
pub fn format_code(prefix: &str, date: NaiveDate, sequence: i64) -> String {
    format!("{}{}-{:04}", prefix, period_key(date), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(DocumentKind::Order.prefix(), "ORD-");
        assert_eq!(DocumentKind::Purchase.prefix(), "PUR-");
        assert_eq!(DocumentKind::OrderReturn.prefix(), "ORDR-");
    }

    #[test]
    fn test_stock_direction() {
        assert_eq!(DocumentKind::Order.stock_direction(), -1);
        assert_eq!(DocumentKind::Purchase.stock_direction(), 1);
        assert_eq!(DocumentKind::OrderReturn.stock_direction(), 1);
    }

    #[test]
    fn test_format_code_pads_and_grows() {
        assert_eq!(format_code("PUR-", day(), 1), "PUR-20260105-0001");
        assert_eq!(format_code("PUR-", day(), 12345), "PUR-20260105-12345");
    }

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("ORD-").is_ok());
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("  ").is_err());
    }
}
