//! # Bulk Import Rules
//!
//! Turns loosely typed tabular rows into product registrations.
//!
//! ## Row Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw row (JSON object, header names as keys)                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  normalize_row()   alias table, first present key wins                  │
//! │      │             numbers parsed leniently, garbage → NotANumber       │
//! │      ▼                                                                  │
//! │  validate_row()    every violated rule, in a fixed order                │
//! │      │                                                                  │
//! │      ├── Err(messages) ──► ImportReport::record_failure(row, messages)  │
//! │      └── Ok(NewProduct) ─► persisted by stockroom-db                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row numbers in reports are spreadsheet rows: the header is row 1, so the
//! data row at zero-based index `i` is row `i + 2`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::money::Money;
use crate::types::NewProduct;
use crate::DEFAULT_LOW_STOCK_THRESHOLD;

/// A raw input row: header name to cell value.
pub type RawRow = Map<String, Value>;

// =============================================================================
// Alias Table
// =============================================================================

pub const PRODUCT_NAME_ALIASES: &[&str] = &["productName", "Product Name", "product_name"];
pub const QTY_ALIASES: &[&str] = &["qty", "quantity", "Qty", "Quantity"];
pub const PRICE_ALIASES: &[&str] = &["price", "Price"];
pub const KATEGORY_ID_ALIASES: &[&str] = &["kategoryId", "categoryId", "CategoryId", "Category ID"];
pub const SUPPLIER_ID_ALIASES: &[&str] = &["supplierId", "SupplierId", "Supplier ID"];
pub const BARCODE_ALIASES: &[&str] = &["barcode", "Barcode", "Product Barcode"];
pub const LOW_STOCK_THRESHOLD_ALIASES: &[&str] =
    &["lowStockThreshold", "LowStockThreshold", "Low Stock Threshold"];

// =============================================================================
// Messages
// =============================================================================

pub const MSG_PRODUCT_NAME_REQUIRED: &str = "Product name is required";
pub const MSG_INVALID_QTY: &str = "Quantity must be a valid non-negative number";
pub const MSG_INVALID_PRICE: &str = "Price must be a valid positive number";
pub const MSG_INVALID_KATEGORY_ID: &str = "Category ID must be a valid positive number";
pub const MSG_INVALID_SUPPLIER_ID: &str = "Supplier ID must be a valid positive number";
pub const MSG_INVALID_LOW_STOCK_THRESHOLD: &str =
    "Low stock threshold must be a valid non-negative number";
pub const MSG_MISSING_REFERENCE: &str = "Category or supplier does not exist";

/// Message for a barcode that collides with an existing product.
pub fn duplicate_barcode_message(barcode: &str) -> String {
    format!("Barcode '{}' already exists", barcode)
}

/// Spreadsheet row number for a zero-based data index.
#[inline]
pub const fn row_number(index: usize) -> usize {
    index + 2
}

// =============================================================================
// Normalization
// =============================================================================

/// A leniently parsed number. Unparseable input is kept as `NotANumber`
/// so that validation can report it instead of silently defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric<T> {
    Value(T),
    NotANumber,
}

impl<T: Copy> Numeric<T> {
    /// The parsed value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Numeric::Value(v) => Some(v),
            Numeric::NotANumber => None,
        }
    }
}

/// A row mapped onto canonical product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub product_name: String,
    pub qty: Numeric<i64>,
    pub price: Numeric<Money>,
    pub kategory_id: Numeric<i64>,
    pub supplier_id: Numeric<i64>,
    pub barcode: Option<String>,
    /// `None` when no alias carried a non-blank value.
    pub low_stock_threshold: Option<Numeric<i64>>,
}

/// First alias present with a non-null value.
fn lookup<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find(|value| !value.is_null())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

/// Integer from a JSON number or numeric text. Decimals truncate toward zero.
fn parse_integer(value: &Value) -> Numeric<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Numeric::Value(i),
            None => n.as_f64().map(truncate).unwrap_or(Numeric::NotANumber),
        },
        Value::String(s) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                return Numeric::Value(i);
            }
            text.parse::<f64>()
                .map(truncate)
                .unwrap_or(Numeric::NotANumber)
        }
        _ => Numeric::NotANumber,
    }
}

fn truncate(value: f64) -> Numeric<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated.abs() >= i64::MAX as f64 {
        return Numeric::NotANumber;
    }
    Numeric::Value(truncated as i64)
}

fn parse_price(value: &Value) -> Numeric<Money> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return Numeric::NotANumber,
    };
    Money::parse_decimal(&text)
        .map(Numeric::Value)
        .unwrap_or(Numeric::NotANumber)
}

/// Maps a raw row onto canonical fields.
///
/// ## Defaults
/// - Missing name → empty
/// - Missing numeric field → 0 (which then fails the positive checks)
/// - Missing or blank barcode → `None`
/// - Missing or blank threshold → `None` (registered as 10)
///
/// `0` and `""` are values, not absences.
///
/// ```rust
/// use serde_json::json;
/// use stockroom_core::import::{normalize_row, Numeric};
///
/// let row = json!({ "Product Name": "Teh", "quantity": "0", "Price": 2.5 });
/// let normalized = normalize_row(row.as_object().unwrap());
/// assert_eq!(normalized.product_name, "Teh");
/// assert_eq!(normalized.qty, Numeric::Value(0));
/// ```
pub fn normalize_row(row: &RawRow) -> NormalizedRow {
    let product_name = lookup(row, PRODUCT_NAME_ALIASES)
        .map(value_to_text)
        .unwrap_or_default();

    let qty = lookup(row, QTY_ALIASES)
        .map(parse_integer)
        .unwrap_or(Numeric::Value(0));

    let price = lookup(row, PRICE_ALIASES)
        .map(parse_price)
        .unwrap_or(Numeric::Value(Money::zero()));

    let kategory_id = lookup(row, KATEGORY_ID_ALIASES)
        .map(parse_integer)
        .unwrap_or(Numeric::Value(0));

    let supplier_id = lookup(row, SUPPLIER_ID_ALIASES)
        .map(parse_integer)
        .unwrap_or(Numeric::Value(0));

    let barcode = lookup(row, BARCODE_ALIASES)
        .filter(|v| !is_blank(v))
        .map(|v| value_to_text(v).trim().to_string());

    let low_stock_threshold = lookup(row, LOW_STOCK_THRESHOLD_ALIASES)
        .filter(|v| !is_blank(v))
        .map(parse_integer);

    NormalizedRow {
        product_name,
        qty,
        price,
        kategory_id,
        supplier_id,
        barcode,
        low_stock_threshold,
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Checks every import rule and returns either the registration or the
/// full, ordered list of violations.
pub fn validate_row(row: &NormalizedRow) -> Result<NewProduct, Vec<String>> {
    let mut errors = Vec::new();

    let product_name = row.product_name.trim();
    if product_name.is_empty() {
        errors.push(MSG_PRODUCT_NAME_REQUIRED.to_string());
    }

    let qty = row.qty.value().filter(|q| *q >= 0);
    if qty.is_none() {
        errors.push(MSG_INVALID_QTY.to_string());
    }

    let price = row.price.value().filter(Money::is_positive);
    if price.is_none() {
        errors.push(MSG_INVALID_PRICE.to_string());
    }

    let kategory_id = row.kategory_id.value().filter(|id| *id > 0);
    if kategory_id.is_none() {
        errors.push(MSG_INVALID_KATEGORY_ID.to_string());
    }

    let supplier_id = row.supplier_id.value().filter(|id| *id > 0);
    if supplier_id.is_none() {
        errors.push(MSG_INVALID_SUPPLIER_ID.to_string());
    }

    let low_stock_threshold = match row.low_stock_threshold {
        None => Some(DEFAULT_LOW_STOCK_THRESHOLD),
        Some(threshold) => threshold.value().filter(|t| *t >= 0),
    };
    if low_stock_threshold.is_none() {
        errors.push(MSG_INVALID_LOW_STOCK_THRESHOLD.to_string());
    }

    match (qty, price, kategory_id, supplier_id, low_stock_threshold) {
        (Some(qty), Some(price), Some(kategory_id), Some(supplier_id), Some(low_stock_threshold))
            if errors.is_empty() =>
        {
            Ok(NewProduct {
                product_name: product_name.to_string(),
                barcode: row.barcode.clone(),
                qty,
                price,
                low_stock_threshold,
                kategory_id,
                supplier_id,
            })
        }
        _ => Err(errors),
    }
}

// =============================================================================
// Report
// =============================================================================

/// Violations for one rejected row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RowErrors {
    pub row: usize,
    pub errors: Vec<String>,
}

/// One violation per entry, for callers that want a flat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FlatRowError {
    pub row: usize,
    pub message: String,
}

/// Aggregated outcome of a bulk import.
///
/// `error_count` counts rejected rows, not individual violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportReport {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RowErrors>,
    pub created_ids: Vec<i64>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, product_id: i64) {
        self.success_count += 1;
        self.created_ids.push(product_id);
    }

    pub fn record_failure(&mut self, row: usize, errors: Vec<String>) {
        self.error_count += 1;
        self.errors.push(RowErrors { row, errors });
    }

    /// Total rows seen.
    pub fn total_rows(&self) -> usize {
        self.success_count + self.error_count
    }

    /// `[{row, message}]`, one entry per violation, input order kept.
    pub fn flatten(&self) -> Vec<FlatRowError> {
        self.errors
            .iter()
            .flat_map(|entry| {
                entry.errors.iter().map(move |message| FlatRowError {
                    row: entry.row,
                    message: message.clone(),
                })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
