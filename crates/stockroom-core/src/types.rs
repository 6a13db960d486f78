//! # Domain Types
//!
//! Core domain types used throughout the Stockroom ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ Order/Purchase  │   │  OrderReturn    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  product_name   │   │  code (unique)  │   │  code (unique)  │       │
//! │  │  qty  (≥ 0)     │◄──│  details[]      │   │  order_id (FK)  │       │
//! │  │  price (Money)  │   │   product_id    │   │  details[]      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product.qty is owned by the StockLedger; nothing else writes it.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Detail rows copy `product_name` and `price` at posting time, so editing a
//! product later never rewrites history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_LOW_STOCK_THRESHOLD;

// =============================================================================
// Reference Entities
// =============================================================================

/// Product category (the original schema spells it "kategory").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// The actor that posts documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub user_name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name, never blank.
    pub product_name: String,

    /// Optional barcode (EAN-13, UPC-A, ...). Unique when present.
    pub barcode: Option<String>,

    /// On-hand quantity. Never negative; only the StockLedger writes it.
    pub qty: i64,

    /// Selling price in cents.
    pub price: Money,

    /// At or below this quantity the product is flagged for restocking.
    pub low_stock_threshold: i64,

    pub kategory_id: i64,

    pub supplier_id: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is at or below its restock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.qty <= self.low_stock_threshold
    }

    /// Whether the product can cover a sale of `quantity` units.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.qty >= quantity
    }
}

/// Input for registering a new product with its initial stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub product_name: String,
    pub barcode: Option<String>,
    /// Initial on-hand quantity (registration, not a stock delta).
    pub qty: i64,
    pub price: Money,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    pub kategory_id: i64,
    pub supplier_id: i64,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// A product joined with the labels of its category and supplier.
///
/// This is the read model the analytics aggregator works over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSnapshot {
    pub id: i64,
    pub product_name: String,
    pub qty: i64,
    pub price: Money,
    pub low_stock_threshold: i64,
    pub kategory_id: i64,
    pub category_name: Option<String>,
    pub supplier_id: i64,
    pub supplier_first_name: Option<String>,
    pub supplier_last_name: Option<String>,
}

// =============================================================================
// Posting Input
// =============================================================================

/// One line of an order, purchase or return as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DetailLine {
    pub product_id: i64,

    /// Name snapshot; blank means "use the product's current name".
    #[serde(default)]
    pub product_name: String,

    /// Unit price snapshot.
    pub price: Money,

    pub qty: i64,

    /// Caller's idea of `qty × price`. Informational only; the ledger
    /// always recomputes it.
    #[serde(default)]
    pub total_price: Option<Money>,
}

impl DetailLine {
    /// Line total as the ledger stores it. `None` on overflow.
    #[inline]
    pub fn computed_total(&self) -> Option<Money> {
        self.price.multiply_quantity(self.qty)
    }
}

/// A sale to post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostOrder {
    pub user_id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    pub details: Vec<DetailLine>,
}

/// A stock receipt to post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostPurchase {
    pub user_id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    pub details: Vec<DetailLine>,
}

/// A return against a prior order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostOrderReturn {
    pub user_id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    pub order_id: i64,
    pub details: Vec<DetailLine>,
}

// =============================================================================
// Order
// =============================================================================

/// A posted sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub code: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub user_id: i64,
    pub note: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Sum of the line totals.
    pub fn grand_total(&self) -> Money {
        self.details.iter().map(|d| d.total).sum()
    }
}

/// A sale line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub price: Money,
    pub qty: i64,
    /// price × qty
    pub total: Money,
}

// =============================================================================
// Purchase
// =============================================================================

/// A posted stock receipt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Purchase {
    pub id: i64,
    pub code: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub user_id: i64,
    pub note: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub details: Vec<PurchaseDetail>,
}

impl Purchase {
    pub fn grand_total(&self) -> Money {
        self.details.iter().map(|d| d.total).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseDetail {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price: Money,
    pub qty: i64,
    pub total: Money,
}

// =============================================================================
// Order Return
// =============================================================================

/// Goods brought back against a prior order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReturn {
    pub id: i64,
    pub code: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub user_id: i64,
    pub order_id: i64,
    pub note: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub details: Vec<OrderReturnDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReturnDetail {
    pub id: i64,
    pub return_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price: Money,
    pub qty: i64,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
