//! # stockroom-core: Pure Business Logic for the Stockroom Ledger
//!
//! This crate holds every rule of the inventory ledger that can be expressed
//! without touching storage: domain types, money arithmetic, input
//! validation, bulk-import normalization, stock analytics and the document
//! code format.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          HTTP / admin UI (outside this workspace)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Envelope { message, result }           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-db (ledger services)               │   │
//! │  │   StockLedger, TransactionCoordinator, BulkImportPipeline       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │ money  │ │validation│ │ import  │ │analytics│  │   │
//! │  │   └─────────┘ └────────┘ └──────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Purchase, OrderReturn, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation for postings
//! - [`import`] - Alias table, row normalization and the import report
//! - [`analytics`] - Stock analytics over a product snapshot
//! - [`document`] - Document kinds and the code format
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::parse_decimal("12.50").unwrap();
//! let line_total = price.multiply_quantity(3).unwrap();
//! assert_eq!(line_total.to_string(), "37.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod document;
pub mod error;
pub mod import;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low-stock threshold applied when a product does not specify one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of products returned by the low-stock alert listing.
pub const LOW_STOCK_PAGE_SIZE: usize = 20;

/// Maximum detail lines allowed on a single order, purchase or return.
///
/// ## Business Reason
/// Keeps a single posting transaction short; the write lock is held for the
/// whole document.
pub const MAX_DETAIL_LINES: usize = 100;

/// Largest quantity a single detail line may carry.
///
/// ## Business Reason
/// Catches typos (an extra few zeros) and keeps every line total and stock
/// sum far from the `i64` limit.
pub const MAX_LINE_QTY: i64 = 1_000_000;
