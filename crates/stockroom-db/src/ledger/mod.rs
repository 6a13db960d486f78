//! # Ledger Services
//!
//! Everything that changes stock or posts documents goes through here.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TransactionCoordinator      BulkImportPipeline     AnalyticsAggregator │
//! │   post_order                  import_rows            product_analytics  │
//! │   post_purchase                    │                 low_stock_alerts   │
//! │   post_order_return                │                        │           │
//! │       │        │                   │                        │           │
//! │       ▼        ▼                   ▼                        ▼           │
//! │  DocumentCode  StockLedger ◄───── register ─────────── snapshot         │
//! │  Generator     apply_delta                                              │
//! │       │        │                                                        │
//! │       ▼        ▼                                                        │
//! │  document_sequences, products, orders/purchases/returns (+ details)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every service returns [`LedgerResult`]; wrap the result in an
//! [`Envelope`] to hand it to a client.

pub mod analytics;
pub mod codes;
pub mod coordinator;
pub mod envelope;
pub mod error;
pub mod import;
pub mod stock;

pub use analytics::AnalyticsAggregator;
pub use codes::DocumentCodeGenerator;
pub use coordinator::TransactionCoordinator;
pub use envelope::Envelope;
pub use error::{ErrorCode, LedgerError, LedgerResult};
pub use import::BulkImportPipeline;
pub use stock::StockLedger;
