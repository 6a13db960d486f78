//! # stockroom-db: Persistence and Ledger Services
//!
//! SQLite storage for the Stockroom inventory ledger, and the services that
//! keep stock consistent on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  HTTP handler / import binary                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    ledger     │    │  repository   │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ Coordinator   │───►│ ProductRepo   │    │              │  │   │
//! │  │   │ StockLedger   │    │ ReferenceRepo │    │ 0001_initial │  │   │
//! │  │   │ Codes, Import │    │ DocumentRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │   Database    │  pool.rs              │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL, foreign keys on)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Environment-driven configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Row-level access (products, reference data, documents)
//! - [`ledger`] - Stock ledger, document codes, posting, import, analytics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//!
//! let order = db.coordinator().post_order(input).await?;
//! let report = db.importer().import_rows(&rows).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, LedgerConfig};
pub use error::{DbError, DbResult};
pub use ledger::{
    AnalyticsAggregator, BulkImportPipeline, DocumentCodeGenerator, Envelope, ErrorCode,
    LedgerError, LedgerResult, StockLedger, TransactionCoordinator,
};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::documents::DocumentRepository;
pub use repository::product::ProductRepository;
pub use repository::reference::ReferenceRepository;
