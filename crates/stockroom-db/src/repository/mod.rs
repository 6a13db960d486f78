//! # Repository Module
//!
//! Row-level database access for the Stockroom ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories vs Ledger Services                      │
//! │                                                                         │
//! │  Ledger service (ledger::*)                                            │
//! │       │  owns the transaction, enforces invariants                     │
//! │       ▼                                                                 │
//! │  Repository                                                            │
//! │  ├── fn x(&self, ..)            runs on the pool                       │
//! │  └── fn x_in(conn, ..)          runs on a caller's connection          │
//! │       │                         (usually `&mut *tx`)                   │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Repositories never write products.qty after creation; only the        │
//! │  StockLedger does.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product rows and snapshots
//! - [`ReferenceRepository`](reference::ReferenceRepository) - Categories, suppliers, users
//! - [`DocumentRepository`](documents::DocumentRepository) - Orders, purchases, returns

pub mod documents;
pub mod product;
pub mod reference;
