//! # Stock Ledger
//!
//! The only writer of `products.qty` after a product is registered.
//!
//! ## Apply Delta
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_delta(product_id, delta)                                         │
//! │                                                                         │
//! │  UPDATE products                                                        │
//! │     SET qty = qty + delta                                               │
//! │   WHERE id = ? AND qty + delta >= 0     ◄── check and write are one     │
//! │     AND qty <= i64::MAX - delta             statement, serialized by    │
//! │  RETURNING qty                              SQLite's write lock         │
//! │       │                                                                 │
//! │       ├── row returned ──► Ok(new_qty)                                  │
//! │       │                                                                 │
//! │       └── no row ──► SELECT qty WHERE id = ?                            │
//! │                        ├── no row     ──► NotFound                      │
//! │                        ├── delta > 0  ──► Validation (qty ceiling)      │
//! │                        └── delta < 0  ──► InsufficientStock             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no read-then-write window, so two concurrent sales of the last
//! unit cannot both succeed.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbError;
use crate::ledger::error::{LedgerError, LedgerResult};
use crate::repository::product::ProductRepository;
use stockroom_core::import::duplicate_barcode_message;
use stockroom_core::validation::{validate_barcode, validate_new_product};
use stockroom_core::{NewProduct, Product, ProductSnapshot, ValidationError};

/// Entity named when a registration points at a missing category or
/// supplier.
pub const MISSING_REFERENCE_ENTITY: &str = "Category or supplier";

#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Applies a signed stock change and returns the new on-hand quantity.
    ///
    /// ## Errors
    /// - `delta == 0` or `delta == i64::MIN` → Validation
    /// - unknown product → NotFound
    /// - `qty + delta < 0` → InsufficientStock, nothing written
    /// - `qty + delta > i64::MAX` → Validation, nothing written
    pub async fn apply_delta(&self, product_id: i64, delta: i64) -> LedgerResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::apply_delta_in(&mut conn, product_id, delta).await
    }

    /// Same as [`apply_delta`](Self::apply_delta), inside a caller's
    /// transaction. A later rollback undoes the change.
    pub async fn apply_delta_in(
        conn: &mut SqliteConnection,
        product_id: i64,
        delta: i64,
    ) -> LedgerResult<i64> {
        if delta == 0 {
            return Err(ValidationError::MustNotBeZero {
                field: "delta".to_string(),
            }
            .into());
        }

        let requested = delta.checked_neg().ok_or_else(delta_out_of_range)?;

        // SQLite turns an overflowing `qty + delta` into REAL instead of failing.
        let ceiling = if delta > 0 { i64::MAX - delta } else { i64::MAX };

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
               SET qty = qty + ?2,
                   updated_at = ?3
             WHERE id = ?1
               AND qty <= ?4
               AND qty + ?2 >= 0
            RETURNING qty
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .bind(Utc::now())
        .bind(ceiling)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::from)?;

        if let Some(new_qty) = updated {
            debug!(product_id, delta, new_qty, "Stock delta applied");
            return Ok(new_qty);
        }

        match Self::current_qty_in(conn, product_id).await? {
            None => Err(LedgerError::not_found("Product", product_id)),
            Some(available) if delta > 0 => {
                debug!(product_id, delta, available, "Stock delta exceeds ceiling");
                Err(delta_out_of_range())
            }
            Some(available) => {
                debug!(product_id, delta, available, "Stock delta rejected");
                Err(LedgerError::InsufficientStock {
                    product_id,
                    available,
                    requested,
                })
            }
        }
    }

    /// Current on-hand quantity.
    pub async fn current_qty(&self, product_id: i64) -> LedgerResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::current_qty_in(&mut conn, product_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Product", product_id))
    }

    /// Current on-hand quantity on a caller's connection; `None` when the
    /// product does not exist.
    pub async fn current_qty_in(
        conn: &mut SqliteConnection,
        product_id: i64,
    ) -> LedgerResult<Option<i64>> {
        let qty: Option<i64> = sqlx::query_scalar("SELECT qty FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::from)?;

        Ok(qty)
    }

    /// Registers a new product with its initial stock.
    ///
    /// This sets the starting quantity; it is not a delta. A missing
    /// category or supplier comes back as NotFound and a taken barcode as
    /// Conflict.
    pub async fn register(&self, product: &NewProduct) -> LedgerResult<Product> {
        validate_new_product(product)?;

        let product = NewProduct {
            barcode: validate_barcode(product.barcode.as_deref())?,
            ..product.clone()
        };

        let created = ProductRepository::new(self.pool.clone())
            .insert(&product)
            .await
            .map_err(|err| match err {
                DbError::ForeignKeyViolation { .. } => LedgerError::NotFound {
                    entity: MISSING_REFERENCE_ENTITY.to_string(),
                    id: format!(
                        "kategoryId={}, supplierId={}",
                        product.kategory_id, product.supplier_id
                    ),
                },
                DbError::UniqueViolation { value, .. } => {
                    LedgerError::Conflict(duplicate_barcode_message(&value))
                }
                other => other.into(),
            })?;

        info!(
            id = created.id,
            product_name = %created.product_name,
            qty = created.qty,
            "Product registered"
        );
        Ok(created)
    }

    /// All products with their category and supplier labels.
    pub async fn snapshot(&self) -> LedgerResult<Vec<ProductSnapshot>> {
        Ok(ProductRepository::new(self.pool.clone()).snapshot().await?)
    }
}

fn delta_out_of_range() -> LedgerError {
    ValidationError::OutOfRange {
        field: "delta".to_string(),
        min: -i64::MAX,
        max: i64::MAX,
    }
    .into()
}
