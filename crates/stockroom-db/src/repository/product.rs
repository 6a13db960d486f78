//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Insert (with initial stock)
//! - Lookup by id / barcode
//! - Snapshot joined with category and supplier labels
//!
//! Stock changes after creation go through
//! [`StockLedger`](crate::ledger::stock::StockLedger), never through here.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{NewProduct, Product, ProductSnapshot};

const PRODUCT_COLUMNS: &str = r#"
    id,
    product_name,
    barcode,
    qty,
    price,
    low_stock_threshold,
    kategory_id,
    supplier_id,
    created_at,
    updated_at
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product with its initial on-hand quantity.
    ///
    /// Constraint failures come back classified: a missing category or
    /// supplier as [`DbError::ForeignKeyViolation`], a taken barcode as
    /// [`DbError::UniqueViolation`].
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, product).await
    }

    /// Same as [`insert`](Self::insert), on a caller's connection.
    pub async fn insert_in(conn: &mut SqliteConnection, product: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();

        debug!(
            product_name = %product.product_name,
            qty = product.qty,
            "Inserting product"
        );

        let sql = format!(
            r#"
            INSERT INTO products (
                product_name, barcode, qty, price, low_stock_threshold,
                kategory_id, supplier_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Product>(&sql)
            .bind(product.product_name.trim())
            .bind(&product.barcode)
            .bind(product.qty)
            .bind(product.price)
            .bind(product.low_stock_threshold)
            .bind(product.kategory_id)
            .bind(product.supplier_id)
            .bind(now)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                    field,
                    value: product.barcode.clone().unwrap_or_default(),
                },
                other => other,
            })?;

        debug!(id = inserted.id, "Product inserted");
        Ok(inserted)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_in(&mut conn, id).await
    }

    /// Same as [`get_by_id`](Self::get_by_id), on a caller's connection.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(product)
    }

    /// Gets a product by barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE barcode = ?1", PRODUCT_COLUMNS);

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists all products by ascending id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS);

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// All products with their category name and supplier names.
    ///
    /// Left joins, so a product whose label rows are missing still shows up.
    pub async fn snapshot(&self) -> DbResult<Vec<ProductSnapshot>> {
        let snapshot = sqlx::query_as::<_, ProductSnapshot>(
            r#"
            SELECT
                p.id,
                p.product_name,
                p.qty,
                p.price,
                p.low_stock_threshold,
                p.kategory_id,
                c.name AS category_name,
                p.supplier_id,
                s.first_name AS supplier_first_name,
                s.last_name AS supplier_last_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.kategory_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = snapshot.len(), "Loaded product snapshot");
        Ok(snapshot)
    }

    /// Total number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Deletes a product.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while any detail row
    /// still references it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
