//! # Document Repository
//!
//! Master and detail rows for orders, purchases and order returns.
//!
//! ## Table Layout
//! ```text
//! orders ─────────┐        purchases ──────┐        order_returns ─────┐
//!   id, code,     │          id, code,     │          id, code,        │
//!   date, user_id │          date, user_id │          order_id ──► orders
//!                 ▼                        ▼                           ▼
//! order_details            purchase_details          order_return_details
//!   order_id                 purchase_id               return_id
//!   product_id ──► products (RESTRICT)
//!   product_name, price      (snapshot)
//!   qty, total
//! ```
//!
//! Writes only happen through the `_in` functions, on the connection of the
//! transaction that creates the master. Nothing here updates or deletes.

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{
    Money, Order, OrderDetail, OrderReturn, OrderReturnDetail, Purchase, PurchaseDetail,
};

// =============================================================================
// Detail Rows
// =============================================================================

/// A detail line ready to be written: snapshot fields resolved, total
/// recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDetail {
    pub product_id: i64,
    pub product_name: String,
    pub price: Money,
    pub qty: i64,
    pub total: Money,
}

/// Which detail table a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailTable {
    Order,
    Purchase,
    OrderReturn,
}

impl DetailTable {
    const fn table(self) -> &'static str {
        match self {
            DetailTable::Order => "order_details",
            DetailTable::Purchase => "purchase_details",
            DetailTable::OrderReturn => "order_return_details",
        }
    }

    const fn parent_column(self) -> &'static str {
        match self {
            DetailTable::Order => "order_id",
            DetailTable::Purchase => "purchase_id",
            DetailTable::OrderReturn => "return_id",
        }
    }
}

async fn insert_detail<T>(
    conn: &mut SqliteConnection,
    kind: DetailTable,
    parent_id: i64,
    detail: &NewDetail,
) -> DbResult<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    debug!(
        table = kind.table(),
        parent_id,
        product_id = detail.product_id,
        qty = detail.qty,
        "Inserting detail"
    );

    let sql = format!(
        r#"
        INSERT INTO {table} ({parent}, product_id, product_name, price, qty, total)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id, {parent}, product_id, product_name, price, qty, total
        "#,
        table = kind.table(),
        parent = kind.parent_column(),
    );

    let row = sqlx::query_as::<_, T>(&sql)
        .bind(parent_id)
        .bind(detail.product_id)
        .bind(&detail.product_name)
        .bind(detail.price)
        .bind(detail.qty)
        .bind(detail.total)
        .fetch_one(&mut *conn)
        .await?;

    Ok(row)
}

async fn fetch_details<T>(pool: &SqlitePool, kind: DetailTable, parent_id: i64) -> DbResult<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!(
        r#"
        SELECT id, {parent}, product_id, product_name, price, qty, total
        FROM {table}
        WHERE {parent} = ?1
        ORDER BY id
        "#,
        table = kind.table(),
        parent = kind.parent_column(),
    );

    let rows = sqlx::query_as::<_, T>(&sql)
        .bind(parent_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for posted documents.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Inserts an order master. Details start empty.
    pub async fn insert_order_in(
        conn: &mut SqliteConnection,
        code: &str,
        date: NaiveDate,
        user_id: i64,
        note: &str,
    ) -> DbResult<Order> {
        debug!(code = %code, user_id, "Inserting order");

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (code, date, user_id, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, code, date, user_id, note, created_at
            "#,
        )
        .bind(code)
        .bind(date)
        .bind(user_id)
        .bind(note)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(order)
    }

    pub async fn insert_order_detail_in(
        conn: &mut SqliteConnection,
        order_id: i64,
        detail: &NewDetail,
    ) -> DbResult<OrderDetail> {
        insert_detail(conn, DetailTable::Order, order_id, detail).await
    }

    /// Whether an order exists, checked on a caller's connection.
    pub async fn order_exists_in(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }

    /// Gets an order with its detail rows.
    pub async fn get_order(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, code, date, user_id, note, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };
        order.details = fetch_details(&self.pool, DetailTable::Order, order.id).await?;
        Ok(Some(order))
    }

    /// Order headers, newest first. Details are not loaded.
    pub async fn list_orders(&self, limit: u32, offset: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, code, date, user_id, note, created_at
            FROM orders
            ORDER BY id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    // -------------------------------------------------------------------------
    // Purchases
    // -------------------------------------------------------------------------

    /// Inserts a purchase master. Details start empty.
    pub async fn insert_purchase_in(
        conn: &mut SqliteConnection,
        code: &str,
        date: NaiveDate,
        user_id: i64,
        note: &str,
    ) -> DbResult<Purchase> {
        debug!(code = %code, user_id, "Inserting purchase");

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (code, date, user_id, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, code, date, user_id, note, created_at
            "#,
        )
        .bind(code)
        .bind(date)
        .bind(user_id)
        .bind(note)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(purchase)
    }

    pub async fn insert_purchase_detail_in(
        conn: &mut SqliteConnection,
        purchase_id: i64,
        detail: &NewDetail,
    ) -> DbResult<PurchaseDetail> {
        insert_detail(conn, DetailTable::Purchase, purchase_id, detail).await
    }

    /// Gets a purchase with its detail rows.
    pub async fn get_purchase(&self, id: i64) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(
            "SELECT id, code, date, user_id, note, created_at FROM purchases WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut purchase) = purchase else {
            return Ok(None);
        };
        purchase.details = fetch_details(&self.pool, DetailTable::Purchase, purchase.id).await?;
        Ok(Some(purchase))
    }

    /// Purchase headers, newest first. Details are not loaded.
    pub async fn list_purchases(&self, limit: u32, offset: u32) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, code, date, user_id, note, created_at
            FROM purchases
            ORDER BY id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    // -------------------------------------------------------------------------
    // Order Returns
    // -------------------------------------------------------------------------

    /// Inserts an order return master. Details start empty.
    pub async fn insert_order_return_in(
        conn: &mut SqliteConnection,
        code: &str,
        date: NaiveDate,
        user_id: i64,
        order_id: i64,
        note: &str,
    ) -> DbResult<OrderReturn> {
        debug!(code = %code, user_id, order_id, "Inserting order return");

        let order_return = sqlx::query_as::<_, OrderReturn>(
            r#"
            INSERT INTO order_returns (code, date, user_id, order_id, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, code, date, user_id, order_id, note, created_at
            "#,
        )
        .bind(code)
        .bind(date)
        .bind(user_id)
        .bind(order_id)
        .bind(note)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(order_return)
    }

    pub async fn insert_order_return_detail_in(
        conn: &mut SqliteConnection,
        return_id: i64,
        detail: &NewDetail,
    ) -> DbResult<OrderReturnDetail> {
        insert_detail(conn, DetailTable::OrderReturn, return_id, detail).await
    }

    /// Gets an order return with its detail rows.
    pub async fn get_order_return(&self, id: i64) -> DbResult<Option<OrderReturn>> {
        let order_return = sqlx::query_as::<_, OrderReturn>(
            r#"
            SELECT id, code, date, user_id, order_id, note, created_at
            FROM order_returns
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut order_return) = order_return else {
            return Ok(None);
        };
        order_return.details =
            fetch_details(&self.pool, DetailTable::OrderReturn, order_return.id).await?;
        Ok(Some(order_return))
    }

    /// Number of detail rows across all three detail tables.
    pub async fn count_detail_rows(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM order_details)
              + (SELECT COUNT(*) FROM purchase_details)
              + (SELECT COUNT(*) FROM order_return_details)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Number of masters across orders, purchases and returns.
    pub async fn count_masters(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM orders)
              + (SELECT COUNT(*) FROM purchases)
              + (SELECT COUNT(*) FROM order_returns)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
