//! # Transaction Coordinator
//!
//! Posts orders, purchases and order returns: one master row, N detail
//! rows and N stock deltas as a single atomic unit.
//!
//! ## Posting Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  post_order(input)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_post_order()          pure; nothing opened yet                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────────┐   │
//! │  │ next_code_in()              first statement is a write, so the   │   │
//! │  │                             write lock is held from here on      │   │
//! │  │ user exists?                NotFound                             │   │
//! │  │ resolve lines               NotFound, snapshot name + total      │   │
//! │  │ summed qty per product      InsufficientStock (orders only)      │   │
//! │  │ INSERT master                                                    │   │
//! │  │ for line in lines:          sequential, never concurrent         │   │
//! │  │     apply_delta_in(direction × qty)                              │   │
//! │  │     INSERT detail                                                │   │
//! │  └ COMMIT ◄── any `?` above drops the transaction: ROLLBACK ───────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Order { code, details }                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::error::DbError;
use crate::ledger::codes::DocumentCodeGenerator;
use crate::ledger::error::{LedgerError, LedgerResult};
use crate::ledger::stock::StockLedger;
use crate::pool::Database;
use crate::repository::documents::{DocumentRepository, NewDetail};
use crate::repository::product::ProductRepository;
use crate::repository::reference::ReferenceRepository;
use stockroom_core::document::DocumentKind;
use stockroom_core::validation::{
    validate_post_order, validate_post_order_return, validate_post_purchase,
};
use stockroom_core::{
    DetailLine, Order, OrderReturn, PostOrder, PostOrderReturn, PostPurchase, Product, Purchase,
    ValidationError,
};

#[derive(Debug, Clone)]
pub struct TransactionCoordinator {
    db: Database,
}

impl TransactionCoordinator {
    pub fn new(db: Database) -> Self {
        TransactionCoordinator { db }
    }

    // =========================================================================
    // Posting
    // =========================================================================

    /// Posts a sale. Every line decrements stock; if any line cannot be
    /// covered the whole order is rejected and nothing is written.
    pub async fn post_order(&self, input: PostOrder) -> LedgerResult<Order> {
        validate_post_order(&input)?;
        let kind = DocumentKind::Order;

        let mut tx = self.db.begin().await?;

        let code = DocumentCodeGenerator::next_code_in(&mut tx, kind.prefix()).await?;
        ensure_user(&mut tx, input.user_id).await?;

        let (lines, products) = resolve_lines(&mut tx, &input.details).await?;
        ensure_stock_covers(&lines, &products)?;

        let mut order = DocumentRepository::insert_order_in(
            &mut tx,
            &code,
            input.date,
            input.user_id,
            &input.note,
        )
        .await?;

        for line in &lines {
            let delta = kind.stock_direction() * line.qty;
            StockLedger::apply_delta_in(&mut tx, line.product_id, delta).await?;
            let detail = DocumentRepository::insert_order_detail_in(&mut tx, order.id, line).await?;
            order.details.push(detail);
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            id = order.id,
            code = %order.code,
            lines = order.details.len(),
            total = %order.grand_total(),
            "Order posted"
        );
        Ok(order)
    }

    /// Posts a stock receipt. Every line increments stock.
    pub async fn post_purchase(&self, input: PostPurchase) -> LedgerResult<Purchase> {
        validate_post_purchase(&input)?;
        let kind = DocumentKind::Purchase;

        let mut tx = self.db.begin().await?;

        let code = DocumentCodeGenerator::next_code_in(&mut tx, kind.prefix()).await?;
        ensure_user(&mut tx, input.user_id).await?;

        let (lines, _) = resolve_lines(&mut tx, &input.details).await?;

        let mut purchase = DocumentRepository::insert_purchase_in(
            &mut tx,
            &code,
            input.date,
            input.user_id,
            &input.note,
        )
        .await?;

        for line in &lines {
            let delta = kind.stock_direction() * line.qty;
            StockLedger::apply_delta_in(&mut tx, line.product_id, delta).await?;
            let detail =
                DocumentRepository::insert_purchase_detail_in(&mut tx, purchase.id, line).await?;
            purchase.details.push(detail);
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            id = purchase.id,
            code = %purchase.code,
            lines = purchase.details.len(),
            total = %purchase.grand_total(),
            "Purchase posted"
        );
        Ok(purchase)
    }

    /// Posts goods returned against an existing order. Every line
    /// increments stock and is tied to the new return.
    pub async fn post_order_return(&self, input: PostOrderReturn) -> LedgerResult<OrderReturn> {
        validate_post_order_return(&input)?;
        let kind = DocumentKind::OrderReturn;

        let mut tx = self.db.begin().await?;

        let code = DocumentCodeGenerator::next_code_in(&mut tx, kind.prefix()).await?;
        ensure_user(&mut tx, input.user_id).await?;

        if !DocumentRepository::order_exists_in(&mut tx, input.order_id).await? {
            return Err(LedgerError::not_found("Order", input.order_id));
        }

        let (lines, _) = resolve_lines(&mut tx, &input.details).await?;

        let mut order_return = DocumentRepository::insert_order_return_in(
            &mut tx,
            &code,
            input.date,
            input.user_id,
            input.order_id,
            &input.note,
        )
        .await?;

        for line in &lines {
            let delta = kind.stock_direction() * line.qty;
            StockLedger::apply_delta_in(&mut tx, line.product_id, delta).await?;
            let detail =
                DocumentRepository::insert_order_return_detail_in(&mut tx, order_return.id, line)
                    .await?;
            order_return.details.push(detail);
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            id = order_return.id,
            code = %order_return.code,
            order_id = order_return.order_id,
            lines = order_return.details.len(),
            "Order return posted"
        );
        Ok(order_return)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_order(&self, id: i64) -> LedgerResult<Order> {
        self.db
            .documents()
            .get_order(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Order", id))
    }

    pub async fn get_purchase(&self, id: i64) -> LedgerResult<Purchase> {
        self.db
            .documents()
            .get_purchase(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Purchase", id))
    }

    pub async fn get_order_return(&self, id: i64) -> LedgerResult<OrderReturn> {
        self.db
            .documents()
            .get_order_return(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Order return", id))
    }

    /// Order headers, newest first.
    pub async fn list_orders(&self, limit: u32, offset: u32) -> LedgerResult<Vec<Order>> {
        Ok(self.db.documents().list_orders(limit, offset).await?)
    }

    /// Purchase headers, newest first.
    pub async fn list_purchases(&self, limit: u32, offset: u32) -> LedgerResult<Vec<Purchase>> {
        Ok(self.db.documents().list_purchases(limit, offset).await?)
    }
}

// =============================================================================
// Helpers (all run on the posting transaction)
// =============================================================================

async fn ensure_user(conn: &mut SqliteConnection, user_id: i64) -> LedgerResult<()> {
    if !ReferenceRepository::user_exists_in(conn, user_id).await? {
        return Err(LedgerError::not_found("User", user_id));
    }
    Ok(())
}

/// Loads every referenced product once and turns input lines into rows
/// ready to insert.
///
/// - blank `product_name` takes the product's stored name
/// - `total` is always `qty × price`; a disagreeing caller total is logged
///   and replaced
async fn resolve_lines(
    conn: &mut SqliteConnection,
    details: &[DetailLine],
) -> LedgerResult<(Vec<NewDetail>, BTreeMap<i64, Product>)> {
    let mut products: BTreeMap<i64, Product> = BTreeMap::new();
    let mut lines = Vec::with_capacity(details.len());

    for line in details {
        if !products.contains_key(&line.product_id) {
            let product = ProductRepository::get_by_id_in(&mut *conn, line.product_id)
                .await?
                .ok_or_else(|| LedgerError::not_found("Product", line.product_id))?;
            products.insert(line.product_id, product);
        }

        let product_name = match line.product_name.trim() {
            "" => products
                .get(&line.product_id)
                .map(|p| p.product_name.clone())
                .unwrap_or_default(),
            name => name.to_string(),
        };

        let total = line.computed_total().ok_or_else(|| {
            LedgerError::from(ValidationError::AmountTooLarge {
                field: "totalPrice".to_string(),
            })
        })?;
        if let Some(claimed) = line.total_price {
            if claimed != total {
                warn!(
                    product_id = line.product_id,
                    claimed = %claimed,
                    computed = %total,
                    "Line total disagrees with qty x price; using computed total"
                );
            }
        }

        lines.push(NewDetail {
            product_id: line.product_id,
            product_name,
            price: line.price,
            qty: line.qty,
            total,
        });
    }

    Ok((lines, products))
}

/// Rejects an order whose summed quantity for some product exceeds what is
/// on hand, before any stock is written.
fn ensure_stock_covers(lines: &[NewDetail], products: &BTreeMap<i64, Product>) -> LedgerResult<()> {
    let mut requested: BTreeMap<i64, i64> = BTreeMap::new();
    for line in lines {
        let sum = requested.entry(line.product_id).or_insert(0);
        *sum = sum.checked_add(line.qty).ok_or_else(|| {
            LedgerError::from(ValidationError::OutOfRange {
                field: "qty".to_string(),
                min: 1,
                max: i64::MAX,
            })
        })?;
    }

    for (product_id, requested) in requested {
        let available = products.get(&product_id).map(|p| p.qty).unwrap_or(0);
        if available < requested {
            return Err(LedgerError::InsufficientStock {
                product_id,
                available,
                requested,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockroom_core::Money;

    fn product(id: i64, qty: i64) -> Product {
        let now = Utc::now();
        Product {
            id,
            product_name: format!("Product {}", id),
            barcode: None,
            qty,
            price: Money::from_units(10),
            low_stock_threshold: 10,
            kategory_id: 1,
            supplier_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn detail(product_id: i64, qty: i64) -> NewDetail {
        NewDetail {
            product_id,
            product_name: String::new(),
            price: Money::from_units(10),
            qty,
            total: Money::from_units(10).multiply_quantity(qty).unwrap_or(Money::zero()),
        }
    }

    #[test]
    fn test_stock_cover_sums_lines_per_product() {
        let products = BTreeMap::from([(9, product(9, 5))]);

        assert!(ensure_stock_covers(&[detail(9, 2), detail(9, 3)], &products).is_ok());

        let err = ensure_stock_covers(&[detail(9, 3), detail(9, 4)], &products).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                product_id: 9,
                available: 5,
                requested: 7
            }
        ));
    }

    #[test]
    fn test_stock_cover_rejects_overflowing_sum() {
        let products = BTreeMap::from([(9, product(9, 5))]);

        let err = ensure_stock_covers(&[detail(9, i64::MAX), detail(9, i64::MAX)], &products)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}
