//! Shared fixtures for the ledger integration tests.

#![allow(dead_code)]

use std::path::Path;

use chrono::{NaiveDate, Utc};
use stockroom_core::{DetailLine, Money, NewProduct, Product};
use stockroom_db::{Database, DbConfig};

/// Reference rows every test needs.
pub struct Fixture {
    pub db: Database,
    pub category_id: i64,
    pub supplier_id: i64,
    pub user_id: i64,
}

impl Fixture {
    /// Fresh in-memory database with one category, supplier and user.
    pub async fn in_memory() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Self::seed(db).await
    }

    /// Fresh on-disk database (for tests that need several connections).
    pub async fn on_disk(path: &Path) -> Fixture {
        let db = Database::new(DbConfig::new(path).max_connections(8))
            .await
            .unwrap();
        Self::seed(db).await
    }

    async fn seed(db: Database) -> Fixture {
        let refs = db.references();
        let category = refs.create_category("Beverages").await.unwrap();
        let supplier = refs.create_supplier("Ada", "Lovelace").await.unwrap();
        let user = refs.create_user("clerk").await.unwrap();

        Fixture {
            db,
            category_id: category.id,
            supplier_id: supplier.id,
            user_id: user.id,
        }
    }

    pub fn new_product(&self, name: &str, qty: i64) -> NewProduct {
        NewProduct {
            product_name: name.to_string(),
            barcode: None,
            qty,
            price: Money::from_units(10),
            low_stock_threshold: 10,
            kategory_id: self.category_id,
            supplier_id: self.supplier_id,
        }
    }

    /// Registers a product priced at 10.00 with the given stock.
    pub async fn product(&self, name: &str, qty: i64) -> Product {
        self.db
            .stock()
            .register(&self.new_product(name, qty))
            .await
            .unwrap()
    }

    pub async fn qty(&self, product_id: i64) -> i64 {
        self.db.stock().current_qty(product_id).await.unwrap()
    }
}

pub fn line(product_id: i64, qty: i64) -> DetailLine {
    DetailLine {
        product_id,
        product_name: String::new(),
        price: Money::from_units(10),
        qty,
        total_price: None,
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
