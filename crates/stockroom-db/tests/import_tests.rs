//! Bulk import and analytics against a real SQLite database.

mod common;

use common::Fixture;
use serde_json::{json, Value};
use stockroom_core::import::{
    duplicate_barcode_message, RawRow, MSG_INVALID_PRICE, MSG_INVALID_QTY, MSG_MISSING_REFERENCE,
    MSG_PRODUCT_NAME_REQUIRED,
};
use stockroom_core::Money;
use stockroom_db::Envelope;

fn raw(value: Value) -> RawRow {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn valid_row(fx: &Fixture, name: &str) -> RawRow {
    raw(json!({
        "Product Name": name,
        "Quantity": "12",
        "Price": "2.50",
        "Category ID": fx.category_id.to_string(),
        "Supplier ID": fx.supplier_id.to_string(),
    }))
}

// =============================================================================
// Bulk Import
// =============================================================================

#[tokio::test]
async fn test_import_reports_spreadsheet_row_numbers() {
    let fx = Fixture::in_memory().await;
    let mut bad = valid_row(&fx, "Broken");
    bad.insert("Price".to_string(), json!("abc"));

    let rows = vec![valid_row(&fx, "Cola"), bad, valid_row(&fx, "Water")];
    let report = fx.db.importer().import_rows(&rows).await.unwrap();

    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.errors[0].row, 3);
    assert_eq!(report.errors[0].errors, vec![MSG_INVALID_PRICE.to_string()]);
    assert_eq!(report.created_ids.len(), 2);
}

#[tokio::test]
async fn test_import_partial_success_keeps_input_order() {
    let fx = Fixture::in_memory().await;

    let rows: Vec<RawRow> = (0..10)
        .map(|i| {
            let mut row = valid_row(&fx, &format!("Product {i}"));
            if i == 2 || i == 7 {
                row.insert("Quantity".to_string(), json!("-1"));
            }
            row
        })
        .collect();

    let report = fx.db.importer().import_rows(&rows).await.unwrap();

    assert_eq!(report.success_count, 8);
    assert_eq!(report.error_count, 2);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![4, 9]);
    assert_eq!(report.errors[0].errors, vec![MSG_INVALID_QTY.to_string()]);
    assert_eq!(fx.db.products().count().await.unwrap(), 8);
}

#[tokio::test]
async fn test_import_blank_name_is_rejected_alone() {
    let fx = Fixture::in_memory().await;
    let rows = vec![valid_row(&fx, "   "), valid_row(&fx, "Juice")];

    let report = fx.db.importer().import_rows(&rows).await.unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 2);
    assert_eq!(
        report.errors[0].errors,
        vec![MSG_PRODUCT_NAME_REQUIRED.to_string()]
    );

    let products = fx.db.products().list().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_name, "Juice");
}

#[tokio::test]
async fn test_import_persists_normalized_values() {
    let fx = Fixture::in_memory().await;
    let rows = vec![raw(json!({
        "productName": "Sparkling Water",
        "qty": 0,
        "price": 1.2,
        "kategoryId": fx.category_id,
        "supplierId": fx.supplier_id,
        "Barcode": "590001",
        "Low Stock Threshold": "0",
    }))];

    let report = fx.db.importer().import_rows(&rows).await.unwrap();
    assert_eq!(report.success_count, 1);

    let product = fx
        .db
        .products()
        .get_by_barcode("590001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.qty, 0);
    assert_eq!(product.price, Money::from_cents(120));
    assert_eq!(product.low_stock_threshold, 0);
    assert_eq!(product.id, report.created_ids[0]);
}

#[tokio::test]
async fn test_import_persist_failures_become_row_errors() {
    let fx = Fixture::in_memory().await;

    let mut first = valid_row(&fx, "Cola");
    first.insert("barcode".to_string(), json!("111"));
    let mut duplicate = valid_row(&fx, "Cola Light");
    duplicate.insert("barcode".to_string(), json!("111"));
    let mut orphan = valid_row(&fx, "Orphan");
    orphan.insert("Supplier ID".to_string(), json!("777"));

    let rows = vec![first, duplicate, orphan, valid_row(&fx, "Water")];
    let report = fx.db.importer().import_rows(&rows).await.unwrap();

    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 2);
    assert_eq!(report.errors[0].row, 3);
    assert_eq!(report.errors[0].errors, vec![duplicate_barcode_message("111")]);
    assert_eq!(report.errors[1].row, 4);
    assert_eq!(report.errors[1].errors, vec![MSG_MISSING_REFERENCE.to_string()]);
}

#[tokio::test]
async fn test_import_envelope_shape() {
    let fx = Fixture::in_memory().await;
    let rows = vec![raw(json!({ "productName": "" }))];

    let envelope = Envelope::from(fx.db.importer().import_rows(&rows).await);
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json["message"], "success");
    assert_eq!(json["result"]["successCount"], 0);
    assert_eq!(json["result"]["errorCount"], 1);
    assert_eq!(json["result"]["errors"][0]["row"], 2);
    assert!(json["result"]["errors"][0]["errors"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn test_import_aborts_when_store_is_gone() {
    let fx = Fixture::in_memory().await;
    fx.db.close().await;

    let err = fx
        .db
        .importer()
        .import_rows(&[valid_row(&fx, "Cola")])
        .await
        .unwrap_err();
    assert!(err.is_internal());
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_analytics_over_live_products() {
    let fx = Fixture::in_memory().await;
    let snacks = fx.db.references().create_category("Snacks").await.unwrap();

    let mut empty = fx.new_product("Empty", 0);
    empty.price = Money::from_cents(100);
    let mut low = fx.new_product("Low", 3);
    low.price = Money::from_cents(200);
    let mut healthy = fx.new_product("Healthy", 50);
    healthy.price = Money::from_cents(401);
    healthy.kategory_id = snacks.id;

    let stock = fx.db.stock();
    for product in [&empty, &low, &healthy] {
        stock.register(product).await.unwrap();
    }

    let analytics = fx.db.analytics().product_analytics().await.unwrap();
    assert_eq!(analytics.total_products, 3);
    assert_eq!(analytics.low_stock_products, 2);
    assert_eq!(analytics.out_of_stock_products, 1);

    assert_eq!(analytics.category_distribution.len(), 2);
    assert_eq!(analytics.category_distribution[0].name, "Beverages");
    assert_eq!(analytics.category_distribution[0].count, 2);
    assert_eq!(analytics.category_distribution[1].name, "Snacks");
    assert_eq!(analytics.supplier_distribution[0].last_name, "Lovelace");
    assert_eq!(analytics.supplier_distribution[0].count, 3);

    assert_eq!(analytics.price_analysis.min, Money::from_cents(100));
    assert_eq!(analytics.price_analysis.max, Money::from_cents(401));
    assert_eq!(analytics.price_analysis.average, Money::from_cents(234));

    let alerts = fx.db.analytics().low_stock_alerts().await.unwrap();
    let names: Vec<&str> = alerts.iter().map(|p| p.product_name.as_str()).collect();
    assert_eq!(names, vec!["Empty", "Low"]);
}

#[tokio::test]
async fn test_analytics_follow_stock_movements() {
    let fx = Fixture::in_memory().await;
    let product = fx.product("Cola", 12).await;

    let before = fx.db.analytics().product_analytics().await.unwrap();
    assert_eq!(before.low_stock_products, 0);

    fx.db.stock().apply_delta(product.id, -12).await.unwrap();

    let after = fx.db.analytics().product_analytics().await.unwrap();
    assert_eq!(after.low_stock_products, 1);
    assert_eq!(after.out_of_stock_products, 1);
}
