//! Reference data: categories, suppliers and users.

mod common;

use common::Fixture;
use stockroom_db::DbError;

#[tokio::test]
async fn test_reference_rows_round_trip() {
    let fx = Fixture::in_memory().await;
    let refs = fx.db.references();

    let category = refs.get_category(fx.category_id).await.unwrap().unwrap();
    assert_eq!(category.name, "Beverages");

    let supplier = refs.get_supplier(fx.supplier_id).await.unwrap().unwrap();
    assert_eq!(supplier.first_name, "Ada");
    assert_eq!(supplier.last_name, "Lovelace");

    let user = refs.get_user(fx.user_id).await.unwrap().unwrap();
    assert_eq!(user.user_name, "clerk");
}

#[tokio::test]
async fn test_missing_reference_rows_are_none() {
    let fx = Fixture::in_memory().await;
    let refs = fx.db.references();

    assert!(refs.get_category(404).await.unwrap().is_none());
    assert!(refs.get_supplier(404).await.unwrap().is_none());
    assert!(refs.get_user(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_names_are_unique() {
    let fx = Fixture::in_memory().await;

    let err = fx.db.references().create_user("clerk").await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}
