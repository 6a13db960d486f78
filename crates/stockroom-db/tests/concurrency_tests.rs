//! Concurrent callers on an on-disk database with a multi-connection pool.

mod common;

use std::collections::HashSet;

use common::{line, today, Fixture};
use stockroom_core::PostOrder;
use stockroom_db::LedgerError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_codes_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Fixture::on_disk(&dir.path().join("codes.db")).await;

    let mut handles = Vec::new();
    for _ in 0..32 {
        let codes = fx.db.codes();
        handles.push(tokio::spawn(async move { codes.next_code("ORDR-").await }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let code = handle.await.unwrap().unwrap();
        assert!(code.starts_with("ORDR-"));
        assert!(seen.insert(code), "duplicate code issued");
    }
    assert_eq!(seen.len(), 32);

    fx.db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Fixture::on_disk(&dir.path().join("orders.db")).await;
    let product = fx.product("Last Units", 3).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let coordinator = fx.db.coordinator();
        let input = PostOrder {
            user_id: fx.user_id,
            date: today(),
            note: String::new(),
            details: vec![line(product.id, 1)],
        };
        handles.push(tokio::spawn(async move { coordinator.post_order(input).await }));
    }

    let mut sold = 0;
    let mut rejected = 0;
    let mut codes = HashSet::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => {
                sold += 1;
                assert!(codes.insert(order.code));
            }
            Err(LedgerError::InsufficientStock { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(sold, 3);
    assert_eq!(rejected, 7);
    assert_eq!(fx.qty(product.id).await, 0);

    fx.db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deltas_are_linearizable() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Fixture::on_disk(&dir.path().join("deltas.db")).await;
    let product_id = fx.product("Cola", 20).await.id;

    let mut handles = Vec::new();
    for i in 0..40 {
        let stock = fx.db.stock();
        let delta = if i % 2 == 0 { -3 } else { 1 };
        handles.push(tokio::spawn(async move {
            (delta, stock.apply_delta(product_id, delta).await)
        }));
    }

    let mut expected = 20;
    for handle in handles {
        match handle.await.unwrap() {
            (delta, Ok(qty)) => {
                assert!(qty >= 0);
                expected += delta;
            }
            (_, Err(LedgerError::InsufficientStock { .. })) => {}
            (_, Err(other)) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(fx.qty(product_id).await, expected);
    assert!(expected >= 0);

    fx.db.close().await;
}
