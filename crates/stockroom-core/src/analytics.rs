//! # Stock Analytics
//!
//! Derived, read-only view over the current product snapshot. Nothing here
//! is cached: every call recomputes from the rows it is handed.
//!
//! ```text
//! Vec<ProductSnapshot> ──► compute_analytics() ──► StockAnalytics
//!                     └──► low_stock_alerts()  ──► lowest qty first, ≤ 20
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::ProductSnapshot;
use crate::LOW_STOCK_PAGE_SIZE;

/// Label used when a product's category row carries no name.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryCount {
    pub id: i64,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierCount {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub count: usize,
}

/// Min, max and mean selling price. All zero for an empty snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceAnalysis {
    pub min: Money,
    pub max: Money,
    pub average: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockAnalytics {
    pub total_products: usize,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    pub category_distribution: Vec<CategoryCount>,
    pub supplier_distribution: Vec<SupplierCount>,
    pub price_analysis: PriceAnalysis,
}

/// Whether a snapshot row is at or below its restock threshold.
#[inline]
pub fn is_low_stock(product: &ProductSnapshot) -> bool {
    product.qty <= product.low_stock_threshold
}

/// Computes counts, distributions and price statistics.
///
/// Distributions are keyed by id and come out in ascending id order; the
/// label of each group is taken from its first member.
pub fn compute_analytics(products: &[ProductSnapshot]) -> StockAnalytics {
    let low_stock_products = products.iter().filter(|p| is_low_stock(p)).count();
    let out_of_stock_products = products.iter().filter(|p| p.qty == 0).count();

    let mut categories: BTreeMap<i64, CategoryCount> = BTreeMap::new();
    let mut suppliers: BTreeMap<i64, SupplierCount> = BTreeMap::new();

    for product in products {
        categories
            .entry(product.kategory_id)
            .or_insert_with(|| CategoryCount {
                id: product.kategory_id,
                name: product
                    .category_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                count: 0,
            })
            .count += 1;

        suppliers
            .entry(product.supplier_id)
            .or_insert_with(|| SupplierCount {
                id: product.supplier_id,
                first_name: product.supplier_first_name.clone().unwrap_or_default(),
                last_name: product.supplier_last_name.clone().unwrap_or_default(),
                count: 0,
            })
            .count += 1;
    }

    StockAnalytics {
        total_products: products.len(),
        low_stock_products,
        out_of_stock_products,
        category_distribution: categories.into_values().collect(),
        supplier_distribution: suppliers.into_values().collect(),
        price_analysis: price_analysis(products),
    }
}

fn price_analysis(products: &[ProductSnapshot]) -> PriceAnalysis {
    let prices: Vec<Money> = products.iter().map(|p| p.price).collect();

    match (prices.iter().min(), prices.iter().max()) {
        (Some(&min), Some(&max)) => PriceAnalysis {
            min,
            max,
            average: Money::average(&prices),
        },
        _ => PriceAnalysis::default(),
    }
}

/// Products at or below threshold, lowest quantity first, at most
/// [`LOW_STOCK_PAGE_SIZE`] of them. Ties keep their input order.
pub fn low_stock_alerts(products: &[ProductSnapshot]) -> Vec<ProductSnapshot> {
    let mut low: Vec<ProductSnapshot> =
        products.iter().filter(|p| is_low_stock(p)).cloned().collect();
    low.sort_by_key(|p| p.qty);
    low.truncate(LOW_STOCK_PAGE_SIZE);
    low
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        id: i64,
        qty: i64,
        threshold: i64,
        price: i64,
        kategory_id: i64,
    ) -> ProductSnapshot {
        ProductSnapshot {
            id,
            product_name: format!("Product {}", id),
            qty,
            price: Money::from_cents(price),
            low_stock_threshold: threshold,
            kategory_id,
            category_name: Some(format!("Category {}", kategory_id)),
            supplier_id: 1,
            supplier_first_name: Some("Budi".to_string()),
            supplier_last_name: Some("Santoso".to_string()),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let analytics = compute_analytics(&[]);
        assert_eq!(analytics.total_products, 0);
        assert_eq!(analytics.low_stock_products, 0);
        assert!(analytics.category_distribution.is_empty());
        assert_eq!(analytics.price_analysis, PriceAnalysis::default());
    }

    #[test]
    fn test_counts() {
        let products = vec![
            snapshot(1, 0, 10, 100, 1),
            snapshot(2, 10, 10, 200, 1),
            snapshot(3, 11, 10, 300, 2),
            // Zero threshold is honored: 1 > 0 so not low
            snapshot(4, 1, 0, 400, 2),
        ];

        let analytics = compute_analytics(&products);
        assert_eq!(analytics.total_products, 4);
        assert_eq!(analytics.low_stock_products, 2);
        assert_eq!(analytics.out_of_stock_products, 1);
    }

    #[test]
    fn test_distributions_sorted_by_id() {
        let mut unnamed = snapshot(3, 5, 10, 100, 2);
        unnamed.category_name = None;
        let products = vec![snapshot(1, 5, 10, 100, 7), unnamed, snapshot(2, 5, 10, 100, 7)];

        let analytics = compute_analytics(&products);
        assert_eq!(
            analytics.category_distribution,
            vec![
                CategoryCount {
                    id: 2,
                    name: UNKNOWN_CATEGORY.to_string(),
                    count: 1
                },
                CategoryCount {
                    id: 7,
                    name: "Category 7".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(analytics.supplier_distribution.len(), 1);
        assert_eq!(analytics.supplier_distribution[0].count, 3);
        assert_eq!(analytics.supplier_distribution[0].first_name, "Budi");
    }

    #[test]
    fn test_price_analysis() {
        let products = vec![
            snapshot(1, 5, 10, 100, 1),
            snapshot(2, 5, 10, 250, 1),
            snapshot(3, 5, 10, 101, 1),
        ];

        let prices = compute_analytics(&products).price_analysis;
        assert_eq!(prices.min, Money::from_cents(100));
        assert_eq!(prices.max, Money::from_cents(250));
        // 451 / 3 = 150.33 → 150
        assert_eq!(prices.average, Money::from_cents(150));
    }

    #[test]
    fn test_low_stock_alerts_sorted_and_capped() {
        let mut products: Vec<_> = (1..=30).map(|id| snapshot(id, 30 - id, 100, 100, 1)).collect();
        products.push(snapshot(99, 500, 10, 100, 1));

        let alerts = low_stock_alerts(&products);
        assert_eq!(alerts.len(), LOW_STOCK_PAGE_SIZE);
        assert_eq!(alerts[0].qty, 0);
        assert!(alerts.windows(2).all(|w| w[0].qty <= w[1].qty));
        assert!(alerts.iter().all(|p| p.id != 99));
    }

    #[test]
    fn test_low_stock_alerts_stable_ties() {
        let products = vec![snapshot(5, 1, 10, 100, 1), snapshot(2, 1, 10, 100, 1)];
        let alerts = low_stock_alerts(&products);
        assert_eq!(alerts[0].id, 5);
        assert_eq!(alerts[1].id, 2);
    }
}
