//! Analytics over the live product table. Recomputed on every call.

use tracing::debug;

use crate::ledger::error::LedgerResult;
use crate::ledger::stock::StockLedger;
use stockroom_core::analytics::{compute_analytics, low_stock_alerts, StockAnalytics};
use stockroom_core::ProductSnapshot;

#[derive(Debug, Clone)]
pub struct AnalyticsAggregator {
    stock: StockLedger,
}

impl AnalyticsAggregator {
    pub fn new(stock: StockLedger) -> Self {
        AnalyticsAggregator { stock }
    }

    /// Counts, distributions and price statistics.
    pub async fn product_analytics(&self) -> LedgerResult<StockAnalytics> {
        let snapshot = self.stock.snapshot().await?;
        let analytics = compute_analytics(&snapshot);

        debug!(
            total = analytics.total_products,
            low_stock = analytics.low_stock_products,
            out_of_stock = analytics.out_of_stock_products,
            "Computed product analytics"
        );
        Ok(analytics)
    }

    /// Lowest-stock products at or below their threshold, at most 20.
    pub async fn low_stock_alerts(&self) -> LedgerResult<Vec<ProductSnapshot>> {
        let snapshot = self.stock.snapshot().await?;
        Ok(low_stock_alerts(&snapshot))
    }
}
