//! # Bulk Import Pipeline
//!
//! Feeds many candidate products through normalize → validate → register,
//! one row at a time, and aggregates the outcome.
//!
//! ```text
//! rows[0] ──► normalize ──► validate ──► register ──► success (id)
//! rows[1] ──► normalize ──► validate ──✗ row 3: [messages...]
//! rows[2] ──► normalize ──► validate ──► register ──✗ row 4: duplicate barcode
//!   ...
//!                                                    ▼
//!                        ImportReport { successCount, errorCount, errors }
//! ```
//!
//! Every row is its own atomic unit: a rejected row never affects its
//! neighbours. Only infrastructure faults stop the pipeline, and rows
//! registered before the fault stay registered.

use tracing::{debug, info, warn};

use crate::ledger::error::{LedgerError, LedgerResult};
use crate::ledger::stock::{StockLedger, MISSING_REFERENCE_ENTITY};
use stockroom_core::import::{
    normalize_row, row_number, validate_row, ImportReport, RawRow, MSG_MISSING_REFERENCE,
};

#[derive(Debug, Clone)]
pub struct BulkImportPipeline {
    stock: StockLedger,
}

impl BulkImportPipeline {
    pub fn new(stock: StockLedger) -> Self {
        BulkImportPipeline { stock }
    }

    /// Imports rows in input order. Row-local problems land in the report;
    /// only a pipeline-wide fault is returned as an error.
    pub async fn import_rows(&self, rows: &[RawRow]) -> LedgerResult<ImportReport> {
        info!(rows = rows.len(), "Starting bulk import");

        let mut report = ImportReport::new();

        for (index, raw) in rows.iter().enumerate() {
            let row = row_number(index);

            let candidate = match validate_row(&normalize_row(raw)) {
                Ok(candidate) => candidate,
                Err(errors) => {
                    debug!(row, errors = errors.len(), "Row rejected by validation");
                    report.record_failure(row, errors);
                    continue;
                }
            };

            match self.stock.register(&candidate).await {
                Ok(product) => report.record_success(product.id),
                Err(err) if err.is_internal() => {
                    warn!(row, error = %err, "Bulk import aborted");
                    return Err(err);
                }
                Err(err) => {
                    debug!(row, error = %err, "Row rejected at persist time");
                    report.record_failure(row, vec![row_message(err)]);
                }
            }
        }

        info!(
            success_count = report.success_count,
            error_count = report.error_count,
            "Bulk import finished"
        );
        Ok(report)
    }
}

fn row_message(err: LedgerError) -> String {
    match err {
        LedgerError::NotFound { entity, .. } if entity == MISSING_REFERENCE_ENTITY => {
            MSG_MISSING_REFERENCE.to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_message_for_missing_reference() {
        let err = LedgerError::not_found(MISSING_REFERENCE_ENTITY, "kategoryId=7, supplierId=1");
        assert_eq!(row_message(err), MSG_MISSING_REFERENCE);
    }

    #[test]
    fn test_row_message_keeps_other_not_found() {
        let err = LedgerError::not_found("Product", 12);
        assert_eq!(row_message(err), "Product not found: 12");

        let err = LedgerError::Conflict("Barcode '111' already exists".to_string());
        assert_eq!(row_message(err), "Barcode '111' already exists");
    }
}
