//! # Ledger Error
//!
//! The error every ledger service returns.
//!
//! ## Taxonomy
//! ```text
//! ┌──────────────────────┬────────┬──────────────────────┬─────────────────┐
//! │ Variant              │ Status │ Code                 │ Logged / masked │
//! ├──────────────────────┼────────┼──────────────────────┼─────────────────┤
//! │ Validation           │ 400    │ VALIDATION_ERROR     │ no / no         │
//! │ NotFound             │ 404    │ NOT_FOUND            │ no / no         │
//! │ InsufficientStock    │ 422    │ INSUFFICIENT_STOCK   │ no / no         │
//! │ Conflict             │ 409    │ CONFLICT             │ no / no         │
//! │ Transaction          │ 500    │ TRANSACTION_ERROR    │ yes / yes       │
//! │ Infrastructure       │ 500    │ INFRASTRUCTURE_ERROR │ yes / yes       │
//! └──────────────────────┴────────┴──────────────────────┴─────────────────┘
//! ```
//!
//! Caller mistakes come back verbatim. Faults of the database or the
//! transaction are logged in full and leave only a generic message.

use serde::Serialize;
use thiserror::Error;

use crate::error::DbError;
use crate::ledger::envelope::Envelope;
use stockroom_core::{CoreError, ValidationError};

pub const TRANSACTION_FAILED_MESSAGE: &str = "Database transaction failed";
pub const INFRASTRUCTURE_FAILED_MESSAGE: &str = "Database operation failed";

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input was rejected before any write.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stock decrement would go below zero.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// A uniqueness or integrity rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// Begin, commit or rollback failed.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// The store or the code counter is unavailable.
    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),
}

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    InsufficientStock,
    Conflict,
    TransactionError,
    InfrastructureError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::TransactionError => "TRANSACTION_ERROR",
            ErrorCode::InfrastructureError => "INFRASTRUCTURE_ERROR",
        }
    }
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::Validation(_) => ErrorCode::ValidationError,
            LedgerError::NotFound { .. } => ErrorCode::NotFound,
            LedgerError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            LedgerError::Conflict(_) => ErrorCode::Conflict,
            LedgerError::Transaction(_) => ErrorCode::TransactionError,
            LedgerError::Infrastructure(_) => ErrorCode::InfrastructureError,
        }
    }

    /// Transport status for the excluded HTTP layer.
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerError::Validation(_) => 400,
            LedgerError::NotFound { .. } => 404,
            LedgerError::Conflict(_) => 409,
            LedgerError::InsufficientStock { .. } => 422,
            LedgerError::Transaction(_) | LedgerError::Infrastructure(_) => 500,
        }
    }

    /// Whether the failure is ours rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            LedgerError::Transaction(_) | LedgerError::Infrastructure(_)
        )
    }

    /// Message safe to hand to a client.
    pub fn safe_message(&self) -> String {
        match self {
            LedgerError::Transaction(_) => TRANSACTION_FAILED_MESSAGE.to_string(),
            LedgerError::Infrastructure(_) => INFRASTRUCTURE_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Failure envelope. Internal failures are logged here with full
    /// context, then masked.
    pub fn into_envelope<T>(self) -> Envelope<T> {
        if self.is_internal() {
            tracing::error!(code = self.code().as_str(), error = %self, "Ledger operation failed");
        }
        Envelope::failure(self.safe_message())
    }
}

impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TooManyLines { .. } => LedgerError::Validation(err.to_string()),
            CoreError::Validation(e) => LedgerError::Validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}

impl From<DbError> for LedgerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            err if err.is_constraint() => LedgerError::Conflict(err.to_string()),
            DbError::TransactionFailed(e) => LedgerError::Transaction(e),
            other => LedgerError::Infrastructure(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
