//! # Document Code Generator
//!
//! Issues `ORD-20261016-0001`-style codes from a counter stored in
//! `document_sequences`, one row per prefix per day.
//!
//! ```text
//! INSERT INTO document_sequences (prefix, period, last_value)
//! VALUES ('ORDR-', '20261016', 1)
//! ON CONFLICT (prefix, period)
//! DO UPDATE SET last_value = last_value + 1
//! RETURNING last_value                     ──► 7 ──► "ORDR-20261016-0007"
//! ```
//!
//! The upsert is a single write statement, so concurrent callers are
//! serialized by SQLite and each sees a different `last_value`. When issued
//! inside a posting transaction the increment rolls back with the document,
//! so failed postings leave no gaps.

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbError;
use crate::ledger::error::LedgerResult;
use stockroom_core::document::{format_code, period_key, validate_prefix};

#[derive(Debug, Clone)]
pub struct DocumentCodeGenerator {
    pool: SqlitePool,
}

impl DocumentCodeGenerator {
    pub fn new(pool: SqlitePool) -> Self {
        DocumentCodeGenerator { pool }
    }

    /// Issues the next code for `prefix`, committed immediately.
    pub async fn next_code(&self, prefix: &str) -> LedgerResult<String> {
        let mut conn = self.pool.acquire().await?;
        Self::next_code_in(&mut conn, prefix).await
    }

    /// Issues the next code on a caller's connection, dated today (UTC).
    pub async fn next_code_in(conn: &mut SqliteConnection, prefix: &str) -> LedgerResult<String> {
        Self::next_code_on_in(conn, prefix, Utc::now().date_naive()).await
    }

    /// Issues the next code for an explicit day bucket.
    pub async fn next_code_on_in(
        conn: &mut SqliteConnection,
        prefix: &str,
        date: NaiveDate,
    ) -> LedgerResult<String> {
        validate_prefix(prefix)?;

        let period = period_key(date);

        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO document_sequences (prefix, period, last_value)
            VALUES (?1, ?2, 1)
            ON CONFLICT (prefix, period)
            DO UPDATE SET last_value = last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(prefix)
        .bind(&period)
        .fetch_one(&mut *conn)
        .await
        .map_err(DbError::from)?;

        let code = format_code(prefix, date, sequence);
        debug!(prefix = %prefix, code = %code, "Issued document code");
        Ok(code)
    }
}
