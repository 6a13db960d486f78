//! # Bulk Product Import
//!
//! Reads a CSV file (header row, then one product per row) and feeds it
//! through the bulk import pipeline. Prints the response envelope as JSON.
//!
//! ## Usage
//! ```bash
//! # Import into the database named by STOCKROOM_DB_PATH (default: stockroom.db)
//! cargo run -p stockroom-db --bin import -- products.csv
//!
//! # Explicit database, flattened error list
//! cargo run -p stockroom-db --bin import -- products.csv --db ./data/stockroom.db --flatten
//! ```
//!
//! Header names are matched case-sensitively against the import alias
//! table (`productName`, `Product Name`, `qty`, `Quantity`, ...). Every
//! cell is passed through as a string; numeric parsing happens in the
//! pipeline.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_core::import::RawRow;
use stockroom_db::{Database, Envelope, LedgerConfig};

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Imports products from a CSV file", long_about = None)]
struct Args {
    /// CSV file with a header row
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Database file (overrides STOCKROOM_DB_PATH)
    #[arg(short = 'd', long)]
    db: Option<PathBuf>,

    /// Report errors as one entry per message instead of grouped per row
    #[arg(long)]
    flatten: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = LedgerConfig::load()?;
    if let Some(db) = args.db {
        config.database_path = db;
    }

    let rows = read_rows(&args.file)?;
    info!(file = %args.file.display(), rows = rows.len(), "Read import file");

    let db = Database::new(config.db_config()).await?;
    let envelope = Envelope::from(db.importer().import_rows(&rows).await);
    db.close().await;

    let ok = envelope.is_success();
    let output = if args.flatten {
        serde_json::to_string_pretty(&Envelope {
            message: envelope.message,
            result: envelope.result.map(|report| report.flatten()),
        })?
    } else {
        serde_json::to_string_pretty(&envelope)?
    };
    println!("{}", output);

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Loads every data row as a loosely typed object keyed by header name.
///
/// Records may be ragged: missing trailing columns are left absent and
/// extra cells are dropped. Invalid UTF-8 is replaced with U+FFFD. The
/// pipeline then judges each row on its own.
fn read_rows(path: &Path) -> Result<Vec<RawRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|header| String::from_utf8_lossy(header).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();

    while reader.read_byte_record(&mut record)? {
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| {
                let cell = String::from_utf8_lossy(cell).into_owned();
                (header.clone(), Value::String(cell))
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom_db=trace` - Trace the ledger only
/// - Default: INFO, with debug for stockroom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_rows_keys_cells_by_header() {
        let file = csv_file(b"Product Name,Quantity,Price\nCola,12,2.50\nWater,3,1.00\n");

        let rows = read_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Product Name"], Value::String("Cola".into()));
        assert_eq!(rows[1]["Quantity"], Value::String("3".into()));
    }

    #[test]
    fn test_read_rows_keeps_ragged_records() {
        let file = csv_file(b"productName,qty,price\nCola,12,2.50\nShort,4\nLong,1,1.00,extra\n");

        let rows = read_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(!rows[1].contains_key("price"));
        assert_eq!(rows[1]["qty"], Value::String("4".into()));
        assert_eq!(rows[2].len(), 3);
    }

    #[test]
    fn test_read_rows_replaces_invalid_utf8() {
        let file = csv_file(b"productName,qty\nKopi \xff,2\nTeh,5\n");

        let rows = read_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["productName"], Value::String("Kopi \u{FFFD}".into()));
        assert_eq!(rows[1]["productName"], Value::String("Teh".into()));
    }
}
