//! CSV loading of sales rows from local files or HTTP URLs.

use crate::error::LoadError;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes, is_remote};
use crate::records::SalesRow;
use async_trait::async_trait;
use std::io::ErrorKind;
use tracing::debug;

/// Source of raw sales rows for a chart.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, source: &str) -> Result<Vec<SalesRow>, LoadError>;
}

/// Reads CSV from disk, or over HTTP when `source` is an `http(s)` URL.
pub struct CsvLoader<C = BasicClient> {
    client: C,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::with_client(BasicClient::new())
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> CsvLoader<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: HttpClient> Loader for CsvLoader<C> {
    #[tracing::instrument(skip(self))]
    async fn load(&self, source: &str) -> Result<Vec<SalesRow>, LoadError> {
        let bytes = if is_remote(source) {
            fetch_bytes(&self.client, source).await?
        } else {
            read_file(source).await?
        };

        let rows = parse_rows(&bytes)?;
        debug!(rows = rows.len(), "Parsed sales rows");
        Ok(rows)
    }
}

async fn read_file(path: &str) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound(path.to_string()),
        _ => LoadError::Io {
            path: path.to_string(),
            source,
        },
    })
}

/// Parses CSV bytes with a header row into [`SalesRow`]s.
///
/// Columns are matched by header name; unknown columns are ignored and
/// empty cells become missing values.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] for malformed CSV or a non-numeric measure.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<SalesRow>, LoadError> {
    let csv_error = |e: csv::Error| LoadError::Parse {
        line: e.position().map_or(0, |p| p.line()),
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = rdr.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());

        let mut row: SalesRow = record
            .deserialize(Some(&headers))
            .map_err(|e| LoadError::Parse {
                line,
                message: e.to_string(),
            })?;
        row.line = line;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Row ID,Order Date,Category,Sales,Quantity,Discount,Profit
1,08/11/2016,Furniture,261.96,2,0,41.9136
2,2016-11-08,Office Supplies,14.62,2,0,6.8714
";

    #[test]
    fn test_parse_rows_by_header() {
        let rows = parse_rows(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].category.as_deref(), Some("Furniture"));
        assert_eq!(rows[0].order_date.as_deref(), Some("08/11/2016"));
        assert_eq!(rows[0].sales, Some(261.96));
        assert_eq!(rows[0].quantity, Some(2.0));
        assert_eq!(rows[1].profit, Some(6.8714));
    }

    #[test]
    fn test_parse_rows_missing_columns_are_none() {
        let rows = parse_rows(b"Category,Profit\nTechnology,10\n").unwrap();
        assert_eq!(rows[0].sales, None);
        assert_eq!(rows[0].order_date, None);
    }

    #[test]
    fn test_parse_rows_empty_cell_is_none() {
        let rows = parse_rows(b"Category,Profit\nTechnology,\n").unwrap();
        assert_eq!(rows[0].profit, None);
    }

    #[test]
    fn test_parse_rows_invalid_number() {
        let err = parse_rows(b"Category,Profit\nA,1\nB,lots\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_rows_ragged_row() {
        let err = parse_rows(b"Category,Profit\nA,1,extra\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_parse_rows_header_only() {
        assert!(parse_rows(b"Category,Profit\n").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = CsvLoader::new();
        let err = loader.load("does/not/exist.csv").await.unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(path) if path == "does/not/exist.csv"));
    }
}
