//! CSV ingestion
//!
//! Turns an uploaded export into ordered [`Row`]s. Only an unreadable header
//! fails the upload; bad records and bad cells are left for the report
//! engine to skip.

mod coerce;
mod row;

pub use coerce::{parse_amount, parse_timestamp, CoercionError};
pub use row::Row;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::{columns, error::Error};

/// CSV parser with a list of columns it expects to find in the header
#[derive(Debug, Clone)]
pub struct CsvParser {
    expected_columns: Vec<String>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            expected_columns: columns::REQUIRED
                .iter()
                .map(|column| column.to_string())
                .collect(),
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds columns to the header check, e.g. configured grouping columns.
    pub fn with_expected_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            if !self.expected_columns.contains(&column) {
                self.expected_columns.push(column);
            }
        }
        self
    }

    /// Decodes raw upload bytes, then parses them.
    pub fn parse_bytes(&self, content: &[u8]) -> Result<Vec<Row>, Error> {
        let text = std::str::from_utf8(content)?;
        self.parse_content(text)
    }

    pub fn parse_content(&self, content: &str) -> Result<Vec<Row>, Error> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.trim().is_empty() {
            return Err(Error::InputFormat(String::from(
                "file is empty, a header row is required",
            )));
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| {
                Error::InputFormat(format!("Failed to read CSV headers: {}", e))
            })?
            .clone();

        if headers.iter().all(|header| header.is_empty()) {
            return Err(Error::InputFormat(String::from(
                "header row has no column names",
            )));
        }

        self.check_header(&headers);

        let mut rows = Vec::new();
        let mut skipped = 0;

        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(Row::from_record(&headers, &record)),
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping CSV record {}: {}", index + 1, e);
                },
            }
        }

        debug!("Parsed {} rows, skipped {} records", rows.len(), skipped);

        Ok(rows)
    }

    /// Expected columns that `headers` does not carry, in expected order.
    fn missing_columns(&self, headers: &StringRecord) -> Vec<&str> {
        self.expected_columns
            .iter()
            .map(String::as_str)
            .filter(|column| !headers.iter().any(|header| header == *column))
            .collect()
    }

    fn check_header(&self, headers: &StringRecord) {
        let missing = self.missing_columns(headers);

        if !missing.is_empty() {
            warn!(
                "Header is missing columns, affected rows will be skipped: {}",
                missing.join(", ")
            );
        }
    }
}

/// Parses CSV text with the default column expectations.
pub fn parse(content: &str) -> Result<Vec<Row>, Error> {
    CsvParser::default().parse_content(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "origin_timestamp,from_asset_amount_usd,from_chain_name,to_chain_name,from_asset_symbol";

    #[test]
    fn test_parse_preserves_row_order() {
        let content = format!(
            "{}\n2025-01-01,1,a,b,USDC\n2025-01-02,2,c,d,ETH\n2025-01-03,3,e,f,DAI\n",
            HEADER
        );
        let rows = parse(&content).unwrap();

        assert_eq!(rows.len(), 3);
        let amounts: Vec<f64> =
            rows.iter().map(|row| row.amount_usd().unwrap()).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_header_only_is_valid() {
        let rows = parse(HEADER).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(parse(""), Err(Error::InputFormat(_))));
        assert!(matches!(parse(" \n \n"), Err(Error::InputFormat(_))));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let parser = CsvParser::new();
        let result = parser.parse_bytes(&[0x6f, 0xff, 0xfe, 0x0a]);
        assert!(matches!(result, Err(Error::Utf8(_))));
    }

    #[test]
    fn test_bom_and_header_padding_are_stripped() {
        let content = "\u{feff} origin_timestamp , from_asset_amount_usd\n2025-01-01, 42\n";
        let rows = parse(content).unwrap();

        assert_eq!(rows[0].amount_usd(), Ok(42.0));
    }

    #[test]
    fn test_bad_cells_are_kept_for_the_engine() {
        let content = format!(
            "{}\nnot-a-date,abc,a,b,USDC\n2025-01-02,,c\n",
            HEADER
        );
        let rows = parse(&content).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].origin_date().is_err());
        assert!(rows[0].amount_usd().is_err());
        assert!(rows[1].amount_usd().is_err());
        assert_eq!(rows[1].to_chain(), "");
    }

    #[test]
    fn test_unicode_header_names_match_verbatim() {
        let content = format!(
            "{},{}\n2025-01-01,1,a,b,USDC,Market Maker Bot\n",
            HEADER,
            columns::MARKET_MAKER_INITIATOR
        );
        let rows = parse(&content).unwrap();

        assert_eq!(
            rows[0].get(columns::MARKET_MAKER_INITIATOR),
            Some(columns::MARKET_MAKER_BOT)
        );
    }

    #[test]
    fn test_missing_columns_are_reported_in_order() {
        let parser = CsvParser::new().with_expected_columns(["extra"]);
        let headers =
            StringRecord::from(vec!["origin_timestamp", "from_chain_name"]);

        assert_eq!(
            parser.missing_columns(&headers),
            vec![
                columns::FROM_ASSET_AMOUNT_USD,
                columns::TO_CHAIN_NAME,
                columns::FROM_ASSET_SYMBOL,
                "extra",
            ]
        );
    }

    #[test]
    fn test_missing_columns_do_not_fail_the_parse() {
        let content = "origin_timestamp,from_asset_amount_usd\n2025-01-01,7\n";
        let parser = CsvParser::new();
        let rows = parser.parse_content(content).unwrap();

        assert_eq!(rows[0].amount_usd(), Ok(7.0));
        assert_eq!(rows[0].get(columns::FROM_CHAIN_NAME), None);
    }

    #[test]
    fn test_complete_header_has_nothing_missing() {
        let headers = StringRecord::from(columns::REQUIRED.to_vec());

        assert!(CsvParser::new().missing_columns(&headers).is_empty());
    }
}
