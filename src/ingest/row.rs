use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::columns;

use super::coerce::{parse_amount, parse_timestamp, CoercionError};

/// One transfer of the export, keyed by header name.
///
/// Values are kept as written; typed access goes through the coercion
/// accessors so a bad cell only ever affects the aggregations that read it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Row {
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_owned(), value.to_owned()))
            .collect();

        Row { fields }
    }

    /// Value of `column`, `None` when the column is absent or the cell is
    /// blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn origin_date(&self) -> Result<NaiveDate, CoercionError> {
        let at = parse_timestamp(
            columns::ORIGIN_TIMESTAMP,
            self.get(columns::ORIGIN_TIMESTAMP),
        )?;
        Ok(at.date())
    }

    pub fn amount_usd(&self) -> Result<f64, CoercionError> {
        parse_amount(
            columns::FROM_ASSET_AMOUNT_USD,
            self.get(columns::FROM_ASSET_AMOUNT_USD),
        )
    }

    pub fn from_chain(&self) -> &str {
        self.get(columns::FROM_CHAIN_NAME).unwrap_or_default()
    }

    pub fn to_chain(&self) -> &str {
        self.get(columns::TO_CHAIN_NAME).unwrap_or_default()
    }

    pub fn asset_symbol(&self) -> &str {
        self.get(columns::FROM_ASSET_SYMBOL).unwrap_or_default()
    }

    /// Source chain, destination chain and asset, `None` if any is blank.
    pub fn pathway(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.get(columns::FROM_CHAIN_NAME)?,
            self.get(columns::TO_CHAIN_NAME)?,
            self.get(columns::FROM_ASSET_SYMBOL)?,
        ))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        Row { fields }
    }
}
