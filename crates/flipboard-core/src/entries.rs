#![forbid(unsafe_code)]

//! Historical point-award entries and their table rows.
//!
//! The entries endpoint returns a JSON array of records with `Date`,
//! `House`, `Event`, `Description` and `Points` fields. This module decodes
//! them leniently, applies the optional house filter, and produces labelled
//! table rows. Drawing the table is left to the host.
//!
//! # Formatting
//!
//! - Dates containing the sentinel, or that do not parse, pass through
//!   unchanged. Parsed dates render as `Mar 5, 2025`.
//! - Points that are missing, `null` or the sentinel render as the sentinel.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Column headers, in display order.
pub const COLUMNS: [&str; 5] = ["Date", "House", "Event", "Description", "Points"];

const DATE_FORMAT: &str = "%b %-d, %Y";

/// Which slice of history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryQuery {
    /// The most recent `count` entries.
    Recent { count: u32 },
    /// Every entry.
    All,
}

impl EntryQuery {
    /// Query string appended to the endpoint URL, including the `?`.
    pub fn query_string(&self) -> String {
        match self {
            Self::Recent { count } => format!("?x={count}"),
            Self::All => "?all=true".to_owned(),
        }
    }
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self::Recent { count: 8 }
    }
}

/// One historical entry as sent by the data source.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EntryRecord {
    #[serde(rename = "Date", default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(rename = "House", default, deserialize_with = "lenient_text")]
    pub house: String,
    #[serde(rename = "Event", default, deserialize_with = "lenient_text")]
    pub event: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "Points", default)]
    pub points: Option<Value>,
}

/// Accept strings, numbers, booleans and null as display text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Format a raw date cell.
pub fn format_date(raw: &str, sentinel: &str) -> String {
    if raw.contains(sentinel) {
        return raw.to_owned();
    }
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().format(DATE_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format(DATE_FORMAT).to_string();
    }
    raw.to_owned()
}

/// Format a raw points cell.
pub fn format_points(raw: Option<&Value>, sentinel: &str) -> String {
    match raw {
        None | Some(Value::Null) => sentinel.to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Case-insensitive substring filter on the `House` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseFilter(String);

impl HouseFilter {
    /// Build a filter; blank text yields `None`.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        (!text.is_empty()).then(|| Self(text.to_uppercase()))
    }

    pub fn matches(&self, record: &EntryRecord) -> bool {
        record.house.to_uppercase().contains(&self.0)
    }
}

/// A labelled table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub label: &'static str,
    pub text: String,
}

/// A row of five cells in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: [TableCell; 5],
}

impl TableRow {
    fn from_record(record: &EntryRecord, sentinel: &str) -> Self {
        let [date, house, event, description, points] = COLUMNS;
        Self {
            cells: [
                TableCell {
                    label: date,
                    text: format_date(&record.date, sentinel),
                },
                TableCell {
                    label: house,
                    text: record.house.clone(),
                },
                TableCell {
                    label: event,
                    text: record.event.clone(),
                },
                TableCell {
                    label: description,
                    text: record.description.clone(),
                },
                TableCell {
                    label: points,
                    text: format_points(record.points.as_ref(), sentinel),
                },
            ],
        }
    }

    /// Cell texts in column order.
    pub fn texts(&self) -> [&str; 5] {
        let [a, b, c, d, e] = &self.cells;
        [
            a.text.as_str(),
            b.text.as_str(),
            c.text.as_str(),
            d.text.as_str(),
            e.text.as_str(),
        ]
    }
}

/// Rows ready for a table renderer, in payload order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntriesTable {
    pub rows: Vec<TableRow>,
}

impl EntriesTable {
    pub fn build(records: &[EntryRecord], filter: Option<&HouseFilter>, sentinel: &str) -> Self {
        let rows = records
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(r)))
            .map(|r| TableRow::from_record(r, sentinel))
            .collect();
        Self { rows }
    }

    /// Decode a raw payload; anything but an array of records is an error.
    pub fn decode(payload: Value) -> Result<Vec<EntryRecord>, serde_json::Error> {
        serde_json::from_value(payload)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
