#![forbid(unsafe_code)]

//! Recording [`TableSink`].

use flipboard_core::entries::EntriesTable;
use flipboard_runtime::TableSink;

/// What the entries view was last told to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Table(EntriesTable),
    Message(String),
}

/// Keeps every update it receives.
#[derive(Debug, Default)]
pub struct RecordingTable {
    shown: Vec<TableView>,
}

impl RecordingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> &[TableView] {
        &self.shown
    }

    pub fn last(&self) -> Option<&TableView> {
        self.shown.last()
    }

    /// Most recent table, if the view currently shows one.
    pub fn table(&self) -> Option<&EntriesTable> {
        match self.last()? {
            TableView::Table(table) => Some(table),
            TableView::Message(_) => None,
        }
    }

    /// Most recent message, if the view currently shows one.
    pub fn message(&self) -> Option<&str> {
        match self.last()? {
            TableView::Message(text) => Some(text),
            TableView::Table(_) => None,
        }
    }
}

impl TableSink for RecordingTable {
    fn show_table(&mut self, table: &EntriesTable) {
        self.shown.push(TableView::Table(table.clone()));
    }

    fn show_message(&mut self, text: &str) {
        self.shown.push(TableView::Message(text.to_owned()));
    }
}
