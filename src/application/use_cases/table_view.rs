// ============================================================
// TABLE VIEW USE CASE
// ============================================================
// Load a CSV resource once, then answer sort clicks from memory

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::use_cases::sort_engine::sort_rows;
use crate::domain::csv::{reduce, Row, SortEvent, SortState, Table};
use crate::domain::error::Result;
use crate::domain::manifest::{basename, validate_file_name};
use crate::infrastructure::csv::{decode_bytes, parse_table};
use crate::infrastructure::fetchers::ResourceFetcher;

/// Everything needed to render one table page: the parsed file and its
/// current sort state
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub file_name: String,
    /// Stem of the generated page, `poe` for `data/poe.csv` unless the
    /// manifest had to disambiguate it
    pub page_stem: String,
    pub table: Table,
    pub sort: SortState,
}

impl TableView {
    /// A freshly loaded table always starts unsorted
    pub fn new(file_name: impl Into<String>, table: Table) -> Self {
        let file_name = file_name.into();
        let page_stem = basename(&file_name);
        Self {
            file_name,
            page_stem,
            table,
            sort: reduce(SortState::default(), SortEvent::Load),
        }
    }

    pub fn with_page_stem(mut self, page_stem: impl Into<String>) -> Self {
        self.page_stem = page_stem.into();
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    pub fn apply(&mut self, event: SortEvent) {
        self.sort = reduce(self.sort, event);
    }

    /// State the view would be in after clicking `column_index`
    pub fn next_sort(&self, column_index: usize) -> SortState {
        reduce(self.sort, SortEvent::Click(column_index))
    }

    /// Rows in the order they are shown. The parsed table is never reordered.
    pub fn display_rows(&self) -> Vec<Row> {
        match self.sort.column_index {
            Some(column_index) => sort_rows(&self.table.rows, column_index, self.sort.ascending),
            None => self.table.rows.clone(),
        }
    }
}

/// Fetches and parses CSV resources
pub struct TableLoader {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl TableLoader {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `file_name` and parse it into an unsorted view.
    /// Invalid names fail before anything is fetched.
    pub async fn load(&self, file_name: &str) -> Result<TableView> {
        validate_file_name(file_name).map_err(|err| {
            error!(error = %err, "Invalid CSV file name");
            err
        })?;

        let location = self.fetcher.locate(file_name);
        info!(resource = %location, "Loading CSV file");

        let bytes = self.fetcher.fetch_bytes(file_name).await.map_err(|err| {
            error!(error = %err, resource = %location, "Error loading CSV file");
            err
        })?;

        let table = parse_table(&decode_bytes(&bytes));
        if table.is_empty() {
            warn!(resource = %location, "CSV file is empty");
        }
        info!(
            resource = %location,
            columns = table.column_count(),
            rows = table.rows.len(),
            "Parsed CSV file"
        );

        Ok(TableView::new(file_name, table))
    }
}
