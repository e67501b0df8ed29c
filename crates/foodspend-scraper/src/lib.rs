pub mod browser;
pub mod error;
pub mod expand;
pub mod extract;
pub mod ingest;
pub mod page;

pub use browser::{BrowserSession, ChromeTable, ORDER_HISTORY_URL};
pub use error::ScraperError;
pub use expand::{expand_table, ExpansionOutcome, ExpansionPolicy, ExpansionReport};
pub use extract::{
    collect_orders, extract_order, extract_orders, row_cells, ExtractionSummary, RowCells,
    RowField, RowReader, RowRejection,
};
pub use ingest::{IngestClient, IngestOutcome};
pub use page::{wait_for_rows, TablePage, ROW_SELECTOR, TABLE_READY_TIMEOUT};
