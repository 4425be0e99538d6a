// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types for parsed tables and their sort state
// No I/O, no async

mod sort_state;
mod table;

pub use sort_state::{reduce, SortEvent, SortState};
pub use table::{Row, Table};
