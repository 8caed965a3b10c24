//! Application orchestration layer for the virtual library client.

mod catalog;
mod search;
mod service;

pub use catalog::{Catalog, CatalogEvent, ViewState};
pub use search::{SearchControl, SearchOutcome};
pub use service::{
    CatalogService, LOAD_FAILED_MESSAGE, OpenPlan, books_folder, convert_and_open, load,
    pick_file_path, plan_open, remove, run_search, sync_folder, toggle_read,
};
