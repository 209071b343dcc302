//! List view services

pub mod dashboard;
pub mod export;
pub mod filter;
pub mod join_index;
pub mod log_viewer;
pub mod navigation;
pub mod paginator;
pub mod record_source;
pub mod user_table;

pub use dashboard::{bar_chart, load_dashboard, Bar, DashboardSnapshot, StatCard};
pub use export::{export_file_name, logs_to_csv, CsvExport, LOG_CSV_HEADER};
pub use filter::{
    log_pipeline, sort_newest_first, user_pipeline, FilterPipeline, LogFilterCriteria,
};
pub use join_index::JoinIndex;
pub use log_viewer::{LoadState, LogViewer};
pub use navigation::{visible_screens, Screen};
pub use paginator::{Page, PageWindow};
pub use record_source::{endpoints, ApiClient, Credential, RecordSource};
pub use user_table::{EditDraft, UserTable};
