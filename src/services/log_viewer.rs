//! Activity log viewer
//!
//! Holds the last fetched log and user directory, the filter criteria and the page
//! window. Filtering, sorting and paging are recomputed from those on every read.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{ActionKind, LogEntry, UserRecord};
use crate::services::export::CsvExport;
use crate::services::filter::{log_pipeline, sort_newest_first, LogFilterCriteria};
use crate::services::join_index::JoinIndex;
use crate::services::paginator::{Page, PageWindow};
use crate::services::record_source::{Credential, RecordSource};
use crate::utils::ConsoleError;

pub const DEFAULT_LOG_PAGE_SIZE: usize = 12;

/// Load state of a list view
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(ConsoleError),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    pub fn error(&self) -> Option<&ConsoleError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogViewer {
    logs: Vec<LogEntry>,
    index: JoinIndex,
    criteria: LogFilterCriteria,
    window: PageWindow,
    state: LoadState,
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PAGE_SIZE)
    }
}

impl LogViewer {
    pub fn new(page_size: usize) -> Self {
        Self {
            logs: Vec::new(),
            index: JoinIndex::default(),
            criteria: LogFilterCriteria::default(),
            window: PageWindow::new(page_size),
            state: LoadState::Loading,
        }
    }

    /// Fetch logs and the user directory concurrently
    ///
    /// Both must succeed; on failure the previous collections are kept and the view
    /// enters its error state.
    pub async fn load<S>(&mut self, source: &S, credential: &Credential) -> &LoadState
    where
        S: RecordSource + ?Sized,
    {
        self.state = LoadState::Loading;
        let fetched = tokio::try_join!(
            source.fetch_logs(credential),
            source.fetch_users(credential)
        );

        match fetched {
            Ok((logs, users)) => self.replace_data(logs, users),
            Err(err) => {
                warn!("Failed to load activity log: {}", err);
                self.state = LoadState::Failed(err);
            }
        }
        &self.state
    }

    /// Replace both collections wholesale and rebuild the join index
    pub fn replace_data(&mut self, logs: Vec<LogEntry>, users: Vec<UserRecord>) {
        debug!("Loaded {} log entries and {} users", logs.len(), users.len());
        self.index = JoinIndex::build(&users);
        self.logs = logs;
        self.state = LoadState::Ready;
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn criteria(&self) -> &LogFilterCriteria {
        &self.criteria
    }

    pub fn index(&self) -> &JoinIndex {
        &self.index
    }

    pub fn total_entries(&self) -> usize {
        self.logs.len()
    }

    pub fn set_action(&mut self, action: Option<ActionKind>) {
        self.criteria.action = action;
        self.window.reset();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
        self.window.reset();
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.criteria.start = start;
        self.window.reset();
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        self.criteria.end = end;
        self.window.reset();
    }

    pub fn reset_filters(&mut self) {
        self.criteria.reset();
        self.window.reset();
    }

    /// Filtered entries, newest first, unpaginated
    pub fn filtered(&self) -> Vec<&LogEntry> {
        let mut entries = log_pipeline(&self.criteria, &self.index).apply(&self.logs);
        sort_newest_first(&mut entries);
        entries
    }

    pub fn page(&self) -> Page<&LogEntry> {
        self.window.paginate(self.filtered())
    }

    pub fn current_page(&self) -> usize {
        self.window.current_page(self.filtered().len())
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages(self.filtered().len())
    }

    pub fn next_page(&mut self) {
        let total = self.filtered().len();
        self.window.next(total);
    }

    pub fn previous_page(&mut self) {
        let total = self.filtered().len();
        self.window.previous(total);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.window.go_to(page);
    }

    /// Export the whole filtered collection under today's file name
    pub fn export_csv(&self) -> CsvExport {
        CsvExport::today(&self.filtered(), &self.index)
    }

    pub fn export_csv_on(&self, date: NaiveDate) -> CsvExport {
        CsvExport::new(&self.filtered(), &self.index, date)
    }

    pub fn display_name(&self, user_id: i64) -> std::borrow::Cow<'_, str> {
        self.index.display_name(user_id)
    }
}
