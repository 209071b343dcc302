//! Filter pipeline and sort stage for list views
//!
//! A pipeline is an ordered conjunction of predicates. Criteria that are not set add no
//! predicate, so an empty pipeline keeps every record.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::models::{ActionKind, LogEntry, UserRecord};
use crate::services::join_index::JoinIndex;
use crate::utils::validation::is_active_query;

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Conjunctive chain of record predicates
pub struct FilterPipeline<'a, T> {
    predicates: Vec<Predicate<'a, T>>,
}

impl<'a, T> Default for FilterPipeline<'a, T> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<'a, T> FilterPipeline<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate
    pub fn with(mut self, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, record: &T) -> bool {
        self.predicates.iter().all(|predicate| predicate(record))
    }

    /// Keep the records satisfying every predicate, in source order
    pub fn apply<'r>(&self, records: &'r [T]) -> Vec<&'r T> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// Criteria of the activity log view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilterCriteria {
    pub action: Option<ActionKind>,
    pub query: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl LogFilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.action.is_none()
            && !is_active_query(&self.query)
            && self.start.is_none()
            && self.end.is_none()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 00:00:00.000 UTC of the given day
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// 23:59:59.999 UTC of the given day
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map_or(DateTime::<Utc>::MAX_UTC, |last| Utc.from_utc_datetime(&last))
}

/// Case-insensitive substring test over a set of fields
///
/// `needle` must already be lower-cased.
pub fn text_matches<'f>(needle: &str, fields: impl IntoIterator<Item = &'f str>) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Build the log pipeline for a set of criteria
pub fn log_pipeline<'a>(
    criteria: &'a LogFilterCriteria,
    index: &'a JoinIndex,
) -> FilterPipeline<'a, LogEntry> {
    let mut pipeline = FilterPipeline::new();

    if let Some(action) = &criteria.action {
        pipeline = pipeline.with(move |entry: &LogEntry| &entry.action == action);
    }

    if is_active_query(&criteria.query) {
        let needle = criteria.query.to_lowercase();
        pipeline = pipeline.with(move |entry: &LogEntry| {
            let actor = index.display_name(entry.user_id);
            let entity_id = entry.entity_id_text();
            text_matches(
                &needle,
                [
                    actor.as_ref(),
                    entry.action.label(),
                    entry.entity.as_str(),
                    entity_id.as_str(),
                ],
            )
        });
    }

    if let Some(start) = criteria.start {
        let from = start_of_day(start);
        pipeline = pipeline.with(move |entry: &LogEntry| entry.timestamp >= from);
    }

    if let Some(end) = criteria.end {
        let until = end_of_day(end);
        pipeline = pipeline.with(move |entry: &LogEntry| entry.timestamp <= until);
    }

    pipeline
}

/// Build the admin user table pipeline: free text over username, email and role
pub fn user_pipeline(query: &str) -> FilterPipeline<'static, UserRecord> {
    let pipeline = FilterPipeline::new();
    if !is_active_query(query) {
        return pipeline;
    }

    let needle = query.to_lowercase();
    pipeline.with(move |user: &UserRecord| {
        text_matches(
            &needle,
            [user.username.as_str(), user.email.as_str(), user.role.as_str()],
        )
    })
}

/// Order log entries newest first; equal timestamps keep their relative order
pub fn sort_newest_first(entries: &mut [&LogEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
