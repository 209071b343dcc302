//! Input validation utilities

use chrono::NaiveDate;

use crate::utils::{ConsoleError, ConsoleResult};

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_calendar_date(input: &str) -> ConsoleResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ConsoleError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", input))
    })
}

/// Parse a 1-based page number
pub fn parse_page_number(input: &str) -> ConsoleResult<usize> {
    match input.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ConsoleError::Validation(format!(
            "Invalid page '{}', expected a number starting at 1",
            input
        ))),
    }
}

/// Parse a record identifier
pub fn parse_record_id(input: &str) -> ConsoleResult<i64> {
    input
        .trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .map_err(|_| ConsoleError::Validation(format!("Invalid record id '{}'", input)))
}

/// Whether a free-text input activates a search
pub fn is_active_query(query: &str) -> bool {
    !query.trim().is_empty()
}
