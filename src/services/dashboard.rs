//! Dashboard aggregation

use tracing::debug;

use crate::models::{DailyStat, StatsSummary};
use crate::services::record_source::{Credential, RecordSource};
use crate::utils::ConsoleResult;

/// Both dashboard documents
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: StatsSummary,
    pub daily: Vec<DailyStat>,
}

/// Fetch summary and daily series concurrently; either failure fails the load
pub async fn load_dashboard<S>(
    source: &S,
    credential: &Credential,
    threshold: u32,
    days: u32,
) -> ConsoleResult<DashboardSnapshot>
where
    S: RecordSource + ?Sized,
{
    let (stats, daily) = tokio::try_join!(
        source.fetch_stats(credential, threshold),
        source.fetch_daily_stats(credential, days)
    )?;
    debug!("Loaded dashboard with {} daily points", daily.len());
    Ok(DashboardSnapshot { stats, daily })
}

/// One column of the daily chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: chrono::NaiveDate,
    /// `MM-DD`
    pub label: String,
    pub count: u64,
    /// Height relative to the tallest bar, 0 to 100
    pub height_pct: f64,
}

/// Normalize the daily series against its maximum (floor 1)
pub fn bar_chart(daily: &[DailyStat]) -> Vec<Bar> {
    let max = daily
        .iter()
        .map(|point| point.count_all)
        .max()
        .unwrap_or(0)
        .max(1);

    daily
        .iter()
        .map(|point| Bar {
            date: point.date,
            label: point.date.format("%m-%d").to_string(),
            count: point.count_all,
            height_pct: point.count_all as f64 / max as f64 * 100.0,
        })
        .collect()
}

/// Summary card shown above the chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub all: u64,
    pub mine: u64,
}

impl DashboardSnapshot {
    pub fn cards(&self) -> Vec<StatCard> {
        let stats = &self.stats;
        vec![
            StatCard {
                title: "Total products".to_string(),
                all: stats.totals.all,
                mine: stats.totals.mine,
            },
            StatCard {
                title: format!("Low stock (< {})", stats.low_stock.threshold),
                all: stats.low_stock.all,
                mine: stats.low_stock.mine,
            },
            StatCard {
                title: "Added today".to_string(),
                all: stats.added_today.all,
                mine: stats.added_today.mine,
            },
        ]
    }

    pub fn bars(&self) -> Vec<Bar> {
        bar_chart(&self.daily)
    }
}
