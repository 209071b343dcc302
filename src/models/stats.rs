//! Dashboard statistics models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Count split between the whole depot and the caller's own products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountPair {
    pub all: u64,
    pub mine: u64,
}

/// Low-stock count together with the threshold the API applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LowStockCount {
    pub all: u64,
    pub mine: u64,
    pub threshold: u32,
}

/// Body of `GET /stats`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub totals: CountPair,
    pub low_stock: LowStockCount,
    pub added_today: CountPair,
}

/// One point of `GET /stats/daily`, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub count_all: u64,
    pub count_mine: u64,
}
