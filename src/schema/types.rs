// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// A single consumption tier: `[from, to)` at `rate`, `to = None` meaning unbounded.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Block {
    pub from: i64,
    pub to: Option<i64>,
    pub rate: f64,
}

/// One tariff schedule for a region over a validity window.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegionPeriod {
    pub region_key: Option<String>,
    pub display_name: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    /// Ordered by `from`, contiguous or gapped but never overlapping.
    pub blocks: Vec<Block>,
}

/// The complete output document.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub version_year: i32,
    pub regions: Vec<RegionPeriod>,
}
