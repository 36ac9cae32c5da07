// src/error.rs

use thiserror::Error;

/// Validation failures raised while turning a tariff sheet into a payload.
///
/// Row numbers are 1-based spreadsheet rows, the header being row 1.
#[derive(Debug, Error, PartialEq)]
pub enum TariffError {
    #[error("missing column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("could not parse {column} {value:?} on row {row} as a date")]
    DateParse {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("found blank startDate values on row(s) {}", join_rows(.rows))]
    BlankStartDate { rows: Vec<usize> },

    #[error("column '{column}' must be an integer, row {row} has {value:?}")]
    InvalidTierType {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("column 'rate' must be numeric (e.g., 3.5525), row {row} has {value:?}")]
    InvalidRateType { row: usize, value: String },

    #[error("all rates must be > 0, row {row} has {rate}")]
    NonPositiveRate { row: usize, rate: f64 },

    #[error("bad tier in {region_key} {start_date}: tierTo {tier_to} < tierFrom {tier_from}")]
    InvalidTierRange {
        region_key: String,
        start_date: String,
        tier_from: i64,
        tier_to: i64,
    },

    #[error(
        "overlapping tiers in {region_key} {start_date}: tierFrom {tier_from} < previous end {previous_end}"
    )]
    OverlappingTier {
        region_key: String,
        start_date: String,
        tier_from: i64,
        previous_end: String,
    },
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
