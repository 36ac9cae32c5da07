// src/process/mod.rs
pub mod date_parser;
pub mod raw_table;
pub mod utils;

use chrono::{Datelike, Local};
use std::{collections::BTreeMap, fmt};
use tracing::{debug, info, instrument, warn};

use crate::error::TariffError;
use crate::schema::{Block, Payload, RegionPeriod};
pub use raw_table::{Cell, RawRow, RawTable};
use utils::Coerce;

/// Columns every tariff sheet must carry; anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "regionKey",
    "displayName",
    "startDate",
    "endDate",
    "tierFrom",
    "tierTo",
    "rate",
];

/// Header positions of the required columns.
struct Columns {
    region_key: usize,
    display_name: usize,
    start_date: usize,
    end_date: usize,
    tier_from: usize,
    tier_to: usize,
    rate: usize,
}

impl Columns {
    fn locate(table: &RawTable) -> Result<Self, TariffError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| table.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TariffError::MissingColumns { columns: missing });
        }

        let idx = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            region_key: idx("regionKey"),
            display_name: idx("displayName"),
            start_date: idx("startDate"),
            end_date: idx("endDate"),
            tier_from: idx("tierFrom"),
            tier_to: idx("tierTo"),
            rate: idx("rate"),
        })
    }
}

/// A fully typed input row.
#[derive(Debug, Clone)]
struct TariffRow {
    sheet_row: usize,
    end_date: Option<String>,
    tier_from: i64,
    tier_to: Option<i64>,
    rate: f64,
}

/// Optional key component; blanks form their own group and sort after every value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Value(String),
    Null,
}

impl KeyPart {
    fn into_option(self) -> Option<String> {
        match self {
            KeyPart::Value(s) => Some(s),
            KeyPart::Null => None,
        }
    }
}

impl From<Option<String>> for KeyPart {
    fn from(v: Option<String>) -> Self {
        v.map_or(KeyPart::Null, KeyPart::Value)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Value(s) => f.write_str(s),
            KeyPart::Null => f.write_str("null"),
        }
    }
}

/// Field order defines the output order of region-periods.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    region_key: KeyPart,
    start_date: String,
    display_name: KeyPart,
}

/// Lowest `tierFrom` the next tier in a group may start at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frontier {
    At(i64),
    /// An open-ended tier was seen; nothing may follow it.
    Unbounded,
}

impl Frontier {
    fn admits(self, from: i64) -> bool {
        match self {
            Frontier::At(end) => from >= end,
            Frontier::Unbounded => false,
        }
    }
}

impl fmt::Display for Frontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frontier::At(end) => write!(f, "{}", end),
            Frontier::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Turns a raw tariff sheet into a validated [`Payload`].
#[derive(Debug, Clone)]
pub struct TariffConverter {
    version_year: i32,
}

impl Default for TariffConverter {
    fn default() -> Self {
        Self {
            version_year: Local::now().year(),
        }
    }
}

impl TariffConverter {
    /// Converter stamping payloads with the current calendar year.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version_year(mut self, year: i32) -> Self {
        self.version_year = year;
        self
    }

    pub fn version_year(&self) -> i32 {
        self.version_year
    }

    /// Validate, normalize and group `table` into region-periods.
    ///
    /// - every required column must be present, checked before any row
    /// - `startDate`/`endDate` normalize to `YYYY-MM-DD`; `startDate` may not be blank
    /// - tiers are integers, `tierTo` blank means unbounded; rates are numbers > 0
    /// - rows group by `(regionKey, startDate, displayName)`, groups come out sorted
    /// - within a group tiers sort by `(tierFrom, tierTo)` and may not overlap
    #[instrument(level = "info", skip_all, fields(rows = table.rows.len()))]
    pub fn convert(&self, table: &RawTable) -> Result<Payload, TariffError> {
        // 1) required columns
        let cols = Columns::locate(table)?;

        // 2) dates, column by column
        let start_dates = normalize_dates(table, cols.start_date, "startDate")?;
        let end_dates = normalize_dates(table, cols.end_date, "endDate")?;
        let blank: Vec<usize> = table
            .rows
            .iter()
            .zip(&start_dates)
            .filter(|(_, d)| d.is_none())
            .map(|(r, _)| r.number)
            .collect();
        if !blank.is_empty() {
            return Err(TariffError::BlankStartDate { rows: blank });
        }

        // 3) tiers and rates
        let tier_froms = column_values(table, cols.tier_from, |cell, row| {
            utils::tier_value(cell).map_err(|e| tier_error("tierFrom", row, cell, e))
        })?;
        let tier_tos = column_values(table, cols.tier_to, |cell, row| {
            utils::optional_tier_value(cell).map_err(|e| tier_error("tierTo", row, cell, e))
        })?;
        let rates = column_values(table, cols.rate, |cell, row| {
            utils::rate_value(cell).map_err(|e| TariffError::InvalidRateType {
                row,
                value: rendered(cell, e),
            })
        })?;
        let non_positive = table.rows.iter().zip(&rates).find(|(_, &rate)| rate <= 0.0);
        if let Some((r, &rate)) = non_positive {
            return Err(TariffError::NonPositiveRate {
                row: r.number,
                rate,
            });
        }

        // 4) group, keeping sheet order inside each group
        let mut groups: BTreeMap<GroupKey, Vec<TariffRow>> = BTreeMap::new();
        for (i, raw) in table.rows.iter().enumerate() {
            let key = GroupKey {
                region_key: utils::key_string(&raw.cells[cols.region_key]).into(),
                start_date: start_dates[i].clone().unwrap_or_default(),
                display_name: utils::key_string(&raw.cells[cols.display_name]).into(),
            };
            groups.entry(key).or_default().push(TariffRow {
                sheet_row: raw.number,
                end_date: end_dates[i].clone(),
                tier_from: tier_froms[i],
                tier_to: tier_tos[i],
                rate: rates[i],
            });
        }
        debug!(groups = groups.len(), "grouped rows");

        // 5) one region-period per group
        let mut regions = Vec::with_capacity(groups.len());
        for (key, rows) in groups {
            regions.push(build_region_period(key, rows)?);
        }

        info!(regions = regions.len(), "converted tariff table");
        Ok(Payload {
            version_year: self.version_year,
            regions,
        })
    }
}

fn build_region_period(
    key: GroupKey,
    mut rows: Vec<TariffRow>,
) -> Result<RegionPeriod, TariffError> {
    let end_date = resolve_end_date(&key, &rows);

    // stable: equal tiers keep sheet order, unbounded sorts after any bound
    rows.sort_by_key(|r| (r.tier_from, r.tier_to.is_none(), r.tier_to));

    let mut frontier = Frontier::At(0);
    for row in &rows {
        if let Some(to) = row.tier_to {
            if to < row.tier_from {
                return Err(TariffError::InvalidTierRange {
                    region_key: key.region_key.to_string(),
                    start_date: key.start_date.clone(),
                    tier_from: row.tier_from,
                    tier_to: to,
                });
            }
        }
        if !frontier.admits(row.tier_from) {
            return Err(TariffError::OverlappingTier {
                region_key: key.region_key.to_string(),
                start_date: key.start_date.clone(),
                tier_from: row.tier_from,
                previous_end: frontier.to_string(),
            });
        }
        frontier = row.tier_to.map_or(Frontier::Unbounded, Frontier::At);
    }

    let blocks = rows
        .iter()
        .map(|r| Block {
            from: r.tier_from,
            to: r.tier_to,
            rate: r.rate,
        })
        .collect();

    Ok(RegionPeriod {
        region_key: key.region_key.into_option(),
        display_name: key.display_name.into_option(),
        start_date: key.start_date,
        end_date,
        blocks,
    })
}

/// First non-blank `endDate` in sheet order wins; later disagreeing values are only logged.
fn resolve_end_date(key: &GroupKey, rows: &[TariffRow]) -> Option<String> {
    let mut dated = rows.iter().filter_map(|r| r.end_date.as_ref().map(|d| (r, d)));
    let (_, first) = dated.next()?;
    for (row, other) in dated.filter(|(_, d)| *d != first) {
        warn!(
            region = %key.region_key,
            start_date = %key.start_date,
            row = row.sheet_row,
            kept = %first,
            ignored = %other,
            "conflicting endDate in region-period"
        );
    }
    Some(first.clone())
}

fn normalize_dates(
    table: &RawTable,
    col: usize,
    column: &'static str,
) -> Result<Vec<Option<String>>, TariffError> {
    column_values(table, col, |cell, row| {
        date_parser::normalize_date(cell).map_err(|value| TariffError::DateParse {
            column,
            row,
            value,
        })
    })
}

/// Apply `f` to every cell of column `col`, stopping at the first error.
fn column_values<T, F>(table: &RawTable, col: usize, f: F) -> Result<Vec<T>, TariffError>
where
    F: Fn(&Cell, usize) -> Result<T, TariffError>,
{
    table
        .rows
        .iter()
        .map(|raw| f(&raw.cells[col], raw.number))
        .collect()
}

fn tier_error(column: &'static str, row: usize, cell: &Cell, e: Coerce) -> TariffError {
    TariffError::InvalidTierType {
        column,
        row,
        value: rendered(cell, e),
    }
}

/// Text for error messages; blank cells show as they are (`#N/A` stays visible).
fn rendered(cell: &Cell, e: Coerce) -> String {
    match e {
        Coerce::Blank => cell.to_string(),
        Coerce::Invalid(v) => v,
    }
}
