use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::raw_table::Cell;

/// Formats tried, in order, for date-only text.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d.%m.%Y", "%m/%d/%Y", "%Y%m%d",
    // month names, short or long: "Jan 5 2024", "5 January 2024", "January 5, 2024"
    "%B %d %Y", "%d %B %Y", "%B %d, %Y",
];

/// Formats tried for text carrying a time of day.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse free-form date text into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches('"');

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // fractional seconds are tolerated and dropped
    let base = match s.rfind(':') {
        Some(colon) => s[colon..].find('.').map_or(s, |dot| &s[..colon + dot]),
        None => s,
    };
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(base, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Normalize a date cell to `YYYY-MM-DD`.
///
/// `Ok(None)` for blank cells, `Err(text)` with the rendered cell when it
/// cannot be read as a date.
pub fn normalize_date(cell: &Cell) -> Result<Option<String>, String> {
    if cell.is_blank() {
        return Ok(None);
    }
    let date = match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date(s),
        Cell::Int(_) | Cell::Float(_) => parse_date(&cell.to_string()),
        _ => None,
    };
    date.map(|d| Some(d.format("%Y-%m-%d").to_string()))
        .ok_or_else(|| cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        assert_eq!(parse_date("2024-01-31"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024/01/31"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("31.01.2024"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("01/31/2024"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("20240131"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date(" 2024-01-31 00:00:00 "), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31T13:45"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31 13:45:10.250"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31T23:30:00+06:00"), Some(ymd(2024, 1, 31)));
    }

    #[test]
    fn parses_month_names() {
        assert_eq!(parse_date("Jan 5 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("5 January 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("January 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05 dec 2023"), Some(ymd(2023, 12, 5)));
        assert_eq!(parse_date("Smarch 5 2024"), None);
    }

    #[test]
    fn month_first_for_ambiguous_slashes() {
        assert_eq!(parse_date("02/03/2024"), Some(ymd(2024, 2, 3)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("31.02.2024"), None);
    }

    #[test]
    fn normalize_cells() {
        let dt = ymd(2023, 7, 1).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(normalize_date(&Cell::DateTime(dt)), Ok(Some("2023-07-01".into())));
        assert_eq!(normalize_date(&Cell::Empty), Ok(None));
        assert_eq!(normalize_date(&Cell::from("  ")), Ok(None));
        assert_eq!(normalize_date(&Cell::Error("#N/A".into())), Ok(None));
        assert_eq!(normalize_date(&Cell::from("01.07.2023")), Ok(Some("2023-07-01".into())));
        assert_eq!(normalize_date(&Cell::Int(20230701)), Ok(Some("2023-07-01".into())));
        assert_eq!(normalize_date(&Cell::from("n/a")), Err("n/a".into()));
        assert_eq!(normalize_date(&Cell::Bool(true)), Err("true".into()));
    }
}
