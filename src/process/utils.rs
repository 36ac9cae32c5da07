use super::raw_table::Cell;

/// Why a cell could not be coerced; carries the rendered cell for messages.
#[derive(Debug, PartialEq)]
pub enum Coerce {
    Blank,
    Invalid(String),
}

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Text form of a key column (`regionKey`, `displayName`); `None` when blank.
///
/// Text is kept verbatim, numbers render without a trailing `.0`.
pub fn key_string(cell: &Cell) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Coerce a tier bound to `i64`. Integral floats and numeric text are accepted.
pub fn tier_value(cell: &Cell) -> Result<i64, Coerce> {
    if cell.is_blank() {
        return Err(Coerce::Blank);
    }
    let invalid = || Coerce::Invalid(cell.to_string());
    match cell {
        Cell::Int(v) => Ok(*v),
        Cell::Float(v) => integral(*v).ok_or_else(invalid),
        Cell::Text(s) => {
            let s = clean_str(s);
            match s.parse::<i64>() {
                Ok(v) => Ok(v),
                Err(_) => s.parse::<f64>().ok().and_then(integral).ok_or_else(invalid),
            }
        }
        _ => Err(invalid()),
    }
}

/// Like [`tier_value`] but a blank cell means "no upper bound".
pub fn optional_tier_value(cell: &Cell) -> Result<Option<i64>, Coerce> {
    match tier_value(cell) {
        Ok(v) => Ok(Some(v)),
        Err(Coerce::Blank) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Coerce a rate to a finite `f64`.
pub fn rate_value(cell: &Cell) -> Result<f64, Coerce> {
    if cell.is_blank() {
        return Err(Coerce::Blank);
    }
    let v = match cell {
        Cell::Int(v) => Some(*v as f64),
        Cell::Float(v) => Some(*v),
        Cell::Text(s) => clean_str(s).parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|v| v.is_finite())
        .ok_or_else(|| Coerce::Invalid(cell.to_string()))
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_str() {
        assert_eq!(clean_str("  \"R1\" "), "R1");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(" plain "), "plain");
    }

    #[test]
    fn keys() {
        assert_eq!(key_string(&Cell::from("Алматы")), Some("Алматы".into()));
        assert_eq!(key_string(&Cell::Float(7.0)), Some("7".into()));
        assert_eq!(key_string(&Cell::Int(12)), Some("12".into()));
        assert_eq!(key_string(&Cell::Empty), None);
        assert_eq!(key_string(&Cell::from(" ")), None);
        assert_eq!(key_string(&Cell::Error("#N/A".into())), None);
    }

    #[test]
    fn tiers() {
        assert_eq!(tier_value(&Cell::Int(100)), Ok(100));
        assert_eq!(tier_value(&Cell::Float(100.0)), Ok(100));
        assert_eq!(tier_value(&Cell::from(" 250 ")), Ok(250));
        assert_eq!(tier_value(&Cell::from("250.0")), Ok(250));
        assert_eq!(tier_value(&Cell::Float(1.5)), Err(Coerce::Invalid("1.5".into())));
        assert_eq!(tier_value(&Cell::from("lots")), Err(Coerce::Invalid("lots".into())));
        assert_eq!(tier_value(&Cell::Empty), Err(Coerce::Blank));

        assert_eq!(optional_tier_value(&Cell::Empty), Ok(None));
        assert_eq!(optional_tier_value(&Cell::Int(0)), Ok(Some(0)));
        assert_eq!(optional_tier_value(&Cell::Error("#N/A".into())), Ok(None));
        assert!(optional_tier_value(&Cell::Bool(false)).is_err());
    }

    #[test]
    fn rates() {
        assert_eq!(rate_value(&Cell::Float(3.5525)), Ok(3.5525));
        assert_eq!(rate_value(&Cell::Int(4)), Ok(4.0));
        assert_eq!(rate_value(&Cell::from("3.5525")), Ok(3.5525));
        assert_eq!(rate_value(&Cell::from("abc")), Err(Coerce::Invalid("abc".into())));
        assert_eq!(rate_value(&Cell::from("NaN")), Err(Coerce::Invalid("NaN".into())));
        assert_eq!(rate_value(&Cell::Empty), Err(Coerce::Blank));
    }
}
