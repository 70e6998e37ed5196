//! Date and number formatting helpers for templates
//!
//! These are the only functions registered on the evaluator. Date formats
//! use chrono strftime patterns; number formats use a small numeral-style
//! pattern language (`0,0`, `000`, `0.00`).

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Current local time, formatted
///
/// Without a format argument, returns an RFC 3339 timestamp.
pub fn now(format: Option<&str>) -> String {
    let current = Local::now();
    match format {
        Some(fmt) => current.format(fmt).to_string(),
        None => current.to_rfc3339(),
    }
}

/// Format a date value with a chrono strftime pattern
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` and plain
/// `YYYY-MM-DD` input.
pub fn format_date(value: &str, format: &str) -> Result<String, minijinja::Error> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.format(format).to_string());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(parsed.format(format).to_string());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(parsed.format(format).to_string());
    }
    Err(minijinja::Error::new(
        minijinja::ErrorKind::InvalidOperation,
        format!("formatDate: cannot parse date '{value}'"),
    ))
}

/// Format a number with a numeral-style pattern
///
/// Supported patterns:
/// - `0,0`: thousands separators (`1,234,567`)
/// - `000`: zero-padding to the pattern width (`007`)
/// - `0.00`: fixed decimal places, combinable with the above (`1,234.50`)
pub fn format_number(value: f64, pattern: &str) -> Result<String, minijinja::Error> {
    if pattern.is_empty() || !pattern.chars().all(|c| matches!(c, '0' | ',' | '.')) {
        return Err(minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            format!("formatNumber: unsupported pattern '{pattern}'"),
        ));
    }

    let decimals = pattern.split('.').nth(1).map_or(0, str::len);
    let grouped = pattern.contains(',');
    let integer_pattern = pattern.split(['.', ',']).next().unwrap_or("");

    let negative = value < 0.0;
    let rounded = format!("{:.decimals$}", value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
        None => (rounded, None),
    };

    let mut int_part = if grouped {
        group_thousands(&int_part)
    } else if int_part.len() < integer_pattern.len() {
        format!("{:0>width$}", int_part, width = integer_pattern.len())
    } else {
        int_part
    };

    if negative {
        int_part.insert(0, '-');
    }
    match frac_part {
        Some(frac) => Ok(format!("{int_part}.{frac}")),
        None => Ok(int_part),
    }
}

/// Insert `,` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (pos, ch) in digits.chars().enumerate() {
        if pos != 0 && (pos + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_now_default_is_rfc3339() {
        let stamp = now(None);
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn test_now_with_format() {
        let year = now(Some("%Y"));
        assert_eq!(year.len(), 4);
        assert!(year.parse::<i32>().is_ok());
    }

    #[test]
    fn test_format_date_rfc3339() {
        let out = format_date("2024-03-05T10:30:00+10:00", "%Y/%m/%d").unwrap();
        assert_eq!(out, "2024/03/05");
    }

    #[test]
    fn test_format_date_plain() {
        let out = format_date("2024-03-05", "%d-%m-%Y").unwrap();
        assert_eq!(out, "05-03-2024");
    }

    #[test]
    fn test_format_date_invalid() {
        assert!(format_date("not a date", "%Y").is_err());
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(1_234_567.0, "0,0").unwrap(), "1,234,567");
        assert_eq!(format_number(123.0, "0,0").unwrap(), "123");
        assert_eq!(format_number(1000.0, "0,0").unwrap(), "1,000");
    }

    #[test]
    fn test_format_number_zero_pad() {
        assert_eq!(format_number(7.0, "000").unwrap(), "007");
        assert_eq!(format_number(1234.0, "000").unwrap(), "1234");
    }

    #[test]
    fn test_format_number_decimals() {
        assert_eq!(format_number(1234.5, "0,0.00").unwrap(), "1,234.50");
        assert_eq!(format_number(2.0, "0.0").unwrap(), "2.0");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-1234.0, "0,0").unwrap(), "-1,234");
    }

    #[test]
    fn test_format_number_bad_pattern() {
        assert!(format_number(1.0, "abc").is_err());
        assert!(format_number(1.0, "").is_err());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("12"), "12");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
