// Utility helpers for parsing and basic statistics.
//
// This module centralizes the "dirty" string/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::{Months, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_usize_safe(s: Option<&str>) -> Option<usize> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<usize>().ok()
}

/// Parse the date portion of a review timestamp.
///
/// Review dates come either as plain `YYYY-MM-DD` or as a full ISO timestamp
/// like `2016-10-09T00:00:00.000Z`; only the first ten characters matter.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Trim a raw CSV cell, mapping blank cells to `None`.
pub fn clean_string(s: Option<String>) -> Option<String> {
    let s = s?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Arithmetic mean, `None` when there is nothing to average.
///
/// Summary consumers must be able to tell "no data" apart from an actual
/// zero, so this never substitutes a default.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// The `YYYY-MM` month `months` before `date`, for the shell's time-period
/// presets.
pub fn month_before(date: NaiveDate, months: u32) -> String {
    let shifted = date
        .checked_sub_months(Months::new(months))
        .unwrap_or(date);
    shifted.format("%Y-%m").to_string()
}

pub fn year_month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages (e.g., `9,855 reviews loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_safe_handles_common_junk() {
        assert_eq!(parse_f64_safe(Some("4")), Some(4.0));
        assert_eq!(parse_f64_safe(Some(" 4.5 ")), Some(4.5));
        assert_eq!(parse_f64_safe(Some("1,234.5")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("five")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_date_safe_accepts_iso_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2016, 10, 9).unwrap();
        assert_eq!(parse_date_safe(Some("2016-10-09")), Some(expected));
        assert_eq!(parse_date_safe(Some("2016-10-09T00:00:00.000Z")), Some(expected));
        assert_eq!(parse_date_safe(Some("not a date")), None);
    }

    #[test]
    fn mean_is_absent_for_empty_input() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn month_before_steps_over_year_boundaries() {
        let date = NaiveDate::from_ymd_opt(2017, 1, 15).unwrap();
        assert_eq!(month_before(date, 6), "2016-07");
        assert_eq!(month_before(date, 12), "2016-01");
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 2), "-42.00");
        assert_eq!(format_number(3.0, 0), "3");
    }
}
