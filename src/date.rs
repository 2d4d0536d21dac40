//! Order-date normalization for the heatmap's year axis.
//!
//! Accepts `day/month/year` and `day-month-year`, plus the ISO ordering
//! `year-month-day` (or `year/month/day`) when the first component has four
//! digits. Impossible dates and two-digit years are rejected rather than
//! rolled over or guessed.

use crate::error::MalformedDateError;
use chrono::{Datelike, NaiveDate};

/// Parses an order date into a calendar date.
pub fn parse_order_date(input: &str) -> Result<NaiveDate, MalformedDateError> {
    let trimmed = input.trim();

    let delimiter = if trimmed.contains('/') {
        '/'
    } else if trimmed.contains('-') {
        '-'
    } else {
        return Err(MalformedDateError::new(input, "expected '/' or '-' delimiter"));
    };

    let parts: Vec<&str> = trimmed.split(delimiter).collect();
    let [first, second, third] = parts.as_slice() else {
        return Err(MalformedDateError::new(
            input,
            format!("expected three components, found {}", parts.len()),
        ));
    };

    let (year, month, day) = if first.len() == 4 {
        (*first, *second, *third)
    } else {
        (*third, *second, *first)
    };
    if year.len() != 4 {
        return Err(MalformedDateError::new(
            input,
            format!("year '{year}' must have four digits"),
        ));
    }

    let year: i32 = parse_component(input, year, "year")?;
    let month: u32 = parse_component(input, month, "month")?;
    let day: u32 = parse_component(input, day, "day")?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        MalformedDateError::new(
            input,
            format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
        )
    })
}

/// Parses an order date and returns only its year.
pub fn order_year(input: &str) -> Result<i32, MalformedDateError> {
    parse_order_date(input).map(|date| date.year())
}

fn parse_component<T: std::str::FromStr>(
    input: &str,
    component: &str,
    name: &str,
) -> Result<T, MalformedDateError> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedDateError::new(
            input,
            format!("{name} '{component}' is not a number"),
        ));
    }
    component
        .parse()
        .map_err(|_| MalformedDateError::new(input, format!("{name} '{component}' is out of range")))
}
