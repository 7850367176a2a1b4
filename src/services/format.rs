//! Display formatting for numbers, money, addresses, statuses and times.
//! Output follows en-US conventions.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::auction::{AuctionStatus, RawTimestamp};
use crate::models::serde_helpers::parse_decimal;

/// Epoch values below this are seconds, at or above it milliseconds
pub const SECONDS_THRESHOLD: f64 = 10_000_000_000.0;

const MINUTE: i64 = 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;
const WEEK: i64 = DAY * 7;
const MONTH: i64 = DAY * 30;
const YEAR: i64 = DAY * 365;

/// Inserts thousands separators into a run of ASCII digits
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567.891` -> `1,234,567.891` (at most three fraction digits)
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_count(value: i64) -> String {
    format_number(Decimal::from(value))
}

/// Amount column text; non-numeric input renders as 0
pub fn format_amount(raw: &str) -> String {
    format_number(parse_decimal(raw).unwrap_or(Decimal::ZERO))
}

/// `$1,234.50`; a missing value renders as `$0.00`
pub fn format_usdt(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "$0.00".to_string();
    };

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, group_digits(int_part), frac_part)
}

/// One decimal place with a percent sign
pub fn format_percent(value: Decimal) -> String {
    format!(
        "{:.1}%",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// `0x1234...abcd`: first six and last four characters
pub fn format_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Transaction hashes use the address truncation; missing renders as `-`
pub fn format_tx_hash(hash: Option<&str>) -> String {
    match hash {
        Some(h) if !h.is_empty() => format_address(h),
        _ => "-".to_string(),
    }
}

/// `CancelledAndRefunded` reads as "Cancelled & Refunded", everything else
/// gets a space before each capital letter.
pub fn status_label(status: AuctionStatus) -> String {
    match status {
        AuctionStatus::CancelledAndRefunded => "Cancelled & Refunded".to_string(),
        other => split_camel_case(other.as_str()),
    }
}

fn split_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        if ch.is_ascii_uppercase() && !out.is_empty() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value < SECONDS_THRESHOLD {
        value * 1000.0
    } else {
        value
    };
    DateTime::from_timestamp_millis(millis as i64)
}

/// Interprets a raw timestamp. Numbers and numeric strings go through the
/// seconds/milliseconds heuristic, other strings are parsed as RFC 3339 or
/// as a naive UTC datetime. Zero and empty values are treated as absent.
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Number(n) => {
            if *n == 0.0 {
                return None;
            }
            from_epoch(*n)
        }
        RawTimestamp::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            if let Ok(n) = text.parse::<f64>() {
                return from_epoch(n);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Some(dt.with_timezone(&Utc));
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|naive| naive.and_utc())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn name(&self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

/// English relative phrase with "numeric: auto" wording
fn relative_phrase(value: i64, unit: TimeUnit) -> String {
    let special = match (value, unit) {
        (0, TimeUnit::Second) => Some("now"),
        (0, TimeUnit::Minute) => Some("this minute"),
        (0, TimeUnit::Hour) => Some("this hour"),
        (0, TimeUnit::Day) => Some("today"),
        (0, TimeUnit::Week) => Some("this week"),
        (0, TimeUnit::Month) => Some("this month"),
        (0, TimeUnit::Year) => Some("this year"),
        (-1, TimeUnit::Day) => Some("yesterday"),
        (1, TimeUnit::Day) => Some("tomorrow"),
        (-1, TimeUnit::Week) => Some("last week"),
        (1, TimeUnit::Week) => Some("next week"),
        (-1, TimeUnit::Month) => Some("last month"),
        (1, TimeUnit::Month) => Some("next month"),
        (-1, TimeUnit::Year) => Some("last year"),
        (1, TimeUnit::Year) => Some("next year"),
        _ => None,
    };
    if let Some(phrase) = special {
        return phrase.to_string();
    }

    let magnitude = value.unsigned_abs();
    let plural = if magnitude == 1 { "" } else { "s" };
    let amount = format_count(magnitude as i64);
    if value < 0 {
        format!("{} {}{} ago", amount, unit.name(), plural)
    } else {
        format!("in {} {}{}", amount, unit.name(), plural)
    }
}

/// Value to show for a difference of `diff` seconds in units of `unit_secs`
fn relative_value(diff: i64, unit_secs: i64) -> i64 {
    -diff.div_euclid(unit_secs)
}

/// Relative time ("5 minutes ago", "yesterday", "3 months ago").
/// Absent or unparseable timestamps render as `-`.
pub fn format_timestamp(raw: Option<&RawTimestamp>, now: DateTime<Utc>) -> String {
    let Some(date) = raw.and_then(parse_timestamp) else {
        return "-".to_string();
    };

    let diff = (now - date).num_seconds();
    let abs = diff.abs();

    if abs < MINUTE {
        relative_phrase(-diff, TimeUnit::Second)
    } else if abs < HOUR {
        relative_phrase(relative_value(diff, MINUTE), TimeUnit::Minute)
    } else if abs < DAY {
        relative_phrase(relative_value(diff, HOUR), TimeUnit::Hour)
    } else if abs < WEEK {
        relative_phrase(relative_value(diff, DAY), TimeUnit::Day)
    } else if abs < MONTH {
        relative_phrase(relative_value(diff, WEEK), TimeUnit::Week)
    } else if abs < YEAR {
        relative_phrase(relative_value(diff, MONTH), TimeUnit::Month)
    } else {
        relative_phrase(relative_value(diff, YEAR), TimeUnit::Year)
    }
}

/// Like `format_timestamp` up to a week, then a calendar date (`M/D/YYYY`)
pub fn format_timestamp_compact(raw: Option<&RawTimestamp>, now: DateTime<Utc>) -> String {
    let Some(date) = raw.and_then(parse_timestamp) else {
        return "-".to_string();
    };

    if (now - date).num_seconds().abs() < WEEK {
        format_timestamp(raw, now)
    } else {
        date.format("%-m/%-d/%Y").to_string()
    }
}
