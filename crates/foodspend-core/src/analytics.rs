//! Weekly, monthly and yearly spend buckets over persisted orders.
//!
//! Order timestamps are stored as the text the source page rendered, so the
//! calendar date is re-derived here with a best-effort pattern. Records whose
//! text does not contain a `<Month> <day>, <year>` date are left out of the
//! buckets rather than treated as errors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::OrderRecord;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b").expect("valid date regex")
});

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(Period::Week),
            "month" | "monthly" => Ok(Period::Month),
            "year" | "yearly" => Ok(Period::Year),
            other => Err(format!(
                "unknown period \"{other}\"; expected week, month or year"
            )),
        }
    }
}

/// Spend aggregated over one calendar window. `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spend: Decimal,
    pub order_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_per_order: Decimal,
}

/// Extracts the calendar date from rendered order text such as
/// `"Feb 22, 2026, 10:09:13 AM"` or `"September 3 2025"`.
///
/// Returns `None` when no month-name date is present or the date does not
/// exist (e.g. `"Feb 30, 2026"`).
#[must_use]
pub fn parse_order_date(text: &str) -> Option<NaiveDate> {
    DATE_RE.captures_iter(text).find_map(|caps| {
        let month = month_number(caps.get(1)?.as_str())?;
        let day = caps.get(2)?.as_str().parse::<u32>().ok()?;
        let year = caps.get(3)?.as_str().parse::<i32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|full| lower == *full || (lower.len() == 3 && full.starts_with(&lower)))
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

/// Groups `records` into contiguous buckets of `period`.
///
/// The range runs from the bucket holding the earliest parseable order date
/// through the bucket holding `today` or the latest parseable date, whichever
/// is later, so future-dated records extend the range instead of being cut
/// off. Buckets without orders are included with zero spend. Returns an empty
/// list when no record has a parseable date.
#[must_use]
pub fn build_buckets(records: &[OrderRecord], period: Period, today: NaiveDate) -> Vec<SpendBucket> {
    let dated: Vec<(NaiveDate, Decimal)> = records
        .iter()
        .filter_map(|r| parse_order_date(&r.ordered_at_text).map(|d| (d, r.total_price)))
        .collect();

    let (Some(first), Some(last)) = (
        dated.iter().map(|(d, _)| *d).min(),
        dated.iter().map(|(d, _)| *d).max(),
    ) else {
        return Vec::new();
    };

    let mut totals: BTreeMap<NaiveDate, (Decimal, u32)> = BTreeMap::new();
    for (date, price) in &dated {
        let entry = totals
            .entry(bucket_start(*date, period))
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.checked_add(*price).unwrap_or_else(|| {
            tracing::warn!(bucket = %date, "bucket total overflowed; saturating");
            Decimal::MAX
        });
        entry.1 += 1;
    }

    let range_end = last.max(today);
    let mut buckets = Vec::new();
    let mut start = bucket_start(first, period);

    while start <= range_end {
        let Some(next) = next_bucket_start(start, period) else {
            break;
        };
        let end = next.pred_opt().unwrap_or(start);
        let (total_spend, order_count) = totals.get(&start).copied().unwrap_or_default();

        buckets.push(SpendBucket {
            label: bucket_label(start, period),
            start,
            end,
            total_spend,
            order_count,
            average_per_order: average(total_spend, order_count),
        });
        start = next;
    }

    buckets
}

fn bucket_start(date: NaiveDate, period: Period) -> NaiveDate {
    match period {
        Period::Week => date - Days::new(u64::from(date.weekday().num_days_from_monday())),
        Period::Month => date.with_day(1).unwrap_or(date),
        Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

fn next_bucket_start(start: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::Week => start.checked_add_days(Days::new(7)),
        Period::Month => start.checked_add_months(Months::new(1)),
        Period::Year => start.checked_add_months(Months::new(12)),
    }
}

fn bucket_label(start: NaiveDate, period: Period) -> String {
    match period {
        Period::Week => {
            let iso = start.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Period::Month => start.format("%Y-%m").to_string(),
        Period::Year => start.year().to_string(),
    }
}

fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}
