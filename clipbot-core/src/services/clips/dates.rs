// File: clipbot-core/src/services/clips/dates.rs

use std::ops::Range;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::Error;
use crate::utils::time::{date_to_utc, start_of_day};

/// `YYYY-MM-DD` with a 1xxx/2xxx year, month 01-12 and day 01-31. Day-of-month
/// validity is left to calendar parsing.
static ABSOLUTE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[12][0-9]{3}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])")
        .expect("absolute date pattern is valid")
});

/// `<N>d`, `<N>m` or `<N>y` as a standalone token.
static RELATIVE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+)([dmy])\b").expect("relative date pattern is valid"));

/// Unit of a relative date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Days,
    Months,
    Years,
}

impl RelativeUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "d" => Some(Self::Days),
            "m" => Some(Self::Months),
            "y" => Some(Self::Years),
            _ => None,
        }
    }
}

/// Time bounds recognized in a piece of text, plus the text with the
/// recognized date expressions cut out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDates {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub residual: String,
}

/// Recognize date expressions anywhere in `text`.
///
/// Absolute dates win: one date sets only the start, two dates set start and
/// end in order of appearance. Relative shorthand is only looked at when no
/// absolute date was found, and resolves against `now` truncated to the day.
pub fn resolve_dates(text: &str, now: DateTime<Utc>) -> Result<ResolvedDates, Error> {
    if let Some(resolved) = resolve_absolute(text)? {
        return Ok(resolved);
    }
    if let Some(resolved) = resolve_relative(text, now)? {
        return Ok(resolved);
    }
    Ok(ResolvedDates {
        residual: text.to_string(),
        ..Default::default()
    })
}

fn resolve_absolute(text: &str) -> Result<Option<ResolvedDates>, Error> {
    let matches: Vec<_> = ABSOLUTE_DATE.find_iter(text).take(2).collect();
    if matches.is_empty() {
        return Ok(None);
    }

    let mut bounds = Vec::with_capacity(matches.len());
    for m in &matches {
        let date = NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d")
            .map_err(|e| Error::DateParse(format!("'{}' is not a calendar date: {}", m.as_str(), e)))?;
        bounds.push(date_to_utc(date));
    }

    let started_at = bounds.first().copied();
    let ended_at = bounds.get(1).copied();
    if let (Some(start), Some(end)) = (started_at, ended_at) {
        if start > end {
            return Err(Error::DateParse(format!(
                "start date {} is after end date {}",
                matches[0].as_str(),
                matches[1].as_str()
            )));
        }
    }

    let ranges: Vec<Range<usize>> = matches.iter().map(|m| m.range()).collect();
    debug!("absolute dates {:?} => start={:?} end={:?}", ranges, started_at, ended_at);

    Ok(Some(ResolvedDates {
        started_at,
        ended_at,
        residual: cut_ranges(text, &ranges),
    }))
}

fn resolve_relative(text: &str, now: DateTime<Utc>) -> Result<Option<ResolvedDates>, Error> {
    let Some(caps) = RELATIVE_DATE.captures(text) else {
        return Ok(None);
    };
    let (Some(whole), Some(amount), Some(suffix)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return Ok(None);
    };
    let Some(unit) = RelativeUnit::from_suffix(suffix.as_str()) else {
        return Ok(None);
    };
    let amount: u32 = amount
        .as_str()
        .parse()
        .map_err(|e| Error::DateParse(format!("'{}' is out of range: {}", whole.as_str(), e)))?;

    let ended_at = start_of_day(now);
    let started_at = subtract(ended_at, amount, unit).ok_or_else(|| {
        Error::DateParse(format!("'{}' reaches too far back", whole.as_str()))
    })?;
    debug!("relative date '{}' => start={} end={}", whole.as_str(), started_at, ended_at);

    Ok(Some(ResolvedDates {
        started_at: Some(started_at),
        ended_at: Some(ended_at),
        residual: cut_ranges(text, &[whole.range()]),
    }))
}

/// `from` minus `amount` units, or `None` when out of chrono's range.
pub fn subtract(from: DateTime<Utc>, amount: u32, unit: RelativeUnit) -> Option<DateTime<Utc>> {
    match unit {
        RelativeUnit::Days => from.checked_sub_days(Days::new(u64::from(amount))),
        RelativeUnit::Months => from.checked_sub_months(Months::new(amount)),
        RelativeUnit::Years => from.checked_sub_months(Months::new(amount.checked_mul(12)?)),
    }
}

/// Remove non-overlapping, ascending byte ranges from `text`.
fn cut_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for range in ranges {
        out.push_str(&text[pos..range.start]);
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}
