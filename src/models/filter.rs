//! Date filtering for crawled submissions.
//!
//! A filter answers two independent questions about a submission timestamp:
//! whether the submission should be collected, and whether it is old enough
//! that crawling can stop (status pages are ordered newest first).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{AppError, Result};
use crate::models::submission::TIMESTAMP_FORMAT;

/// Filter configuration for a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFilter {
    /// Collect everything, never stop early.
    #[default]
    None,

    /// Collect only submissions in a single month, "YYYYMM".
    Month(String),

    /// Collect submissions whose date falls in [start, end] inclusive.
    /// A missing bound is unbounded on that side.
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Build a month filter from a "YYYYMM" argument.
    pub fn month(arg: &str) -> Result<Self> {
        let valid = arg.len() == 6
            && arg.chars().all(|c| c.is_ascii_digit())
            && NaiveDate::parse_from_str(&format!("{arg}01"), "%Y%m%d").is_ok();
        if !valid {
            return Err(AppError::config(format!(
                "Month must be in YYYYMM format (e.g., 202401), got '{arg}'"
            )));
        }
        Ok(Self::Month(arg.to_string()))
    }

    /// Build a date-range filter from optional "YYMMDD" bounds.
    pub fn range(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(parse_yymmdd).transpose()?;
        let end = end.map(parse_yymmdd).transpose()?;
        Ok(Self::Range { start, end })
    }

    /// Build a filter from the CLI arguments, rejecting conflicting modes.
    pub fn from_args(
        month: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self> {
        let has_range = start_date.is_some() || end_date.is_some();
        if has_range && month.is_some() {
            return Err(AppError::config(
                "Cannot use both date range filters (--start-date, --end-date) \
                 and month filter (--month) at the same time",
            ));
        }
        if has_range {
            Self::range(start_date, end_date)
        } else if let Some(m) = month {
            Self::month(m)
        } else {
            Ok(Self::None)
        }
    }

    /// Whether a submission with this timestamp should be collected.
    ///
    /// Malformed timestamps are never collected.
    pub fn includes(&self, submission_time: &str) -> bool {
        match self {
            Self::None => true,
            Self::Month(target) => match parse_timestamp(submission_time) {
                Some(dt) => dt.format("%Y%m").to_string() == *target,
                None => false,
            },
            Self::Range { start, end } => match parse_timestamp(submission_time) {
                Some(dt) => {
                    let date = dt.date();
                    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
                }
                None => false,
            },
        }
    }

    /// Whether a submission with this timestamp is older than the filter's
    /// lower bound, meaning no later page can contain matches.
    ///
    /// Malformed timestamps never trigger a stop.
    pub fn is_before_range(&self, submission_time: &str) -> bool {
        match self {
            Self::None => false,
            Self::Month(target) => match parse_timestamp(submission_time) {
                Some(dt) => dt.format("%Y%m").to_string() < *target,
                None => false,
            },
            Self::Range { start, .. } => match (parse_timestamp(submission_time), start) {
                (Some(dt), Some(s)) => dt.date() < *s,
                _ => false,
            },
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "no filter"),
            Self::Month(m) => write!(f, "month {m}"),
            Self::Range { start, end } => match (start, end) {
                (Some(s), Some(e)) => write!(f, "from {s} to {e}"),
                (Some(s), None) => write!(f, "from {s}"),
                (None, Some(e)) => write!(f, "until {e}"),
                (None, None) => write!(f, "unbounded range"),
            },
        }
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// Parse a "YYMMDD" date, with two-digit years anchored to the 2000s.
fn parse_yymmdd(value: &str) -> Result<NaiveDate> {
    let invalid = || {
        AppError::config(format!(
            "Date must be in YYMMDD format (e.g., 240315 for Mar 15, 2024), got '{value}'"
        ))
    };

    if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = 2000 + value[0..2].parse::<i32>().map_err(|_| invalid())?;
    let month: u32 = value[2..4].parse().map_err(|_| invalid())?;
    let day: u32 = value[4..6].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
