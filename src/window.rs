//! Time window selection for the `fetch` command.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::discord::normalize::parse_timestamp;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("range must be start,end or start..end")]
    RangeShape,

    #[error("invalid {which} timestamp '{value}' (expected RFC 3339)")]
    Timestamp { which: &'static str, value: String },

    #[error("range start must not be after end")]
    Inverted,

    #[error("days/hours window must be positive")]
    NotPositive,

    #[error("days/hours window is too large")]
    TooLarge,
}

/// Inclusive time bounds; `None` leaves a side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// The whole history.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse `start,end` or `start..end`.
    pub fn parse_range(value: &str) -> Result<Self, WindowError> {
        let value = value.trim();
        let (start, end) = value
            .split_once("..")
            .or_else(|| value.split_once(','))
            .ok_or(WindowError::RangeShape)?;
        if end.contains(',') || end.contains("..") {
            return Err(WindowError::RangeShape);
        }

        let since = parse_bound("start", start)?;
        let until = parse_bound("end", end)?;
        if since > until {
            return Err(WindowError::Inverted);
        }
        Ok(Self {
            since: Some(since),
            until: Some(until),
        })
    }

    /// Window covering the last `days` days plus `hours` hours before `now`.
    pub fn relative(days: u32, hours: u32, now: DateTime<Utc>) -> Result<Self, WindowError> {
        let total_hours = i64::from(days) * 24 + i64::from(hours);
        if total_hours <= 0 {
            return Err(WindowError::NotPositive);
        }
        let span = Duration::try_hours(total_hours).ok_or(WindowError::TooLarge)?;
        let since = now.checked_sub_signed(span).ok_or(WindowError::TooLarge)?;
        Ok(Self {
            since: Some(since),
            until: None,
        })
    }
}

fn parse_bound(which: &'static str, value: &str) -> Result<DateTime<Utc>, WindowError> {
    parse_timestamp(value).ok_or_else(|| WindowError::Timestamp {
        which,
        value: value.trim().to_string(),
    })
}
