use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeekError {
    #[error(
        "Invalid week specification: {0}. \
         Use current, this, last, previous, a number of weeks ago, or YYYY-MM-DD"
    )]
    InvalidSpec(String),
    #[error("Week offset out of range: {0}")]
    OutOfRange(u32),
    #[error("Week containing {0} is outside the supported calendar")]
    OutOfCalendar(NaiveDate),
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex"))
}

/// Parses a strict `YYYY-MM-DD` date: four-digit year, no sign.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !iso_date_re().is_match(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Which week to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekSpec {
    #[default]
    Previous,
    Current,
    WeeksAgo(u32),
    Containing(NaiveDate),
}

impl FromStr for WeekSpec {
    type Err = WeekError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "last" | "previous" => return Ok(WeekSpec::Previous),
            "current" | "this" => return Ok(WeekSpec::Current),
            _ => {}
        }
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return trimmed
                .parse::<u32>()
                .map(WeekSpec::WeeksAgo)
                .map_err(|_| WeekError::InvalidSpec(value.to_string()));
        }
        parse_iso_date(trimmed)
            .map(WeekSpec::Containing)
            .ok_or_else(|| WeekError::InvalidSpec(value.to_string()))
    }
}

impl WeekSpec {
    /// Parses an optional CLI value; absent means the previous week.
    pub fn parse_optional(value: Option<&str>) -> Result<Self, WeekError> {
        match value {
            None => Ok(WeekSpec::Previous),
            Some(value) => value.parse(),
        }
    }

    pub fn reference_date(&self, today: NaiveDate) -> Result<NaiveDate, WeekError> {
        match *self {
            WeekSpec::Previous => today
                .checked_sub_days(Days::new(7))
                .ok_or(WeekError::OutOfCalendar(today)),
            WeekSpec::Current => Ok(today),
            WeekSpec::WeeksAgo(weeks) => today
                .checked_sub_days(Days::new(u64::from(weeks) * 7))
                .ok_or(WeekError::OutOfRange(weeks)),
            WeekSpec::Containing(date) => Ok(date),
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> Result<WeekRange, WeekError> {
        WeekRange::containing(self.reference_date(today)?)
    }

    pub fn describe(&self) -> String {
        match *self {
            WeekSpec::Previous | WeekSpec::WeeksAgo(1) => "previous week".to_string(),
            WeekSpec::Current | WeekSpec::WeeksAgo(0) => "current week".to_string(),
            WeekSpec::WeeksAgo(weeks) => format!("{weeks} weeks ago"),
            WeekSpec::Containing(date) => {
                format!("week containing {}", date.format("%Y-%m-%d"))
            }
        }
    }
}

/// Monday through Sunday, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
}

impl WeekRange {
    /// The week around `date`. Fails when Monday or Sunday of that week falls
    /// outside the representable calendar.
    pub fn containing(date: NaiveDate) -> Result<Self, WeekError> {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let monday = date
            .checked_sub_days(Days::new(offset))
            .ok_or(WeekError::OutOfCalendar(date))?;
        let sunday = monday
            .checked_add_days(Days::new(6))
            .ok_or(WeekError::OutOfCalendar(date))?;
        Ok(Self { monday, sunday })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.monday.iter_days().take(7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday <= date && date <= self.sunday
    }

    pub fn folder_name(&self) -> String {
        format!("Week of {}", self.monday.format("%Y-%m-%d"))
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.monday.format("%Y-%m-%d"),
            self.sunday.format("%Y-%m-%d")
        )
    }
}
