use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// `%b` also accepts full month names.
const DATE_FORMATS: [&str; 3] = ["%b %d %Y", "%b %d, %Y", "%d %b %Y"];

/// Correction for the one post dated on the last day of the year before the
/// default year. The dump omits the year only for current-year posts, so that
/// post's inferred year is one too high.
///
/// Only dates whose year was filled in are eligible; a post that already
/// reads `Dec 31 <default-year>` keeps its explicit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearEndRollback {
    month: u32,
    day: u32,
}

impl Default for YearEndRollback {
    fn default() -> Self {
        Self { month: 12, day: 31 }
    }
}

impl YearEndRollback {
    /// Returns the corrected date when `date` carries an inferred
    /// `default_year` and falls on the rollback day.
    pub fn apply(&self, date: NaiveDate, default_year: i32) -> Option<NaiveDate> {
        if date.year() != default_year || date.month() != self.month || date.day() != self.day {
            return None;
        }
        NaiveDate::from_ymd_opt(default_year - 1, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairedDate {
    pub date: NaiveDate,
    pub year_inferred: bool,
    pub rolled_back: bool,
}

#[derive(Debug)]
pub struct DateRepair {
    default_year: i32,
    rollback: Option<YearEndRollback>,
    trailing_year: Regex,
}

impl DateRepair {
    pub fn new(default_year: i32, rollback: Option<YearEndRollback>) -> Result<Self> {
        Ok(Self {
            default_year,
            rollback,
            trailing_year: Regex::new(r"[0-9]{4}$").context("failed to compile trailing year regex")?,
        })
    }

    /// Text the parser sees: the original date, with the default year
    /// appended when it has none.
    pub fn complete(&self, date_text: &str) -> (String, bool) {
        let date_text = date_text.trim();
        if self.trailing_year.is_match(date_text) {
            (date_text.to_string(), false)
        } else {
            (format!("{date_text} {}", self.default_year), true)
        }
    }

    pub fn repair(&self, date_text: &str) -> Option<RepairedDate> {
        let (completed, year_inferred) = self.complete(date_text);
        let parsed = parse_post_date(&completed)?;

        let rolled = year_inferred
            .then_some(self.rollback)
            .flatten()
            .and_then(|rule| rule.apply(parsed, self.default_year));

        Some(RepairedDate {
            date: rolled.unwrap_or(parsed),
            year_inferred,
            rolled_back: rolled.is_some(),
        })
    }
}

pub fn parse_post_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
