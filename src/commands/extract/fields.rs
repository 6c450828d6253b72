use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{CountField, DiscardReason};

use super::PostFields;

#[derive(Debug)]
pub struct FieldPatterns {
    year_perc: Regex,
    replies: Regex,
    retweets: Regex,
    likes: Regex,
}

impl FieldPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            year_perc: Regex::new(r"([0-9]+)%$").context("failed to compile percentage regex")?,
            replies: Regex::new(r"([0-9]+) repl").context("failed to compile replies regex")?,
            retweets: Regex::new(r"([0-9]+) retweet").context("failed to compile retweets regex")?,
            likes: Regex::new(r"([0-9]+) like").context("failed to compile likes regex")?,
        })
    }

    /// Digits of the trailing `NN%` token.
    pub fn extract_year_perc<'a>(&self, year_perc_raw: &'a str) -> Option<&'a str> {
        first_capture(&self.year_perc, year_perc_raw)
    }

    /// Expects `stats` with thousands separators already removed.
    pub fn extract_count<'a>(&self, stats: &'a str, field: CountField) -> Option<&'a str> {
        let pattern = match field {
            CountField::Replies => &self.replies,
            CountField::Retweets => &self.retweets,
            CountField::Likes => &self.likes,
        };
        first_capture(pattern, stats)
    }

    pub fn resolve(&self, fields: &PostFields<'_>) -> Result<ResolvedFields, DiscardReason> {
        let year_perc = self
            .extract_year_perc(fields.year_perc_raw)
            .ok_or(DiscardReason::UnresolvedPercent)?;

        let stats = strip_thousands_separators(fields.stats);
        let count = |field: CountField| {
            self.extract_count(&stats, field)
                .map(ToOwned::to_owned)
                .ok_or(DiscardReason::UnresolvedCount { field })
        };

        Ok(ResolvedFields {
            year_perc: year_perc.to_string(),
            replies: count(CountField::Replies)?,
            retweets: count(CountField::Retweets)?,
            likes: count(CountField::Likes)?,
        })
    }
}

/// Digit strings pulled out of a post, not yet converted to integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub year_perc: String,
    pub replies: String,
    pub retweets: String,
    pub likes: String,
}

/// Mis-captured retweets and quotes fail one of these two checks.
pub fn validity_failure(fields: &PostFields<'_>) -> Option<DiscardReason> {
    if !fields.year_perc_raw.contains('%') {
        return Some(DiscardReason::MissingPercent);
    }
    if !fields.stats.contains("likes") {
        return Some(DiscardReason::MissingLikes);
    }
    None
}

pub fn strip_thousands_separators(text: &str) -> String {
    text.replace(',', "")
}

fn first_capture<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str())
}
