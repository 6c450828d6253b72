use anyhow::{Context, Result, bail};
use regex::Regex;

use super::ExtractError;

pub const PRIMARY_DELIMITER: &str = "@year_progress";
/// Reply threads interleaved in the dump start with this handle.
pub const REPLY_THREAD_DELIMITER: &str = "@dustinhorne";
pub const PROGRESS_BAR_GLYPHS: [char; 2] = ['▓', '░'];

const DATE_LINE: usize = 0;
const YEAR_PERC_LINE: usize = 2;
const STATS_LINE: usize = 4;
pub const REQUIRED_LINE_COUNT: usize = STATS_LINE + 1;

const PREVIEW_CHARS: usize = 48;

pub fn default_delimiters() -> Vec<String> {
    vec![
        PRIMARY_DELIMITER.to_string(),
        REPLY_THREAD_DELIMITER.to_string(),
    ]
}

/// Splits a dump on lines consisting solely of one of the delimiters.
#[derive(Debug)]
pub struct Segmenter {
    boundary: Regex,
}

impl Segmenter {
    pub fn new(delimiters: &[String]) -> Result<Self> {
        if delimiters.is_empty() {
            bail!("at least one segment delimiter is required");
        }

        let alternatives = delimiters
            .iter()
            .map(|delimiter| regex::escape(delimiter))
            .collect::<Vec<_>>()
            .join("|");
        let boundary = Regex::new(&format!(r"(?m)^(?:{alternatives})\r?$"))
            .context("failed to compile segment delimiter regex")?;

        Ok(Self { boundary })
    }

    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.boundary.split(text).collect()
    }
}

pub fn has_progress_bar(segment: &str) -> bool {
    segment.contains(PROGRESS_BAR_GLYPHS)
}

/// The three positional lines of a post, trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFields<'a> {
    pub date: &'a str,
    pub year_perc_raw: &'a str,
    pub stats: &'a str,
}

impl<'a> PostFields<'a> {
    pub fn from_segment(segment_index: usize, segment: &'a str) -> Result<Self, ExtractError> {
        let trimmed = segment.trim();
        let lines = trimmed.lines().collect::<Vec<_>>();

        if lines.len() < REQUIRED_LINE_COUNT {
            return Err(ExtractError::MalformedSegment {
                segment_index,
                line_count: lines.len(),
                required: REQUIRED_LINE_COUNT,
                preview: trimmed.chars().take(PREVIEW_CHARS).collect(),
            });
        }

        Ok(Self {
            date: lines[DATE_LINE].trim(),
            year_perc_raw: lines[YEAR_PERC_LINE].trim(),
            stats: lines[STATS_LINE].trim(),
        })
    }
}
