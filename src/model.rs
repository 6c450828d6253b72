use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub year_perc: u8,
    pub replies: u64,
    pub retweets: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountField {
    Replies,
    Retweets,
    Likes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscardReason {
    /// Percentage line has no `%` at all.
    MissingPercent,
    /// Stats line never mentions `likes`.
    MissingLikes,
    /// `%` present but no trailing `<digits>%` token.
    UnresolvedPercent,
    UnresolvedCount { field: CountField },
}

impl DiscardReason {
    /// Validity failures happen before any field extraction.
    pub fn is_validity_failure(&self) -> bool {
        matches!(self, Self::MissingPercent | Self::MissingLikes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardedSegment {
    pub segment_index: usize,
    pub date_text: String,
    pub reason: DiscardReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCounts {
    pub segment_count: usize,
    pub candidate_count: usize,
    pub validity_dropped: usize,
    pub unresolved_dropped: usize,
    pub years_inferred: usize,
    pub year_end_rollbacks: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub input_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub paths: ExtractPaths,
    pub input_sha256: String,
    pub default_year: i32,
    pub year_end_rollback_enabled: bool,
    pub delimiters: Vec<String>,
    pub counts: ExtractionCounts,
    pub discarded: Vec<DiscardedSegment>,
}
