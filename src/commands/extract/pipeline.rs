use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

use crate::model::{CleanedRecord, DiscardReason, DiscardedSegment, ExtractionCounts};

use super::{
    DateRepair, ExtractError, FieldPatterns, PostFields, ResolvedFields, Segmenter,
    YearEndRollback, default_delimiters, has_progress_bar, validity_failure,
};

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub delimiters: Vec<String>,
    pub default_year: i32,
    pub year_end_rollback: Option<YearEndRollback>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            default_year: 2019,
            year_end_rollback: Some(YearEndRollback::default()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<CleanedRecord>,
    pub discarded: Vec<DiscardedSegment>,
    pub counts: ExtractionCounts,
}

#[derive(Debug)]
pub struct Extractor {
    segmenter: Segmenter,
    patterns: FieldPatterns,
    dates: DateRepair,
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            segmenter: Segmenter::new(&config.delimiters)?,
            patterns: FieldPatterns::new()?,
            dates: DateRepair::new(config.default_year, config.year_end_rollback)?,
        })
    }

    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractError> {
        let mut extraction = Extraction::default();
        let segments = self.segmenter.split(text);
        extraction.counts.segment_count = segments.len();

        for (segment_index, segment) in segments.into_iter().enumerate() {
            if !has_progress_bar(segment) {
                continue;
            }
            extraction.counts.candidate_count += 1;

            let fields = PostFields::from_segment(segment_index, segment)?;

            if let Some(reason) = validity_failure(&fields) {
                extraction.discard(segment_index, &fields, reason);
                continue;
            }

            let repaired = self.dates.repair(fields.date).ok_or_else(|| {
                ExtractError::InvalidDate {
                    segment_index,
                    date_text: fields.date.to_string(),
                    repaired: self.dates.complete(fields.date).0,
                }
            })?;

            let resolved = match self.patterns.resolve(&fields) {
                Ok(resolved) => resolved,
                Err(reason) => {
                    extraction.discard(segment_index, &fields, reason);
                    continue;
                }
            };

            let row_index = extraction.records.len();
            let record = coerce_record(row_index, segment_index, repaired.date, &resolved)?;

            if repaired.year_inferred {
                extraction.counts.years_inferred += 1;
            }
            if repaired.rolled_back {
                extraction.counts.year_end_rollbacks += 1;
            }
            extraction.records.push(record);
        }

        extraction.counts.row_count = extraction.records.len();
        Ok(extraction)
    }
}

impl Extraction {
    fn discard(&mut self, segment_index: usize, fields: &PostFields<'_>, reason: DiscardReason) {
        debug!(
            segment = segment_index,
            date = fields.date,
            reason = ?reason,
            "dropped segment"
        );
        if reason.is_validity_failure() {
            self.counts.validity_dropped += 1;
        } else {
            self.counts.unresolved_dropped += 1;
        }
        self.discarded.push(DiscardedSegment {
            segment_index,
            date_text: fields.date.to_string(),
            reason,
        });
    }
}

fn coerce_record(
    row_index: usize,
    segment_index: usize,
    date: NaiveDate,
    resolved: &ResolvedFields,
) -> Result<CleanedRecord, ExtractError> {
    let fault = |field: &'static str, value: &str, reason: String| ExtractError::Coercion {
        row_index,
        segment_index,
        field,
        value: value.to_string(),
        reason,
    };

    let year_perc = resolved
        .year_perc
        .parse::<u8>()
        .map_err(|err| fault("year_perc", &resolved.year_perc, err.to_string()))?;
    if year_perc > 100 {
        return Err(fault(
            "year_perc",
            &resolved.year_perc,
            "percentage exceeds 100".to_string(),
        ));
    }

    let count = |field: &'static str, value: &str| {
        value
            .parse::<u64>()
            .map_err(|err| fault(field, value, err.to_string()))
    };

    Ok(CleanedRecord {
        date,
        year_perc,
        replies: count("replies", &resolved.replies)?,
        retweets: count("retweets", &resolved.retweets)?,
        likes: count("likes", &resolved.likes)?,
    })
}
