use thiserror::Error;

/// Hard faults that abort an extraction run. Recoverable problems become
/// discard entries instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(
        "malformed record in segment {segment_index}: expected at least {required} lines, found {line_count} (starts with {preview:?})"
    )]
    MalformedSegment {
        segment_index: usize,
        line_count: usize,
        required: usize,
        preview: String,
    },

    #[error("segment {segment_index} has an unparseable date {date_text:?} (read as {repaired:?})")]
    InvalidDate {
        segment_index: usize,
        date_text: String,
        repaired: String,
    },

    #[error(
        "row {row_index} (segment {segment_index}): cannot coerce {field} value {value:?}: {reason}"
    )]
    Coercion {
        row_index: usize,
        segment_index: usize,
        field: &'static str,
        value: String,
        reason: String,
    },
}
