//! Parsing of newline-delimited index responses.

use crate::model::IndexRecord;
use crate::traits::RecordError;
use serde::{Deserialize, Serialize};

/// Paths shorter than this are treated as invalid records.
pub const MIN_PATH_LEN: usize = 5;

/// What to do with the rest of a response after an invalid line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Stop at the first invalid line and drop everything after it.
    #[default]
    Abandon,
    /// Drop only the invalid line and keep parsing.
    Skip,
}

/// Result of parsing one response body.
#[derive(Debug, Default)]
pub struct ParsedBody {
    pub records: Vec<IndexRecord>,
    /// Invalid lines dropped under [`InvalidRecordPolicy::Skip`].
    pub skipped: usize,
    /// The line that ended parsing under [`InvalidRecordPolicy::Abandon`].
    pub abandoned_at: Option<RecordError>,
}

/// Parses and validates a single line (`line_no` is 1-based).
pub fn parse_line(line: &str, line_no: usize) -> Result<IndexRecord, RecordError> {
    let record: IndexRecord = serde_json::from_str(line).map_err(|source| RecordError::Json {
        line: line_no,
        source,
    })?;

    if record.path.len() < MIN_PATH_LEN {
        return Err(RecordError::PathTooShort {
            line: line_no,
            path: record.path,
        });
    }

    Ok(record)
}

/// Splits `body` into lines and parses each one as an [`IndexRecord`].
///
/// Trailing blank lines are ignored. Any other line that fails
/// [`parse_line`] is handled according to `policy`.
pub fn parse_body(body: &str, policy: InvalidRecordPolicy) -> ParsedBody {
    let mut parsed = ParsedBody::default();
    let body = body.trim_end();
    if body.is_empty() {
        return parsed;
    }

    for (idx, line) in body.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match parse_line(line, idx + 1) {
            Ok(record) => parsed.records.push(record),
            Err(err) => match policy {
                InvalidRecordPolicy::Abandon => {
                    parsed.abandoned_at = Some(err);
                    break;
                }
                InvalidRecordPolicy::Skip => parsed.skipped += 1,
            },
        }
    }

    parsed
}
