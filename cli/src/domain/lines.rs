//! Line-delimited decoding shared by the docker output parsers.
//!
//! Each line decodes to `Ok(record)` or a [`LineError`]; failed lines are
//! logged and dropped so one bad row never hides its neighbours.

use thiserror::Error;

/// Why a single line of docker output was not turned into a record.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field {0}")]
    MissingField(&'static str),
}

/// Decode every non-blank line of `text`, dropping the ones that fail.
pub fn decode_lines<T>(
    text: &str,
    kind: &'static str,
    decode: impl Fn(&str) -> Result<T, LineError>,
) -> Vec<T> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match decode(line) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!(kind, %err, line, "dropping undecodable line");
                None
            }
        })
        .collect()
}
