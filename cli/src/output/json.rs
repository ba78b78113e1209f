//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout; failures use the error object produced by [`format_error`].

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::error::{
    CommandError, ConfigError, ConnectionError, NotFoundError, ValidationError,
};

/// Renders results as JSON documents.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print `value` as one pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{text}");
        Ok(())
    }
}

/// Machine-readable category of a failure, taken from the first typed
/// error found in the chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<ValidationError>() {
            return "validation";
        }
        if cause.is::<NotFoundError>() {
            return "not_found";
        }
        if cause.is::<ConnectionError>() {
            return "connection";
        }
        if cause.is::<CommandError>() {
            return "command";
        }
        if cause.is::<ConfigError>() {
            return "config";
        }
    }
    "internal"
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
