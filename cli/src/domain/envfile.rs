//! Dotenv parsing and serialisation for the env file editor.

use dockhand_common::EnvVar;

use crate::domain::error::ValidationError;

/// Parse dotenv text into ordered variables.
///
/// Blank lines and `#` comments are skipped, as are lines without a key
/// before the first `=`. One pair of matching surrounding quotes is
/// removed; inside double quotes `\"` and `\\` are unescaped.
#[must_use]
pub fn parse_env_file(text: &str) -> Vec<EnvVar> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some(EnvVar::new(key, unquote(value.trim())))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    let quoted_with = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
    if quoted_with('"') {
        unescape(&value[1..value.len() - 1])
    } else if quoted_with('\'') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn needs_quotes(value: &str) -> bool {
    value.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'')
}

/// Render variables back to dotenv text, one per line.
///
/// Entries with an empty key are dropped. Values containing whitespace or
/// quotes are wrapped in double quotes.
#[must_use]
pub fn serialize_env_vars(vars: &[EnvVar]) -> String {
    vars.iter()
        .filter(|var| !var.key.trim().is_empty())
        .map(|var| {
            if needs_quotes(&var.value) {
                let escaped = var.value.replace('\\', r"\\").replace('"', "\\\"");
                format!("{}=\"{escaped}\"", var.key.trim())
            } else {
                format!("{}={}", var.key.trim(), var.value)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a `KEY=VALUE` command-line assignment.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAssignment`] if there is no `=` or the
/// key is empty.
pub fn parse_assignment(raw: &str) -> Result<EnvVar, ValidationError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(EnvVar::new(key.trim(), value)),
        _ => Err(ValidationError::InvalidAssignment(raw.to_string())),
    }
}

/// Set each assignment in `vars`: the first entry with the same key is
/// updated in place, unknown keys are appended.
pub fn apply_assignments(vars: &mut Vec<EnvVar>, assignments: Vec<EnvVar>) {
    for assignment in assignments {
        match vars.iter_mut().find(|v| v.key == assignment.key) {
            Some(existing) => existing.value = assignment.value,
            None => vars.push(assignment),
        }
    }
}
