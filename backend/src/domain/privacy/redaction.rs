//! Best-effort scrubbing of contact details from free text.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::Error;
use crate::domain::patterns::compiled;

/// Replacement token for every redacted span.
pub const REDACTED: &str = "[REDACTED]";

// Alternatives are tried at each position in one left-to-right pass, so the
// outcome does not depend on which pattern is listed first.
const SENSITIVE_TEXT_PATTERN: &str = concat!(
    r"(?i:password\s*[:=]\s*\S+)",
    r"|[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}",
    r"|\+[0-9](?:[0-9 \-]*[0-9])?",
);

static SENSITIVE_TEXT_RE: OnceLock<Regex> = OnceLock::new();

/// Replace phone numbers, email addresses, and `password=`/`password:`
/// assignments in `text` with [`REDACTED`].
///
/// # Examples
/// ```
/// use companion::domain::privacy::redact_sensitive_text;
///
/// let text = redact_sensitive_text("sms to +61 412 345 678 failed");
/// assert_eq!(text, "sms to [REDACTED] failed");
/// ```
pub fn redact_sensitive_text(text: &str) -> Cow<'_, str> {
    compiled(&SENSITIVE_TEXT_RE, SENSITIVE_TEXT_PATTERN).replace_all(text, REDACTED)
}

fn redact_strings(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(redact_sensitive_text(&text).into_owned()),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_strings).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, child)| (key, redact_strings(child)))
                .collect(),
        ),
        other => other,
    }
}

/// Rewrite a domain error so neither its message nor any string in its
/// details carries contact data. Code and trace id are kept.
///
/// # Examples
/// ```
/// use companion::domain::Error;
/// use companion::domain::privacy::redact_sensitive_from_error;
///
/// let error = redact_sensitive_from_error(Error::internal("failed for +61412345678"));
/// assert_eq!(error.message(), "failed for [REDACTED]");
/// ```
pub fn redact_sensitive_from_error(error: Error) -> Error {
    error.map_text(
        |message| redact_sensitive_text(message).into_owned(),
        redact_strings,
    )
}

/// Redacted rendering of an error raised outside the domain.
///
/// Captures the error and its `source` chain as `outer: cause: root` with
/// contact data scrubbed. The original error is not retained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RedactedError {
    message: String,
}

impl RedactedError {
    /// Render and scrub `error` together with its causes.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let chain: Vec<String> = std::iter::successors(Some(error), |&current| current.source())
            .map(ToString::to_string)
            .collect();
        Self {
            message: redact_sensitive_text(&chain.join(": ")).into_owned(),
        }
    }

    /// The scrubbed text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RedactedError> for Error {
    fn from(value: RedactedError) -> Self {
        if value.message.trim().is_empty() {
            Self::internal("Internal server error")
        } else {
            Self::internal(value.message)
        }
    }
}
