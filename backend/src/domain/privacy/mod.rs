//! Privacy boundary between internal records and client-facing surfaces.
//!
//! Mobile numbers and email addresses must never appear in an API payload,
//! a rendered error, or a log line. This module offers four layers:
//!
//! - [`strip_sensitive_fields`] removes known contact keys from a record.
//! - [`build_search_result_projection`] keeps only allow-listed user fields.
//! - [`assert_no_sensitive_data`] walks a payload and fails on any key that
//!   looks sensitive; [`guard_response`] does the same and logs the path.
//! - [`redact_sensitive_from_error`] rewrites error text that happens to
//!   contain contact details.
//!
//! Only the assertion can fail. A failure means the data flow itself is
//! wrong, so callers abort the response instead of recovering.

mod redaction;

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use super::User;
use super::search::SearchResultUser;

pub use self::redaction::{
    REDACTED, RedactedError, redact_sensitive_from_error, redact_sensitive_text,
};

/// Keys removed by [`strip_sensitive_fields`], compared case-insensitively.
pub const STRIPPED_FIELDS: [&str; 4] = ["mobile", "mobileNumber", "email", "phone"];

/// Lowercase terms that mark a key as sensitive wherever they appear in it.
pub const SENSITIVE_FIELD_TERMS: [&str; 4] = ["mobile", "email", "phone", "password"];

/// Placeholder returned for values too short to mask safely.
pub const MASK: &str = "***";

const MASK_MIN_LEN: usize = 8;
const MASK_PREFIX_LEN: usize = 3;
const MASK_SUFFIX_LEN: usize = 5;

fn is_stripped_field(key: &str) -> bool {
    STRIPPED_FIELDS
        .iter()
        .any(|field| key.eq_ignore_ascii_case(field))
}

/// Remove contact fields from a record, keeping every other key in order.
///
/// # Examples
/// ```
/// use companion::domain::privacy::strip_sensitive_fields;
/// use serde_json::json;
///
/// let record = json!({"id": "u1", "Email": "amy@example.com", "firstName": "Amy"});
/// let stripped = strip_sensitive_fields(record.as_object().unwrap());
/// assert_eq!(serde_json::Value::Object(stripped), json!({"id": "u1", "firstName": "Amy"}));
/// ```
pub fn strip_sensitive_fields(record: &Map<String, Value>) -> Map<String, Value> {
    record
        .iter()
        .filter(|(key, _)| !is_stripped_field(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Serialise `value` and strip contact fields from the top-level object.
///
/// Values that do not serialise to an object are returned unchanged.
pub fn strip_sensitive_from<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    Ok(match serde_json::to_value(value)? {
        Value::Object(record) => Value::Object(strip_sensitive_fields(&record)),
        other => other,
    })
}

/// Mask a mobile number for display to its owner.
///
/// Inputs shorter than eight characters collapse to [`MASK`]; longer ones
/// keep the first three and last five characters.
///
/// # Examples
/// ```
/// use companion::domain::privacy::mask_mobile_number;
///
/// assert_eq!(mask_mobile_number("+61412345678"), "+61***45678");
/// assert_eq!(mask_mobile_number("+6141"), "***");
/// ```
pub fn mask_mobile_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() < MASK_MIN_LEN {
        return MASK.to_owned();
    }
    let prefix: String = chars.iter().take(MASK_PREFIX_LEN).collect();
    let suffix: String = chars
        .iter()
        .skip(chars.len().saturating_sub(MASK_SUFFIX_LEN))
        .collect();
    format!("{prefix}{MASK}{suffix}")
}

/// Keep only the identifier, first name, languages, and verification flag.
pub fn build_search_result_projection(user: &User) -> SearchResultUser {
    SearchResultUser::from(user)
}

/// A sensitive key found in an outgoing payload.
///
/// Carries the key and its path only; the offending value is never kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "sensitive field \"{field}\" detected at path \"{path}\"; mobile numbers and emails must never be exposed in client-facing payloads"
)]
pub struct PrivacyViolation {
    field: String,
    path: String,
}

impl PrivacyViolation {
    /// The offending key.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Dotted and bracketed path from the payload root, e.g.
    /// `user.contacts[0].mobileNumber`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

const MOBILE_VERIFIED_FIELD: &str = "mobileVerified";

/// Rules for recognising sensitive keys.
///
/// Matching is a case-insensitive substring test against
/// [`SENSITIVE_FIELD_TERMS`], which over-matches (a key such as
/// `emailTemplate` trips it). Keys that are known to be harmless can be
/// exempted by exact name with [`SensitiveFieldPolicy::allow`].
///
/// # Examples
/// ```
/// use companion::domain::privacy::SensitiveFieldPolicy;
/// use serde_json::json;
///
/// let policy = SensitiveFieldPolicy::default().allow("emailTemplate");
/// assert!(policy.check(&json!({"emailTemplate": "welcome"})).is_ok());
/// assert!(policy.check(&json!({"email": "amy@example.com"})).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensitiveFieldPolicy {
    allowed: BTreeSet<String>,
}

impl SensitiveFieldPolicy {
    /// Policy applied to outgoing responses.
    ///
    /// Exempts `mobileVerified`, a flag carried by every public user
    /// projection that holds no contact data.
    ///
    /// # Examples
    /// ```
    /// use companion::domain::privacy::SensitiveFieldPolicy;
    /// use serde_json::json;
    ///
    /// let policy = SensitiveFieldPolicy::response_boundary();
    /// assert!(policy.check(&json!({"mobileVerified": true})).is_ok());
    /// assert!(policy.check(&json!({"mobileNumber": "+61412345678"})).is_err());
    /// ```
    pub fn response_boundary() -> Self {
        Self::default().allow(MOBILE_VERIFIED_FIELD)
    }

    /// Exempt a key, matched exactly and case-sensitively.
    #[must_use]
    pub fn allow(mut self, field: impl Into<String>) -> Self {
        self.allowed.insert(field.into());
        self
    }

    /// Whether `key` counts as sensitive under this policy.
    pub fn is_sensitive(&self, key: &str) -> bool {
        if self.allowed.contains(key) {
            return false;
        }
        let lowered = key.to_lowercase();
        SENSITIVE_FIELD_TERMS
            .iter()
            .any(|term| lowered.contains(term))
    }

    /// Walk `value` depth-first and fail on the first sensitive key.
    pub fn check(&self, value: &Value) -> Result<(), PrivacyViolation> {
        self.walk(value, "")
    }

    fn walk(&self, value: &Value, path: &str) -> Result<(), PrivacyViolation> {
        match value {
            Value::Object(fields) => {
                for (key, child) in fields {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    if self.is_sensitive(key) {
                        return Err(PrivacyViolation {
                            field: key.clone(),
                            path: child_path,
                        });
                    }
                    self.walk(child, &child_path)?;
                }
                Ok(())
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| self.walk(item, &format!("{path}[{index}]"))),
            _ => Ok(()),
        }
    }
}

/// Fail if any key at any depth of `value` looks sensitive.
///
/// # Examples
/// ```
/// use companion::domain::privacy::assert_no_sensitive_data;
/// use serde_json::json;
///
/// let leak = json!({"user": {"mobileNumber": "+61412345678"}});
/// let violation = assert_no_sensitive_data(&leak).unwrap_err();
/// assert_eq!(violation.path(), "user.mobileNumber");
///
/// assert!(assert_no_sensitive_data(&json!({"user": {"firstName": "Amy"}})).is_ok());
/// ```
pub fn assert_no_sensitive_data(value: &Value) -> Result<(), PrivacyViolation> {
    SensitiveFieldPolicy::default().check(value)
}

/// Check a payload about to leave the process against
/// [`SensitiveFieldPolicy::response_boundary`].
///
/// A violation is logged at error level with its path, never its value.
pub fn guard_response(value: &Value) -> Result<(), PrivacyViolation> {
    SensitiveFieldPolicy::response_boundary()
        .check(value)
        .inspect_err(|violation| {
            error!(
                field = %violation.field(),
                path = %violation.path(),
                "privacy violation in outgoing payload"
            );
        })
}
