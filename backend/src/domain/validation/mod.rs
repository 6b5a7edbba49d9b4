//! Validation of untyped JSON input.
//!
//! Every write enters the service as a `serde_json::Value`. The schemas in
//! [`forms`] walk that value with a [`FieldReader`], parse each field with a
//! function from [`fields`], and either return a typed value or the complete
//! list of [`Violations`]. A field reports only its first failing rule, but
//! every field is checked so callers can show all problems in one pass.

pub mod fields;
mod forms;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use utoipa::ToSchema;

use super::{
    Error, FlightValidationError, MessagingValidationError, RatingValidationError,
    UserValidationError,
};

pub use self::forms::{
    CreateFlight, CreateMessage, CreateRating, CreateUser, SEARCH_LIMIT_DEFAULT, SEARCH_LIMIT_MAX,
    SEARCH_PAGE_DEFAULT, SearchParams, UpdateFlight, UpdateUser,
};

/// Field name used for violations that concern the input as a whole.
pub const ROOT_FIELD: &str = "";

/// Reason a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Required")]
    Missing,
    #[error("Expected a string")]
    ExpectedString,
    #[error("Expected a number")]
    ExpectedNumber,
    #[error("Expected an integer")]
    ExpectedInteger,
    #[error("Expected an array")]
    ExpectedArray,
    #[error("Expected an object")]
    ExpectedObject,
    #[error("Must be a positive integer")]
    NotPositive,
    #[error("Must be {max} or less")]
    TooLarge { max: u32 },
    #[error("Invalid {label}")]
    InvalidUuid { label: &'static str },
    #[error("At least one field must be provided for update")]
    EmptyUpdate,
    #[error(transparent)]
    User(#[from] UserValidationError),
    #[error(transparent)]
    Flight(#[from] FlightValidationError),
    #[error(transparent)]
    Messaging(#[from] MessagingValidationError),
    #[error(transparent)]
    Rating(#[from] RatingValidationError),
}

/// One rejected field and the reason, safe to show to the end user.
///
/// Messages describe the rule that failed and never echo the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Path of the field, e.g. `languages[1]`; empty for the whole input.
    #[schema(example = "sourceAirport")]
    field: String,
    #[schema(example = "Airport code must be exactly 3 characters")]
    message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn to_json(&self) -> Value {
        json!({"field": self.field, "message": self.message})
    }
}

/// All violations found in one input, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages reported for `field`, in order.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |violation| violation.field == field)
            .map(Violation::message)
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            if violation.field.is_empty() {
                f.write_str(&violation.message)?;
            } else {
                write!(f, "{}: {}", violation.field, violation.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl From<Violations> for Error {
    fn from(value: Violations) -> Self {
        let violations: Vec<Value> = value.0.iter().map(Violation::to_json).collect();
        Error::invalid_request("Request validation failed")
            .with_details(json!({ "violations": violations }))
    }
}

/// Cursor over a JSON object that records a violation for each failing field.
///
/// Parsed values come back as `Option`s; `None` means a violation was
/// recorded. [`FieldReader::finish`] turns the collected state into a
/// `Result`. `null` counts as absent and unknown keys are ignored.
///
/// # Examples
/// ```
/// use companion::domain::validation::{FieldReader, fields};
/// use serde_json::json;
///
/// let input = json!({"sourceAirport": "syd", "destinationAirport": "M1L"});
/// let mut reader = FieldReader::new(&input, "route");
/// let source = reader.required("sourceAirport", fields::airport_code);
/// let destination = reader.required("destinationAirport", fields::airport_code);
/// let violations = reader
///     .finish(|| Some((source?, destination?)))
///     .unwrap_err();
/// assert_eq!(violations.as_slice()[0].field(), "destinationAirport");
/// ```
pub struct FieldReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    schema: &'static str,
    violations: Vec<Violation>,
}

impl<'a> FieldReader<'a> {
    /// Start reading `input`. A non-object input is recorded as a root
    /// violation and every later read yields `None`.
    pub fn new(input: &'a Value, schema: &'static str) -> Self {
        let fields = input.as_object();
        let violations = match fields {
            Some(_) => Vec::new(),
            None => vec![Violation::new(
                ROOT_FIELD,
                FieldError::ExpectedObject.to_string(),
            )],
        };
        Self {
            fields,
            schema,
            violations,
        }
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        self.fields?.get(field).filter(|value| !value.is_null())
    }

    fn record<T>(&mut self, field: &str, parsed: Result<T, FieldError>) -> Option<T> {
        parsed.map_err(|error| self.reject(field, &error)).ok()
    }

    /// Record a violation against `field`.
    pub fn reject(&mut self, field: &str, error: &FieldError) {
        self.violations
            .push(Violation::new(field, error.to_string()));
    }

    /// Parse a field that must be present.
    pub fn required<T>(
        &mut self,
        field: &str,
        parse: impl FnOnce(&Value) -> Result<T, FieldError>,
    ) -> Option<T> {
        self.fields?;
        match self.value(field) {
            Some(value) => self.record(field, parse(value)),
            None => {
                self.reject(field, &FieldError::Missing);
                None
            }
        }
    }

    /// Parse a field that may be absent. `Some(None)` means absent.
    pub fn optional<T>(
        &mut self,
        field: &str,
        parse: impl FnOnce(&Value) -> Result<T, FieldError>,
    ) -> Option<Option<T>> {
        self.fields?;
        match self.value(field) {
            Some(value) => self.record(field, parse(value)).map(Some),
            None => Some(None),
        }
    }

    /// Parse a required array, reporting item failures at `field[i]`.
    pub fn required_list<T>(
        &mut self,
        field: &str,
        parse_item: impl Fn(&Value) -> Result<T, FieldError>,
    ) -> Option<Vec<T>> {
        self.fields?;
        match self.value(field) {
            Some(value) => self.list(field, value, parse_item),
            None => {
                self.reject(field, &FieldError::Missing);
                None
            }
        }
    }

    /// Parse an optional array, reporting item failures at `field[i]`.
    pub fn optional_list<T>(
        &mut self,
        field: &str,
        parse_item: impl Fn(&Value) -> Result<T, FieldError>,
    ) -> Option<Option<Vec<T>>> {
        self.fields?;
        match self.value(field) {
            Some(value) => self.list(field, value, parse_item).map(Some),
            None => Some(None),
        }
    }

    fn list<T>(
        &mut self,
        field: &str,
        value: &Value,
        parse_item: impl Fn(&Value) -> Result<T, FieldError>,
    ) -> Option<Vec<T>> {
        let Some(items) = value.as_array() else {
            self.reject(field, &FieldError::ExpectedArray);
            return None;
        };
        let before = self.violations.len();
        let parsed: Vec<T> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                self.record(&format!("{field}[{index}]"), parse_item(item))
            })
            .collect();
        (self.violations.len() == before).then_some(parsed)
    }

    /// Apply a check to an already parsed value, recording the failure
    /// against `field`.
    pub fn check<T, U>(
        &mut self,
        field: &str,
        value: Option<T>,
        check: impl FnOnce(T) -> Result<U, FieldError>,
    ) -> Option<U> {
        let value = value?;
        self.record(field, check(value))
    }

    /// Whether any of `fields` is present with a non-null value.
    pub fn provides_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|field| self.value(field).is_some())
    }

    /// Whether the input was an object at all.
    pub fn is_object(&self) -> bool {
        self.fields.is_some()
    }

    /// Build the typed value, or return every recorded violation.
    ///
    /// `build` is only called when no violation was recorded, at which point
    /// every parsed field is `Some`.
    pub fn finish<T>(mut self, build: impl FnOnce() -> Option<T>) -> Result<T, Violations> {
        if self.violations.is_empty() {
            match build() {
                Some(value) => return Ok(value),
                None => self
                    .violations
                    .push(Violation::new(ROOT_FIELD, "Invalid input")),
            }
        }
        debug!(
            schema = self.schema,
            violations = self.violations.len(),
            "input rejected by validation"
        );
        Err(Violations(self.violations))
    }
}

#[cfg(test)]
mod tests;
