//! Flight records and the value types that describe a route.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;
use super::patterns::compiled;

/// Validation errors returned by the flight newtype constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlightValidationError {
    #[error("Airport code must be exactly 3 characters")]
    AirportCodeLength,
    #[error("Airport code must contain only letters")]
    AirportCodeLetters,
    #[error("Flight number format: 2 letters + 1-4 digits (e.g., QF123)")]
    FlightNumberFormat,
    #[error("Travel date must be a valid date")]
    InvalidTravelDate,
    #[error("Travel date must be today or in the future")]
    TravelDateInPast,
    #[error("Data source must be MANUAL or IMPORTED")]
    UnknownDataSource,
}

static AIRPORT_CODE_RE: OnceLock<Regex> = OnceLock::new();

/// IATA airport code, always stored uppercase.
///
/// # Examples
/// ```
/// use companion::domain::AirportCode;
///
/// assert_eq!(AirportCode::new("syd").unwrap().as_ref(), "SYD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AirportCode(String);

impl AirportCode {
    /// Check the length, uppercase, then require three ASCII letters.
    pub fn new(code: impl AsRef<str>) -> Result<Self, FlightValidationError> {
        let code = code.as_ref();
        if code.chars().count() != 3 {
            return Err(FlightValidationError::AirportCodeLength);
        }
        let upper = code.to_uppercase();
        if !compiled(&AIRPORT_CODE_RE, "^[A-Z]{3}$").is_match(&upper) {
            return Err(FlightValidationError::AirportCodeLetters);
        }
        Ok(Self(upper))
    }
}

impl AsRef<str> for AirportCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AirportCode> for String {
    fn from(value: AirportCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for AirportCode {
    type Error = FlightValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static FLIGHT_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

/// Airline flight designator such as `QF123`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlightNumber(String);

impl FlightNumber {
    /// Validate two uppercase letters followed by one to four digits.
    pub fn new(number: impl Into<String>) -> Result<Self, FlightValidationError> {
        let number = number.into();
        if !compiled(&FLIGHT_NUMBER_RE, "^[A-Z]{2}[0-9]{1,4}$").is_match(&number) {
            return Err(FlightValidationError::FlightNumberFormat);
        }
        Ok(Self(number))
    }
}

impl AsRef<str> for FlightNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<FlightNumber> for String {
    fn from(value: FlightNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for FlightNumber {
    type Error = FlightValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Calendar date of travel, never earlier than the day it was recorded.
///
/// Only [`TravelDate::new`] builds one, so the type serialises but does not
/// deserialise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TravelDate(NaiveDate);

impl TravelDate {
    /// Accept `date` when it is `today` or later. Time of day plays no part.
    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, FlightValidationError> {
        if date < today {
            return Err(FlightValidationError::TravelDateInPast);
        }
        Ok(Self(date))
    }

    /// The underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// How a flight record entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Typed in by the traveller.
    #[default]
    Manual,
    /// Imported from a booking.
    Imported,
}

impl DataSource {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Imported => "IMPORTED",
        }
    }
}

impl FromStr for DataSource {
    type Err = FlightValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANUAL" => Ok(Self::Manual),
            "IMPORTED" => Ok(Self::Imported),
            _ => Err(FlightValidationError::UnknownDataSource),
        }
    }
}

/// A traveller's recorded flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub user_id: UserId,
    pub source_airport: AirportCode,
    pub destination_airport: AirportCode,
    pub travel_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<FlightNumber>,
    pub data_source: DataSource,
    pub created_at: DateTime<Utc>,
}
