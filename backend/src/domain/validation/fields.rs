//! Field parsers: `&Value -> Result<T, FieldError>`.
//!
//! Each parser checks the JSON shape, then defers to the domain constructor,
//! which applies the transform and the strict re-check.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::FieldError;
use crate::domain::{
    AirportCode, EmailAddress, FirstName, FlightNumber, FlightValidationError, LanguageCode,
    Languages, MessageContent, MobileNumber, RATING_STARS_MAX, RATING_STARS_MIN, RatingFeedback,
    RatingStars, RatingValidationError, TravelDate,
};

fn string(value: &Value) -> Result<&str, FieldError> {
    value.as_str().ok_or(FieldError::ExpectedString)
}

pub fn email(value: &Value) -> Result<EmailAddress, FieldError> {
    Ok(EmailAddress::new(string(value)?)?)
}

pub fn mobile_number(value: &Value) -> Result<MobileNumber, FieldError> {
    Ok(MobileNumber::parse(string(value)?)?)
}

pub fn airport_code(value: &Value) -> Result<AirportCode, FieldError> {
    Ok(AirportCode::new(string(value)?)?)
}

pub fn first_name(value: &Value) -> Result<FirstName, FieldError> {
    Ok(FirstName::new(string(value)?)?)
}

pub fn language_code(value: &Value) -> Result<LanguageCode, FieldError> {
    Ok(LanguageCode::new(string(value)?)?)
}

/// Whole-list variant for callers outside a [`super::FieldReader`]; reports
/// the first failing item without its index.
pub fn languages(value: &Value) -> Result<Languages, FieldError> {
    let items = value.as_array().ok_or(FieldError::ExpectedArray)?;
    let codes = items
        .iter()
        .map(language_code)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Languages::new(codes)?)
}

pub fn flight_number(value: &Value) -> Result<FlightNumber, FieldError> {
    Ok(FlightNumber::new(string(value)?)?)
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or epoch milliseconds into a
/// UTC calendar date.
pub fn calendar_date(value: &Value) -> Result<NaiveDate, FieldError> {
    let parsed = match value {
        Value::String(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        }),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|timestamp| timestamp.date_naive()),
        _ => None,
    };
    parsed.ok_or(FieldError::Flight(FlightValidationError::InvalidTravelDate))
}

/// [`calendar_date`] that must not fall before `today`.
pub fn travel_date(value: &Value, today: NaiveDate) -> Result<TravelDate, FieldError> {
    Ok(TravelDate::new(calendar_date(value)?, today)?)
}

pub fn message_content(value: &Value) -> Result<MessageContent, FieldError> {
    Ok(MessageContent::new(string(value)?)?)
}

/// Whole star count. `4.0` is accepted; `4.5` is not.
pub fn rating_stars(value: &Value) -> Result<RatingStars, FieldError> {
    let Value::Number(number) = value else {
        return Err(FieldError::ExpectedNumber);
    };
    if let Some(stars) = number.as_i64() {
        return Ok(RatingStars::new(stars)?);
    }
    if number.is_u64() {
        return Err(RatingValidationError::StarsTooHigh.into());
    }
    let stars = number.as_f64().ok_or(FieldError::ExpectedNumber)?;
    if !stars.is_finite() || stars.fract() != 0.0 {
        return Err(RatingValidationError::StarsNotWhole.into());
    }
    if stars < RATING_STARS_MIN as f64 {
        return Err(RatingValidationError::StarsTooLow.into());
    }
    if stars > RATING_STARS_MAX as f64 {
        return Err(RatingValidationError::StarsTooHigh.into());
    }
    Ok(RatingStars::new(stars as i64)?)
}

pub fn rating_feedback(value: &Value) -> Result<RatingFeedback, FieldError> {
    Ok(RatingFeedback::new(string(value)?)?)
}

/// UUID parser whose failure message names the identifier, e.g.
/// `Invalid conversation ID`.
pub fn identifier(label: &'static str) -> impl Fn(&Value) -> Result<Uuid, FieldError> {
    move |value| {
        let raw = string(value)?;
        Uuid::parse_str(raw).map_err(|_| FieldError::InvalidUuid { label })
    }
}

/// Positive integer from a JSON number or a string of ASCII digits.
///
/// Query strings arrive as text, so `"2"` is accepted alongside `2`.
pub fn positive_integer(value: &Value) -> Result<u32, FieldError> {
    let parsed = match value {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                unsigned
            } else if number.as_i64().is_some() {
                return Err(FieldError::NotPositive);
            } else {
                let float = number.as_f64().ok_or(FieldError::ExpectedNumber)?;
                if float.fract() != 0.0 || !float.is_finite() {
                    return Err(FieldError::ExpectedInteger);
                }
                if float <= 0.0 {
                    return Err(FieldError::NotPositive);
                }
                return u32::try_from(float as u64)
                    .map_err(|_| FieldError::TooLarge { max: u32::MAX });
            }
        }
        Value::String(text) => {
            if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(FieldError::ExpectedInteger);
            }
            text.parse::<u64>()
                .map_err(|_| FieldError::TooLarge { max: u32::MAX })?
        }
        _ => return Err(FieldError::ExpectedNumber),
    };
    if parsed == 0 {
        return Err(FieldError::NotPositive);
    }
    u32::try_from(parsed).map_err(|_| FieldError::TooLarge { max: u32::MAX })
}

/// [`positive_integer`] no greater than `max`.
pub fn bounded_positive_integer(max: u32) -> impl Fn(&Value) -> Result<u32, FieldError> {
    move |value| {
        let parsed = positive_integer(value)?;
        if parsed > max {
            return Err(FieldError::TooLarge { max });
        }
        Ok(parsed)
    }
}
