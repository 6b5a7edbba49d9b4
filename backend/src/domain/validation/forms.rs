//! Composite schemas for each write the service accepts.

use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde_json::Value;
use uuid::Uuid;

use super::fields;
use super::{FieldError, FieldReader, ROOT_FIELD, Violations};
use crate::domain::{
    AccountStatus, AirportCode, DataSource, EmailAddress, FirstName, FlightNumber, LanguageCode,
    Languages, MessageContent, MobileNumber, RatingFeedback, RatingStars, RawUser, TravelDate,
    User, UserId,
};

/// Page served when the query names none.
pub const SEARCH_PAGE_DEFAULT: u32 = 1;
/// Page size served when the query names none.
pub const SEARCH_LIMIT_DEFAULT: u32 = 10;
/// Largest page size a query may request.
pub const SEARCH_LIMIT_MAX: u32 = 100;

fn data_source(value: &Value) -> Result<DataSource, FieldError> {
    let raw = value.as_str().ok_or(FieldError::ExpectedString)?;
    Ok(raw.parse::<DataSource>()?)
}

fn languages(reader: &mut FieldReader<'_>, field: &str) -> Option<Languages> {
    let codes = reader.required_list(field, fields::language_code);
    reader.check(field, codes, |codes| Ok(Languages::new(codes)?))
}

fn optional_languages(reader: &mut FieldReader<'_>, field: &str) -> Option<Option<Languages>> {
    let codes = reader.optional_list(field, fields::language_code)?;
    match codes {
        Some(codes) => reader
            .check(field, Some(codes), |codes| Ok(Languages::new(codes)?))
            .map(Some),
        None => Some(None),
    }
}

fn today(clock: &dyn Clock) -> NaiveDate {
    clock.utc().date_naive()
}

/// Registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub first_name: FirstName,
    pub email: EmailAddress,
    pub mobile_number: MobileNumber,
    pub languages: Languages,
}

impl CreateUser {
    pub fn from_json(input: &Value) -> Result<Self, Violations> {
        let mut reader = FieldReader::new(input, "createUser");
        let first_name = reader.required("firstName", fields::first_name);
        let email = reader.required("email", fields::email);
        let mobile_number = reader.required("mobileNumber", fields::mobile_number);
        let languages = languages(&mut reader, "languages");
        reader.finish(|| {
            Some(Self {
                first_name: first_name?,
                email: email?,
                mobile_number: mobile_number?,
                languages: languages?,
            })
        })
    }

    /// Build the internal record for a freshly registered account.
    pub fn into_raw_user(self, id: UserId, now: DateTime<Utc>) -> RawUser {
        RawUser {
            profile: User {
                id,
                first_name: self.first_name,
                languages: self.languages,
                account_status: AccountStatus::Active,
                mobile_verified: false,
                created_at: now,
                updated_at: now,
            },
            email: self.email,
            mobile_number: self.mobile_number,
        }
    }
}

/// New flight record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFlight {
    pub source_airport: AirportCode,
    pub destination_airport: AirportCode,
    pub travel_date: TravelDate,
    pub flight_number: Option<FlightNumber>,
    pub data_source: DataSource,
}

impl CreateFlight {
    /// `clock` supplies "today" for the travel date check.
    pub fn from_json(input: &Value, clock: &dyn Clock) -> Result<Self, Violations> {
        let today = today(clock);
        let mut reader = FieldReader::new(input, "createFlight");
        let source_airport = reader.required("sourceAirport", fields::airport_code);
        let destination_airport = reader.required("destinationAirport", fields::airport_code);
        let travel_date = reader.required("travelDate", |value| fields::travel_date(value, today));
        let flight_number = reader.optional("flightNumber", fields::flight_number);
        let data_source = reader.optional("dataSource", data_source);
        reader.finish(|| {
            Some(Self {
                source_airport: source_airport?,
                destination_airport: destination_airport?,
                travel_date: travel_date?,
                flight_number: flight_number?,
                data_source: data_source?.unwrap_or_default(),
            })
        })
    }
}

/// Partial flight update. At least one field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFlight {
    pub source_airport: Option<AirportCode>,
    pub destination_airport: Option<AirportCode>,
    pub travel_date: Option<TravelDate>,
    pub flight_number: Option<FlightNumber>,
}

impl UpdateFlight {
    const FIELDS: [&'static str; 4] = [
        "sourceAirport",
        "destinationAirport",
        "travelDate",
        "flightNumber",
    ];

    pub fn from_json(input: &Value, clock: &dyn Clock) -> Result<Self, Violations> {
        let today = today(clock);
        let mut reader = FieldReader::new(input, "updateFlight");
        if reader.is_object() && !reader.provides_any(&Self::FIELDS) {
            reader.reject(ROOT_FIELD, &FieldError::EmptyUpdate);
        }
        let source_airport = reader.optional("sourceAirport", fields::airport_code);
        let destination_airport = reader.optional("destinationAirport", fields::airport_code);
        let travel_date = reader.optional("travelDate", |value| fields::travel_date(value, today));
        let flight_number = reader.optional("flightNumber", fields::flight_number);
        reader.finish(|| {
            Some(Self {
                source_airport: source_airport?,
                destination_airport: destination_airport?,
                travel_date: travel_date?,
                flight_number: flight_number?,
            })
        })
    }
}

/// Route search query with paging.
///
/// # Examples
/// ```
/// use companion::domain::validation::SearchParams;
/// use serde_json::json;
///
/// let params = SearchParams::from_json(&json!({
///     "sourceAirport": "syd",
///     "destinationAirport": "mel",
/// }))
/// .unwrap();
/// assert_eq!(params.source_airport.as_ref(), "SYD");
/// assert_eq!((params.page, params.limit), (1, 10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub source_airport: AirportCode,
    pub destination_airport: AirportCode,
    /// Searched date; past dates are allowed here.
    pub travel_date: Option<NaiveDate>,
    pub languages: Option<Vec<LanguageCode>>,
    pub page: u32,
    pub limit: u32,
}

impl SearchParams {
    pub fn from_json(input: &Value) -> Result<Self, Violations> {
        let mut reader = FieldReader::new(input, "search");
        let source_airport = reader.required("sourceAirport", fields::airport_code);
        let destination_airport = reader.required("destinationAirport", fields::airport_code);
        let travel_date = reader.optional("travelDate", fields::calendar_date);
        let languages = reader.optional_list("languages", fields::language_code);
        let page = reader.optional("page", fields::positive_integer);
        let limit = reader.optional(
            "limit",
            fields::bounded_positive_integer(SEARCH_LIMIT_MAX),
        );
        reader.finish(|| {
            Some(Self {
                source_airport: source_airport?,
                destination_airport: destination_airport?,
                travel_date: travel_date?,
                languages: languages?,
                page: page?.unwrap_or(SEARCH_PAGE_DEFAULT),
                limit: limit?.unwrap_or(SEARCH_LIMIT_DEFAULT),
            })
        })
    }

    /// Number of results to skip for the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Message sent within a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMessage {
    pub conversation_id: Uuid,
    pub recipient_id: UserId,
    pub content: MessageContent,
}

impl CreateMessage {
    pub fn from_json(input: &Value) -> Result<Self, Violations> {
        let mut reader = FieldReader::new(input, "createMessage");
        let conversation_id =
            reader.required("conversationId", fields::identifier("conversation ID"));
        let recipient_id = reader.required("recipientId", fields::identifier("recipient ID"));
        let content = reader.required("content", fields::message_content);
        reader.finish(|| {
            Some(Self {
                conversation_id: conversation_id?,
                recipient_id: UserId::from_uuid(recipient_id?),
                content: content?,
            })
        })
    }
}

/// Rating left for another traveller after a shared flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRating {
    pub flight_id: Uuid,
    pub ratee_id: UserId,
    pub stars: RatingStars,
    pub feedback: Option<RatingFeedback>,
}

impl CreateRating {
    pub fn from_json(input: &Value) -> Result<Self, Violations> {
        let mut reader = FieldReader::new(input, "createRating");
        let flight_id = reader.required("flightId", fields::identifier("flight ID"));
        let ratee_id = reader.required("rateeId", fields::identifier("ratee ID"));
        let stars = reader.required("stars", fields::rating_stars);
        let feedback = reader.optional("feedback", fields::rating_feedback);
        reader.finish(|| {
            Some(Self {
                flight_id: flight_id?,
                ratee_id: UserId::from_uuid(ratee_id?),
                stars: stars?,
                feedback: feedback?,
            })
        })
    }
}

/// Partial profile update. At least one field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub first_name: Option<FirstName>,
    pub languages: Option<Languages>,
}

impl UpdateUser {
    pub fn from_json(input: &Value) -> Result<Self, Violations> {
        let mut reader = FieldReader::new(input, "updateUser");
        if reader.is_object() && !reader.provides_any(&["firstName", "languages"]) {
            reader.reject(ROOT_FIELD, &FieldError::EmptyUpdate);
        }
        let first_name = reader.optional("firstName", fields::first_name);
        let languages = optional_languages(&mut reader, "languages");
        reader.finish(|| {
            Some(Self {
                first_name: first_name?,
                languages: languages?,
            })
        })
    }

    /// Apply the update to `user`, bumping `updated_at`.
    pub fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(languages) = self.languages {
            user.languages = languages;
        }
        user.updated_at = now;
    }
}
