//! Tests for the field reader, field parsers, and composite schemas.

use super::*;
use crate::domain::{DataSource, ErrorCode, UserId};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn clock() -> FixtureClock {
    FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2026, 3, 10, 23, 30, 0)
            .single()
            .expect("valid fixture timestamp"),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn fields_of(violations: &Violations) -> Vec<&str> {
    violations.as_slice().iter().map(Violation::field).collect()
}

fn only_message(violations: &Violations, field: &str) -> String {
    let messages: Vec<&str> = violations.messages_for(field).collect();
    assert_eq!(messages.len(), 1, "expected one message for {field:?}");
    messages[0].to_owned()
}

#[rstest]
fn create_user_normalises_mobile_number() {
    let form = CreateUser::from_json(&json!({
        "firstName": "Amy",
        "email": "amy@example.com",
        "mobileNumber": "+61 412-345 678",
        "languages": ["en", "fr"],
        "ignored": true,
    }))
    .expect("valid registration");

    assert_eq!(form.mobile_number.as_str(), "+61412345678");
    assert_eq!(form.first_name.as_ref(), "Amy");
    assert_eq!(form.languages.as_slice().len(), 2);
}

#[rstest]
fn create_user_accumulates_every_violation_in_field_order() {
    let violations = CreateUser::from_json(&json!({
        "firstName": "",
        "email": "not-an-email",
        "mobileNumber": "0412345678",
        "languages": ["en", "FR", "eng"],
    }))
    .expect_err("invalid registration");

    assert_eq!(
        fields_of(&violations),
        vec![
            "firstName",
            "email",
            "mobileNumber",
            "languages[1]",
            "languages[2]"
        ]
    );
    assert_eq!(only_message(&violations, "firstName"), "First name is required");
    assert_eq!(only_message(&violations, "email"), "Invalid email format");
    assert_eq!(
        only_message(&violations, "languages[1]"),
        "Language code must be lowercase letters"
    );
    assert_eq!(
        only_message(&violations, "languages[2]"),
        "Language code must be 2 characters (ISO 639-1)"
    );
}

#[rstest]
fn create_user_reports_missing_fields() {
    let violations = CreateUser::from_json(&json!({"firstName": "Amy", "email": null}))
        .expect_err("incomplete registration");
    assert_eq!(
        fields_of(&violations),
        vec!["email", "mobileNumber", "languages"]
    );
    assert_eq!(only_message(&violations, "email"), "Required");
}

#[rstest]
fn create_user_rejects_empty_language_list() {
    let violations = CreateUser::from_json(&json!({
        "firstName": "Amy",
        "email": "amy@example.com",
        "mobileNumber": "+61412345678",
        "languages": [],
    }))
    .expect_err("no languages");
    assert_eq!(
        only_message(&violations, "languages"),
        "At least one language is required"
    );
}

#[rstest]
fn mobile_number_with_too_many_digits_fails_the_strict_check() {
    let violations = CreateUser::from_json(&json!({
        "firstName": "Amy",
        "email": "amy@example.com",
        "mobileNumber": "+61 4123 4567 8901 23",
        "languages": ["en"],
    }))
    .expect_err("sixteen digits");
    assert!(only_message(&violations, "mobileNumber").contains("up to 15 digits"));
}

#[rstest]
fn create_user_converts_to_inactive_unverified_account() {
    let form = CreateUser::from_json(&json!({
        "firstName": "Amy",
        "email": "amy@example.com",
        "mobileNumber": "+61412345678",
        "languages": ["en"],
    }))
    .expect("valid registration");
    let now = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    let id = UserId::random();

    let raw = form.into_raw_user(id.clone(), now);

    assert_eq!(raw.public().id, id);
    assert!(!raw.public().mobile_verified);
    assert_eq!(raw.mobile_number.as_str(), "+61412345678");
}

#[rstest]
#[case(json!([]))]
#[case(json!("text"))]
#[case(json!(null))]
#[case(json!(42))]
fn non_object_input_yields_one_root_violation(#[case] input: Value) {
    let violations = CreateUser::from_json(&input).expect_err("non-object input");
    assert_eq!(fields_of(&violations), vec![ROOT_FIELD]);
    assert_eq!(only_message(&violations, ROOT_FIELD), "Expected an object");
}

#[rstest]
fn create_flight_defaults_to_manual_source(clock: FixtureClock) {
    let flight = CreateFlight::from_json(
        &json!({
            "sourceAirport": "syd",
            "destinationAirport": "mel",
            "travelDate": "2026-03-10",
        }),
        &clock,
    )
    .expect("valid flight");

    assert_eq!(flight.data_source, DataSource::Manual);
    assert_eq!(flight.travel_date.date(), date(2026, 3, 10));
    assert_eq!(flight.source_airport.as_ref(), "SYD");
    assert!(flight.flight_number.is_none());
}

#[rstest]
#[case(json!("2026-03-11T09:00:00+10:00"), date(2026, 3, 10))]
#[case(json!("2026-04-01T00:00:00Z"), date(2026, 4, 1))]
#[case(json!(1_775_001_600_000_i64), date(2026, 4, 1))]
fn travel_date_accepts_timestamps(
    clock: FixtureClock,
    #[case] travel_date: Value,
    #[case] expected: NaiveDate,
) {
    let flight = CreateFlight::from_json(
        &json!({
            "sourceAirport": "SYD",
            "destinationAirport": "MEL",
            "travelDate": travel_date,
            "flightNumber": "QF1",
            "dataSource": "IMPORTED",
        }),
        &clock,
    )
    .expect("valid flight");
    assert_eq!(flight.travel_date.date(), expected);
    assert_eq!(flight.data_source, DataSource::Imported);
}

#[rstest]
#[case(json!("2026-03-09"), "Travel date must be today or in the future")]
#[case(json!("next tuesday"), "Travel date must be a valid date")]
#[case(json!(true), "Travel date must be a valid date")]
fn create_flight_rejects_bad_travel_dates(
    clock: FixtureClock,
    #[case] travel_date: Value,
    #[case] expected: &str,
) {
    let violations = CreateFlight::from_json(
        &json!({
            "sourceAirport": "SYD",
            "destinationAirport": "MEL",
            "travelDate": travel_date,
        }),
        &clock,
    )
    .expect_err("bad travel date");
    assert_eq!(only_message(&violations, "travelDate"), expected);
}

#[rstest]
fn create_flight_treats_null_flight_number_as_absent(clock: FixtureClock) {
    let flight = CreateFlight::from_json(
        &json!({
            "sourceAirport": "SYD",
            "destinationAirport": "MEL",
            "travelDate": "2026-05-01",
            "flightNumber": null,
        }),
        &clock,
    )
    .expect("valid flight");
    assert!(flight.flight_number.is_none());
}

#[rstest]
fn create_flight_rejects_malformed_flight_number(clock: FixtureClock) {
    let violations = CreateFlight::from_json(
        &json!({
            "sourceAirport": "SYD",
            "destinationAirport": "MEL",
            "travelDate": "2026-05-01",
            "flightNumber": "qf1",
            "dataSource": "SCRAPED",
        }),
        &clock,
    )
    .expect_err("bad optional fields");
    assert_eq!(fields_of(&violations), vec!["flightNumber", "dataSource"]);
}

#[rstest]
#[case(json!({}))]
#[case(json!({"flightNumber": null, "notes": "x"}))]
fn update_flight_requires_at_least_one_field(clock: FixtureClock, #[case] input: Value) {
    let violations = UpdateFlight::from_json(&input, &clock).expect_err("empty update");
    assert_eq!(
        only_message(&violations, ROOT_FIELD),
        "At least one field must be provided for update"
    );
}

#[rstest]
fn update_flight_accepts_single_field(clock: FixtureClock) {
    let update = UpdateFlight::from_json(&json!({"destinationAirport": "bne"}), &clock)
        .expect("valid update");
    assert_eq!(
        update.destination_airport.map(String::from),
        Some("BNE".to_owned())
    );
    assert!(update.source_airport.is_none());
}

#[rstest]
fn search_applies_defaults_and_uppercases() {
    let params = SearchParams::from_json(&json!({
        "sourceAirport": "syd",
        "destinationAirport": "mel",
    }))
    .expect("valid search");
    assert_eq!(params.source_airport.as_ref(), "SYD");
    assert_eq!(params.destination_airport.as_ref(), "MEL");
    assert_eq!(params.page, SEARCH_PAGE_DEFAULT);
    assert_eq!(params.limit, SEARCH_LIMIT_DEFAULT);
    assert_eq!(params.offset(), 0);
    assert!(params.travel_date.is_none());
    assert!(params.languages.is_none());
}

#[rstest]
fn search_accepts_query_string_numbers_and_past_dates() {
    let params = SearchParams::from_json(&json!({
        "sourceAirport": "SYD",
        "destinationAirport": "MEL",
        "travelDate": "2020-01-01",
        "languages": ["en"],
        "page": "3",
        "limit": 25,
    }))
    .expect("valid search");
    assert_eq!((params.page, params.limit), (3, 25));
    assert_eq!(params.offset(), 50);
    assert_eq!(params.travel_date, Some(date(2020, 1, 1)));
}

#[rstest]
#[case(json!(101), "limit", "Must be 100 or less")]
#[case(json!(0), "limit", "Must be a positive integer")]
#[case(json!(-2), "limit", "Must be a positive integer")]
#[case(json!(2.5), "limit", "Expected an integer")]
#[case(json!("ten"), "limit", "Expected an integer")]
#[case(json!(true), "limit", "Expected a number")]
fn search_rejects_bad_paging(#[case] value: Value, #[case] field: &str, #[case] expected: &str) {
    let mut input = json!({"sourceAirport": "SYD", "destinationAirport": "MEL"});
    input[field] = value;
    let violations = SearchParams::from_json(&input).expect_err("bad paging");
    assert_eq!(only_message(&violations, field), expected);
}

#[rstest]
fn search_allows_limit_at_maximum() {
    let params = SearchParams::from_json(&json!({
        "sourceAirport": "SYD",
        "destinationAirport": "MEL",
        "limit": "100",
    }))
    .expect("limit at maximum");
    assert_eq!(params.limit, SEARCH_LIMIT_MAX);
}

#[rstest]
fn create_message_names_the_bad_identifier() {
    let violations = CreateMessage::from_json(&json!({
        "conversationId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "recipientId": "someone",
        "content": "",
    }))
    .expect_err("bad message");
    assert_eq!(fields_of(&violations), vec!["recipientId", "content"]);
    assert_eq!(only_message(&violations, "recipientId"), "Invalid recipient ID");
    assert_eq!(only_message(&violations, "content"), "Message cannot be empty");
}

#[rstest]
fn create_message_accepts_valid_input() {
    let message = CreateMessage::from_json(&json!({
        "conversationId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "recipientId": "9b2e5c1a-7d44-4c1e-8f2a-1a2b3c4d5e6f",
        "content": "See you at the gate",
    }))
    .expect("valid message");
    assert_eq!(message.content.as_ref(), "See you at the gate");
    assert_eq!(
        message.recipient_id.as_ref(),
        "9b2e5c1a-7d44-4c1e-8f2a-1a2b3c4d5e6f"
    );
}

#[rstest]
#[case(json!(4), true)]
#[case(json!(4.0), true)]
#[case(json!(4.5), false)]
#[case(json!(0), false)]
#[case(json!(6), false)]
#[case(json!("4"), false)]
fn rating_stars_must_be_whole_and_in_range(#[case] stars: Value, #[case] accepted: bool) {
    let outcome = CreateRating::from_json(&json!({
        "flightId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "rateeId": "9b2e5c1a-7d44-4c1e-8f2a-1a2b3c4d5e6f",
        "stars": stars,
    }));
    assert_eq!(outcome.is_ok(), accepted);
}

#[rstest]
#[case(json!(4.5), "Rating must be a whole number")]
#[case(json!(0), "Rating must be at least 1 star")]
#[case(json!(-1.0), "Rating must be at least 1 star")]
#[case(json!(6), "Rating must be at most 5 stars")]
#[case(json!(u64::MAX), "Rating must be at most 5 stars")]
fn rating_stars_messages(#[case] stars: Value, #[case] expected: &str) {
    assert_eq!(
        fields::rating_stars(&stars)
            .expect_err("invalid stars")
            .to_string(),
        expected
    );
}

#[rstest]
fn create_rating_limits_feedback() {
    let violations = CreateRating::from_json(&json!({
        "flightId": "nope",
        "rateeId": "9b2e5c1a-7d44-4c1e-8f2a-1a2b3c4d5e6f",
        "stars": 5,
        "feedback": "a".repeat(501),
    }))
    .expect_err("bad rating");
    assert_eq!(fields_of(&violations), vec!["flightId", "feedback"]);
    assert_eq!(only_message(&violations, "flightId"), "Invalid flight ID");
    assert_eq!(
        only_message(&violations, "feedback"),
        "Feedback must be 500 characters or less"
    );
}

#[rstest]
fn update_user_requires_a_field() {
    let violations = UpdateUser::from_json(&json!({"email": "amy@example.com"}))
        .expect_err("nothing to update");
    assert_eq!(fields_of(&violations), vec![ROOT_FIELD]);
}

#[rstest]
fn update_user_validates_languages_list() {
    let violations =
        UpdateUser::from_json(&json!({"languages": []})).expect_err("empty language list");
    assert_eq!(
        only_message(&violations, "languages"),
        "At least one language is required"
    );
}

#[rstest]
fn standalone_languages_parser_reports_first_bad_item() {
    assert_eq!(
        fields::languages(&json!(["en", "X"])),
        Err(FieldError::User(
            crate::domain::UserValidationError::LanguageCodeLength
        ))
    );
    assert!(fields::languages(&json!(["en"])).is_ok());
}

#[rstest]
fn violations_convert_to_invalid_request_error() {
    let violations = SearchParams::from_json(&json!({"sourceAirport": "SY"}))
        .expect_err("bad search");

    assert_eq!(
        violations.to_string(),
        "sourceAirport: Airport code must be exactly 3 characters; destinationAirport: Required"
    );

    let error: crate::domain::Error = violations.into();
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Request validation failed");
    assert_eq!(
        error.details(),
        Some(&json!({"violations": [
            {"field": "sourceAirport", "message": "Airport code must be exactly 3 characters"},
            {"field": "destinationAirport", "message": "Required"},
        ]}))
    );
}

#[rstest]
fn violation_messages_never_echo_input() {
    let violations = CreateUser::from_json(&json!({
        "firstName": "Amy",
        "email": "leak@example",
        "mobileNumber": "+99 8877 6655 4433 22",
        "languages": ["en"],
    }))
    .expect_err("bad contact details");
    assert_eq!(violations.len(), 2);
    let rendered = violations.to_string();
    assert!(!rendered.contains("leak@example"));
    assert!(!rendered.contains("8877"));
    assert!(!rendered.contains("4433"));
}
