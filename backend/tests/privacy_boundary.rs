//! End-to-end tests for the privacy boundary behind actix-web handlers.
//!
//! Handlers here mirror how the service wires validation, projection, and
//! the sanitised responder: input is validated, records carry contact
//! details internally, and only sanitised payloads leave.

use std::collections::HashMap;

use actix_web::{
    App, HttpResponse,
    body::to_bytes,
    http::StatusCode,
    test::{self, TestRequest},
    web,
};
use chrono::{TimeZone, Utc};
use companion::domain::privacy::{mask_mobile_number, strip_sensitive_from};
use companion::domain::validation::{CreateUser, SearchParams};
use companion::domain::{
    AirportCode, ApiResult, DataSource, Error, ErrorCode, Flight, SearchResponse, SearchResult,
    User, UserId,
};
use companion::inbound::http::SanitizedJson;
use rstest::rstest;
use serde_json::{Map, Value, json};
use uuid::Uuid;

const OWNER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

async fn register(body: web::Json<Value>) -> ApiResult<SanitizedJson<User>> {
    let form = CreateUser::from_json(&body)?;
    let id = UserId::new(OWNER_ID).map_err(|_| Error::internal("bad fixture id"))?;
    let raw = form.into_raw_user(id, created_at());
    Ok(SanitizedJson::created(raw.into_public()))
}

async fn search(
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<SanitizedJson<SearchResponse>> {
    let input: Map<String, Value> = query
        .into_inner()
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    let params = SearchParams::from_json(&Value::Object(input))?;

    let registration = CreateUser::from_json(&json!({
        "firstName": "Bo",
        "email": "bo@example.com",
        "mobileNumber": "+61498765432",
        "languages": ["en"],
    }))?;
    let traveller = registration.into_raw_user(UserId::random(), created_at());
    let flight = Flight {
        id: Uuid::nil(),
        user_id: traveller.public().id.clone(),
        source_airport: params.source_airport.clone(),
        destination_airport: params.destination_airport.clone(),
        travel_date: chrono::NaiveDate::from_ymd_opt(2026, 6, 15)
            .ok_or_else(|| Error::internal("bad fixture date"))?,
        flight_number: None,
        data_source: DataSource::Manual,
        created_at: created_at(),
    };
    let results = vec![SearchResult::new(traveller.public(), &flight, params.travel_date)];
    Ok(SanitizedJson::new(SearchResponse::new(results, 1, &params)))
}

async fn leaky_profile() -> SanitizedJson<Value> {
    SanitizedJson::new(json!({"user": {"firstName": "Bo", "mobileNumber": "+61498765432"}}))
}

async fn stripped_profile() -> ApiResult<SanitizedJson<Value>> {
    let record = json!({"firstName": "Bo", "mobile": "+61498765432", "email": "bo@example.com"});
    let stripped = strip_sensitive_from(&record).map_err(|_| Error::internal("serialise"))?;
    Ok(SanitizedJson::new(stripped))
}

async fn own_number() -> HttpResponse {
    HttpResponse::Ok().json(json!({"masked": mask_mobile_number("+61412345678")}))
}

async fn conflict() -> ApiResult<HttpResponse> {
    Err(Error::conflict("+61412345678 is already registered to amy@example.com")
        .with_trace_id("trace-42"))
}

async fn call(request: TestRequest) -> (StatusCode, Value, String) {
    let service = test::init_service(
        App::new()
            .route("/users", web::post().to(register))
            .route("/search", web::get().to(search))
            .route("/leaky", web::get().to(leaky_profile))
            .route("/stripped", web::get().to(stripped_profile))
            .route("/me/mobile", web::get().to(own_number))
            .route("/conflict", web::get().to(conflict)),
    )
    .await;
    let response = test::call_service(&service, request.to_request()).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let text = String::from_utf8(bytes.to_vec()).expect("body is UTF-8");
    let value = serde_json::from_str(&text).expect("body is JSON");
    (status, value, text)
}

#[rstest]
#[actix_web::test]
async fn registration_returns_public_projection_only() {
    let (status, body, text) = call(TestRequest::post().uri("/users").set_json(json!({
        "firstName": "Amy",
        "email": "amy@example.com",
        "mobileNumber": "+61 412 345 678",
        "languages": ["en"],
    })))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["firstName"], json!("Amy"));
    assert_eq!(body["accountStatus"], json!("ACTIVE"));
    assert!(!text.contains("412345678"));
    assert!(!text.contains("amy@example.com"));
}

#[rstest]
#[actix_web::test]
async fn invalid_registration_lists_every_violation() {
    let (status, body, _) = call(TestRequest::post().uri("/users").set_json(json!({
        "firstName": "9lives",
        "email": "amy@",
        "languages": [],
    })))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Error = serde_json::from_value(body.clone()).expect("error payload");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let fields: Vec<&str> = body["details"]["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .filter_map(|violation| violation["field"].as_str())
        .collect();
    assert_eq!(
        fields,
        vec!["firstName", "email", "mobileNumber", "languages"]
    );
}

#[rstest]
#[actix_web::test]
async fn search_normalises_query_and_hides_contact_details() {
    let (status, body, text) = call(
        TestRequest::get()
            .uri("/search?sourceAirport=syd&destinationAirport=mel&travelDate=2026-06-13"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["totalPages"], json!(1));
    let result = &body["results"][0];
    assert_eq!(result["flight"]["sourceAirport"], json!("SYD"));
    assert_eq!(result["flight"]["destinationAirport"], json!("MEL"));
    assert_eq!(result["distance"], json!(2));
    assert_eq!(
        result["user"]
            .as_object()
            .map(|user| user.keys().cloned().collect::<Vec<_>>()),
        Some(vec![
            "id".to_owned(),
            "firstName".to_owned(),
            "languages".to_owned(),
            "mobileVerified".to_owned(),
        ])
    );
    assert!(!text.contains("498765432"));
    assert!(!text.contains("bo@example.com"));
}

#[rstest]
#[actix_web::test]
async fn search_rejects_oversized_page() {
    let (status, body, _) = call(
        TestRequest::get().uri("/search?sourceAirport=SYD&destinationAirport=MEL&limit=500"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"]["violations"][0],
        json!({"field": "limit", "message": "Must be 100 or less"})
    );
}

#[rstest]
#[actix_web::test]
async fn leaking_handler_is_stopped_at_the_boundary() {
    let (status, body, text) = call(TestRequest::get().uri("/leaky")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("Internal server error"));
    assert!(!text.contains("498765432"));
}

#[rstest]
#[actix_web::test]
async fn stripped_record_passes_the_boundary() {
    let (status, body, _) = call(TestRequest::get().uri("/stripped")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"firstName": "Bo"}));
}

#[rstest]
#[actix_web::test]
async fn owner_sees_only_masked_number() {
    let (_, body, _) = call(TestRequest::get().uri("/me/mobile")).await;
    assert_eq!(body, json!({"masked": "+61***45678"}));
}

#[rstest]
#[actix_web::test]
async fn client_errors_are_redacted_before_sending() {
    let (status, body, text) = call(TestRequest::get().uri("/conflict")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        json!("[REDACTED] is already registered to [REDACTED]")
    );
    assert_eq!(body["traceId"], json!("trace-42"));
    assert!(!text.contains("412345678"));
}

#[rstest]
fn airport_codes_in_search_are_uppercase() {
    let code = AirportCode::new("syd").expect("valid code");
    assert_eq!(code.as_ref(), "SYD");
}
