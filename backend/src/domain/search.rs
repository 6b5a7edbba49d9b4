//! Search result projections.
//!
//! Search results are the widest-exposure surface in the service: every
//! traveller on a route sees them. The projections here are allow-lists, so
//! fields added to [`User`] or [`Flight`] later never flow into results
//! unless added here explicitly.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::privacy::build_search_result_projection;
use super::validation::SearchParams;
use super::{AirportCode, FirstName, Flight, Languages, RawUser, User, UserId};

/// The only user fields a search result may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultUser {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "Amy")]
    pub first_name: FirstName,
    #[schema(value_type = Vec<String>)]
    pub languages: Languages,
    pub mobile_verified: bool,
}

impl From<&User> for SearchResultUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            languages: user.languages.clone(),
            mobile_verified: user.mobile_verified,
        }
    }
}

impl From<&RawUser> for SearchResultUser {
    fn from(user: &RawUser) -> Self {
        Self::from(user.public())
    }
}

/// The only flight fields a search result may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlightSummary {
    pub id: Uuid,
    #[schema(value_type = String, example = "SYD")]
    pub source_airport: AirportCode,
    #[schema(value_type = String, example = "MEL")]
    pub destination_airport: AirportCode,
    #[schema(value_type = String, example = "2026-12-01")]
    pub travel_date: NaiveDate,
}

impl From<&Flight> for FlightSummary {
    fn from(flight: &Flight) -> Self {
        Self {
            id: flight.id,
            source_airport: flight.source_airport.clone(),
            destination_airport: flight.destination_airport.clone(),
            travel_date: flight.travel_date,
        }
    }
}

/// A matching traveller and their flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub user: SearchResultUser,
    pub flight: FlightSummary,
    /// Days between the flight and the searched date; zero without a date.
    pub distance: u64,
}

impl SearchResult {
    /// Project a user and flight into a result.
    pub fn new(user: &User, flight: &Flight, searched: Option<NaiveDate>) -> Self {
        let distance = searched.map_or(0, |date| {
            flight.travel_date.signed_duration_since(date).num_days().unsigned_abs()
        });
        Self {
            user: build_search_result_projection(user),
            flight: FlightSummary::from(flight),
            distance,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

impl SearchResponse {
    /// Wrap a page of results using the paging of `params`.
    pub fn new(results: Vec<SearchResult>, total: u64, params: &SearchParams) -> Self {
        let limit = u64::from(params.limit);
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            results,
            total,
            page: params.page,
            total_pages,
        }
    }
}
