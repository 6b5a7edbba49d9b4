//! Domain primitives, the privacy boundary, and input validation.
//!
//! Purpose: define strongly typed values for everything the service accepts
//! or returns, so contact details can only move through types that refuse to
//! serialise or print them.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - User (alias to `user::User`): public user projection; `RawUser` holds
//!   the contact details and never leaves the business layer.
//! - Flight, SearchResult, SearchResponse: route and search payloads.
//! - `privacy`: stripping, masking, assertion, and redaction.
//! - `validation`: field parsers and composite input schemas.

pub mod error;
pub mod flight;
pub mod identity;
pub mod messaging;
mod patterns;
pub mod privacy;
pub mod rating;
pub mod search;
pub mod user;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::flight::{
    AirportCode, DataSource, Flight, FlightNumber, FlightValidationError, TravelDate,
};
pub use self::messaging::{
    ConversationStatus, MESSAGE_CONTENT_MAX, MessageContent, MessagingValidationError,
};
pub use self::rating::{
    RATING_FEEDBACK_MAX, RATING_STARS_MAX, RATING_STARS_MIN, RatingFeedback, RatingStars,
    RatingValidationError,
};
pub use self::search::{FlightSummary, SearchResponse, SearchResult, SearchResultUser};
pub use self::user::{
    AccountStatus, EmailAddress, FIRST_NAME_MAX, FirstName, LanguageCode, Languages,
    MobileNumber, RawUser, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use companion::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
