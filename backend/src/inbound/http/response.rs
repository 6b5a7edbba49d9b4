//! JSON responder that refuses to ship contact details.
//!
//! Handlers return [`SanitizedJson`] instead of `web::Json` for any payload
//! built from user records. The body is serialised, walked for sensitive
//! keys, and replaced by a generic internal error if one is found.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::domain::Error;
use crate::domain::privacy::{RedactedError, guard_response};

/// Serialisable body checked against the privacy deny-list before sending.
///
/// # Examples
/// ```
/// use companion::inbound::http::SanitizedJson;
/// use serde_json::json;
///
/// async fn handler() -> SanitizedJson<serde_json::Value> {
///     SanitizedJson::new(json!({"firstName": "Amy"}))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SanitizedJson<T> {
    body: T,
    status: StatusCode,
}

impl<T: Serialize> SanitizedJson<T> {
    /// Respond with `200 OK`.
    pub fn new(body: T) -> Self {
        Self {
            body,
            status: StatusCode::OK,
        }
    }

    /// Respond with `201 Created`.
    pub fn created(body: T) -> Self {
        Self {
            body,
            status: StatusCode::CREATED,
        }
    }

    fn into_response(self) -> Result<HttpResponse, Error> {
        let value = serde_json::to_value(&self.body).map_err(|err| {
            let redacted = RedactedError::from_error(&err);
            error!(error = %redacted, "response body failed to serialise");
            Error::internal("Internal server error")
        })?;
        guard_response(&value).map_err(|_| Error::internal("Internal server error"))?;
        Ok(HttpResponse::build(self.status).json(value))
    }
}

impl<T: Serialize> Responder for SanitizedJson<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        self.into_response()
            .unwrap_or_else(|error| error.error_response())
    }
}
