//! HTTP inbound adapter helpers for actix-web handlers.
//!
//! Routing lives with the application; this module supplies the pieces every
//! handler shares: mapping domain errors to responses and a JSON responder
//! that enforces the privacy boundary.

pub mod error;
pub mod response;

pub use response::SanitizedJson;
