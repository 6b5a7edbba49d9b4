//! Privacy and validation core for the travel companion service.
//!
//! - [`domain`] holds the typed values, the privacy boundary, and the input
//!   schemas.
//! - [`config`] reads identity-provider settings from the environment.
//! - [`inbound`] adapts domain errors and payloads to actix-web.

pub mod config;
pub mod domain;
pub mod inbound;
