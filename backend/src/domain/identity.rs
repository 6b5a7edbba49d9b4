//! Authenticated-user profile returned by the identity provider.
//!
//! The provider's record includes the email and, once the traveller has
//! completed onboarding, their mobile number in `user_metadata`. Both stay
//! inside this type; only masked forms are rendered.

use std::fmt;

use serde::Deserialize;

use super::privacy::mask_mobile_number;
use super::{MobileNumber, UserValidationError};

/// Provider-managed metadata attached to the profile.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
struct IdentityMetadata {
    #[serde(default)]
    mobile_number: Option<String>,
    #[serde(default)]
    mobile_verified: bool,
}

/// Profile of the currently authenticated user.
///
/// # Examples
/// ```
/// use companion::domain::identity::IdentityProfile;
///
/// let profile: IdentityProfile = serde_json::from_str(
///     r#"{"sub": "auth0|42", "email": "amy@example.com",
///         "user_metadata": {"mobile_number": "+61412345678"}}"#,
/// )
/// .unwrap();
/// assert_eq!(profile.masked_mobile().as_deref(), Some("+61***45678"));
/// assert!(!format!("{profile:?}").contains("amy@"));
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityProfile {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    user_metadata: IdentityMetadata,
}

impl IdentityProfile {
    /// Provider subject identifier.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mobile_verified(&self) -> bool {
        self.user_metadata.mobile_verified
    }

    /// Email for the owner's own account flows. Never place it in a response.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn masked_mobile(&self) -> Option<String> {
        self.user_metadata
            .mobile_number
            .as_deref()
            .map(mask_mobile_number)
    }

    /// Parse the stored mobile number, if any.
    pub fn mobile_number(&self) -> Result<Option<MobileNumber>, UserValidationError> {
        self.user_metadata
            .mobile_number
            .as_deref()
            .map(MobileNumber::parse)
            .transpose()
    }
}

impl fmt::Debug for IdentityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityProfile")
            .field("sub", &self.sub)
            .field("email", &self.email.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("mobile_number", &self.masked_mobile())
            .field("mobile_verified", &self.user_metadata.mobile_verified)
            .finish()
    }
}
