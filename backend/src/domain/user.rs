//! User data model.
//!
//! Two shapes exist. [`User`] is the public projection that may cross the
//! API boundary. [`RawUser`] additionally holds the contact details supplied
//! at registration; it does not implement `Serialize`, and its
//! `Debug` output masks the sensitive fields.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::patterns::compiled;
use super::privacy::mask_mobile_number;

/// Validation errors returned by the user newtype constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("First name is required")]
    EmptyFirstName,
    #[error("First name must be {max} characters or less")]
    FirstNameTooLong { max: usize },
    #[error("First name must start with a letter and can only contain letters, digits, spaces, hyphens, and apostrophes")]
    FirstNameInvalidCharacters,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Mobile number must be in E.164 format (e.g., +61412345678 or +61 412 345 678). Only digits, spaces, and dashes are allowed.")]
    MobileNumberFormat,
    #[error("Mobile number must be in E.164 format with up to 15 digits after the + (e.g., +61412345678)")]
    MobileNumberDigits,
    #[error("Language code must be 2 characters (ISO 639-1)")]
    LanguageCodeLength,
    #[error("Language code must be lowercase letters")]
    LanguageCodeCase,
    #[error("At least one language is required")]
    NoLanguages,
    #[error("unknown account status: {value}")]
    UnknownAccountStatus { value: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a first name, in characters.
pub const FIRST_NAME_MAX: usize = 50;

static FIRST_NAME_RE: OnceLock<Regex> = OnceLock::new();

/// First name shown to other travellers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FirstName(String);

impl FirstName {
    /// Validate and construct a [`FirstName`] from owned input.
    pub fn new(first_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(first_name.into())
    }

    fn from_owned(first_name: String) -> Result<Self, UserValidationError> {
        if first_name.is_empty() {
            return Err(UserValidationError::EmptyFirstName);
        }
        if first_name.chars().count() > FIRST_NAME_MAX {
            return Err(UserValidationError::FirstNameTooLong {
                max: FIRST_NAME_MAX,
            });
        }

        // Length is enforced above; the pattern constrains the alphabet.
        let pattern = compiled(&FIRST_NAME_RE, r"^[A-Za-z][A-Za-z0-9 '\-]*$");
        if !pattern.is_match(&first_name) {
            return Err(UserValidationError::FirstNameInvalidCharacters);
        }

        Ok(Self(first_name))
    }
}

impl AsRef<str> for FirstName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FirstName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FirstName> for String {
    fn from(value: FirstName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FirstName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static LANGUAGE_CODE_RE: OnceLock<Regex> = OnceLock::new();

/// ISO 639-1 language code such as `en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Validate and construct a [`LanguageCode`].
    pub fn new(code: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(code.into())
    }

    fn from_owned(code: String) -> Result<Self, UserValidationError> {
        if code.chars().count() != 2 {
            return Err(UserValidationError::LanguageCodeLength);
        }
        if !compiled(&LANGUAGE_CODE_RE, "^[a-z]{2}$").is_match(&code) {
            return Err(UserValidationError::LanguageCodeCase);
        }
        Ok(Self(code))
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Ordered, non-empty list of spoken languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LanguageCode>", into = "Vec<LanguageCode>")]
pub struct Languages(Vec<LanguageCode>);

impl Languages {
    /// Construct a language list, rejecting an empty one.
    pub fn new(codes: Vec<LanguageCode>) -> Result<Self, UserValidationError> {
        if codes.is_empty() {
            return Err(UserValidationError::NoLanguages);
        }
        Ok(Self(codes))
    }

    /// Borrow the codes in their original order.
    pub fn as_slice(&self) -> &[LanguageCode] {
        &self.0
    }
}

impl From<Languages> for Vec<LanguageCode> {
    fn from(value: Languages) -> Self {
        value.0
    }
}

impl TryFrom<Vec<LanguageCode>> for Languages {
    type Error = UserValidationError;

    fn try_from(value: Vec<LanguageCode>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// The account is in good standing.
    #[default]
    Active,
    /// The account is temporarily disabled.
    Suspended,
    /// The account is permanently blocked.
    Blocked,
}

impl AccountStatus {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            "BLOCKED" => Ok(Self::Blocked),
            _ => Err(UserValidationError::UnknownAccountStatus {
                value: s.to_owned(),
            }),
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Email address supplied at registration.
///
/// The value never leaves the business layer; `Debug` prints a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate the general shape of an email address.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let pattern = compiled(
            &EMAIL_RE,
            r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
        );
        if email.starts_with('.') || email.contains("..") || !pattern.is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Borrow the address. Only the owner's own flows may use this.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EmailAddress(<redacted>)")
    }
}

static MOBILE_INPUT_RE: OnceLock<Regex> = OnceLock::new();
static MOBILE_E164_RE: OnceLock<Regex> = OnceLock::new();

/// Mobile number in strict E.164 form (`+` and up to 15 digits).
///
/// The digits are zeroised when the value is dropped and `Debug` only ever
/// shows the masked form.
///
/// # Examples
/// ```
/// use companion::domain::MobileNumber;
///
/// let number = MobileNumber::parse("+61 412-345-678").unwrap();
/// assert_eq!(number.as_str(), "+61412345678");
/// assert_eq!(number.masked(), "+61***45678");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MobileNumber(Zeroizing<String>);

impl MobileNumber {
    /// Accept `+` followed by digits, spaces, or dashes, strip the
    /// separators, and re-check the result as strict E.164.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        if !compiled(&MOBILE_INPUT_RE, r"^\+[1-9][0-9 \-]{1,20}$").is_match(raw) {
            return Err(UserValidationError::MobileNumberFormat);
        }

        let stripped: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        if !compiled(&MOBILE_E164_RE, r"^\+[1-9][0-9]{1,14}$").is_match(&stripped) {
            return Err(UserValidationError::MobileNumberDigits);
        }

        Ok(Self(Zeroizing::new(stripped)))
    }

    /// Borrow the normalised E.164 digits. Never place this in a response.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Masked form suitable for showing the owner their own number.
    pub fn masked(&self) -> String {
        mask_mobile_number(self.as_str())
    }
}

impl fmt::Debug for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MobileNumber").field(&self.masked()).finish()
    }
}

/// Public user projection.
///
/// ## Invariants
/// - Carries no mobile number, email, or phone field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// First name shown to other travellers.
    pub first_name: FirstName,
    /// Spoken languages in preference order.
    pub languages: Languages,
    /// Account lifecycle state.
    pub account_status: AccountStatus,
    /// Whether the mobile number passed verification.
    pub mobile_verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Internal user record including contact details.
///
/// Lives only inside the business layer. Convert to [`User`] before anything
/// leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUser {
    /// Fields that may be shown publicly.
    pub profile: User,
    /// Registration email.
    pub email: EmailAddress,
    /// Registered mobile number.
    pub mobile_number: MobileNumber,
}

impl RawUser {
    /// Borrow the public projection.
    pub fn public(&self) -> &User {
        &self.profile
    }

    /// Drop the contact details and keep the public projection.
    pub fn into_public(self) -> User {
        self.profile
    }
}
