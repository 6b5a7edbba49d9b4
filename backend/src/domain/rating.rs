//! Post-trip ratings travellers leave for each other.

use serde::{Deserialize, Serialize};

/// Lowest accepted star rating.
pub const RATING_STARS_MIN: i64 = 1;
/// Highest accepted star rating.
pub const RATING_STARS_MAX: i64 = 5;
/// Maximum feedback length, in characters.
pub const RATING_FEEDBACK_MAX: usize = 500;

/// Validation errors for rating payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    #[error("Rating must be a whole number")]
    StarsNotWhole,
    #[error("Rating must be at least 1 star")]
    StarsTooLow,
    #[error("Rating must be at most 5 stars")]
    StarsTooHigh,
    #[error("Feedback must be 500 characters or less")]
    FeedbackTooLong,
}

/// Star rating between one and five inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingStars(u8);

impl RatingStars {
    /// Validate the range.
    pub fn new(stars: i64) -> Result<Self, RatingValidationError> {
        if stars < RATING_STARS_MIN {
            return Err(RatingValidationError::StarsTooLow);
        }
        if stars > RATING_STARS_MAX {
            return Err(RatingValidationError::StarsTooHigh);
        }
        u8::try_from(stars)
            .map(Self)
            .map_err(|_| RatingValidationError::StarsTooHigh)
    }

    /// Numeric value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<RatingStars> for u8 {
    fn from(value: RatingStars) -> Self {
        value.0
    }
}

impl TryFrom<i64> for RatingStars {
    type Error = RatingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Optional free-text feedback attached to a rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RatingFeedback(String);

impl RatingFeedback {
    /// Accept up to [`RATING_FEEDBACK_MAX`] characters.
    pub fn new(feedback: impl Into<String>) -> Result<Self, RatingValidationError> {
        let feedback = feedback.into();
        if feedback.chars().count() > RATING_FEEDBACK_MAX {
            return Err(RatingValidationError::FeedbackTooLong);
        }
        Ok(Self(feedback))
    }
}

impl AsRef<str> for RatingFeedback {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RatingFeedback> for String {
    fn from(value: RatingFeedback) -> Self {
        value.0
    }
}

impl TryFrom<String> for RatingFeedback {
    type Error = RatingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
