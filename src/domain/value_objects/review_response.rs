use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

pub const MIN_RESPONSE_LENGTH: usize = 10;
pub const MAX_RESPONSE_LENGTH: usize = 5000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewResponseError {
    #[error("Response must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
    #[error("Response must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
    #[error("Responder must be provided")]
    MissingResponder,
}

impl From<ReviewResponseError> for AppError {
    fn from(e: ReviewResponseError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// A merchant's reply to a Google review. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    content: String,
    responded_by: String,
    responded_at: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn create(
        content: &str,
        responded_by: &str,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ReviewResponseError> {
        let content = content.trim();
        let length = content.chars().count();

        if length < MIN_RESPONSE_LENGTH {
            return Err(ReviewResponseError::TooShort { min: MIN_RESPONSE_LENGTH, actual: length });
        }
        if length > MAX_RESPONSE_LENGTH {
            return Err(ReviewResponseError::TooLong { max: MAX_RESPONSE_LENGTH, actual: length });
        }
        if responded_by.trim().is_empty() {
            return Err(ReviewResponseError::MissingResponder);
        }

        Ok(Self {
            content: content.to_string(),
            responded_by: responded_by.trim().to_string(),
            responded_at: responded_at.unwrap_or_else(Utc::now),
        })
    }

    /// Rebuilds a response that was validated before it was stored.
    pub(crate) fn restore(content: String, responded_by: String, responded_at: DateTime<Utc>) -> Self {
        Self { content, responded_by, responded_at }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn responded_by(&self) -> &str {
        &self.responded_by
    }

    pub fn responded_at(&self) -> DateTime<Utc> {
        self.responded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_minimum_is_rejected() {
        let err = ReviewResponse::create("short", "owner-1", None).unwrap_err();
        assert_eq!(err, ReviewResponseError::TooShort { min: 10, actual: 5 });
    }

    #[test]
    fn test_above_maximum_is_rejected() {
        let err = ReviewResponse::create(&"a".repeat(5001), "owner-1", None).unwrap_err();
        assert_eq!(err, ReviewResponseError::TooLong { max: 5000, actual: 5001 });
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(ReviewResponse::create(&"a".repeat(10), "owner-1", None).is_ok());
        assert!(ReviewResponse::create(&"a".repeat(5000), "owner-1", None).is_ok());
    }

    #[test]
    fn test_content_is_trimmed_before_measuring() {
        let err = ReviewResponse::create("   123456789   ", "owner-1", None).unwrap_err();
        assert!(matches!(err, ReviewResponseError::TooShort { actual: 9, .. }));

        let ok = ReviewResponse::create("  Thanks a lot!  ", "owner-1", None).unwrap();
        assert_eq!(ok.content(), "Thanks a lot!");
    }

    #[test]
    fn test_explicit_timestamp_is_kept() {
        let at = DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z").unwrap().with_timezone(&Utc);
        let response = ReviewResponse::create("Merci pour votre avis !", "owner-1", Some(at)).unwrap();
        assert_eq!(response.responded_at(), at);
        assert_eq!(response.responded_by(), "owner-1");
    }
}
