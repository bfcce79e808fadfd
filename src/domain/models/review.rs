use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::store::StoreId;
use crate::domain::value_objects::ReviewResponse;

pub type ReviewId = TypedId<Review>;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A Google review synced for a store, with the merchant's reply if any.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Review {
    pub id: ReviewId,
    pub store_id: StoreId,
    pub google_review_id: String,
    pub author_name: String,
    pub rating: i32,
    pub content: Option<String>,
    pub published_at: DateTime<Utc>,
    pub response: Option<ReviewResponse>,
    pub synced_at: DateTime<Utc>,
}

impl Review {
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

/// Flat row shape; the response lives in three nullable columns.
#[derive(Debug, FromRow)]
pub(crate) struct ReviewRow {
    pub id: ReviewId,
    pub store_id: StoreId,
    pub google_review_id: String,
    pub author_name: String,
    pub rating: i32,
    pub content: Option<String>,
    pub published_at: DateTime<Utc>,
    pub response_content: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub synced_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        let response = match (row.response_content, row.responded_by, row.responded_at) {
            (Some(content), Some(by), Some(at)) => Some(ReviewResponse::restore(content, by, at)),
            _ => None,
        };
        Self {
            id: row.id,
            store_id: row.store_id,
            google_review_id: row.google_review_id,
            author_name: row.author_name,
            rating: row.rating,
            content: row.content,
            published_at: row.published_at,
            response,
            synced_at: row.synced_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total: i64,
    pub average_rating: Option<f64>,
    pub responded: i64,
}

impl ReviewStats {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::default();
        }
        let total = reviews.len() as i64;
        let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
        Self {
            total,
            average_rating: Some(sum as f64 / total as f64),
            responded: reviews.iter().filter(|r| r.has_response()).count() as i64,
        }
    }

    pub fn response_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.responded as f64 / self.total as f64
        }
    }
}
