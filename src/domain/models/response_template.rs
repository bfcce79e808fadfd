use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::brand::BrandId;
use crate::domain::models::review::{MAX_RATING, MIN_RATING};
use crate::error::AppError;

pub type ResponseTemplateId = TypedId<ResponseTemplate>;

string_enum! {
    pub enum ResponseTone {
        Professional => "PROFESSIONAL",
        Friendly => "FRIENDLY",
        Enthusiastic => "ENTHUSIASTIC",
        Apologetic => "APOLOGETIC",
    }
}

impl Default for ResponseTone {
    fn default() -> Self {
        ResponseTone::Professional
    }
}

/// Canned reply a brand can reuse, optionally scoped to a rating range.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ResponseTemplate {
    pub id: ResponseTemplateId,
    pub brand_id: BrandId,
    pub name: String,
    pub content: String,
    pub tone: ResponseTone,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewResponseTemplateParams {
    pub brand_id: BrandId,
    pub name: String,
    pub content: String,
    pub tone: ResponseTone,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
}

impl ResponseTemplate {
    pub fn new(params: NewResponseTemplateParams) -> Result<Self, AppError> {
        let name = params.name.trim().to_string();
        let content = params.content.trim().to_string();
        if name.is_empty() || content.is_empty() {
            return Err(AppError::Validation("Template name and content are required".into()));
        }
        for rating in [params.min_rating, params.max_rating].into_iter().flatten() {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(AppError::Validation(format!(
                    "Template ratings must be between {} and {}",
                    MIN_RATING, MAX_RATING
                )));
            }
        }
        if let (Some(min), Some(max)) = (params.min_rating, params.max_rating) {
            if min > max {
                return Err(AppError::Validation("min_rating cannot exceed max_rating".into()));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: ResponseTemplateId::new(),
            brand_id: params.brand_id,
            name,
            content,
            tone: params.tone,
            min_rating: params.min_rating,
            max_rating: params.max_rating,
            created_at: now,
            updated_at: now,
        })
    }

    /// Open bounds match everything on that side.
    pub fn matches_rating(&self, rating: i32) -> bool {
        self.min_rating.is_none_or(|min| rating >= min) && self.max_rating.is_none_or(|max| rating <= max)
    }

    /// Substitutes `{author}` and `{store}` placeholders.
    pub fn render(&self, author_name: &str, store_name: &str) -> String {
        self.content.replace("{author}", author_name).replace("{store}", store_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(min: Option<i32>, max: Option<i32>) -> Result<ResponseTemplate, AppError> {
        ResponseTemplate::new(NewResponseTemplateParams {
            brand_id: BrandId::from("brand-1"),
            name: "Thanks".into(),
            content: "Thanks {author}, see you soon at {store}!".into(),
            tone: ResponseTone::Friendly,
            min_rating: min,
            max_rating: max,
        })
    }

    #[test]
    fn test_rating_range() {
        let t = template(Some(4), Some(5)).unwrap();
        assert!(t.matches_rating(4));
        assert!(t.matches_rating(5));
        assert!(!t.matches_rating(3));

        let open = template(None, Some(2)).unwrap();
        assert!(open.matches_rating(1));
        assert!(!open.matches_rating(3));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(template(Some(0), None).is_err());
        assert!(template(Some(5), Some(4)).is_err());
        assert!(template(None, Some(6)).is_err());
    }

    #[test]
    fn test_render() {
        let t = template(None, None).unwrap();
        assert_eq!(t.render("Ana", "Chez Paul"), "Thanks Ana, see you soon at Chez Paul!");
    }
}
