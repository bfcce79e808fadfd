use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::actor::UserId;
use crate::domain::ids::TypedId;
use crate::error::AppError;

pub type BrandId = TypedId<Brand>;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub logo_url: String,
    pub owner_id: UserId,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBrandParams {
    pub name: String,
    pub logo_url: String,
    pub owner_id: UserId,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
}

impl Brand {
    pub fn new(params: NewBrandParams) -> Self {
        let now = Utc::now();
        Self {
            id: BrandId::new(),
            name: params.name.trim().to_string(),
            logo_url: params.logo_url.trim().to_string(),
            owner_id: params.owner_id,
            primary_color: params.primary_color,
            secondary_color: params.secondary_color,
            font: params.font,
            is_paid: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks the invariants every persisted brand must satisfy.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Brand name is required".into()));
        }
        validate_http_url("logo_url", &self.logo_url)?;
        for (field, color) in [("primary_color", &self.primary_color), ("secondary_color", &self.secondary_color)] {
            if let Some(color) = color {
                validate_hex_color(field, color)?;
            }
        }
        Ok(())
    }
}

pub fn validate_http_url(field: &str, raw: &str) -> Result<(), AppError> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|_| AppError::Validation(format!("{} must be a valid URL", field)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::Validation(format!("{} must be an http(s) URL", field)));
    }
    Ok(())
}

pub fn validate_hex_color(field: &str, raw: &str) -> Result<(), AppError> {
    let hex = raw.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::Validation(format!("{} must be a hex color like #1A2B3C", field)));
    }
    Ok(())
}
