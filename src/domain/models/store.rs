use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::brand::{validate_http_url, BrandId};
use crate::domain::models::campaign::CampaignId;
use crate::error::AppError;

pub type StoreId = TypedId<Store>;

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 64;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub slug: String,
    pub google_business_url: String,
    pub google_place_id: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_paid: bool,
    pub brand_id: BrandId,
    /// Campaign the printed QR code currently lands on. The public URL never changes.
    pub qr_campaign_id: Option<CampaignId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewStoreParams {
    pub brand_id: BrandId,
    pub name: String,
    pub slug: String,
    pub google_business_url: String,
    pub google_place_id: Option<String>,
    pub description: Option<String>,
}

impl Store {
    pub fn new(params: NewStoreParams) -> Result<Self, AppError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Store name is required".into()));
        }
        let slug = normalize_slug(&params.slug)?;
        validate_http_url("google_business_url", &params.google_business_url)?;

        let now = Utc::now();
        Ok(Self {
            id: StoreId::new(),
            name,
            slug,
            google_business_url: params.google_business_url.trim().to_string(),
            google_place_id: params.google_place_id,
            description: params.description,
            is_active: true,
            is_paid: false,
            brand_id: params.brand_id,
            qr_campaign_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Public landing page the store's QR code encodes.
    pub fn landing_url(&self, public_base_url: &str) -> String {
        format!("{}/s/{}", public_base_url.trim_end_matches('/'), self.slug)
    }
}

/// Lower-cases and validates a store slug: `[a-z0-9-]`, no leading or trailing dash.
pub fn normalize_slug(raw: &str) -> Result<String, AppError> {
    let slug = raw.trim().to_lowercase();
    let len = slug.chars().count();

    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "Slug must be between {} and {} characters",
            SLUG_MIN_LEN, SLUG_MAX_LEN
        )));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(AppError::Validation("Slug may only contain letters, digits and dashes".into()));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(AppError::Validation("Slug must not start, end or repeat dashes".into()));
    }
    Ok(slug)
}
