use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::campaign::CampaignId;
use crate::error::AppError;

pub type PrizeId = TypedId<PrizeItem>;

/// One entry of a campaign's prize set.
///
/// `probability` is a percentage weight. `quantity` is the configured cap
/// (`None` = unlimited) and `remaining` the live counter the storage adapter
/// decrements when a unit is awarded.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PrizeItem {
    pub id: PrizeId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub description: Option<String>,
    pub probability: f64,
    pub quantity: Option<i32>,
    pub remaining: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrizeParams {
    pub name: String,
    pub description: Option<String>,
    pub probability: f64,
    pub quantity: Option<i32>,
}

impl PrizeItem {
    pub fn new(campaign_id: CampaignId, params: NewPrizeParams) -> Result<Self, AppError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Prize name is required".into()));
        }
        if !params.probability.is_finite() || params.probability < 0.0 {
            return Err(AppError::Validation(format!(
                "Prize '{}' must have a non-negative probability",
                name
            )));
        }
        if let Some(q) = params.quantity {
            if q < 0 {
                return Err(AppError::Validation(format!("Prize '{}' quantity cannot be negative", name)));
            }
        }

        Ok(Self {
            id: PrizeId::new(),
            campaign_id,
            name,
            description: params.description,
            probability: params.probability,
            quantity: params.quantity,
            remaining: params.quantity,
            created_at: Utc::now(),
        })
    }

    /// Unlimited items are always available; limited ones while units remain.
    pub fn is_available(&self) -> bool {
        match self.remaining {
            None => true,
            Some(left) => left > 0,
        }
    }

    pub fn is_limited(&self) -> bool {
        self.quantity.is_some()
    }
}
