use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::store::StoreId;
use crate::error::AppError;

pub type CampaignId = TypedId<Campaign>;

pub const MAX_CLAIM_VALIDITY_DAYS: i32 = 365;

string_enum! {
    pub enum GameType {
        Wheel => "WHEEL",
        SlotMachine => "SLOT_MACHINE",
        ScratchCard => "SCRATCH_CARD",
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Campaign {
    pub id: CampaignId,
    pub store_id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub game_type: GameType,
    pub claim_validity_days: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewCampaignParams {
    pub store_id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub game_type: GameType,
    pub claim_validity_days: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl Campaign {
    pub fn new(params: NewCampaignParams) -> Result<Self, AppError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Campaign name is required".into()));
        }
        if !(1..=MAX_CLAIM_VALIDITY_DAYS).contains(&params.claim_validity_days) {
            return Err(AppError::Validation(format!(
                "claim_validity_days must be between 1 and {}",
                MAX_CLAIM_VALIDITY_DAYS
            )));
        }
        if let (Some(start), Some(end)) = (params.starts_at, params.ends_at) {
            if end <= start {
                return Err(AppError::Validation("Campaign must end after it starts".into()));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: CampaignId::new(),
            store_id: params.store_id,
            name,
            description: params.description,
            game_type: params.game_type,
            claim_validity_days: params.claim_validity_days,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
            is_active: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether `now` falls inside the campaign's optional start/end window.
    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.starts_at.is_none_or(|start| start <= now);
        let not_ended = self.ends_at.is_none_or(|end| now < end);
        started && not_ended
    }
}
