use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::actor::Actor;
use crate::domain::models::{
    campaign::{Campaign, CampaignId, GameType, NewCampaignParams},
    prize::{NewPrizeParams, PrizeItem},
    store::StoreId,
};
use crate::domain::ports::{BrandRepository, CampaignRepository, StoreRepository};
use crate::domain::services::game_suggestion::suggest_game;
use crate::domain::services::prize_draw::{calculate_total_probability, ProbabilityPolicy};
use crate::domain::use_cases::{ensure_campaign_owner, load_managed_store, require_id};
use crate::error::AppError;

pub struct CreateCampaignInput {
    pub actor: Actor,
    pub store_id: StoreId,
    pub name: String,
    pub description: Option<String>,
    /// Suggested from the prize count when absent.
    pub game_type: Option<GameType>,
    pub claim_validity_days: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub prizes: Vec<NewPrizeParams>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetails {
    pub campaign: Campaign,
    pub prizes: Vec<PrizeItem>,
    pub total_probability: f64,
}

pub struct CreateCampaign {
    campaigns: Arc<dyn CampaignRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
    default_claim_validity_days: i32,
}

impl CreateCampaign {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
        default_claim_validity_days: i32,
    ) -> Self {
        Self { campaigns, stores, brands, default_claim_validity_days }
    }

    pub async fn execute(&self, input: CreateCampaignInput) -> Result<CampaignDetails, AppError> {
        let (store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;

        let suggestion = suggest_game(input.prizes.len() as i64)?;
        let campaign = Campaign::new(NewCampaignParams {
            store_id: store.id,
            name: input.name,
            description: input.description,
            game_type: input.game_type.unwrap_or_else(|| suggestion.game_type()),
            claim_validity_days: input.claim_validity_days.unwrap_or(self.default_claim_validity_days),
            starts_at: input.starts_at,
            ends_at: input.ends_at,
        })?;

        let prizes = input
            .prizes
            .into_iter()
            .map(|params| PrizeItem::new(campaign.id.clone(), params))
            .collect::<Result<Vec<_>, _>>()?;

        let campaign = self.campaigns.create_with_prizes(&campaign, &prizes).await?;
        info!(campaign_id = %campaign.id, prizes = prizes.len(), game = %campaign.game_type, "Campaign created");

        Ok(CampaignDetails { total_probability: calculate_total_probability(&prizes), campaign, prizes })
    }
}

pub struct CampaignRef {
    pub actor: Actor,
    pub campaign_id: CampaignId,
}

pub struct GetCampaign {
    campaigns: Arc<dyn CampaignRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl GetCampaign {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self { campaigns, stores, brands }
    }

    pub async fn execute(&self, input: CampaignRef) -> Result<CampaignDetails, AppError> {
        let campaign = ensure_campaign_owner(
            self.campaigns.as_ref(),
            self.stores.as_ref(),
            self.brands.as_ref(),
            &input.campaign_id,
            &input.actor,
        )
        .await?;
        let prizes = self.campaigns.list_prizes(&campaign.id).await?;

        Ok(CampaignDetails { total_probability: calculate_total_probability(&prizes), campaign, prizes })
    }
}

pub struct ListCampaignsInput {
    pub actor: Actor,
    pub store_id: StoreId,
}

pub struct ListCampaigns {
    campaigns: Arc<dyn CampaignRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl ListCampaigns {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self { campaigns, stores, brands }
    }

    pub async fn execute(&self, input: ListCampaignsInput) -> Result<Vec<Campaign>, AppError> {
        let (store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;
        self.campaigns.list_by_store(&store.id).await
    }
}

/// Puts a campaign live. At most one campaign per store is active at a time.
pub struct ActivateCampaign {
    campaigns: Arc<dyn CampaignRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
    policy: ProbabilityPolicy,
}

impl ActivateCampaign {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
        policy: ProbabilityPolicy,
    ) -> Self {
        Self { campaigns, stores, brands, policy }
    }

    pub async fn execute(&self, input: CampaignRef) -> Result<Campaign, AppError> {
        let mut campaign = ensure_campaign_owner(
            self.campaigns.as_ref(),
            self.stores.as_ref(),
            self.brands.as_ref(),
            &input.campaign_id,
            &input.actor,
        )
        .await?;

        if campaign.is_active {
            return Err(AppError::Conflict("Campaign is already active".into()));
        }

        let prizes = self.campaigns.list_prizes(&campaign.id).await?;
        self.policy.validate(&prizes)?;

        // The write re-checks the state, so a concurrent activation loses here.
        let switched_off = self
            .campaigns
            .activate_exclusive(&campaign.id, &campaign.store_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Campaign is already active".into()))?;
        info!(campaign_id = %campaign.id, switched_off, policy = %self.policy, "Campaign activated");

        campaign.is_active = true;
        campaign.updated_at = Utc::now();
        Ok(campaign)
    }
}

pub struct DeactivateCampaign {
    campaigns: Arc<dyn CampaignRepository>,
}

impl DeactivateCampaign {
    pub fn new(campaigns: Arc<dyn CampaignRepository>) -> Self {
        Self { campaigns }
    }

    /// Not idempotent: deactivating an inactive campaign is a conflict.
    pub async fn execute(&self, id: &CampaignId) -> Result<Campaign, AppError> {
        require_id(id, "Campaign id")?;
        let mut campaign = self
            .campaigns
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;

        if !campaign.is_active || !self.campaigns.deactivate(&campaign.id).await? {
            return Err(AppError::Conflict("Campaign is already inactive".into()));
        }
        info!(campaign_id = %campaign.id, "Campaign deactivated");

        campaign.is_active = false;
        campaign.updated_at = Utc::now();
        Ok(campaign)
    }
}
