use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::actor::Actor;
use crate::domain::models::{
    campaign::CampaignId,
    participant::ParticipantId,
    prize::PrizeId,
    winner::{normalize_claim_code, Winner, WinnerId, WinnerStatus},
};
use crate::domain::ports::{BrandRepository, CampaignRepository, StoreRepository, WinnerRepository};
use crate::domain::use_cases::ensure_campaign_owner;
use crate::error::AppError;

/// Winner as presented to callers. Expiry and claim flags are computed at read time.
#[derive(Debug, Clone, Serialize)]
pub struct WinnerView {
    pub id: WinnerId,
    pub campaign_id: CampaignId,
    pub participant_id: ParticipantId,
    pub prize_id: PrizeId,
    pub claim_code: String,
    pub status: WinnerStatus,
    pub expires_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_expired: bool,
    pub is_claimed: bool,
}

impl WinnerView {
    pub fn at(winner: Winner, now: DateTime<Utc>) -> Self {
        Self {
            is_expired: winner.is_expired_at(now),
            is_claimed: winner.is_claimed(),
            status: winner.effective_status(now),
            id: winner.id,
            campaign_id: winner.campaign_id,
            participant_id: winner.participant_id,
            prize_id: winner.prize_id,
            claim_code: winner.claim_code,
            expires_at: winner.expires_at,
            claimed_at: winner.claimed_at,
            created_at: winner.created_at,
        }
    }
}

pub struct GetWinnerByClaimCode {
    winners: Arc<dyn WinnerRepository>,
}

impl GetWinnerByClaimCode {
    pub fn new(winners: Arc<dyn WinnerRepository>) -> Self {
        Self { winners }
    }

    pub async fn execute(&self, claim_code: &str) -> Result<WinnerView, AppError> {
        let code = normalize_claim_code(claim_code);
        if code.is_empty() {
            return Err(AppError::Validation("Claim code is required".into()));
        }

        let winner = self
            .winners
            .find_by_claim_code(&code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid claim code".into()))?;

        Ok(WinnerView::at(winner, Utc::now()))
    }
}

pub struct ClaimPrizeInput {
    pub actor: Actor,
    pub claim_code: String,
}

/// Redeems a prize at the counter. Only the merchant running the campaign can do it.
pub struct ClaimPrize {
    winners: Arc<dyn WinnerRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl ClaimPrize {
    pub fn new(
        winners: Arc<dyn WinnerRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self { winners, campaigns, stores, brands }
    }

    pub async fn execute(&self, input: ClaimPrizeInput) -> Result<WinnerView, AppError> {
        let code = normalize_claim_code(&input.claim_code);
        if code.is_empty() {
            return Err(AppError::Validation("Claim code is required".into()));
        }

        let mut winner = self
            .winners
            .find_by_claim_code(&code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid claim code".into()))?;

        ensure_campaign_owner(
            self.campaigns.as_ref(),
            self.stores.as_ref(),
            self.brands.as_ref(),
            &winner.campaign_id,
            &input.actor,
        )
        .await?;

        let now = Utc::now();
        if winner.is_claimed() {
            return Err(AppError::Conflict("Prize has already been claimed".into()));
        }
        if winner.is_expired_at(now) {
            return Err(AppError::Conflict("Claim code has expired".into()));
        }

        if !self.winners.mark_claimed(&winner.id, now).await? {
            return Err(AppError::Conflict("Prize is no longer claimable".into()));
        }
        info!(winner_id = %winner.id, claimed_by = %input.actor.user_id, "Prize claimed");

        winner.status = WinnerStatus::Claimed;
        winner.claimed_at = Some(now);
        Ok(WinnerView::at(winner, now))
    }
}

pub struct ListWinnersInput {
    pub campaign_id: Option<CampaignId>,
    pub status: Option<WinnerStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WinnerList {
    pub winners: Vec<WinnerView>,
    pub pending_count: usize,
    pub claimed_count: usize,
    pub expired_count: usize,
}

pub struct ListWinners {
    winners: Arc<dyn WinnerRepository>,
}

impl ListWinners {
    pub fn new(winners: Arc<dyn WinnerRepository>) -> Self {
        Self { winners }
    }

    /// Statuses are the read-time ones, so the filter and the counts agree with `is_expired`.
    pub async fn execute(&self, input: ListWinnersInput) -> Result<WinnerList, AppError> {
        let campaign_id = input
            .campaign_id
            .filter(|id| !id.is_blank())
            .ok_or_else(|| AppError::Validation("campaign_id is required to list winners".into()))?;

        let now = Utc::now();
        let winners: Vec<WinnerView> = self
            .winners
            .list_by_campaign(&campaign_id)
            .await?
            .into_iter()
            .map(|w| WinnerView::at(w, now))
            .filter(|w| input.status.is_none_or(|status| w.status == status))
            .collect();

        let count = |status: WinnerStatus| winners.iter().filter(|w| w.status == status).count();
        Ok(WinnerList {
            pending_count: count(WinnerStatus::Pending),
            claimed_count: count(WinnerStatus::Claimed),
            expired_count: count(WinnerStatus::Expired),
            winners,
        })
    }
}
