use crate::domain::actor::UserId;
use crate::domain::models::{
    ai_config::{AiProvider, AiServiceConfig},
    brand::{Brand, BrandId},
    campaign::{Campaign, CampaignId},
    participant::Participant,
    pricing_plan::PricingPlan,
    prize::{PrizeId, PrizeItem},
    response_template::{ResponseTemplate, ResponseTemplateId, ResponseTone},
    review::{Review, ReviewId},
    store::{Store, StoreId},
    store_history::StoreHistory,
    winner::{Winner, WinnerId},
};
use crate::domain::value_objects::ReviewResponse;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn create(&self, brand: &Brand) -> Result<Brand, AppError>;
    async fn find_by_id(&self, id: &BrandId) -> Result<Option<Brand>, AppError>;
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Brand>, AppError>;
    async fn list_all(&self) -> Result<Vec<Brand>, AppError>;
    async fn count_by_owner_id(&self, owner_id: &UserId) -> Result<i64, AppError>;
    async fn update(&self, brand: &Brand) -> Result<Brand, AppError>;
    async fn delete(&self, id: &BrandId) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn create(&self, store: &Store) -> Result<Store, AppError>;
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Store>, AppError>;
    async fn list_by_brand(&self, brand_id: &BrandId) -> Result<Vec<Store>, AppError>;
    async fn count_by_brand(&self, brand_id: &BrandId) -> Result<i64, AppError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;
    async fn update(&self, store: &Store) -> Result<Store, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHistoryRepository: Send + Sync {
    /// Writes `entry` and deletes the store it was taken from in one transaction.
    /// `NotFound` (nothing written) when that store is already gone.
    async fn archive_store(&self, entry: &StoreHistory) -> Result<(), AppError>;
    async fn exists_by_google_business_url(&self, url: &str) -> Result<bool, AppError>;
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<StoreHistory>, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Inserts the campaign and its prize set in one transaction.
    async fn create_with_prizes(&self, campaign: &Campaign, prizes: &[PrizeItem]) -> Result<Campaign, AppError>;
    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, AppError>;
    async fn find_active_by_store(&self, store_id: &StoreId) -> Result<Option<Campaign>, AppError>;
    async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Campaign>, AppError>;
    async fn list_prizes(&self, campaign_id: &CampaignId) -> Result<Vec<PrizeItem>, AppError>;
    /// Activates `id` and deactivates every other campaign of the same store.
    /// Returns how many other campaigns were switched off, or `None` (nothing written)
    /// when `id` was not an inactive campaign of that store.
    async fn activate_exclusive(&self, id: &CampaignId, store_id: &StoreId) -> Result<Option<u64>, AppError>;
    /// `false` when the campaign was not active at write time.
    async fn deactivate(&self, id: &CampaignId) -> Result<bool, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Stores a play that did not win anything.
    async fn record_loss(&self, participant: &Participant) -> Result<Participant, AppError>;
    async fn list_by_campaign(&self, campaign_id: &CampaignId) -> Result<Vec<Participant>, AppError>;
    async fn count_by_campaign(&self, campaign_id: &CampaignId) -> Result<i64, AppError>;
}

/// Result of trying to award a prize unit.
#[derive(Debug, Clone)]
pub enum WinRecord {
    Recorded(Winner),
    /// Another play took the last unit first; nothing was written.
    PrizeExhausted(PrizeId),
    /// The claim code already exists; nothing was written.
    ClaimCodeTaken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WinnerRepository: Send + Sync {
    /// Decrements the prize counter, inserts the participant and inserts the
    /// winner in a single transaction.
    async fn record_win(&self, participant: &Participant, winner: &Winner) -> Result<WinRecord, AppError>;
    async fn find_by_id(&self, id: &WinnerId) -> Result<Option<Winner>, AppError>;
    async fn find_by_claim_code(&self, claim_code: &str) -> Result<Option<Winner>, AppError>;
    async fn list_by_campaign(&self, campaign_id: &CampaignId) -> Result<Vec<Winner>, AppError>;
    /// Moves a PENDING, unexpired winner to CLAIMED. Returns false when the row
    /// was no longer claimable.
    async fn mark_claimed(&self, id: &WinnerId, claimed_at: DateTime<Utc>) -> Result<bool, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingPlanRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<PricingPlan>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PricingPlan>, AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseTemplateRepository: Send + Sync {
    async fn create(&self, template: &ResponseTemplate) -> Result<ResponseTemplate, AppError>;
    async fn find_by_id(&self, id: &ResponseTemplateId) -> Result<Option<ResponseTemplate>, AppError>;
    async fn list_by_brand(&self, brand_id: &BrandId) -> Result<Vec<ResponseTemplate>, AppError>;
    async fn delete(&self, id: &ResponseTemplateId) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts or refreshes a review keyed by `(store_id, google_review_id)`.
    /// An existing merchant response is kept.
    async fn upsert(&self, review: &Review) -> Result<Review, AppError>;
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, AppError>;
    async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Review>, AppError>;
    async fn save_response(&self, id: &ReviewId, response: &ReviewResponse) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiConfigRepository: Send + Sync {
    async fn upsert(&self, config: &AiServiceConfig) -> Result<AiServiceConfig, AppError>;
    async fn find_by_brand(&self, brand_id: &BrandId) -> Result<Option<AiServiceConfig>, AppError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailOptions {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailReceipt {
    pub id: String,
    pub success: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, options: EmailOptions) -> Result<EmailReceipt, AppError>;
    async fn send_batch(&self, emails: Vec<EmailOptions>) -> Result<Vec<EmailReceipt>, AppError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait EncryptionService: Send + Sync {
    fn encrypt(&self, value: &str) -> Result<String, AppError>;
    fn decrypt(&self, value: &str) -> Result<String, AppError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiResponseInput {
    pub review_content: String,
    pub review_rating: i32,
    pub author_name: String,
    pub store_name: String,
    pub tone: ResponseTone,
    pub language: String,
    pub include_emojis: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_rating(rating: i32) -> Self {
        match rating {
            4.. => Sentiment::Positive,
            3 => Sentiment::Neutral,
            _ => Sentiment::Negative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiResponseOutput {
    pub suggested_response: String,
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub tokens_used: u32,
    pub provider: AiProvider,
    pub model: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiResponseGenerator: Send + Sync {
    async fn generate_response(&self, input: &AiResponseInput) -> Result<AiResponseOutput, AppError>;
    fn is_available(&self) -> bool;
    fn active_provider(&self) -> AiProvider;
}

/// Decrypted provider settings, only alive for the duration of one call.
#[derive(Clone)]
pub struct AiProviderSettings {
    pub provider: AiProvider,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for AiProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiProviderSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AiResponderFactory: Send + Sync {
    fn build(&self, settings: AiProviderSettings) -> Arc<dyn AiResponseGenerator>;
}
