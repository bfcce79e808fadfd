#![allow(dead_code)]

use async_trait::async_trait;
use review_lottery::{
    config::Config,
    domain::{
        actor::Actor,
        models::{ai_config::AiProvider, campaign::CampaignId, prize::NewPrizeParams},
        ports::{
            AiProviderSettings, AiResponderFactory, AiResponseGenerator, AiResponseInput, AiResponseOutput,
            CampaignRepository, EmailOptions, EmailReceipt, EmailService, Sentiment,
        },
        services::prize_draw::ProbabilityPolicy,
        use_cases::{
            brand::{CreateBrand, CreateBrandInput},
            campaign::{ActivateCampaign, CampaignDetails, CampaignRef, CreateCampaign, CreateCampaignInput},
            play::PlayCampaign,
            store::{CreateStore, CreateStoreInput},
        },
    },
    error::AppError,
    infra::factory::bootstrap_state,
    state::AppState,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const OWNER: &str = "owner-1";

/// 32 zero bytes, base64.
const TEST_ENCRYPTION_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

#[derive(Default)]
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<EmailOptions>>,
}

impl RecordingEmailService {
    pub fn sent_to(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send_email(&self, options: EmailOptions) -> Result<EmailReceipt, AppError> {
        self.sent.lock().unwrap().push(options);
        Ok(EmailReceipt { id: Uuid::new_v4().to_string(), success: true })
    }

    async fn send_batch(&self, emails: Vec<EmailOptions>) -> Result<Vec<EmailReceipt>, AppError> {
        let mut receipts = Vec::new();
        for email in emails {
            receipts.push(self.send_email(email).await?);
        }
        Ok(receipts)
    }
}

/// Echoes the settings it was built with so tests can see the decrypted key.
pub struct EchoResponder {
    settings: AiProviderSettings,
}

#[async_trait]
impl AiResponseGenerator for EchoResponder {
    async fn generate_response(&self, input: &AiResponseInput) -> Result<AiResponseOutput, AppError> {
        Ok(AiResponseOutput {
            suggested_response: format!("Thanks {} ({})", input.author_name, self.settings.api_key),
            confidence: 0.9,
            sentiment: Sentiment::from_rating(input.review_rating),
            tokens_used: 10,
            provider: self.settings.provider,
            model: self.settings.model.clone(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn active_provider(&self) -> AiProvider {
        self.settings.provider
    }
}

pub struct EchoResponderFactory;

impl AiResponderFactory for EchoResponderFactory {
    fn build(&self, settings: AiProviderSettings) -> Arc<dyn AiResponseGenerator> {
        Arc::new(EchoResponder { settings })
    }
}

pub struct TestApp {
    pub state: AppState,
    pub emails: Arc<RecordingEmailService>,
    pub db_filename: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(ProbabilityPolicy::Exact).await
    }

    pub async fn with_policy(policy: ProbabilityPolicy) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let config = Config {
            database_url: format!("sqlite://{}?mode=rwc", db_filename),
            encryption_key: TEST_ENCRYPTION_KEY.to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from: "ReviewLottery <test@example.com>".to_string(),
            public_base_url: "https://play.example.com".to_string(),
            claim_validity_days: 30,
            probability_policy: policy,
            ai_request_timeout_secs: 1,
        };

        let mut state = bootstrap_state(&config).await.expect("Failed to bootstrap test state");
        let emails = Arc::new(RecordingEmailService::default());
        state.email_service = emails.clone();
        state.ai_responders = Arc::new(EchoResponderFactory);

        Self { state, emails, db_filename }
    }

    pub fn owner(&self) -> Actor {
        Actor::user(OWNER)
    }

    pub fn activate(&self) -> ActivateCampaign {
        ActivateCampaign::new(
            self.state.campaign_repo.clone(),
            self.state.store_repo.clone(),
            self.state.brand_repo.clone(),
            self.state.config.probability_policy,
        )
    }

    pub fn campaign_ref(&self, campaign_id: &CampaignId) -> CampaignRef {
        CampaignRef { actor: self.owner(), campaign_id: campaign_id.clone() }
    }

    pub fn play(&self) -> PlayCampaign {
        PlayCampaign::new(
            self.state.campaign_repo.clone(),
            self.state.store_repo.clone(),
            self.state.participant_repo.clone(),
            self.state.winner_repo.clone(),
            self.state.email_service.clone(),
        )
    }

    /// Brand, store and an activated campaign holding `prizes`.
    pub async fn live_campaign(&self, slug: &str, prizes: Vec<NewPrizeParams>) -> CampaignDetails {
        let details = self.draft_campaign(slug, prizes).await;
        self.activate()
            .execute(self.campaign_ref(&details.campaign.id))
            .await
            .expect("Failed to activate campaign");
        let prizes = self.state.campaign_repo.list_prizes(&details.campaign.id).await.unwrap();
        let campaign = self.state.campaign_repo.find_by_id(&details.campaign.id).await.unwrap().unwrap();
        CampaignDetails { campaign, prizes, ..details }
    }

    pub async fn draft_campaign(&self, slug: &str, prizes: Vec<NewPrizeParams>) -> CampaignDetails {
        let brand = CreateBrand::new(self.state.brand_repo.clone())
            .execute(CreateBrandInput {
                actor: self.owner(),
                name: format!("Brand {}", slug),
                logo_url: "https://cdn.example.com/logo.png".into(),
                primary_color: None,
                secondary_color: None,
                font: None,
            })
            .await
            .expect("Failed to create brand");

        let store = CreateStore::new(
            self.state.store_repo.clone(),
            self.state.brand_repo.clone(),
            self.state.store_history_repo.clone(),
        )
        .execute(CreateStoreInput {
            actor: self.owner(),
            brand_id: brand.id,
            name: format!("Store {}", slug),
            slug: slug.into(),
            google_business_url: format!("https://g.page/{}", slug),
            google_place_id: None,
            description: None,
        })
        .await
        .expect("Failed to create store");

        CreateCampaign::new(
            self.state.campaign_repo.clone(),
            self.state.store_repo.clone(),
            self.state.brand_repo.clone(),
            self.state.config.claim_validity_days,
        )
        .execute(CreateCampaignInput {
            actor: self.owner(),
            store_id: store.id,
            name: "Opening week".into(),
            description: None,
            game_type: None,
            claim_validity_days: None,
            starts_at: None,
            ends_at: None,
            prizes,
        })
        .await
        .expect("Failed to create campaign")
    }
}

pub fn prize(name: &str, probability: f64, quantity: Option<i32>) -> NewPrizeParams {
    NewPrizeParams { name: name.into(), description: None, probability, quantity }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
