use std::sync::Arc;
use sqlx::{PgPool, SqlitePool};
use tracing::info;

use crate::config::Config;
use crate::domain::ports::{
    AiConfigRepository, AiResponderFactory, BrandRepository, CampaignRepository, EmailService,
    EncryptionService, ParticipantRepository, PricingPlanRepository, ResponseTemplateRepository,
    ReviewRepository, StoreHistoryRepository, StoreRepository, WinnerRepository,
};

/// The pool behind every repository, created once by the entry point.
#[derive(Clone, Debug)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    pub fn backend(&self) -> &'static str {
        match self {
            Database::Postgres(_) => "postgres",
            Database::Sqlite(_) => "sqlite",
        }
    }

    pub async fn close(&self) {
        match self {
            Database::Postgres(pool) => pool.close().await,
            Database::Sqlite(pool) => pool.close().await,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub database: Database,
    pub brand_repo: Arc<dyn BrandRepository>,
    pub store_repo: Arc<dyn StoreRepository>,
    pub store_history_repo: Arc<dyn StoreHistoryRepository>,
    pub campaign_repo: Arc<dyn CampaignRepository>,
    pub participant_repo: Arc<dyn ParticipantRepository>,
    pub winner_repo: Arc<dyn WinnerRepository>,
    pub pricing_plan_repo: Arc<dyn PricingPlanRepository>,
    pub response_template_repo: Arc<dyn ResponseTemplateRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub ai_config_repo: Arc<dyn AiConfigRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub encryption_service: Arc<dyn EncryptionService>,
    pub ai_responders: Arc<dyn AiResponderFactory>,
}

impl AppState {
    pub async fn shutdown(&self) {
        self.database.close().await;
        info!(backend = self.database.backend(), "Database pool closed");
    }
}
