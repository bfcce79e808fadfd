use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::domain::actor::Actor;
use crate::domain::models::{
    ai_config::{AiProvider, AiServiceConfig},
    brand::BrandId,
    response_template::ResponseTone,
    review::ReviewId,
};
use crate::domain::ports::{
    AiConfigRepository, AiProviderSettings, AiResponderFactory, AiResponseInput, AiResponseOutput,
    BrandRepository, EncryptionService, ReviewRepository, StoreRepository,
};
use crate::domain::use_cases::{load_managed_brand, load_managed_store, require_id};
use crate::error::AppError;

pub struct ConfigureAiServiceInput {
    pub actor: Actor,
    pub brand_id: BrandId,
    pub provider: AiProvider,
    pub model: Option<String>,
    pub api_key: String,
    pub is_enabled: bool,
}

pub struct ConfigureAiService {
    configs: Arc<dyn AiConfigRepository>,
    brands: Arc<dyn BrandRepository>,
    encryption: Arc<dyn EncryptionService>,
}

impl ConfigureAiService {
    pub fn new(
        configs: Arc<dyn AiConfigRepository>,
        brands: Arc<dyn BrandRepository>,
        encryption: Arc<dyn EncryptionService>,
    ) -> Self {
        Self { configs, brands, encryption }
    }

    pub async fn execute(&self, input: ConfigureAiServiceInput) -> Result<AiServiceConfig, AppError> {
        let brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;
        let api_key = input.api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Validation("API key is required".into()));
        }

        let encrypted = self.encryption.encrypt(api_key)?;
        let mut config = AiServiceConfig::new(brand.id.clone(), input.provider, input.model, encrypted);
        config.is_enabled = input.is_enabled;

        // Keep the row identity when reconfiguring.
        if let Some(existing) = self.configs.find_by_brand(&brand.id).await? {
            config.id = existing.id;
            config.created_at = existing.created_at;
            config.updated_at = Utc::now();
        }

        let saved = self.configs.upsert(&config).await?;
        info!(brand_id = %brand.id, provider = %saved.provider, model = %saved.model, "AI service configured");
        Ok(saved)
    }
}

pub struct SuggestReviewResponseInput {
    pub actor: Actor,
    pub review_id: ReviewId,
    pub tone: ResponseTone,
    pub language: String,
    pub include_emojis: bool,
}

pub struct SuggestReviewResponse {
    configs: Arc<dyn AiConfigRepository>,
    reviews: Arc<dyn ReviewRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
    encryption: Arc<dyn EncryptionService>,
    responders: Arc<dyn AiResponderFactory>,
}

impl SuggestReviewResponse {
    pub fn new(
        configs: Arc<dyn AiConfigRepository>,
        reviews: Arc<dyn ReviewRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
        encryption: Arc<dyn EncryptionService>,
        responders: Arc<dyn AiResponderFactory>,
    ) -> Self {
        Self { configs, reviews, stores, brands, encryption, responders }
    }

    #[instrument(skip(self, input), fields(review_id = %input.review_id))]
    pub async fn execute(&self, input: SuggestReviewResponseInput) -> Result<AiResponseOutput, AppError> {
        require_id(&input.review_id, "Review id")?;
        let review = self
            .reviews
            .find_by_id(&input.review_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".into()))?;
        let (store, brand) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &review.store_id, &input.actor).await?;

        let config = self
            .configs
            .find_by_brand(&brand.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No AI service configured for this brand".into()))?;
        if !config.is_enabled {
            return Err(AppError::Conflict("AI suggestions are disabled for this brand".into()));
        }

        // Decrypted only for the lifetime of this call.
        let api_key = self.encryption.decrypt(&config.encrypted_api_key)?;
        let generator = self.responders.build(AiProviderSettings {
            provider: config.provider,
            model: config.model.clone(),
            api_key,
        });
        if !generator.is_available() {
            return Err(AppError::Conflict(format!("{} is not available", generator.active_provider())));
        }

        let language = match input.language.trim() {
            "" => "en".to_string(),
            other => other.to_string(),
        };
        generator
            .generate_response(&AiResponseInput {
                review_content: review.content.unwrap_or_default(),
                review_rating: review.rating,
                author_name: review.author_name,
                store_name: store.name,
                tone: input.tone,
                language,
                include_emojis: input.include_emojis,
            })
            .await
    }
}
