use crate::domain::{models::{ai_config::AiServiceConfig, brand::BrandId}, ports::AiConfigRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAiConfigRepo {
    pool: SqlitePool,
}

impl SqliteAiConfigRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AiConfigRepository for SqliteAiConfigRepo {
    async fn upsert(&self, config: &AiServiceConfig) -> Result<AiServiceConfig, AppError> {
        sqlx::query_as::<_, AiServiceConfig>(
            "INSERT INTO ai_service_configs (id, brand_id, provider, model, encrypted_api_key, is_enabled, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (brand_id) DO UPDATE SET
                provider = excluded.provider, model = excluded.model, encrypted_api_key = excluded.encrypted_api_key,
                is_enabled = excluded.is_enabled, updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&config.id).bind(&config.brand_id).bind(config.provider).bind(&config.model)
            .bind(&config.encrypted_api_key).bind(config.is_enabled).bind(config.created_at).bind(config.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_brand(&self, brand_id: &BrandId) -> Result<Option<AiServiceConfig>, AppError> {
        sqlx::query_as::<_, AiServiceConfig>("SELECT * FROM ai_service_configs WHERE brand_id = ?").bind(brand_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
