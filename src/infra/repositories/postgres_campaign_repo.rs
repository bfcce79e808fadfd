use crate::domain::{
    models::{campaign::{Campaign, CampaignId}, prize::PrizeItem, store::StoreId},
    ports::CampaignRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresCampaignRepo {
    pool: PgPool,
}

impl PostgresCampaignRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepository for PostgresCampaignRepo {
    async fn create_with_prizes(&self, campaign: &Campaign, prizes: &[PrizeItem]) -> Result<Campaign, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Campaign>(
            "INSERT INTO campaigns (id, store_id, name, description, game_type, claim_validity_days, starts_at, ends_at, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&campaign.id)
            .bind(&campaign.store_id)
            .bind(&campaign.name)
            .bind(&campaign.description)
            .bind(campaign.game_type)
            .bind(campaign.claim_validity_days)
            .bind(campaign.starts_at)
            .bind(campaign.ends_at)
            .bind(campaign.is_active)
            .bind(campaign.created_at)
            .bind(campaign.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for (position, prize) in prizes.iter().enumerate() {
            sqlx::query("INSERT INTO prize_items (id, campaign_id, position, name, description, probability, quantity, remaining, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)")
                .bind(&prize.id)
                .bind(&created.id)
                .bind(position as i32)
                .bind(&prize.name)
                .bind(&prize.description)
                .bind(prize.probability)
                .bind(prize.quantity)
                .bind(prize.remaining)
                .bind(prize.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn find_active_by_store(&self, store_id: &StoreId) -> Result<Option<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE store_id = $1 AND is_active = TRUE ORDER BY updated_at DESC LIMIT 1")
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE store_id = $1 ORDER BY created_at DESC")
            .bind(store_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn list_prizes(&self, campaign_id: &CampaignId) -> Result<Vec<PrizeItem>, AppError> {
        sqlx::query_as::<_, PrizeItem>("SELECT * FROM prize_items WHERE campaign_id = $1 ORDER BY position ASC")
            .bind(campaign_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn activate_exclusive(&self, id: &CampaignId, store_id: &StoreId) -> Result<Option<u64>, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let switched_off = sqlx::query("UPDATE campaigns SET is_active = FALSE, updated_at = $1 WHERE store_id = $2 AND id != $3 AND is_active = TRUE")
            .bind(now)
            .bind(store_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .rows_affected();
        let activated = sqlx::query("UPDATE campaigns SET is_active = TRUE, updated_at = $1 WHERE id = $2 AND store_id = $3 AND is_active = FALSE")
            .bind(now)
            .bind(id)
            .bind(store_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .rows_affected();
        if activated == 0 {
            return Ok(None);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(switched_off))
    }
    async fn deactivate(&self, id: &CampaignId) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE campaigns SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active = TRUE")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }
}
