use crate::domain::{
    models::{campaign::{Campaign, CampaignId}, prize::PrizeItem, store::StoreId},
    ports::CampaignRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteCampaignRepo {
    pool: SqlitePool,
}

impl SqliteCampaignRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepository for SqliteCampaignRepo {
    async fn create_with_prizes(&self, campaign: &Campaign, prizes: &[PrizeItem]) -> Result<Campaign, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Campaign>(
            "INSERT INTO campaigns (id, store_id, name, description, game_type, claim_validity_days, starts_at, ends_at, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&campaign.id).bind(&campaign.store_id).bind(&campaign.name).bind(&campaign.description)
            .bind(campaign.game_type).bind(campaign.claim_validity_days).bind(campaign.starts_at).bind(campaign.ends_at)
            .bind(campaign.is_active).bind(campaign.created_at).bind(campaign.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for (position, prize) in prizes.iter().enumerate() {
            sqlx::query("INSERT INTO prize_items (id, campaign_id, position, name, description, probability, quantity, remaining, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)")
                .bind(&prize.id).bind(&created.id).bind(position as i32).bind(&prize.name).bind(&prize.description)
                .bind(prize.probability).bind(prize.quantity).bind(prize.remaining).bind(prize.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_active_by_store(&self, store_id: &StoreId) -> Result<Option<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE store_id = ? AND is_active = 1 ORDER BY updated_at DESC LIMIT 1").bind(store_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE store_id = ? ORDER BY created_at DESC").bind(store_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_prizes(&self, campaign_id: &CampaignId) -> Result<Vec<PrizeItem>, AppError> {
        sqlx::query_as::<_, PrizeItem>("SELECT * FROM prize_items WHERE campaign_id = ? ORDER BY position ASC").bind(campaign_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn activate_exclusive(&self, id: &CampaignId, store_id: &StoreId) -> Result<Option<u64>, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let switched_off = sqlx::query("UPDATE campaigns SET is_active = 0, updated_at = ? WHERE store_id = ? AND id != ? AND is_active = 1")
            .bind(now).bind(store_id).bind(id)
            .execute(&mut *tx).await.map_err(AppError::Database)?
            .rows_affected();
        let activated = sqlx::query("UPDATE campaigns SET is_active = 1, updated_at = ? WHERE id = ? AND store_id = ? AND is_active = 0")
            .bind(now).bind(id).bind(store_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?
            .rows_affected();
        if activated == 0 {
            return Ok(None);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(switched_off))
    }
    async fn deactivate(&self, id: &CampaignId) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE campaigns SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1").bind(Utc::now()).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }
}
