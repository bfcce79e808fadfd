use crate::domain::{models::{campaign::CampaignId, participant::Participant}, ports::ParticipantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteParticipantRepo {
    pool: SqlitePool,
}

impl SqliteParticipantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) const INSERT_PARTICIPANT: &str =
    "INSERT INTO participants (id, campaign_id, email, name, outcome, prize_id, played_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *";

#[async_trait]
impl ParticipantRepository for SqliteParticipantRepo {
    async fn record_loss(&self, participant: &Participant) -> Result<Participant, AppError> {
        sqlx::query_as::<_, Participant>(INSERT_PARTICIPANT)
            .bind(&participant.id).bind(&participant.campaign_id).bind(&participant.email).bind(&participant.name)
            .bind(participant.outcome).bind(&participant.prize_id).bind(participant.played_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_campaign(&self, campaign_id: &CampaignId) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE campaign_id = ? ORDER BY played_at DESC").bind(campaign_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_by_campaign(&self, campaign_id: &CampaignId) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants WHERE campaign_id = ?").bind(campaign_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
