use crate::domain::{
    models::{campaign::CampaignId, participant::Participant, winner::{Winner, WinnerId}},
    ports::{WinRecord, WinnerRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::sqlite_participant_repo::INSERT_PARTICIPANT;

pub struct SqliteWinnerRepo {
    pool: SqlitePool,
}

impl SqliteWinnerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WinnerRepository for SqliteWinnerRepo {
    async fn record_win(&self, participant: &Participant, winner: &Winner) -> Result<WinRecord, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Write first so SQLite takes the lock before anything is read.
        let decremented = sqlx::query("UPDATE prize_items SET remaining = remaining - 1 WHERE id = ? AND (remaining IS NULL OR remaining > 0)")
            .bind(&winner.prize_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if decremented.rows_affected() == 0 {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(WinRecord::PrizeExhausted(winner.prize_id.clone()));
        }

        sqlx::query(INSERT_PARTICIPANT)
            .bind(&participant.id).bind(&participant.campaign_id).bind(&participant.email).bind(&participant.name)
            .bind(participant.outcome).bind(&participant.prize_id).bind(participant.played_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let inserted = sqlx::query_as::<_, Winner>(
            "INSERT INTO winners (id, campaign_id, participant_id, prize_id, claim_code, status, expires_at, claimed_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&winner.id).bind(&winner.campaign_id).bind(&winner.participant_id).bind(&winner.prize_id)
            .bind(&winner.claim_code).bind(winner.status).bind(winner.expires_at).bind(winner.claimed_at).bind(winner.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database);

        match inserted {
            Ok(recorded) => {
                tx.commit().await.map_err(AppError::Database)?;
                Ok(WinRecord::Recorded(recorded))
            }
            Err(e) if e.is_unique_violation() => {
                debug!(claim_code = %winner.claim_code, "Claim code collision, rolling back");
                tx.rollback().await.map_err(AppError::Database)?;
                Ok(WinRecord::ClaimCodeTaken)
            }
            Err(e) => Err(e),
        }
    }
    async fn find_by_id(&self, id: &WinnerId) -> Result<Option<Winner>, AppError> {
        sqlx::query_as::<_, Winner>("SELECT * FROM winners WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_claim_code(&self, claim_code: &str) -> Result<Option<Winner>, AppError> {
        sqlx::query_as::<_, Winner>("SELECT * FROM winners WHERE claim_code = ?").bind(claim_code).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_campaign(&self, campaign_id: &CampaignId) -> Result<Vec<Winner>, AppError> {
        sqlx::query_as::<_, Winner>("SELECT * FROM winners WHERE campaign_id = ? ORDER BY created_at DESC").bind(campaign_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn mark_claimed(&self, id: &WinnerId, claimed_at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE winners SET status = 'CLAIMED', claimed_at = ? WHERE id = ? AND status = 'PENDING' AND expires_at >= ?")
            .bind(claimed_at).bind(id).bind(claimed_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }
}
