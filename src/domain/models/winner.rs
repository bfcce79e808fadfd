use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::campaign::CampaignId;
use crate::domain::models::participant::ParticipantId;
use crate::domain::models::prize::PrizeId;

pub type WinnerId = TypedId<Winner>;

string_enum! {
    pub enum WinnerStatus {
        Pending => "PENDING",
        Claimed => "CLAIMED",
        Expired => "EXPIRED",
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Winner {
    pub id: WinnerId,
    pub campaign_id: CampaignId,
    pub participant_id: ParticipantId,
    pub prize_id: PrizeId,
    pub claim_code: String,
    pub status: WinnerStatus,
    pub expires_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Winner {
    pub fn new(
        campaign_id: CampaignId,
        participant_id: ParticipantId,
        prize_id: PrizeId,
        claim_code: String,
        validity: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: WinnerId::new(),
            campaign_id,
            participant_id,
            prize_id,
            claim_code: normalize_claim_code(&claim_code),
            status: WinnerStatus::Pending,
            expires_at: now + validity,
            claimed_at: None,
            created_at: now,
        }
    }

    /// Expiry is derived at read time; a stored PENDING row past its
    /// `expires_at` counts as expired without being rewritten.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == WinnerStatus::Expired || self.expires_at < now
    }

    pub fn is_claimed(&self) -> bool {
        self.status == WinnerStatus::Claimed
    }

    /// Status as a reader should see it at `now`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> WinnerStatus {
        match self.status {
            WinnerStatus::Pending if self.expires_at < now => WinnerStatus::Expired,
            status => status,
        }
    }
}

/// Claim codes are stored upper-case and compared after trimming.
pub fn normalize_claim_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner(validity: Duration) -> Winner {
        Winner::new(
            CampaignId::from("c-1"),
            ParticipantId::from("p-1"),
            PrizeId::from("prize-1"),
            "ab12cd34".into(),
            validity,
        )
    }

    #[test]
    fn test_claim_code_is_uppercased() {
        assert_eq!(winner(Duration::days(1)).claim_code, "AB12CD34");
        assert_eq!(normalize_claim_code("  ab12cd34  "), "AB12CD34");
    }

    #[test]
    fn test_pending_past_expiry_reads_as_expired() {
        let w = winner(Duration::days(-1));
        assert_eq!(w.status, WinnerStatus::Pending);
        assert!(w.is_expired_at(Utc::now()));
        assert_eq!(w.effective_status(Utc::now()), WinnerStatus::Expired);
    }

    #[test]
    fn test_claimed_stays_claimed_after_expiry() {
        let mut w = winner(Duration::days(-1));
        w.status = WinnerStatus::Claimed;
        assert!(w.is_claimed());
        assert_eq!(w.effective_status(Utc::now()), WinnerStatus::Claimed);
    }
}
