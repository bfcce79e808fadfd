use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::campaign::CampaignId;
use crate::domain::models::prize::PrizeId;
use crate::domain::value_objects::Email;

pub type ParticipantId = TypedId<Participant>;

string_enum! {
    pub enum PlayOutcome {
        Won => "WON",
        Lost => "LOST",
    }
}

/// One play session against a campaign, recorded whether or not it won.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub campaign_id: CampaignId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub outcome: PlayOutcome,
    pub prize_id: Option<PrizeId>,
    pub played_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(campaign_id: CampaignId, email: Option<Email>, name: Option<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            campaign_id,
            email: email.map(Email::into_string),
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            outcome: PlayOutcome::Lost,
            prize_id: None,
            played_at: Utc::now(),
        }
    }

    pub fn won(mut self, prize_id: PrizeId) -> Self {
        self.outcome = PlayOutcome::Won;
        self.prize_id = Some(prize_id);
        self
    }
}
