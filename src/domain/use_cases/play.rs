use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::models::{
    campaign::{Campaign, CampaignId},
    participant::{Participant, ParticipantId, PlayOutcome},
    prize::PrizeItem,
    winner::Winner,
};
use crate::domain::ports::{
    CampaignRepository, EmailOptions, EmailService, ParticipantRepository, StoreRepository, WinRecord, WinnerRepository,
};
use crate::domain::services::claim_code::{generate_claim_code, MAX_CLAIM_CODE_ATTEMPTS};
use crate::domain::services::prize_draw::draw_prize;
use crate::domain::use_cases::require_id;
use crate::domain::value_objects::Email;
use crate::error::AppError;

/// Upper bound on redraws after losing a race for the last unit of a prize.
pub const MAX_DRAW_ATTEMPTS: usize = 3;

pub struct PlayCampaignInput {
    pub campaign_id: CampaignId,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayResult {
    pub participant_id: ParticipantId,
    pub outcome: PlayOutcome,
    pub prize: Option<PrizeItem>,
    pub claim_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct PlayCampaign {
    campaigns: Arc<dyn CampaignRepository>,
    stores: Arc<dyn StoreRepository>,
    participants: Arc<dyn ParticipantRepository>,
    winners: Arc<dyn WinnerRepository>,
    emails: Arc<dyn EmailService>,
    rng: Mutex<StdRng>,
}

impl PlayCampaign {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        stores: Arc<dyn StoreRepository>,
        participants: Arc<dyn ParticipantRepository>,
        winners: Arc<dyn WinnerRepository>,
        emails: Arc<dyn EmailService>,
    ) -> Self {
        Self {
            campaigns,
            stores,
            participants,
            winners,
            emails,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fixes the random sequence. Used by tests that need a known outcome.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[instrument(skip(self, input), fields(campaign_id = %input.campaign_id))]
    pub async fn execute(&self, input: PlayCampaignInput) -> Result<PlayResult, AppError> {
        require_id(&input.campaign_id, "Campaign id")?;
        let email = input
            .email
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(Email::create)
            .transpose()?;

        let campaign = self
            .campaigns
            .find_by_id(&input.campaign_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;
        if !campaign.is_active {
            return Err(AppError::Conflict("Campaign is not active".into()));
        }
        if !campaign.is_running_at(Utc::now()) {
            return Err(AppError::Conflict("Campaign is not running".into()));
        }
        // A closed store keeps its campaign row but takes no more plays.
        let store_open = self.stores.find_by_id(&campaign.store_id).await?.is_some_and(|s| s.is_active);
        if !store_open {
            return Err(AppError::Conflict("Store is not active".into()));
        }

        let mut prizes = self.campaigns.list_prizes(&campaign.id).await?;

        for _ in 0..MAX_DRAW_ATTEMPTS {
            let Some(prize) = self.draw(&prizes)? else {
                break;
            };

            match self.award(&campaign, &prize, email.clone(), input.name.clone()).await? {
                Some((participant, winner)) => {
                    info!(prize_id = %prize.id, winner_id = %winner.id, "Prize won");
                    if let Some(email) = &email {
                        self.notify_winner(email, &prize, &winner).await;
                    }
                    return Ok(PlayResult {
                        participant_id: participant.id,
                        outcome: PlayOutcome::Won,
                        prize: Some(prize),
                        claim_code: Some(winner.claim_code),
                        expires_at: Some(winner.expires_at),
                    });
                }
                None => {
                    // Lost the race for the last unit. Take it out of this play's draw.
                    warn!(prize_id = %prize.id, "Prize ran out mid-play; redrawing");
                    if let Some(item) = prizes.iter_mut().find(|p| p.id == prize.id) {
                        item.remaining = Some(0);
                    }
                }
            }
        }

        let participant = self
            .participants
            .record_loss(&Participant::new(campaign.id.clone(), email, input.name))
            .await?;
        Ok(PlayResult {
            participant_id: participant.id,
            outcome: PlayOutcome::Lost,
            prize: None,
            claim_code: None,
            expires_at: None,
        })
    }

    fn draw(&self, prizes: &[PrizeItem]) -> Result<Option<PrizeItem>, AppError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::InternalWithMsg("Prize RNG lock poisoned".into()))?;
        Ok(draw_prize(prizes, &mut *rng).cloned())
    }

    fn next_claim_code(&self) -> Result<String, AppError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::InternalWithMsg("Prize RNG lock poisoned".into()))?;
        Ok(generate_claim_code(&mut *rng))
    }

    /// `Ok(None)` means the prize was exhausted by a concurrent play.
    async fn award(
        &self,
        campaign: &Campaign,
        prize: &PrizeItem,
        email: Option<Email>,
        name: Option<String>,
    ) -> Result<Option<(Participant, Winner)>, AppError> {
        let validity = Duration::days(i64::from(campaign.claim_validity_days));

        for attempt in 1..=MAX_CLAIM_CODE_ATTEMPTS {
            let participant =
                Participant::new(campaign.id.clone(), email.clone(), name.clone()).won(prize.id.clone());
            let winner = Winner::new(
                campaign.id.clone(),
                participant.id.clone(),
                prize.id.clone(),
                self.next_claim_code()?,
                validity,
            );

            match self.winners.record_win(&participant, &winner).await {
                Ok(WinRecord::Recorded(winner)) => return Ok(Some((participant, winner))),
                Ok(WinRecord::PrizeExhausted(_)) => return Ok(None),
                Ok(WinRecord::ClaimCodeTaken) => {
                    warn!(attempt, "Claim code collision; regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::InternalWithMsg(format!(
            "Could not allocate a unique claim code after {} attempts",
            MAX_CLAIM_CODE_ATTEMPTS
        )))
    }

    async fn notify_winner(&self, email: &Email, prize: &PrizeItem, winner: &Winner) {
        let expires = winner.expires_at.format("%Y-%m-%d").to_string();
        let options = EmailOptions {
            to: email.as_str().to_string(),
            subject: format!("You won: {}", prize.name),
            html_body: format!(
                "<p>Congratulations! You won <strong>{}</strong>.</p>\
                 <p>Show this code at the counter: <strong>{}</strong></p>\
                 <p>Valid until {}.</p>",
                prize.name, winner.claim_code, expires
            ),
            text_body: Some(format!(
                "You won {}. Claim code: {} (valid until {}).",
                prize.name, winner.claim_code, expires
            )),
            reply_to: None,
        };

        match self.emails.send_email(options).await {
            Ok(receipt) if receipt.success => info!(email_id = %receipt.id, "Winner e-mail sent"),
            Ok(receipt) => warn!(email_id = %receipt.id, "Winner e-mail was not accepted"),
            Err(e) => warn!("Winner e-mail failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::prize::PrizeId;
    use crate::domain::ports::{
        EmailReceipt, MockCampaignRepository, MockEmailService, MockParticipantRepository, MockStoreRepository,
        MockWinnerRepository,
    };
    use crate::domain::use_cases::fixtures;
    use crate::error::ErrorKind;

    fn store_repo(is_active: bool) -> MockStoreRepository {
        let mut stores = MockStoreRepository::new();
        stores.expect_find_by_id().returning(move |_| {
            let mut store = fixtures::store(&fixtures::brand("user-1"));
            store.is_active = is_active;
            Ok(Some(store))
        });
        stores
    }

    fn campaign_repo(is_active: bool, prizes: Vec<(&'static str, f64, Option<i32>)>) -> MockCampaignRepository {
        let mut campaigns = MockCampaignRepository::new();
        campaigns.expect_find_by_id().returning(move |_| {
            let store = fixtures::store(&fixtures::brand("user-1"));
            Ok(Some(fixtures::campaign(&store, is_active)))
        });
        campaigns.expect_list_prizes().returning(move |_| {
            let store = fixtures::store(&fixtures::brand("user-1"));
            let campaign = fixtures::campaign(&store, is_active);
            Ok(prizes
                .iter()
                .map(|(name, p, q)| {
                    let mut item = fixtures::prize(&campaign, name, *p, *q);
                    item.id = PrizeId::from(*name);
                    item
                })
                .collect())
        });
        campaigns
    }

    fn input(email: Option<&str>) -> PlayCampaignInput {
        PlayCampaignInput {
            campaign_id: CampaignId::from("campaign-1"),
            email: email.map(str::to_string),
            name: Some("Ana".into()),
        }
    }

    fn quiet_mailer() -> MockEmailService {
        let mut emails = MockEmailService::new();
        emails.expect_send_email().returning(|_| Ok(EmailReceipt { id: "mail-1".into(), success: true }));
        emails
    }

    #[tokio::test]
    async fn test_inactive_campaign_cannot_be_played() {
        let mut winners = MockWinnerRepository::new();
        winners.expect_record_win().times(0);
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(false, vec![("Coffee", 100.0, None)])),
            Arc::new(store_repo(true)),
            Arc::new(MockParticipantRepository::new()),
            Arc::new(winners),
            Arc::new(MockEmailService::new()),
        );

        assert_eq!(use_case.execute(input(None)).await.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_closed_store_takes_no_plays() {
        let mut winners = MockWinnerRepository::new();
        winners.expect_record_win().times(0);
        let mut participants = MockParticipantRepository::new();
        participants.expect_record_loss().times(0);
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("Coffee", 100.0, None)])),
            Arc::new(store_repo(false)),
            Arc::new(participants),
            Arc::new(winners),
            Arc::new(MockEmailService::new()),
        );

        let err = use_case.execute(input(None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("Store is not active"));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_lookup() {
        let mut campaigns = MockCampaignRepository::new();
        campaigns.expect_find_by_id().times(0);
        let use_case = PlayCampaign::new(
            Arc::new(campaigns),
            Arc::new(store_repo(true)),
            Arc::new(MockParticipantRepository::new()),
            Arc::new(MockWinnerRepository::new()),
            Arc::new(MockEmailService::new()),
        );

        let err = use_case.execute(input(Some("not-an-email"))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_certain_prize_creates_winner_and_mails() {
        let mut winners = MockWinnerRepository::new();
        winners
            .expect_record_win()
            .times(1)
            .withf(|p, w| p.outcome == PlayOutcome::Won && w.participant_id == p.id)
            .returning(|_, w| Ok(WinRecord::Recorded(w.clone())));
        let mut participants = MockParticipantRepository::new();
        participants.expect_record_loss().times(0);
        let mut emails = MockEmailService::new();
        emails
            .expect_send_email()
            .times(1)
            .withf(|o| o.to == "ana@example.com" && o.subject.contains("Coffee"))
            .returning(|_| Ok(EmailReceipt { id: "mail-1".into(), success: true }));
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("Coffee", 100.0, None)])),
            Arc::new(store_repo(true)),
            Arc::new(participants),
            Arc::new(winners),
            Arc::new(emails),
        )
        .with_seed(5);

        let result = use_case.execute(input(Some(" Ana@Example.com "))).await.unwrap();
        assert_eq!(result.outcome, PlayOutcome::Won);
        assert_eq!(result.prize.unwrap().name, "Coffee");
        let code = result.claim_code.unwrap();
        assert_eq!(code.len(), 8);
        let expires = result.expires_at.unwrap();
        assert!(expires > Utc::now() + Duration::days(29));
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_fail_the_play() {
        let mut winners = MockWinnerRepository::new();
        winners.expect_record_win().returning(|_, w| Ok(WinRecord::Recorded(w.clone())));
        let mut emails = MockEmailService::new();
        emails
            .expect_send_email()
            .times(1)
            .returning(|_| Err(AppError::InternalWithMsg("smtp down".into())));
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("Coffee", 100.0, None)])),
            Arc::new(store_repo(true)),
            Arc::new(MockParticipantRepository::new()),
            Arc::new(winners),
            Arc::new(emails),
        );

        let result = use_case.execute(input(Some("ana@example.com"))).await.unwrap();
        assert_eq!(result.outcome, PlayOutcome::Won);
    }

    #[tokio::test]
    async fn test_empty_roll_records_a_loss() {
        let mut winners = MockWinnerRepository::new();
        winners.expect_record_win().times(0);
        let mut participants = MockParticipantRepository::new();
        participants
            .expect_record_loss()
            .times(1)
            .withf(|p| p.outcome == PlayOutcome::Lost && p.prize_id.is_none())
            .returning(|p| Ok(p.clone()));
        // Every item already gone: only no-win mass is left.
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("A", 30.0, Some(0)), ("B", 70.0, Some(0))])),
            Arc::new(store_repo(true)),
            Arc::new(participants),
            Arc::new(winners),
            Arc::new(MockEmailService::new()),
        );

        let result = use_case.execute(input(None)).await.unwrap();
        assert_eq!(result.outcome, PlayOutcome::Lost);
        assert!(result.claim_code.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_race_redraws_then_loses() {
        let mut winners = MockWinnerRepository::new();
        winners
            .expect_record_win()
            .times(1)
            .returning(|_, w| Ok(WinRecord::PrizeExhausted(w.prize_id.clone())));
        let mut participants = MockParticipantRepository::new();
        participants.expect_record_loss().times(1).returning(|p| Ok(p.clone()));
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("Coffee", 100.0, Some(1))])),
            Arc::new(store_repo(true)),
            Arc::new(participants),
            Arc::new(winners),
            Arc::new(quiet_mailer()),
        );

        let result = use_case.execute(input(None)).await.unwrap();
        assert_eq!(result.outcome, PlayOutcome::Lost);
    }

    #[tokio::test]
    async fn test_exhausted_race_falls_through_to_other_prize() {
        let mut winners = MockWinnerRepository::new();
        winners.expect_record_win().returning(|_, w| {
            if w.prize_id.as_str() == "A" {
                Ok(WinRecord::PrizeExhausted(w.prize_id.clone()))
            } else {
                Ok(WinRecord::Recorded(w.clone()))
            }
        });
        let mut participants = MockParticipantRepository::new();
        participants.expect_record_loss().returning(|p| Ok(p.clone()));
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("A", 50.0, Some(1)), ("B", 50.0, None)])),
            Arc::new(store_repo(true)),
            Arc::new(participants),
            Arc::new(winners),
            Arc::new(quiet_mailer()),
        );

        for seed in 0..20 {
            let result = use_case_with_seed(&use_case, seed).await;
            if let Some(prize) = result.prize {
                assert_eq!(prize.name, "B");
            }
        }
    }

    async fn use_case_with_seed(use_case: &PlayCampaign, seed: u64) -> PlayResult {
        if let Ok(mut rng) = use_case.rng.lock() {
            *rng = StdRng::seed_from_u64(seed);
        }
        use_case.execute(input(None)).await.unwrap()
    }

    #[tokio::test]
    async fn test_claim_code_collision_gives_up_eventually() {
        let mut winners = MockWinnerRepository::new();
        winners
            .expect_record_win()
            .times(MAX_CLAIM_CODE_ATTEMPTS)
            .returning(|_, _| Ok(WinRecord::ClaimCodeTaken));
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("Coffee", 100.0, None)])),
            Arc::new(store_repo(true)),
            Arc::new(MockParticipantRepository::new()),
            Arc::new(winners),
            Arc::new(quiet_mailer()),
        );

        let err = use_case.execute(input(None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }

    #[tokio::test]
    async fn test_claim_code_collision_regenerates() {
        let mut winners = MockWinnerRepository::new();
        let mut seen: Vec<String> = Vec::new();
        winners.expect_record_win().times(2).returning(move |_, w| {
            seen.push(w.claim_code.clone());
            if seen.len() == 1 {
                Ok(WinRecord::ClaimCodeTaken)
            } else {
                assert_ne!(seen[0], seen[1]);
                Ok(WinRecord::Recorded(w.clone()))
            }
        });
        let use_case = PlayCampaign::new(
            Arc::new(campaign_repo(true, vec![("Coffee", 100.0, None)])),
            Arc::new(store_repo(true)),
            Arc::new(MockParticipantRepository::new()),
            Arc::new(winners),
            Arc::new(quiet_mailer()),
        );

        let result = use_case.execute(input(None)).await.unwrap();
        assert_eq!(result.outcome, PlayOutcome::Won);
    }
}
