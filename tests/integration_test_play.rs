mod common;

use chrono::{Duration, Utc};
use common::{prize, TestApp, OWNER};
use review_lottery::domain::{
    actor::Actor,
    models::{participant::PlayOutcome, winner::WinnerStatus},
    ports::{CampaignRepository, ParticipantRepository, WinnerRepository},
    use_cases::{
        campaign::DeactivateCampaign,
        play::PlayCampaignInput,
        store::{DeactivateStore, StoreRef},
        winner::{ClaimPrize, ClaimPrizeInput, GetWinnerByClaimCode, ListWinners, ListWinnersInput},
    },
};
use review_lottery::error::ErrorKind;
use std::sync::Arc;
use tokio::task::JoinSet;

fn claim_prize(app: &TestApp) -> ClaimPrize {
    ClaimPrize::new(
        app.state.winner_repo.clone(),
        app.state.campaign_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
    )
}

#[tokio::test]
async fn test_certain_win_is_mailed_looked_up_and_claimed_once() {
    let app = TestApp::new().await;
    let details = app.live_campaign("sure-win", vec![prize("Free coffee", 100.0, None)]).await;

    let result = app
        .play()
        .execute(PlayCampaignInput {
            campaign_id: details.campaign.id.clone(),
            email: Some("Ana@Example.com".into()),
            name: Some("Ana".into()),
        })
        .await
        .unwrap();
    assert_eq!(result.outcome, PlayOutcome::Won);
    let code = result.claim_code.unwrap();
    assert_eq!(app.emails.sent_to(), vec!["ana@example.com".to_string()]);

    let sloppy = format!("  {}  ", code.to_lowercase());
    let view = GetWinnerByClaimCode::new(app.state.winner_repo.clone()).execute(&sloppy).await.unwrap();
    assert_eq!(view.claim_code, code);
    assert_eq!(view.status, WinnerStatus::Pending);
    assert!(!view.is_expired);

    let err = claim_prize(&app)
        .execute(ClaimPrizeInput { actor: Actor::user("someone-else"), claim_code: code.clone() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let claimed = claim_prize(&app)
        .execute(ClaimPrizeInput { actor: Actor::user(OWNER), claim_code: code.clone() })
        .await
        .unwrap();
    assert!(claimed.is_claimed);
    assert_eq!(claimed.status, WinnerStatus::Claimed);

    let err = claim_prize(&app)
        .execute(ClaimPrizeInput { actor: Actor::user(OWNER), claim_code: code })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_expired_code_reads_as_expired_and_cannot_be_claimed() {
    let app = TestApp::new().await;
    let details = app.live_campaign("late-claim", vec![prize("Croissant", 100.0, None)]).await;
    let result = app
        .play()
        .execute(PlayCampaignInput { campaign_id: details.campaign.id.clone(), email: None, name: None })
        .await
        .unwrap();
    let code = result.claim_code.unwrap();

    let winner = app.state.winner_repo.find_by_claim_code(&code).await.unwrap().unwrap();
    let sqlx_pool = match &app.state.database {
        review_lottery::state::Database::Sqlite(pool) => pool.clone(),
        review_lottery::state::Database::Postgres(_) => unreachable!("tests run on SQLite"),
    };
    sqlx::query("UPDATE winners SET expires_at = ? WHERE id = ?")
        .bind(Utc::now() - Duration::days(1))
        .bind(&winner.id)
        .execute(&sqlx_pool)
        .await
        .unwrap();

    let view = GetWinnerByClaimCode::new(app.state.winner_repo.clone()).execute(&code).await.unwrap();
    assert!(view.is_expired);
    assert_eq!(view.status, WinnerStatus::Expired);

    // Stored status is left alone.
    let stored = app.state.winner_repo.find_by_id(&winner.id).await.unwrap().unwrap();
    assert_eq!(stored.status, WinnerStatus::Pending);

    let err = claim_prize(&app)
        .execute(ClaimPrizeInput { actor: Actor::user(OWNER), claim_code: code })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_limited_pair_runs_dry_then_nobody_wins() {
    let app = TestApp::new().await;
    let details = app
        .live_campaign("pair-dry", vec![prize("A", 30.0, Some(1)), prize("B", 70.0, Some(1))])
        .await;
    let play = app.play();

    for _ in 0..60 {
        play.execute(PlayCampaignInput { campaign_id: details.campaign.id.clone(), email: None, name: None })
            .await
            .unwrap();
    }

    let winners = app.state.winner_repo.list_by_campaign(&details.campaign.id).await.unwrap();
    assert_eq!(winners.len(), 2);
    let prizes = app.state.campaign_repo.list_prizes(&details.campaign.id).await.unwrap();
    assert!(prizes.iter().all(|p| p.remaining == Some(0)));

    let last = play
        .execute(PlayCampaignInput { campaign_id: details.campaign.id.clone(), email: None, name: None })
        .await
        .unwrap();
    assert_eq!(last.outcome, PlayOutcome::Lost);
    assert!(last.prize.is_none());
    assert_eq!(app.state.participant_repo.count_by_campaign(&details.campaign.id).await.unwrap(), 61);
}

#[tokio::test]
async fn test_concurrent_plays_never_oversell_a_limited_prize() {
    let app = TestApp::new().await;
    let details = app.live_campaign("rush-hour", vec![prize("Cake", 100.0, Some(5))]).await;
    let play = Arc::new(app.play());

    let mut set = JoinSet::new();
    for i in 0..20 {
        let play = play.clone();
        let campaign_id = details.campaign.id.clone();
        set.spawn(async move {
            play.execute(PlayCampaignInput { campaign_id, email: None, name: Some(format!("Player {}", i)) })
                .await
        });
    }

    let mut won = 0;
    let mut lost = 0;
    while let Some(joined) = set.join_next().await {
        match joined.unwrap().unwrap().outcome {
            PlayOutcome::Won => won += 1,
            PlayOutcome::Lost => lost += 1,
        }
    }
    assert_eq!(won, 5);
    assert_eq!(lost, 15);

    let prizes = app.state.campaign_repo.list_prizes(&details.campaign.id).await.unwrap();
    assert_eq!(prizes[0].remaining, Some(0));
    assert_eq!(app.state.winner_repo.list_by_campaign(&details.campaign.id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_winners_counts_add_up() {
    let app = TestApp::new().await;
    let details = app.live_campaign("winner-board", vec![prize("Coffee", 100.0, Some(3))]).await;
    let play = app.play();
    let mut codes = Vec::new();
    for _ in 0..4 {
        let result = play
            .execute(PlayCampaignInput { campaign_id: details.campaign.id.clone(), email: None, name: None })
            .await
            .unwrap();
        codes.extend(result.claim_code);
    }
    assert_eq!(codes.len(), 3);

    claim_prize(&app)
        .execute(ClaimPrizeInput { actor: Actor::user(OWNER), claim_code: codes[0].clone() })
        .await
        .unwrap();

    let list_winners = ListWinners::new(app.state.winner_repo.clone());
    let all = list_winners
        .execute(ListWinnersInput { campaign_id: Some(details.campaign.id.clone()), status: None })
        .await
        .unwrap();
    assert_eq!(all.winners.len(), 3);
    assert_eq!(all.pending_count, 2);
    assert_eq!(all.claimed_count, 1);
    assert_eq!(all.expired_count, 0);
    assert_eq!(all.pending_count + all.claimed_count + all.expired_count, all.winners.len());

    let pending = list_winners
        .execute(ListWinnersInput { campaign_id: Some(details.campaign.id.clone()), status: Some(WinnerStatus::Pending) })
        .await
        .unwrap();
    assert_eq!(pending.winners.len(), 2);

    let err = list_winners
        .execute(ListWinnersInput { campaign_id: None, status: None })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_inactive_campaign_cannot_be_played() {
    let app = TestApp::new().await;
    let details = app.live_campaign("closed-shop", vec![prize("Coffee", 100.0, None)]).await;
    DeactivateCampaign::new(app.state.campaign_repo.clone())
        .execute(&details.campaign.id)
        .await
        .unwrap();

    let err = app
        .play()
        .execute(PlayCampaignInput { campaign_id: details.campaign.id.clone(), email: None, name: None })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(app.state.participant_repo.count_by_campaign(&details.campaign.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_campaign_of_closed_store_cannot_be_played() {
    let app = TestApp::new().await;
    let details = app.live_campaign("shuttered-shop", vec![prize("Coffee", 100.0, None)]).await;
    DeactivateStore::new(app.state.store_repo.clone(), app.state.brand_repo.clone())
        .execute(StoreRef { actor: app.owner(), store_id: details.campaign.store_id.clone() })
        .await
        .unwrap();

    let err = app
        .play()
        .execute(PlayCampaignInput { campaign_id: details.campaign.id.clone(), email: None, name: None })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(app.state.participant_repo.count_by_campaign(&details.campaign.id).await.unwrap(), 0);
    assert!(app.state.winner_repo.list_by_campaign(&details.campaign.id).await.unwrap().is_empty());
}
