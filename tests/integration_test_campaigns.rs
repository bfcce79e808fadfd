mod common;

use common::{prize, TestApp};
use review_lottery::domain::{
    actor::Actor,
    models::{campaign::GameType, store_history::StoreHistory},
    ports::{CampaignRepository, StoreHistoryRepository, StoreRepository},
    use_cases::{
        campaign::{CampaignRef, CreateCampaign, CreateCampaignInput, DeactivateCampaign, GetCampaign},
        store::{CreateStore, CreateStoreInput, DeleteStore, GetStoreBySlug, SetStoreQrCampaign, SetStoreQrCampaignInput, StoreRef},
    },
};
use review_lottery::error::ErrorKind;

#[tokio::test]
async fn test_campaign_is_created_with_ordered_prizes_and_suggested_game() {
    let app = TestApp::new().await;
    let details = app
        .draft_campaign(
            "paul-bastille",
            vec![prize("Croissant", 50.0, None), prize("Coffee", 30.0, Some(10)), prize("Baguette", 20.0, Some(2))],
        )
        .await;

    assert_eq!(details.campaign.game_type, GameType::ScratchCard);
    assert!(!details.campaign.is_active);
    assert_eq!(details.total_probability, 100.0);

    let stored = app.state.campaign_repo.list_prizes(&details.campaign.id).await.unwrap();
    let names: Vec<&str> = stored.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Croissant", "Coffee", "Baguette"]);
    assert_eq!(stored[1].remaining, Some(10));
    assert_eq!(stored[0].remaining, None);

    let fetched = GetCampaign::new(
        app.state.campaign_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
    )
    .execute(CampaignRef { actor: app.owner(), campaign_id: details.campaign.id.clone() })
    .await
    .unwrap();
    assert_eq!(fetched.prizes.len(), 3);
}

#[tokio::test]
async fn test_activation_checks_probability_total() {
    let app = TestApp::new().await;
    let details = app.draft_campaign("short-total", vec![prize("Coffee", 60.0, None), prize("Tea", 30.0, None)]).await;

    let err = app.activate().execute(app.campaign_ref(&details.campaign.id)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let campaign = app.state.campaign_repo.find_by_id(&details.campaign.id).await.unwrap().unwrap();
    assert!(!campaign.is_active);
}

#[tokio::test]
async fn test_one_live_campaign_per_store() {
    let app = TestApp::new().await;
    let first = app.live_campaign("one-live", vec![prize("Coffee", 100.0, None)]).await;

    let second = CreateCampaign::new(
        app.state.campaign_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
        30,
    )
    .execute(CreateCampaignInput {
        actor: app.owner(),
        store_id: first.campaign.store_id.clone(),
        name: "Summer".into(),
        description: None,
        game_type: Some(GameType::Wheel),
        claim_validity_days: Some(14),
        starts_at: None,
        ends_at: None,
        prizes: vec![prize("Ice cream", 100.0, None)],
    })
    .await
    .unwrap();

    let activate = app.activate();
    activate.execute(app.campaign_ref(&second.campaign.id)).await.unwrap();

    let first_now = app.state.campaign_repo.find_by_id(&first.campaign.id).await.unwrap().unwrap();
    assert!(!first_now.is_active);
    let live = app.state.campaign_repo.find_active_by_store(&first.campaign.store_id).await.unwrap().unwrap();
    assert_eq!(live.id, second.campaign.id);

    let err = activate.execute(app.campaign_ref(&second.campaign.id)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = activate
        .execute(CampaignRef { actor: Actor::user("someone-else"), campaign_id: first.campaign.id.clone() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let still_live = app.state.campaign_repo.find_active_by_store(&first.campaign.store_id).await.unwrap().unwrap();
    assert_eq!(still_live.id, second.campaign.id);
}

#[tokio::test]
async fn test_second_deactivate_conflicts() {
    let app = TestApp::new().await;
    let details = app.live_campaign("deactivate-twice", vec![prize("Coffee", 100.0, None)]).await;
    let deactivate = DeactivateCampaign::new(app.state.campaign_repo.clone());

    let campaign = deactivate.execute(&details.campaign.id).await.unwrap();
    assert!(!campaign.is_active);

    let err = deactivate.execute(&details.campaign.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_concurrent_deactivations_only_one_wins() {
    let app = TestApp::new().await;
    let details = app.live_campaign("deactivate-race", vec![prize("Coffee", 100.0, None)]).await;
    let deactivate = DeactivateCampaign::new(app.state.campaign_repo.clone());
    let activate = app.activate();

    for round in 0..20 {
        let (left, right) = tokio::join!(
            deactivate.execute(&details.campaign.id),
            deactivate.execute(&details.campaign.id)
        );
        let succeeded = [left.is_ok(), right.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(succeeded, 1, "round {}", round);
        for result in [left, right] {
            if let Err(e) = result {
                assert_eq!(e.kind(), ErrorKind::Conflict);
            }
        }

        activate.execute(app.campaign_ref(&details.campaign.id)).await.unwrap();
    }
}

#[tokio::test]
async fn test_landing_and_qr_target() {
    let app = TestApp::new().await;
    let details = app.live_campaign("qr-store", vec![prize("Coffee", 100.0, None)]).await;

    let landing = GetStoreBySlug::new(app.state.store_repo.clone(), app.state.campaign_repo.clone())
        .execute(" QR-Store ")
        .await
        .unwrap();
    assert_eq!(landing.campaign.map(|c| c.id), Some(details.campaign.id.clone()));

    let target = SetStoreQrCampaign::new(
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
        app.state.campaign_repo.clone(),
        app.state.config.public_base_url.clone(),
    )
    .execute(SetStoreQrCampaignInput {
        actor: app.owner(),
        store_id: details.campaign.store_id.clone(),
        campaign_id: Some(details.campaign.id.clone()),
    })
    .await
    .unwrap();
    assert_eq!(target.landing_url, "https://play.example.com/s/qr-store");
    assert_eq!(target.store.qr_campaign_id, Some(details.campaign.id.clone()));

    let stored = app.state.store_repo.find_by_slug("qr-store").await.unwrap().unwrap();
    assert_eq!(stored.qr_campaign_id, Some(details.campaign.id));
}

#[tokio::test]
async fn test_archiving_a_gone_store_leaves_no_history() {
    let app = TestApp::new().await;
    let details = app.draft_campaign("gone-shop", vec![prize("Coffee", 100.0, None)]).await;
    let store = app.state.store_repo.find_by_id(&details.campaign.store_id).await.unwrap().unwrap();
    let owner = app.owner().user_id;

    app.state.store_history_repo.archive_store(&StoreHistory::archive(&store, owner.clone())).await.unwrap();
    let err = app
        .state
        .store_history_repo
        .archive_store(&StoreHistory::archive(&store, owner.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let history = app.state.store_history_repo.list_by_owner(&owner).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(app.state.store_repo.find_by_id(&store.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleted_free_store_cannot_be_recreated() {
    let app = TestApp::new().await;
    let details = app.draft_campaign("archived-shop", vec![prize("Coffee", 100.0, None)]).await;
    let store = app.state.store_repo.find_by_id(&details.campaign.store_id).await.unwrap().unwrap();

    let entry = DeleteStore::new(
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
        app.state.store_history_repo.clone(),
    )
    .execute(StoreRef { actor: app.owner(), store_id: store.id.clone() })
    .await
    .unwrap();
    assert_eq!(entry.google_business_url, store.google_business_url);
    assert!(app.state.store_repo.find_by_id(&store.id).await.unwrap().is_none());
    assert!(app.state.campaign_repo.find_by_id(&details.campaign.id).await.unwrap().is_none());

    let err = CreateStore::new(
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
        app.state.store_history_repo.clone(),
    )
    .execute(CreateStoreInput {
        actor: app.owner(),
        brand_id: store.brand_id,
        name: "Again".into(),
        slug: "archived-shop-2".into(),
        google_business_url: store.google_business_url,
        google_place_id: None,
        description: None,
    })
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
