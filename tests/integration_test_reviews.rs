mod common;

use chrono::{Duration, Utc};
use common::TestApp;
use review_lottery::domain::{
    actor::Actor,
    models::{ai_config::AiProvider, response_template::ResponseTone, store::Store},
    ports::{AiConfigRepository, ReviewRepository, StoreRepository},
    use_cases::{
        ai_config::{ConfigureAiService, ConfigureAiServiceInput, SuggestReviewResponse, SuggestReviewResponseInput},
        pricing::{GetPricingPlanBySlug, ListPricingPlans},
        response_template::{CreateResponseTemplate, CreateResponseTemplateInput, ListResponseTemplates, ListResponseTemplatesInput},
        review::{GetReviewStats, ImportedReview, RespondToReview, RespondToReviewInput, StoreReviewsInput, SyncStoreReviews},
    },
};
use review_lottery::error::ErrorKind;

fn imported(google_id: &str, author: &str, rating: i32) -> ImportedReview {
    ImportedReview {
        google_review_id: google_id.into(),
        author_name: author.into(),
        rating,
        content: Some(format!("{} stars from {}", rating, author)),
        published_at: Utc::now() - Duration::days(2),
    }
}

async fn store_for(app: &TestApp, slug: &str) -> Store {
    let details = app.draft_campaign(slug, vec![common::prize("Coffee", 100.0, None)]).await;
    app.state.store_repo.find_by_id(&details.campaign.store_id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_synced_reviews_keep_their_responses() {
    let app = TestApp::new().await;
    let store = store_for(&app, "review-desk").await;
    let sync = SyncStoreReviews::new(app.state.review_repo.clone(), app.state.store_repo.clone());

    let stored = sync
        .execute(&store.id, vec![imported("g-1", "Ana", 5), imported("g-2", "Bob", 2)])
        .await
        .unwrap();
    assert_eq!(stored, 2);

    let reviews = app.state.review_repo.list_by_store(&store.id).await.unwrap();
    let bob = reviews.iter().find(|r| r.google_review_id == "g-2").unwrap();
    let answered = RespondToReview::new(
        app.state.review_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
    )
    .execute(RespondToReviewInput {
        actor: app.owner(),
        review_id: bob.id.clone(),
        content: "Sorry about the wait, come back soon.".into(),
    })
    .await
    .unwrap();
    assert!(answered.has_response());

    // Google sends Bob's review again with an edited rating.
    sync.execute(&store.id, vec![imported("g-2", "Bob", 3)]).await.unwrap();

    let reviews = app.state.review_repo.list_by_store(&store.id).await.unwrap();
    assert_eq!(reviews.len(), 2);
    let bob = reviews.iter().find(|r| r.google_review_id == "g-2").unwrap();
    assert_eq!(bob.rating, 3);
    assert_eq!(bob.response.as_ref().unwrap().content(), "Sorry about the wait, come back soon.");

    let stats = GetReviewStats::new(
        app.state.review_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
    )
    .execute(StoreReviewsInput { actor: app.owner(), store_id: store.id.clone() })
    .await
    .unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.average_rating, Some(4.0));
    assert_eq!(stats.responded, 1);
    assert_eq!(stats.response_rate(), 0.5);
}

#[tokio::test]
async fn test_stats_for_a_stranger_are_forbidden() {
    let app = TestApp::new().await;
    let store = store_for(&app, "private-desk").await;

    let err = GetReviewStats::new(
        app.state.review_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
    )
    .execute(StoreReviewsInput { actor: Actor::user("intruder"), store_id: store.id })
    .await
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_templates_are_filtered_by_rating() {
    let app = TestApp::new().await;
    let store = store_for(&app, "template-desk").await;
    let create = CreateResponseTemplate::new(app.state.response_template_repo.clone(), app.state.brand_repo.clone());

    for (name, min, max, tone) in [
        ("Happy", Some(4), Some(5), ResponseTone::Enthusiastic),
        ("Apology", Some(1), Some(2), ResponseTone::Apologetic),
        ("Generic", None, None, ResponseTone::Professional),
    ] {
        create
            .execute(CreateResponseTemplateInput {
                actor: app.owner(),
                brand_id: store.brand_id.clone(),
                name: name.into(),
                content: "Thank you for your visit!".into(),
                tone,
                min_rating: min,
                max_rating: max,
            })
            .await
            .unwrap();
    }

    let list = ListResponseTemplates::new(app.state.response_template_repo.clone(), app.state.brand_repo.clone());
    let low = list
        .execute(ListResponseTemplatesInput { actor: app.owner(), brand_id: store.brand_id.clone(), rating: Some(1) })
        .await
        .unwrap();
    let mut names: Vec<String> = low.into_iter().map(|t| t.name).collect();
    names.sort();
    assert_eq!(names, vec!["Apology".to_string(), "Generic".to_string()]);

    let all = list
        .execute(ListResponseTemplatesInput { actor: app.owner(), brand_id: store.brand_id.clone(), rating: None })
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_ai_suggestion_uses_the_decrypted_key() {
    let app = TestApp::new().await;
    let store = store_for(&app, "ai-desk").await;
    SyncStoreReviews::new(app.state.review_repo.clone(), app.state.store_repo.clone())
        .execute(&store.id, vec![imported("g-9", "Chloe", 5)])
        .await
        .unwrap();
    let review = app.state.review_repo.list_by_store(&store.id).await.unwrap().remove(0);

    let configure = ConfigureAiService::new(
        app.state.ai_config_repo.clone(),
        app.state.brand_repo.clone(),
        app.state.encryption_service.clone(),
    );
    let saved = configure
        .execute(ConfigureAiServiceInput {
            actor: app.owner(),
            brand_id: store.brand_id.clone(),
            provider: AiProvider::OpenAi,
            model: None,
            api_key: "sk-live-123".into(),
            is_enabled: true,
        })
        .await
        .unwrap();
    assert_eq!(saved.model, "gpt-4o-mini");
    assert_ne!(saved.encrypted_api_key, "sk-live-123");

    // Reconfiguring replaces the row in place.
    let again = configure
        .execute(ConfigureAiServiceInput {
            actor: app.owner(),
            brand_id: store.brand_id.clone(),
            provider: AiProvider::Gemini,
            model: Some("gemini-2.0-flash".into()),
            api_key: "g-key-456".into(),
            is_enabled: true,
        })
        .await
        .unwrap();
    assert_eq!(again.id, saved.id);
    let stored = app.state.ai_config_repo.find_by_brand(&store.brand_id).await.unwrap().unwrap();
    assert_eq!(stored.provider, AiProvider::Gemini);

    let suggestion = SuggestReviewResponse::new(
        app.state.ai_config_repo.clone(),
        app.state.review_repo.clone(),
        app.state.store_repo.clone(),
        app.state.brand_repo.clone(),
        app.state.encryption_service.clone(),
        app.state.ai_responders.clone(),
    )
    .execute(SuggestReviewResponseInput {
        actor: app.owner(),
        review_id: review.id,
        tone: ResponseTone::Friendly,
        language: "".into(),
        include_emojis: false,
    })
    .await
    .unwrap();
    assert_eq!(suggestion.suggested_response, "Thanks Chloe (g-key-456)");
    assert_eq!(suggestion.provider, AiProvider::Gemini);
}

#[tokio::test]
async fn test_seeded_pricing_plans() {
    let app = TestApp::new().await;

    let plans = ListPricingPlans::new(app.state.pricing_plan_repo.clone()).execute().await.unwrap();
    let slugs: Vec<&str> = plans.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["free", "pro", "business"]);
    assert_eq!(plans[0].price_cents, 0);

    let pro = GetPricingPlanBySlug::new(app.state.pricing_plan_repo.clone()).execute(" PRO ").await.unwrap();
    assert!(pro.is_popular);
    assert_eq!(pro.price_cents, 2900);

    let err = GetPricingPlanBySlug::new(app.state.pricing_plan_repo.clone())
        .execute("enterprise")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
