use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::actor::Actor;
use crate::domain::models::{
    review::{Review, ReviewId, ReviewStats, MAX_RATING, MIN_RATING},
    store::StoreId,
};
use crate::domain::ports::{BrandRepository, ReviewRepository, StoreRepository};
use crate::domain::use_cases::{load_managed_store, require_id};
use crate::domain::value_objects::ReviewResponse;
use crate::error::AppError;

pub struct StoreReviewsInput {
    pub actor: Actor,
    pub store_id: StoreId,
}

pub struct ListStoreReviews {
    reviews: Arc<dyn ReviewRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl ListStoreReviews {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self { reviews, stores, brands }
    }

    pub async fn execute(&self, input: StoreReviewsInput) -> Result<Vec<Review>, AppError> {
        let (store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;
        self.reviews.list_by_store(&store.id).await
    }
}

pub struct GetReviewStats {
    reviews: Arc<dyn ReviewRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl GetReviewStats {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self { reviews, stores, brands }
    }

    pub async fn execute(&self, input: StoreReviewsInput) -> Result<ReviewStats, AppError> {
        let (store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;
        let reviews = self.reviews.list_by_store(&store.id).await?;
        Ok(ReviewStats::from_reviews(&reviews))
    }
}

/// A review as delivered by the Google Business client.
#[derive(Debug, Clone)]
pub struct ImportedReview {
    pub google_review_id: String,
    pub author_name: String,
    pub rating: i32,
    pub content: Option<String>,
    pub published_at: DateTime<Utc>,
}

pub struct SyncStoreReviews {
    reviews: Arc<dyn ReviewRepository>,
    stores: Arc<dyn StoreRepository>,
}

impl SyncStoreReviews {
    pub fn new(reviews: Arc<dyn ReviewRepository>, stores: Arc<dyn StoreRepository>) -> Self {
        Self { reviews, stores }
    }

    /// Upserts a batch fetched from Google. Returns how many reviews were stored.
    pub async fn execute(&self, store_id: &StoreId, batch: Vec<ImportedReview>) -> Result<usize, AppError> {
        require_id(store_id, "Store id")?;
        let store = self
            .stores
            .find_by_id(store_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        for imported in &batch {
            if imported.google_review_id.trim().is_empty() {
                return Err(AppError::Validation("google_review_id is required".into()));
            }
            if !(MIN_RATING..=MAX_RATING).contains(&imported.rating) {
                return Err(AppError::Validation(format!(
                    "Review {} has rating {} outside {}-{}",
                    imported.google_review_id, imported.rating, MIN_RATING, MAX_RATING
                )));
            }
        }

        let synced_at = Utc::now();
        let count = batch.len();
        for imported in batch {
            let review = Review {
                id: ReviewId::new(),
                store_id: store.id.clone(),
                google_review_id: imported.google_review_id,
                author_name: imported.author_name,
                rating: imported.rating,
                content: imported.content,
                published_at: imported.published_at,
                response: None,
                synced_at,
            };
            self.reviews.upsert(&review).await?;
        }

        info!(store_id = %store.id, count, "Reviews synced");
        Ok(count)
    }
}

pub struct RespondToReviewInput {
    pub actor: Actor,
    pub review_id: ReviewId,
    pub content: String,
}

pub struct RespondToReview {
    reviews: Arc<dyn ReviewRepository>,
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl RespondToReview {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
    ) -> Self {
        Self { reviews, stores, brands }
    }

    pub async fn execute(&self, input: RespondToReviewInput) -> Result<Review, AppError> {
        require_id(&input.review_id, "Review id")?;
        let mut review = self
            .reviews
            .find_by_id(&input.review_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".into()))?;
        load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &review.store_id, &input.actor).await?;

        let response = ReviewResponse::create(&input.content, input.actor.user_id.as_str(), None)?;
        self.reviews.save_response(&review.id, &response).await?;
        info!(review_id = %review.id, "Review answered");

        review.response = Some(response);
        Ok(review)
    }
}
