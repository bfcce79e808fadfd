use crate::domain::{
    models::{review::{Review, ReviewId, ReviewRow}, store::StoreId},
    ports::ReviewRepository,
    value_objects::ReviewResponse,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteReviewRepo {
    pool: SqlitePool,
}

impl SqliteReviewRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepo {
    async fn upsert(&self, review: &Review) -> Result<Review, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (id, store_id, google_review_id, author_name, rating, content, published_at, synced_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (store_id, google_review_id) DO UPDATE SET
                author_name = excluded.author_name, rating = excluded.rating, content = excluded.content,
                published_at = excluded.published_at, synced_at = excluded.synced_at
             RETURNING *"
        )
            .bind(&review.id).bind(&review.store_id).bind(&review.google_review_id).bind(&review.author_name)
            .bind(review.rating).bind(&review.content).bind(review.published_at).bind(review.synced_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.into())
    }
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.map(Review::from))
    }
    async fn list_by_store(&self, store_id: &StoreId) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE store_id = ? ORDER BY published_at DESC").bind(store_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
    async fn save_response(&self, id: &ReviewId, response: &ReviewResponse) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE reviews SET response_content = ?, responded_by = ?, responded_at = ? WHERE id = ?")
            .bind(response.content()).bind(response.responded_by()).bind(response.responded_at()).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Review not found".into())); }
        Ok(())
    }
}
