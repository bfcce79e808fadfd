use crate::domain::actor::UserId;
use crate::domain::{models::store_history::StoreHistory, ports::StoreHistoryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteStoreHistoryRepo {
    pool: SqlitePool,
}

impl SqliteStoreHistoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHistoryRepository for SqliteStoreHistoryRepo {
    async fn archive_store(&self, entry: &StoreHistory) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query(
            "INSERT INTO store_history (id, original_store_id, brand_id, owner_id, name, slug, google_business_url, google_place_id, was_paid, archived_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&entry.id).bind(&entry.original_store_id).bind(&entry.brand_id).bind(&entry.owner_id)
            .bind(&entry.name).bind(&entry.slug).bind(&entry.google_business_url).bind(&entry.google_place_id)
            .bind(entry.was_paid).bind(entry.archived_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        let result = sqlx::query("DELETE FROM stores WHERE id = ?").bind(&entry.original_store_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        // Dropping the transaction rolls the history row back.
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Store not found".into())); }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
    async fn exists_by_google_business_url(&self, url: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM store_history WHERE google_business_url = ?)").bind(url).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<StoreHistory>, AppError> {
        sqlx::query_as::<_, StoreHistory>("SELECT * FROM store_history WHERE owner_id = ? ORDER BY archived_at DESC").bind(owner_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
