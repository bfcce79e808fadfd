use crate::domain::{models::{brand::BrandId, store::{Store, StoreId}}, ports::StoreRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresStoreRepo {
    pool: PgPool,
}

impl PostgresStoreRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PostgresStoreRepo {
    async fn create(&self, store: &Store) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(
            "INSERT INTO stores (id, name, slug, google_business_url, google_place_id, description, is_active, is_paid, brand_id, qr_campaign_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *"
        )
            .bind(&store.id)
            .bind(&store.name)
            .bind(&store.slug)
            .bind(&store.google_business_url)
            .bind(&store.google_place_id)
            .bind(&store.description)
            .bind(store.is_active)
            .bind(store.is_paid)
            .bind(&store.brand_id)
            .bind(&store.qr_campaign_id)
            .bind(store.created_at)
            .bind(store.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, AppError> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Store>, AppError> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn list_by_brand(&self, brand_id: &BrandId) -> Result<Vec<Store>, AppError> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE brand_id = $1 ORDER BY created_at ASC")
            .bind(brand_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn count_by_brand(&self, brand_id: &BrandId) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores WHERE brand_id = $1")
            .bind(brand_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM stores WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn update(&self, store: &Store) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(
            "UPDATE stores SET name=$1, google_business_url=$2, google_place_id=$3, description=$4, is_active=$5, is_paid=$6, qr_campaign_id=$7, updated_at=$8 WHERE id=$9 RETURNING *"
        )
            .bind(&store.name)
            .bind(&store.google_business_url)
            .bind(&store.google_place_id)
            .bind(&store.description)
            .bind(store.is_active)
            .bind(store.is_paid)
            .bind(&store.qr_campaign_id)
            .bind(store.updated_at)
            .bind(&store.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Store not found".into()))
    }
}
