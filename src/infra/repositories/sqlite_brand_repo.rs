use crate::domain::actor::UserId;
use crate::domain::{models::brand::{Brand, BrandId}, ports::BrandRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBrandRepo {
    pool: SqlitePool,
}

impl SqliteBrandRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrandRepository for SqliteBrandRepo {
    async fn create(&self, brand: &Brand) -> Result<Brand, AppError> {
        sqlx::query_as::<_, Brand>(
            "INSERT INTO brands (id, name, logo_url, owner_id, primary_color, secondary_color, font, is_paid, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&brand.id).bind(&brand.name).bind(&brand.logo_url).bind(&brand.owner_id)
            .bind(&brand.primary_color).bind(&brand.secondary_color).bind(&brand.font).bind(brand.is_paid)
            .bind(brand.created_at).bind(brand.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &BrandId) -> Result<Option<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE owner_id = ? ORDER BY created_at ASC").bind(owner_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_all(&self) -> Result<Vec<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY created_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count_by_owner_id(&self, owner_id: &UserId) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM brands WHERE owner_id = ?").bind(owner_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, brand: &Brand) -> Result<Brand, AppError> {
        sqlx::query_as::<_, Brand>(
            "UPDATE brands SET name=?, logo_url=?, primary_color=?, secondary_color=?, font=?, is_paid=?, updated_at=? WHERE id=? RETURNING *"
        )
            .bind(&brand.name).bind(&brand.logo_url).bind(&brand.primary_color).bind(&brand.secondary_color)
            .bind(&brand.font).bind(brand.is_paid).bind(brand.updated_at).bind(&brand.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Brand not found".into()))
    }
    async fn delete(&self, id: &BrandId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM brands WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Brand not found".into())); }
        Ok(())
    }
}
