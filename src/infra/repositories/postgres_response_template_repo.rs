use crate::domain::{
    models::{brand::BrandId, response_template::{ResponseTemplate, ResponseTemplateId}},
    ports::ResponseTemplateRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresResponseTemplateRepo {
    pool: PgPool,
}

impl PostgresResponseTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseTemplateRepository for PostgresResponseTemplateRepo {
    async fn create(&self, template: &ResponseTemplate) -> Result<ResponseTemplate, AppError> {
        sqlx::query_as::<_, ResponseTemplate>(
            "INSERT INTO response_templates (id, brand_id, name, content, tone, min_rating, max_rating, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&template.id)
            .bind(&template.brand_id)
            .bind(&template.name)
            .bind(&template.content)
            .bind(template.tone)
            .bind(template.min_rating)
            .bind(template.max_rating)
            .bind(template.created_at)
            .bind(template.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &ResponseTemplateId) -> Result<Option<ResponseTemplate>, AppError> {
        sqlx::query_as::<_, ResponseTemplate>("SELECT * FROM response_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn list_by_brand(&self, brand_id: &BrandId) -> Result<Vec<ResponseTemplate>, AppError> {
        sqlx::query_as::<_, ResponseTemplate>("SELECT * FROM response_templates WHERE brand_id = $1 ORDER BY name ASC")
            .bind(brand_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn delete(&self, id: &ResponseTemplateId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM response_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Template not found".into())); }
        Ok(())
    }
}
