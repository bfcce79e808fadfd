use crate::domain::{models::pricing_plan::PricingPlan, ports::PricingPlanRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPricingPlanRepo {
    pool: PgPool,
}

impl PostgresPricingPlanRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingPlanRepository for PostgresPricingPlanRepo {
    async fn list_active(&self) -> Result<Vec<PricingPlan>, AppError> {
        sqlx::query_as::<_, PricingPlan>("SELECT * FROM pricing_plans WHERE is_active = TRUE ORDER BY display_order ASC, price_cents ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PricingPlan>, AppError> {
        sqlx::query_as::<_, PricingPlan>("SELECT * FROM pricing_plans WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
