use std::sync::Arc;

use crate::domain::models::pricing_plan::PricingPlan;
use crate::domain::ports::PricingPlanRepository;
use crate::error::AppError;

pub struct ListPricingPlans {
    plans: Arc<dyn PricingPlanRepository>,
}

impl ListPricingPlans {
    pub fn new(plans: Arc<dyn PricingPlanRepository>) -> Self {
        Self { plans }
    }

    /// Active plans in display order.
    pub async fn execute(&self) -> Result<Vec<PricingPlan>, AppError> {
        let mut plans: Vec<PricingPlan> = self.plans.list_active().await?.into_iter().filter(|p| p.is_active).collect();
        plans.sort_by_key(|p| (p.display_order, p.price_cents));
        Ok(plans)
    }
}

pub struct GetPricingPlanBySlug {
    plans: Arc<dyn PricingPlanRepository>,
}

impl GetPricingPlanBySlug {
    pub fn new(plans: Arc<dyn PricingPlanRepository>) -> Self {
        Self { plans }
    }

    pub async fn execute(&self, slug: &str) -> Result<PricingPlan, AppError> {
        let slug = slug.trim().to_lowercase();
        if slug.is_empty() {
            return Err(AppError::Validation("Plan slug is required".into()));
        }
        self.plans
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pricing plan '{}' not found", slug)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::pricing_plan::{BillingInterval, PricingPlanId};
    use crate::domain::ports::MockPricingPlanRepository;
    use crate::error::ErrorKind;
    use chrono::Utc;

    fn plan(slug: &str, order: i32, active: bool) -> PricingPlan {
        let now = Utc::now();
        PricingPlan {
            id: PricingPlanId::new(),
            slug: slug.into(),
            name: slug.to_uppercase(),
            description: None,
            price_cents: 0,
            currency: "EUR".into(),
            interval: BillingInterval::Month,
            features: vec!["1 store".into()],
            max_stores: Some(1),
            max_campaigns: None,
            display_order: order,
            is_active: active,
            is_popular: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_active_only() {
        let mut repo = MockPricingPlanRepository::new();
        repo.expect_list_active()
            .returning(|| Ok(vec![plan("pro", 2, true), plan("legacy", 0, false), plan("free", 1, true)]));
        let plans = ListPricingPlans::new(Arc::new(repo)).execute().await.unwrap();

        let slugs: Vec<&str> = plans.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["free", "pro"]);
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        let mut repo = MockPricingPlanRepository::new();
        repo.expect_find_by_slug().withf(|slug| slug == "gold").returning(|_| Ok(None));
        let err = GetPricingPlanBySlug::new(Arc::new(repo)).execute(" Gold ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
