use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;

pub type PricingPlanId = TypedId<PricingPlan>;

string_enum! {
    pub enum BillingInterval {
        Month => "MONTH",
        Year => "YEAR",
        OneTime => "ONE_TIME",
    }
}

/// Catalog entry. Read-heavy, seeded by migrations.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PricingPlan {
    pub id: PricingPlanId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    #[sqlx(rename = "billing_interval")]
    pub interval: BillingInterval,
    #[sqlx(json)]
    pub features: Vec<String>,
    pub max_stores: Option<i32>,
    pub max_campaigns: Option<i32>,
    pub display_order: i32,
    pub is_active: bool,
    pub is_popular: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingPlan {
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }
}
