use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::actor::UserId;
use crate::domain::ids::TypedId;
use crate::domain::models::brand::BrandId;
use crate::domain::models::store::{Store, StoreId};

pub type StoreHistoryId = TypedId<StoreHistory>;

/// Snapshot of a deleted store. Kept so a free-tier Google listing cannot be
/// re-registered by deleting and recreating its store.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct StoreHistory {
    pub id: StoreHistoryId,
    pub original_store_id: StoreId,
    pub brand_id: BrandId,
    pub owner_id: UserId,
    pub name: String,
    pub slug: String,
    pub google_business_url: String,
    pub google_place_id: Option<String>,
    pub was_paid: bool,
    pub archived_at: DateTime<Utc>,
}

impl StoreHistory {
    pub fn archive(store: &Store, owner_id: UserId) -> Self {
        Self {
            id: StoreHistoryId::new(),
            original_store_id: store.id.clone(),
            brand_id: store.brand_id.clone(),
            owner_id,
            name: store.name.clone(),
            slug: store.slug.clone(),
            google_business_url: store.google_business_url.clone(),
            google_place_id: store.google_place_id.clone(),
            was_paid: store.is_paid,
            archived_at: Utc::now(),
        }
    }
}
