use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::actor::Actor;
use crate::domain::models::{
    brand::{validate_http_url, BrandId},
    campaign::{Campaign, CampaignId},
    store::{normalize_slug, NewStoreParams, Store, StoreId},
    store_history::StoreHistory,
};
use crate::domain::ports::{BrandRepository, CampaignRepository, StoreHistoryRepository, StoreRepository};
use crate::domain::use_cases::{load_managed_brand, load_managed_store};
use crate::error::AppError;

pub struct CreateStoreInput {
    pub actor: Actor,
    pub brand_id: BrandId,
    pub name: String,
    pub slug: String,
    pub google_business_url: String,
    pub google_place_id: Option<String>,
    pub description: Option<String>,
}

pub struct CreateStore {
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
    history: Arc<dyn StoreHistoryRepository>,
}

impl CreateStore {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
        history: Arc<dyn StoreHistoryRepository>,
    ) -> Self {
        Self { stores, brands, history }
    }

    pub async fn execute(&self, input: CreateStoreInput) -> Result<Store, AppError> {
        let brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;

        let mut store = Store::new(NewStoreParams {
            brand_id: brand.id.clone(),
            name: input.name,
            slug: input.slug,
            google_business_url: input.google_business_url,
            google_place_id: input.google_place_id,
            description: input.description,
        })?;
        store.is_paid = brand.is_paid;

        if !brand.is_paid {
            if self.stores.count_by_brand(&brand.id).await? >= 1 {
                return Err(AppError::Forbidden("The free plan includes a single store".into()));
            }
            // A deleted free store cannot be recreated to reset its campaign history.
            if self.history.exists_by_google_business_url(&store.google_business_url).await? {
                warn!(url = %store.google_business_url, "Rejected free store re-creation");
                return Err(AppError::Conflict(
                    "This Google Business listing was already used by a free store".into(),
                ));
            }
        }

        if self.stores.slug_exists(&store.slug).await? {
            return Err(AppError::Conflict(format!("Slug '{}' is already taken", store.slug)));
        }

        let created = self.stores.create(&store).await.map_err(|e| {
            if e.is_unique_violation() {
                AppError::Conflict(format!("Slug '{}' is already taken", store.slug))
            } else {
                e
            }
        })?;
        info!(store_id = %created.id, slug = %created.slug, "Store created");
        Ok(created)
    }
}

/// What a customer scanning the QR code lands on.
#[derive(Debug, Clone, Serialize)]
pub struct StoreLanding {
    pub store: Store,
    pub campaign: Option<Campaign>,
}

pub struct GetStoreBySlug {
    stores: Arc<dyn StoreRepository>,
    campaigns: Arc<dyn CampaignRepository>,
}

impl GetStoreBySlug {
    pub fn new(stores: Arc<dyn StoreRepository>, campaigns: Arc<dyn CampaignRepository>) -> Self {
        Self { stores, campaigns }
    }

    pub async fn execute(&self, slug: &str) -> Result<StoreLanding, AppError> {
        let slug = normalize_slug(slug)?;
        let store = self
            .stores
            .find_by_slug(&slug)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        let pinned = match &store.qr_campaign_id {
            Some(id) => self.campaigns.find_by_id(id).await?.filter(|c| c.is_active),
            None => None,
        };
        let campaign = match pinned {
            Some(c) => Some(c),
            None => self.campaigns.find_active_by_store(&store.id).await?,
        };

        Ok(StoreLanding { store, campaign })
    }
}

pub struct ListStoresInput {
    pub actor: Actor,
    pub brand_id: BrandId,
}

pub struct ListStores {
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl ListStores {
    pub fn new(stores: Arc<dyn StoreRepository>, brands: Arc<dyn BrandRepository>) -> Self {
        Self { stores, brands }
    }

    pub async fn execute(&self, input: ListStoresInput) -> Result<Vec<Store>, AppError> {
        let brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;
        self.stores.list_by_brand(&brand.id).await
    }
}

#[derive(Default)]
pub struct StoreChanges {
    pub name: Option<String>,
    pub google_business_url: Option<String>,
    pub google_place_id: Option<String>,
    pub description: Option<String>,
}

pub struct UpdateStoreInput {
    pub actor: Actor,
    pub store_id: StoreId,
    pub changes: StoreChanges,
}

pub struct UpdateStore {
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl UpdateStore {
    pub fn new(stores: Arc<dyn StoreRepository>, brands: Arc<dyn BrandRepository>) -> Self {
        Self { stores, brands }
    }

    pub async fn execute(&self, input: UpdateStoreInput) -> Result<Store, AppError> {
        let (mut store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;
        let changes = input.changes;

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Store name is required".into()));
            }
            store.name = name;
        }
        if let Some(url) = changes.google_business_url {
            validate_http_url("google_business_url", &url)?;
            store.google_business_url = url.trim().to_string();
        }
        if changes.google_place_id.is_some() {
            store.google_place_id = changes.google_place_id;
        }
        if changes.description.is_some() {
            store.description = changes.description;
        }
        store.updated_at = Utc::now();

        self.stores.update(&store).await
    }
}

pub struct StoreRef {
    pub actor: Actor,
    pub store_id: StoreId,
}

pub struct DeactivateStore {
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl DeactivateStore {
    pub fn new(stores: Arc<dyn StoreRepository>, brands: Arc<dyn BrandRepository>) -> Self {
        Self { stores, brands }
    }

    pub async fn execute(&self, input: StoreRef) -> Result<Store, AppError> {
        let (mut store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;
        if !store.is_active {
            return Err(AppError::Conflict("Store is already inactive".into()));
        }
        store.is_active = false;
        store.updated_at = Utc::now();
        self.stores.update(&store).await
    }
}

pub struct DeleteStore {
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
    history: Arc<dyn StoreHistoryRepository>,
}

impl DeleteStore {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
        history: Arc<dyn StoreHistoryRepository>,
    ) -> Self {
        Self { stores, brands, history }
    }

    pub async fn execute(&self, input: StoreRef) -> Result<StoreHistory, AppError> {
        let (store, brand) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;

        let entry = StoreHistory::archive(&store, brand.owner_id.clone());
        self.history.archive_store(&entry).await?;

        info!(store_id = %store.id, history_id = %entry.id, "Store archived and deleted");
        Ok(entry)
    }
}

pub struct SetStoreQrCampaignInput {
    pub actor: Actor,
    pub store_id: StoreId,
    /// `None` falls back to whichever campaign is active.
    pub campaign_id: Option<CampaignId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QrTarget {
    pub store: Store,
    pub landing_url: String,
}

/// Re-points a store's printed QR code. The encoded URL never changes.
pub struct SetStoreQrCampaign {
    stores: Arc<dyn StoreRepository>,
    brands: Arc<dyn BrandRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    public_base_url: String,
}

impl SetStoreQrCampaign {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        brands: Arc<dyn BrandRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        public_base_url: String,
    ) -> Self {
        Self { stores, brands, campaigns, public_base_url }
    }

    pub async fn execute(&self, input: SetStoreQrCampaignInput) -> Result<QrTarget, AppError> {
        let (mut store, _) =
            load_managed_store(self.stores.as_ref(), self.brands.as_ref(), &input.store_id, &input.actor).await?;

        if let Some(campaign_id) = &input.campaign_id {
            let campaign = self
                .campaigns
                .find_by_id(campaign_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;
            if campaign.store_id != store.id {
                return Err(AppError::Validation("Campaign belongs to another store".into()));
            }
        }

        store.qr_campaign_id = input.campaign_id;
        store.updated_at = Utc::now();
        let store = self.stores.update(&store).await?;
        let landing_url = store.landing_url(&self.public_base_url);

        Ok(QrTarget { store, landing_url })
    }
}
