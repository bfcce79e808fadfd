//! Application use cases.
//!
//! One struct per business operation. Ports are injected as `Arc<dyn ...>` and
//! every operation is `execute(input) -> Result<Output, AppError>`.
//! Authorization happens here, by walking the ownership chain
//! user -> brand -> store -> campaign.

pub mod ai_config;
pub mod brand;
pub mod campaign;
pub mod play;
pub mod pricing;
pub mod response_template;
pub mod review;
pub mod store;
pub mod winner;

use crate::domain::actor::Actor;
use crate::domain::ids::TypedId;
use crate::domain::models::{
    brand::{Brand, BrandId},
    campaign::{Campaign, CampaignId},
    store::{Store, StoreId},
};
use crate::domain::ports::{BrandRepository, CampaignRepository, StoreRepository};
use crate::error::AppError;

pub(crate) fn require_id<T>(id: &TypedId<T>, field: &str) -> Result<(), AppError> {
    if id.is_blank() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) async fn load_managed_brand(
    brands: &dyn BrandRepository,
    brand_id: &BrandId,
    actor: &Actor,
) -> Result<Brand, AppError> {
    require_id(brand_id, "brand_id")?;
    let brand = brands
        .find_by_id(brand_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".into()))?;

    if !actor.can_manage(&brand.owner_id) {
        return Err(AppError::Forbidden("You do not own this brand".into()));
    }
    Ok(brand)
}

pub(crate) async fn load_managed_store(
    stores: &dyn StoreRepository,
    brands: &dyn BrandRepository,
    store_id: &StoreId,
    actor: &Actor,
) -> Result<(Store, Brand), AppError> {
    require_id(store_id, "store_id")?;
    let store = stores
        .find_by_id(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".into()))?;
    let brand = load_managed_brand(brands, &store.brand_id, actor).await?;
    Ok((store, brand))
}

/// Resolves a campaign and checks that `actor` manages the brand behind it.
pub async fn ensure_campaign_owner(
    campaigns: &dyn CampaignRepository,
    stores: &dyn StoreRepository,
    brands: &dyn BrandRepository,
    campaign_id: &CampaignId,
    actor: &Actor,
) -> Result<Campaign, AppError> {
    require_id(campaign_id, "campaign_id")?;
    let campaign = campaigns
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;
    load_managed_store(stores, brands, &campaign.store_id, actor).await?;
    Ok(campaign)
}
