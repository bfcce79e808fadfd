use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::actor::{Actor, UserId};
use crate::domain::models::brand::{Brand, BrandId, NewBrandParams};
use crate::domain::ports::{BrandRepository, StoreRepository};
use crate::domain::use_cases::{load_managed_brand, require_id};
use crate::error::AppError;

pub const MAX_BRANDS_PER_OWNER: i64 = 5;

pub struct GetBrandByIdInput {
    pub id: BrandId,
    pub owner_id: UserId,
}

pub struct GetBrandById {
    brands: Arc<dyn BrandRepository>,
}

impl GetBrandById {
    pub fn new(brands: Arc<dyn BrandRepository>) -> Self {
        Self { brands }
    }

    pub async fn execute(&self, input: GetBrandByIdInput) -> Result<Brand, AppError> {
        require_id(&input.id, "Brand id")?;
        require_id(&input.owner_id, "Owner id")?;

        let brand = self
            .brands
            .find_by_id(&input.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Brand not found".into()))?;

        if brand.owner_id != input.owner_id {
            return Err(AppError::Forbidden("You do not own this brand".into()));
        }
        Ok(brand)
    }
}

pub struct CreateBrandInput {
    pub actor: Actor,
    pub name: String,
    pub logo_url: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
}

pub struct CreateBrand {
    brands: Arc<dyn BrandRepository>,
    max_per_owner: i64,
}

impl CreateBrand {
    pub fn new(brands: Arc<dyn BrandRepository>) -> Self {
        Self { brands, max_per_owner: MAX_BRANDS_PER_OWNER }
    }

    pub fn with_limit(mut self, max_per_owner: i64) -> Self {
        self.max_per_owner = max_per_owner;
        self
    }

    pub async fn execute(&self, input: CreateBrandInput) -> Result<Brand, AppError> {
        let brand = Brand::new(NewBrandParams {
            name: input.name,
            logo_url: input.logo_url,
            owner_id: input.actor.user_id.clone(),
            primary_color: input.primary_color,
            secondary_color: input.secondary_color,
            font: input.font,
        });
        brand.validate()?;

        if !input.actor.role.is_admin() {
            let owned = self.brands.count_by_owner_id(&input.actor.user_id).await?;
            if owned >= self.max_per_owner {
                return Err(AppError::Forbidden(format!(
                    "Brand limit reached ({} per account)",
                    self.max_per_owner
                )));
            }
        }

        let created = self.brands.create(&brand).await?;
        info!(brand_id = %created.id, owner_id = %created.owner_id, "Brand created");
        Ok(created)
    }
}

pub struct ListBrands {
    brands: Arc<dyn BrandRepository>,
}

impl ListBrands {
    pub fn new(brands: Arc<dyn BrandRepository>) -> Self {
        Self { brands }
    }

    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Brand>, AppError> {
        require_id(&actor.user_id, "User id")?;
        self.brands.list_by_owner(&actor.user_id).await
    }
}

pub struct ListAllBrands {
    brands: Arc<dyn BrandRepository>,
}

impl ListAllBrands {
    pub fn new(brands: Arc<dyn BrandRepository>) -> Self {
        Self { brands }
    }

    pub async fn execute(&self, actor: &Actor) -> Result<Vec<Brand>, AppError> {
        if !actor.role.is_admin() {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        self.brands.list_all().await
    }
}

#[derive(Default)]
pub struct BrandChanges {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font: Option<String>,
}

pub struct UpdateBrandInput {
    pub actor: Actor,
    pub brand_id: BrandId,
    pub changes: BrandChanges,
}

pub struct UpdateBrand {
    brands: Arc<dyn BrandRepository>,
}

impl UpdateBrand {
    pub fn new(brands: Arc<dyn BrandRepository>) -> Self {
        Self { brands }
    }

    pub async fn execute(&self, input: UpdateBrandInput) -> Result<Brand, AppError> {
        let mut brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;
        let changes = input.changes;

        if let Some(name) = changes.name {
            brand.name = name.trim().to_string();
        }
        if let Some(logo_url) = changes.logo_url {
            brand.logo_url = logo_url.trim().to_string();
        }
        if changes.primary_color.is_some() {
            brand.primary_color = changes.primary_color;
        }
        if changes.secondary_color.is_some() {
            brand.secondary_color = changes.secondary_color;
        }
        if changes.font.is_some() {
            brand.font = changes.font;
        }
        brand.validate()?;
        brand.updated_at = Utc::now();

        self.brands.update(&brand).await
    }
}

pub struct DeleteBrandInput {
    pub actor: Actor,
    pub brand_id: BrandId,
}

pub struct DeleteBrand {
    brands: Arc<dyn BrandRepository>,
    stores: Arc<dyn StoreRepository>,
}

impl DeleteBrand {
    pub fn new(brands: Arc<dyn BrandRepository>, stores: Arc<dyn StoreRepository>) -> Self {
        Self { brands, stores }
    }

    pub async fn execute(&self, input: DeleteBrandInput) -> Result<(), AppError> {
        let brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;

        let store_count = self.stores.count_by_brand(&brand.id).await?;
        if store_count > 0 {
            return Err(AppError::Conflict(format!(
                "Brand still has {} store(s); delete them first",
                store_count
            )));
        }

        self.brands.delete(&brand.id).await?;
        info!(brand_id = %brand.id, "Brand deleted");
        Ok(())
    }
}
