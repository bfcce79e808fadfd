use std::sync::Arc;

use crate::domain::actor::Actor;
use crate::domain::models::{
    brand::BrandId,
    response_template::{NewResponseTemplateParams, ResponseTemplate, ResponseTemplateId, ResponseTone},
};
use crate::domain::ports::{BrandRepository, ResponseTemplateRepository};
use crate::domain::use_cases::{load_managed_brand, require_id};
use crate::error::AppError;

pub struct CreateResponseTemplateInput {
    pub actor: Actor,
    pub brand_id: BrandId,
    pub name: String,
    pub content: String,
    pub tone: ResponseTone,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
}

pub struct CreateResponseTemplate {
    templates: Arc<dyn ResponseTemplateRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl CreateResponseTemplate {
    pub fn new(templates: Arc<dyn ResponseTemplateRepository>, brands: Arc<dyn BrandRepository>) -> Self {
        Self { templates, brands }
    }

    pub async fn execute(&self, input: CreateResponseTemplateInput) -> Result<ResponseTemplate, AppError> {
        let brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;
        let template = ResponseTemplate::new(NewResponseTemplateParams {
            brand_id: brand.id,
            name: input.name,
            content: input.content,
            tone: input.tone,
            min_rating: input.min_rating,
            max_rating: input.max_rating,
        })?;
        self.templates.create(&template).await
    }
}

pub struct ListResponseTemplatesInput {
    pub actor: Actor,
    pub brand_id: BrandId,
    /// Only templates whose rating range covers this value.
    pub rating: Option<i32>,
}

pub struct ListResponseTemplates {
    templates: Arc<dyn ResponseTemplateRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl ListResponseTemplates {
    pub fn new(templates: Arc<dyn ResponseTemplateRepository>, brands: Arc<dyn BrandRepository>) -> Self {
        Self { templates, brands }
    }

    pub async fn execute(&self, input: ListResponseTemplatesInput) -> Result<Vec<ResponseTemplate>, AppError> {
        let brand = load_managed_brand(self.brands.as_ref(), &input.brand_id, &input.actor).await?;
        let templates = self.templates.list_by_brand(&brand.id).await?;
        Ok(match input.rating {
            Some(rating) => templates.into_iter().filter(|t| t.matches_rating(rating)).collect(),
            None => templates,
        })
    }
}

pub struct DeleteResponseTemplateInput {
    pub actor: Actor,
    pub template_id: ResponseTemplateId,
}

pub struct DeleteResponseTemplate {
    templates: Arc<dyn ResponseTemplateRepository>,
    brands: Arc<dyn BrandRepository>,
}

impl DeleteResponseTemplate {
    pub fn new(templates: Arc<dyn ResponseTemplateRepository>, brands: Arc<dyn BrandRepository>) -> Self {
        Self { templates, brands }
    }

    pub async fn execute(&self, input: DeleteResponseTemplateInput) -> Result<(), AppError> {
        require_id(&input.template_id, "Template id")?;
        let template = self
            .templates
            .find_by_id(&input.template_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Template not found".into()))?;
        load_managed_brand(self.brands.as_ref(), &template.brand_id, &input.actor).await?;
        self.templates.delete(&template.id).await
    }
}
