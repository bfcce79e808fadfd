pub mod sqlite_ai_config_repo;
pub mod sqlite_brand_repo;
pub mod sqlite_campaign_repo;
pub mod sqlite_participant_repo;
pub mod sqlite_pricing_plan_repo;
pub mod sqlite_response_template_repo;
pub mod sqlite_review_repo;
pub mod sqlite_store_history_repo;
pub mod sqlite_store_repo;
pub mod sqlite_winner_repo;

pub mod postgres_ai_config_repo;
pub mod postgres_brand_repo;
pub mod postgres_campaign_repo;
pub mod postgres_participant_repo;
pub mod postgres_pricing_plan_repo;
pub mod postgres_response_template_repo;
pub mod postgres_review_repo;
pub mod postgres_store_history_repo;
pub mod postgres_store_repo;
pub mod postgres_winner_repo;
