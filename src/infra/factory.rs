use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::ConnectOptions;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::{AppState, Database};
use crate::infra::ai::http_ai_responder::HttpAiResponderFactory;
use crate::infra::crypto::aes_encryption_service::AesEncryptionService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_ai_config_repo::PostgresAiConfigRepo, postgres_brand_repo::PostgresBrandRepo,
    postgres_campaign_repo::PostgresCampaignRepo, postgres_participant_repo::PostgresParticipantRepo,
    postgres_pricing_plan_repo::PostgresPricingPlanRepo, postgres_response_template_repo::PostgresResponseTemplateRepo,
    postgres_review_repo::PostgresReviewRepo, postgres_store_history_repo::PostgresStoreHistoryRepo,
    postgres_store_repo::PostgresStoreRepo, postgres_winner_repo::PostgresWinnerRepo,
    sqlite_ai_config_repo::SqliteAiConfigRepo, sqlite_brand_repo::SqliteBrandRepo,
    sqlite_campaign_repo::SqliteCampaignRepo, sqlite_participant_repo::SqliteParticipantRepo,
    sqlite_pricing_plan_repo::SqlitePricingPlanRepo, sqlite_response_template_repo::SqliteResponseTemplateRepo,
    sqlite_review_repo::SqliteReviewRepo, sqlite_store_history_repo::SqliteStoreHistoryRepo,
    sqlite_store_repo::SqliteStoreRepo, sqlite_winner_repo::SqliteWinnerRepo,
};

fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

/// Opens the pool for `DATABASE_URL`: Postgres by scheme, SQLite (WAL) otherwise.
pub async fn connect(config: &Config) -> Result<Database, AppError> {
    let database_url = &config.database_url;

    if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse().map_err(AppError::Database)?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;
        Ok(Database::Postgres(pool))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;
        Ok(Database::Sqlite(pool))
    }
}

pub async fn run_migrations(database: &Database) -> Result<(), AppError> {
    match database {
        Database::Postgres(pool) => sqlx::migrate!("./migrations/postgres")
            .run(pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?,
        Database::Sqlite(pool) => sqlx::migrate!("./migrations/sqlite")
            .run(pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?,
    }
    info!(backend = database.backend(), "Migrations applied");
    Ok(())
}

/// Wires every adapter around an already migrated pool.
pub fn build_state(config: &Config, database: Database) -> Result<AppState, AppError> {
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from.clone(),
    ));
    let encryption_service = Arc::new(AesEncryptionService::from_base64_key(&config.encryption_key)?);
    let ai_responders = Arc::new(HttpAiResponderFactory::new(Duration::from_secs(config.ai_request_timeout_secs)));

    let state = match &database {
        Database::Postgres(pool) => AppState {
            config: config.clone(),
            database: database.clone(),
            brand_repo: Arc::new(PostgresBrandRepo::new(pool.clone())),
            store_repo: Arc::new(PostgresStoreRepo::new(pool.clone())),
            store_history_repo: Arc::new(PostgresStoreHistoryRepo::new(pool.clone())),
            campaign_repo: Arc::new(PostgresCampaignRepo::new(pool.clone())),
            participant_repo: Arc::new(PostgresParticipantRepo::new(pool.clone())),
            winner_repo: Arc::new(PostgresWinnerRepo::new(pool.clone())),
            pricing_plan_repo: Arc::new(PostgresPricingPlanRepo::new(pool.clone())),
            response_template_repo: Arc::new(PostgresResponseTemplateRepo::new(pool.clone())),
            review_repo: Arc::new(PostgresReviewRepo::new(pool.clone())),
            ai_config_repo: Arc::new(PostgresAiConfigRepo::new(pool.clone())),
            email_service,
            encryption_service,
            ai_responders,
        },
        Database::Sqlite(pool) => AppState {
            config: config.clone(),
            database: database.clone(),
            brand_repo: Arc::new(SqliteBrandRepo::new(pool.clone())),
            store_repo: Arc::new(SqliteStoreRepo::new(pool.clone())),
            store_history_repo: Arc::new(SqliteStoreHistoryRepo::new(pool.clone())),
            campaign_repo: Arc::new(SqliteCampaignRepo::new(pool.clone())),
            participant_repo: Arc::new(SqliteParticipantRepo::new(pool.clone())),
            winner_repo: Arc::new(SqliteWinnerRepo::new(pool.clone())),
            pricing_plan_repo: Arc::new(SqlitePricingPlanRepo::new(pool.clone())),
            response_template_repo: Arc::new(SqliteResponseTemplateRepo::new(pool.clone())),
            review_repo: Arc::new(SqliteReviewRepo::new(pool.clone())),
            ai_config_repo: Arc::new(SqliteAiConfigRepo::new(pool.clone())),
            email_service,
            encryption_service,
            ai_responders,
        },
    };
    Ok(state)
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database = connect(config).await?;
    run_migrations(&database).await?;
    build_state(config, database)
}
