use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::services::prize_draw::ProbabilityPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub encryption_key: String, // base64, 32 bytes
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from: String,
    pub public_base_url: String,
    pub claim_validity_days: i32,
    pub probability_policy: ProbabilityPolicy,
    pub ai_request_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("mail_service_url", &self.mail_service_url)
            .field("mail_from", &self.mail_from)
            .field("public_base_url", &self.public_base_url)
            .field("claim_validity_days", &self.claim_validity_days)
            .field("probability_policy", &self.probability_policy)
            .field("ai_request_timeout_secs", &self.ai_request_timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            encryption_key: required("ENCRYPTION_KEY")?,
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/emails".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "ReviewLottery <no-reply@reviewlottery.local>".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            claim_validity_days: parsed("CLAIM_VALIDITY_DAYS", 30)?,
            probability_policy: parsed("PRIZE_PROBABILITY_POLICY", ProbabilityPolicy::default())?,
            ai_request_timeout_secs: parsed("AI_REQUEST_TIMEOUT_SECS", 30)?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string())),
        _ => Ok(default),
    }
}
