use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::ids::TypedId;
use crate::domain::models::brand::BrandId;

pub type AiServiceConfigId = TypedId<AiServiceConfig>;

string_enum! {
    pub enum AiProvider {
        Gemini => "GEMINI",
        OpenAi => "OPENAI",
    }
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::OpenAi => "gpt-4o-mini",
        }
    }
}

/// Per-brand AI provider settings. The API key is only ever stored encrypted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AiServiceConfig {
    pub id: AiServiceConfigId,
    pub brand_id: BrandId,
    pub provider: AiProvider,
    pub model: String,
    #[serde(skip_serializing)]
    pub encrypted_api_key: String,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AiServiceConfig {
    pub fn new(brand_id: BrandId, provider: AiProvider, model: Option<String>, encrypted_api_key: String) -> Self {
        let now = Utc::now();
        let model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());
        Self {
            id: AiServiceConfigId::new(),
            brand_id,
            provider,
            model,
            encrypted_api_key,
            is_enabled: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_applied() {
        let cfg = AiServiceConfig::new(BrandId::from("b"), AiProvider::OpenAi, Some("  ".into()), "xx".into());
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert!(cfg.is_enabled);
    }

    #[test]
    fn test_key_is_not_serialized() {
        let cfg = AiServiceConfig::new(BrandId::from("b"), AiProvider::Gemini, None, "secret-cipher".into());
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("secret-cipher"));
        assert!(json.contains("\"GEMINI\""));
    }
}
