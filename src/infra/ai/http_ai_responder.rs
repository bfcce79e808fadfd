use crate::domain::models::{ai_config::AiProvider, response_template::ResponseTone};
use crate::domain::ports::{
    AiProviderSettings, AiResponderFactory, AiResponseGenerator, AiResponseInput, AiResponseOutput, Sentiment,
};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const CONFIDENT: f64 = 0.9;
const UNSURE: f64 = 0.5;

/// Hands out one responder per brand config, sharing the HTTP client.
pub struct HttpAiResponderFactory {
    client: Client,
}

impl HttpAiResponderFactory {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl AiResponderFactory for HttpAiResponderFactory {
    fn build(&self, settings: AiProviderSettings) -> Arc<dyn AiResponseGenerator> {
        Arc::new(HttpAiResponder { client: self.client.clone(), settings })
    }
}

pub struct HttpAiResponder {
    client: Client,
    settings: AiProviderSettings,
}

/// Text pulled out of a provider reply.
#[derive(Debug, PartialEq)]
struct Completion {
    text: String,
    tokens_used: u32,
    finished_cleanly: bool,
}

impl HttpAiResponder {
    fn request(&self) -> RequestBuilder {
        match self.settings.provider {
            AiProvider::Gemini => self
                .client
                .post(format!("{}/{}:generateContent", GEMINI_BASE_URL, self.settings.model))
                .header("x-goog-api-key", &self.settings.api_key),
            AiProvider::OpenAi => self.client.post(OPENAI_CHAT_URL).bearer_auth(&self.settings.api_key),
        }
    }

    fn payload(&self, system: &str, prompt: &str) -> Value {
        match self.settings.provider {
            AiProvider::Gemini => json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "systemInstruction": { "parts": [{ "text": system }] },
                "generationConfig": { "temperature": 0.7, "maxOutputTokens": 512 }
            }),
            AiProvider::OpenAi => json!({
                "model": self.settings.model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": prompt }
                ],
                "temperature": 0.7,
                "max_tokens": 512
            }),
        }
    }

    async fn send_request_with_retry(&self, payload: &Value) -> Result<Value, AppError> {
        let provider = self.settings.provider;
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            match self.request().json(payload).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json().await.map_err(|e| {
                            error!("Failed to parse {} response JSON: {:?}", provider, e);
                            AppError::InternalWithMsg(format!("{} returned malformed JSON", provider))
                        });
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            let text = response.text().await.unwrap_or_default();
                            error!("{} failed after {} retries. Status: {}", provider, retries, status);
                            return Err(AppError::InternalWithMsg(format!("AI provider error: {} - {}", status, text)));
                        }
                        warn!("{} transient error {}. Retrying in {}ms...", provider, status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        return Err(rejected(provider, status, &text));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("{} network error after {} retries: {:?}", provider, retries, e);
                        return Err(AppError::InternalWithMsg(format!("AI network error: {}", e)));
                    }
                    warn!("{} network error. Retrying in {}ms... {:?}", provider, backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

#[async_trait]
impl AiResponseGenerator for HttpAiResponder {
    #[instrument(skip(self, input), fields(provider = %self.settings.provider, model = %self.settings.model, rating = input.review_rating))]
    async fn generate_response(&self, input: &AiResponseInput) -> Result<AiResponseOutput, AppError> {
        let (system, prompt) = build_prompt(input);
        let payload = self.payload(&system, &prompt);

        info!("Requesting review reply suggestion");
        let body = self.send_request_with_retry(&payload).await?;
        let completion = match self.settings.provider {
            AiProvider::Gemini => extract_gemini(&body)?,
            AiProvider::OpenAi => extract_openai(&body)?,
        };
        if !completion.finished_cleanly {
            warn!("Suggestion was cut short by the provider");
        }

        Ok(AiResponseOutput {
            suggested_response: completion.text,
            confidence: if completion.finished_cleanly { CONFIDENT } else { UNSURE },
            sentiment: Sentiment::from_rating(input.review_rating),
            tokens_used: completion.tokens_used,
            provider: self.settings.provider,
            model: self.settings.model.clone(),
        })
    }

    fn is_available(&self) -> bool {
        !self.settings.api_key.trim().is_empty() && !self.settings.model.trim().is_empty()
    }

    fn active_provider(&self) -> AiProvider {
        self.settings.provider
    }
}

fn tone_instruction(tone: ResponseTone) -> &'static str {
    match tone {
        ResponseTone::Professional => "courteous and professional",
        ResponseTone::Friendly => "warm and friendly",
        ResponseTone::Enthusiastic => "upbeat and enthusiastic",
        ResponseTone::Apologetic => "sincerely apologetic and solution-oriented",
    }
}

/// Returns `(system instruction, user prompt)`.
fn build_prompt(input: &AiResponseInput) -> (String, String) {
    let emojis = if input.include_emojis { "You may use a few fitting emojis." } else { "Do not use emojis." };
    let system = format!(
        "You write public replies from a local business to its Google reviews. \
         Reply in the language with code '{}'. Keep the tone {}. {} \
         Never invent facts, discounts or promises. Return only the reply text.",
        input.language,
        tone_instruction(input.tone),
        emojis,
    );
    let review = if input.review_content.trim().is_empty() { "(no text, rating only)" } else { input.review_content.trim() };
    let prompt = format!(
        "Business: {}\nReviewer: {}\nRating: {}/5\nReview: {}",
        input.store_name, input.author_name, input.review_rating, review,
    );
    (system, prompt)
}

/// A 4xx from the provider means our stored settings are wrong, not the caller's input.
fn rejected(provider: AiProvider, status: StatusCode, body: &str) -> AppError {
    error!("{} rejected the request {}: {}", provider, status, body);
    AppError::InternalWithMsg(format!("{} rejected the request: {}", provider, status))
}

fn clean(text: &str) -> String {
    text.trim().trim_start_matches("```").trim_end_matches("```").trim().to_string()
}

fn extract_gemini(body: &Value) -> Result<Completion, AppError> {
    let first = body.get("candidates").and_then(|c| c.as_array()).and_then(|c| c.first());
    if let Some(first) = first {
        let finish = first.get("finishReason").and_then(|s| s.as_str()).unwrap_or("STOP");
        if finish == "SAFETY" {
            return Err(AppError::Validation("AI reply blocked by safety filters".into()));
        }
        if let Some(text) = first
            .pointer("/content/parts/0/text")
            .and_then(|t| t.as_str())
        {
            let tokens = body.pointer("/usageMetadata/totalTokenCount").and_then(|t| t.as_u64()).unwrap_or(0);
            return Ok(Completion {
                text: clean(text),
                tokens_used: u32::try_from(tokens).unwrap_or(u32::MAX),
                finished_cleanly: finish == "STOP",
            });
        }
    }
    error!("Unexpected Gemini response structure: {:?}", body);
    Err(AppError::InternalWithMsg("AI response missing content".into()))
}

fn extract_openai(body: &Value) -> Result<Completion, AppError> {
    let first = body.get("choices").and_then(|c| c.as_array()).and_then(|c| c.first());
    if let Some(text) = first.and_then(|f| f.pointer("/message/content")).and_then(|t| t.as_str()) {
        let finish = first.and_then(|f| f.get("finish_reason")).and_then(|s| s.as_str()).unwrap_or("stop");
        if finish == "content_filter" {
            return Err(AppError::Validation("AI reply blocked by content filter".into()));
        }
        let tokens = body.pointer("/usage/total_tokens").and_then(|t| t.as_u64()).unwrap_or(0);
        return Ok(Completion {
            text: clean(text),
            tokens_used: u32::try_from(tokens).unwrap_or(u32::MAX),
            finished_cleanly: finish == "stop",
        });
    }
    error!("Unexpected OpenAI response structure: {:?}", body);
    Err(AppError::InternalWithMsg("AI response missing content".into()))
}
