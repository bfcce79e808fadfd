use crate::domain::ports::{EmailOptions, EmailReceipt, EmailService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, instrument, warn};

/// Posts mail to the relay service as JSON, one request per message.
pub struct HttpEmailService {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to_addr: &'a str,
    subject: &'a str,
    html_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize, Default)]
struct RelayResponse {
    #[serde(default)]
    id: Option<String>,
}

#[async_trait]
impl EmailService for HttpEmailService {
    #[instrument(skip(self, options), fields(to = %options.to))]
    async fn send_email(&self, options: EmailOptions) -> Result<EmailReceipt, AppError> {
        let payload = EmailPayload {
            from: &self.from,
            to_addr: &options.to,
            subject: &options.subject,
            html_body: &options.html_body,
            text_body: options.text_body.as_deref(),
            reply_to: options.reply_to.as_deref(),
        };

        let res = self.client.post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Email service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Email service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        // Relays that answer with an empty body still accepted the message.
        let body: RelayResponse = res.json().await.unwrap_or_default();
        Ok(EmailReceipt {
            id: body.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            success: true,
        })
    }

    async fn send_batch(&self, emails: Vec<EmailOptions>) -> Result<Vec<EmailReceipt>, AppError> {
        let mut receipts = Vec::with_capacity(emails.len());
        for options in emails {
            let to = options.to.clone();
            match self.send_email(options).await {
                Ok(receipt) => receipts.push(receipt),
                Err(e) => {
                    warn!(%to, "Batch email failed: {}", e);
                    receipts.push(EmailReceipt { id: String::new(), success: false });
                }
            }
        }
        Ok(receipts)
    }
}
