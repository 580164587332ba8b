//! Outbound messaging-gateway client
//!
//! Sends WhatsApp/SMS acknowledgments through a Twilio-compatible REST API.
//! The client is only constructed when the messaging configuration block is
//! present; callers treat delivery as best-effort.

use reqwest::Client;
use tracing::debug;

use crate::core::config::MessagingConfig;
use crate::core::error::{AppError, Result};

pub struct MessagingClient {
    http: Client,
    config: MessagingConfig,
}

impl MessagingClient {
    pub fn new(config: MessagingConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Send a text message to the given number
    pub async fn send_message(&self, to: &str, body: &str) -> Result<()> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url, self.config.account_sid
        );

        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Messaging gateway request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalServiceError(format!(
                "Messaging gateway returned {}: {}",
                status, body
            )));
        }

        debug!("Acknowledgment message sent to {}", to);
        Ok(())
    }
}
