//! Twilio REST client (Calls and Messages resources)

use super::{OutboundCall, PlatformError, SmsMessage};
use crate::config::{ConfigError, PlatformCredentials};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2010-04-01";

/// Twilio service implementation
pub struct TwilioClient {
    client: Client,
    account_sid: String,
    auth_token: String,
    base_url: String,
}

/// Body of a successful create request; only the SID is used
#[derive(Debug, Deserialize)]
struct CreatedResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioClient {
    /// Build a client. Fails without sending anything if the credentials are
    /// missing or still the sample placeholders.
    pub fn new(credentials: &PlatformCredentials, api_base: &str) -> Result<Self, ConfigError> {
        let valid = credentials.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            account_sid: valid.account_sid.to_string(),
            auth_token: valid.auth_token.to_string(),
            base_url: format!(
                "{}/{API_VERSION}/Accounts/{}",
                api_base.trim_end_matches('/'),
                valid.account_sid
            ),
        })
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{resource}.json", self.base_url)
    }

    /// Place an outbound call; returns the call SID
    pub async fn place_call(&self, call: &OutboundCall) -> Result<String, PlatformError> {
        self.create("Calls", call).await
    }

    /// Send a text message; returns the message SID
    pub async fn send_sms(&self, message: &SmsMessage) -> Result<String, PlatformError> {
        self.create("Messages", message).await
    }

    async fn create<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        form: &T,
    ) -> Result<String, PlatformError> {
        let url = self.resource_url(resource);
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| PlatformError::network(format!("{resource} request failed: {e}")))?;

        let status = response.status();
        tracing::debug!(
            resource,
            status = status.as_u16(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Voice platform request complete"
        );

        if status.is_success() {
            let created: CreatedResource = response.json().await.map_err(|e| {
                PlatformError::unknown(format!("Invalid {resource} response: {e}"))
            })?;
            return Ok(created.sid);
        }

        let message = match response.json::<TwilioErrorBody>().await {
            Ok(TwilioErrorBody {
                code: Some(code),
                message: Some(message),
            }) => format!("{resource} rejected ({status}, code {code}): {message}"),
            Ok(TwilioErrorBody {
                message: Some(message),
                ..
            }) => format!("{resource} rejected ({status}): {message}"),
            _ => format!("{resource} rejected ({status})"),
        };
        Err(PlatformError::from_status(status, message))
    }
}
