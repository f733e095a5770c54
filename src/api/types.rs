//! API request and response types

use serde::{Deserialize, Serialize};

/// Parameters the voice platform sends on every webhook request, either as a
/// query string (GET) or a form body (POST). Unknown parameters are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceWebhook {
    pub call_sid: Option<String>,
    /// Transcript of the caller's last utterance; absent on the first request
    pub speech_result: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    /// `inbound` or `outbound-api`
    pub direction: Option<String>,
}

impl VoiceWebhook {
    /// The person on the other end of the line. For calls we placed that is
    /// the dialed number; for calls we received it is the originator.
    pub fn caller_phone(&self) -> Option<String> {
        if self.direction.as_deref() == Some("inbound") {
            self.from.clone()
        } else {
            self.to.clone()
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
