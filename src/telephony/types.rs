//! Outbound request types

use serde::Serialize;

/// Request to place a call that the platform will drive via `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundCall {
    pub to: String,
    pub from: String,
    pub url: String,
}

/// Text message to a single recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmsMessage {
    pub to: String,
    pub from: String,
    pub body: String,
}
