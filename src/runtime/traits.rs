//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the call runtime with mock implementations.

use crate::report::{CallReportRecord, CsvReportLog, ReportError};
use crate::telephony::{OutboundCall, PlatformError, SmsMessage, TwilioClient};
use async_trait::async_trait;
use std::sync::Arc;

/// Append-only sink for completed call reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn append(&self, record: &CallReportRecord) -> Result<(), ReportError>;
}

/// Outbound text messaging; returns the message SID
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    async fn send_sms(&self, message: &SmsMessage) -> Result<String, PlatformError>;
}

/// Outbound call placement; returns the call SID
#[async_trait]
pub trait VoicePlatform: Send + Sync {
    async fn place_call(&self, call: &OutboundCall) -> Result<String, PlatformError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ReportSink + ?Sized> ReportSink for Arc<T> {
    async fn append(&self, record: &CallReportRecord) -> Result<(), ReportError> {
        (**self).append(record).await
    }
}

#[async_trait]
impl<T: MessagingChannel + ?Sized> MessagingChannel for Arc<T> {
    async fn send_sms(&self, message: &SmsMessage) -> Result<String, PlatformError> {
        (**self).send_sms(message).await
    }
}

#[async_trait]
impl<T: VoicePlatform + ?Sized> VoicePlatform for Arc<T> {
    async fn place_call(&self, call: &OutboundCall) -> Result<String, PlatformError> {
        (**self).place_call(call).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl ReportSink for CsvReportLog {
    async fn append(&self, record: &CallReportRecord) -> Result<(), ReportError> {
        let log = self.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || log.append(&record))
            .await
            .map_err(|e| ReportError::Join(e.to_string()))?
    }
}

#[async_trait]
impl MessagingChannel for TwilioClient {
    async fn send_sms(&self, message: &SmsMessage) -> Result<String, PlatformError> {
        TwilioClient::send_sms(self, message).await
    }
}

#[async_trait]
impl VoicePlatform for TwilioClient {
    async fn place_call(&self, call: &OutboundCall) -> Result<String, PlatformError> {
        TwilioClient::place_call(self, call).await
    }
}

/// Stand-in used when credentials are missing: every request fails with the
/// configuration problem, so the dialog keeps working and the failure is logged
pub struct UnconfiguredPlatform {
    reason: String,
}

impl UnconfiguredPlatform {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MessagingChannel for UnconfiguredPlatform {
    async fn send_sms(&self, _message: &SmsMessage) -> Result<String, PlatformError> {
        Err(PlatformError::credentials(self.reason.clone()))
    }
}

#[async_trait]
impl VoicePlatform for UnconfiguredPlatform {
    async fn place_call(&self, _call: &OutboundCall) -> Result<String, PlatformError> {
        Err(PlatformError::credentials(self.reason.clone()))
    }
}
