//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::report::{CallReportRecord, ReportError};
use crate::telephony::{OutboundCall, PlatformError, PlatformErrorKind, SmsMessage};
use async_trait::async_trait;
use std::sync::Mutex;

// ============================================================================
// Report Sinks
// ============================================================================

/// Report sink that keeps records in memory
#[derive(Default)]
pub struct MemoryReportSink {
    records: Mutex<Vec<CallReportRecord>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CallReportRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn append(&self, record: &CallReportRecord) -> Result<(), ReportError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Report sink whose every write fails like a full disk
pub struct FailingReportSink;

#[async_trait]
impl ReportSink for FailingReportSink {
    async fn append(&self, _record: &CallReportRecord) -> Result<(), ReportError> {
        Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no space left on device",
        )))
    }
}

// ============================================================================
// Mock Messaging Channel
// ============================================================================

/// Messaging channel that records messages instead of sending them
pub struct MockMessagingChannel {
    fail: bool,
    sent: Mutex<Vec<SmsMessage>>,
}

impl MockMessagingChannel {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Channel that rejects every message
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages accepted so far
    pub fn sent_messages(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingChannel for MockMessagingChannel {
    async fn send_sms(&self, message: &SmsMessage) -> Result<String, PlatformError> {
        if self.fail {
            return Err(PlatformError::new(
                PlatformErrorKind::InvalidRequest,
                "Messages rejected (400 Bad Request): invalid 'To' phone number",
            ));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(format!("SM{:032}", sent.len()))
    }
}

// ============================================================================
// Mock Voice Platform
// ============================================================================

/// Voice platform that records call requests
#[derive(Default)]
pub struct MockVoicePlatform {
    calls: Mutex<Vec<OutboundCall>>,
}

impl MockVoicePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placed_calls(&self) -> Vec<OutboundCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoicePlatform for MockVoicePlatform {
    async fn place_call(&self, call: &OutboundCall) -> Result<String, PlatformError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call.clone());
        Ok(format!("CA{:032}", calls.len()))
    }
}
