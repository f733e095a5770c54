//! SMS summary of an ambulance assignment

use crate::dispatch::AmbulanceAssignment;
use crate::runtime::MessagingChannel;
use crate::telephony::{PlatformError, SmsMessage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("No caller number recorded for this call")]
    MissingRecipient,
    #[error("No sender number configured (TWILIO_PHONE_NUMBER)")]
    MissingSender,
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Text body sent to the caller
pub fn summary_body(assignment: &AmbulanceAssignment) -> String {
    format!(
        "Emergency Ambulance Service Summary:\n\
         Ambulance Type: {}\n\
         Vehicle No: {}\n\
         Driver: {}\n\
         Driver's No: {}",
        assignment.ambulance_type,
        assignment.vehicle_number,
        assignment.driver_name,
        assignment.driver_number,
    )
}

/// Sends assignment summaries from a fixed sender number
pub struct NotificationSender<M: MessagingChannel> {
    channel: M,
    from_number: Option<String>,
}

impl<M: MessagingChannel> NotificationSender<M> {
    pub fn new(channel: M, from_number: Option<String>) -> Self {
        Self {
            channel,
            from_number,
        }
    }

    /// Send the summary to `to`; returns the message SID
    pub async fn send_summary(
        &self,
        to: Option<&str>,
        assignment: &AmbulanceAssignment,
    ) -> Result<String, NotificationError> {
        let to = to
            .filter(|n| !n.is_empty())
            .ok_or(NotificationError::MissingRecipient)?;
        let from = self
            .from_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(NotificationError::MissingSender)?;

        let message = SmsMessage {
            to: to.to_string(),
            from: from.to_string(),
            body: summary_body(assignment),
        };
        Ok(self.channel.send_sms(&message).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::AmbulanceType;
    use crate::runtime::testing::MockMessagingChannel;
    use std::sync::Arc;

    fn assignment() -> AmbulanceAssignment {
        AmbulanceAssignment {
            ambulance_type: AmbulanceType::BasicLifeSupport,
            vehicle_number: "WB 03 EF 9101".to_string(),
            driver_name: "Vikas Patel".to_string(),
            driver_number: "+91 98765 55555".to_string(),
        }
    }

    #[test]
    fn test_summary_body_template() {
        assert_eq!(
            summary_body(&assignment()),
            "Emergency Ambulance Service Summary:\n\
             Ambulance Type: Basic Life Support Ambulance\n\
             Vehicle No: WB 03 EF 9101\n\
             Driver: Vikas Patel\n\
             Driver's No: +91 98765 55555"
        );
    }

    #[tokio::test]
    async fn test_sends_to_caller_from_sender() {
        let channel = Arc::new(MockMessagingChannel::new());
        let sender = NotificationSender::new(Arc::clone(&channel), Some("+15550100".to_string()));

        let sid = sender
            .send_summary(Some("+919800000000"), &assignment())
            .await
            .unwrap();

        assert!(sid.starts_with("SM"));
        let sent = channel.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "+919800000000");
        assert_eq!(sent[0].from, "+15550100");
        assert!(sent[0].body.contains("Vehicle No: WB 03 EF 9101"));
    }

    #[tokio::test]
    async fn test_missing_numbers_fail_without_sending() {
        let channel = Arc::new(MockMessagingChannel::new());

        let sender = NotificationSender::new(Arc::clone(&channel), Some("+15550100".to_string()));
        assert!(matches!(
            sender.send_summary(None, &assignment()).await,
            Err(NotificationError::MissingRecipient)
        ));

        let sender = NotificationSender::new(Arc::clone(&channel), None);
        assert!(matches!(
            sender.send_summary(Some("+919800000000"), &assignment()).await,
            Err(NotificationError::MissingSender)
        ));

        assert!(channel.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_platform_failure_is_reported() {
        let channel = Arc::new(MockMessagingChannel::failing());
        let sender = NotificationSender::new(Arc::clone(&channel), Some("+15550100".to_string()));

        assert!(matches!(
            sender.send_summary(Some("+919800000000"), &assignment()).await,
            Err(NotificationError::Platform(_))
        ));
    }
}
