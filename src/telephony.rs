//! Voice platform integration
//!
//! Outbound REST calls (call placement, SMS) and `TwiML` rendering for the
//! inbound webhook.

mod error;
mod twilio;
mod twiml;
mod types;

pub use error::{PlatformError, PlatformErrorKind};
pub use twilio::TwilioClient;
pub use twiml::VoiceResponse;
pub use types::{OutboundCall, SmsMessage};
