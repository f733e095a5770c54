//! Operator console: collects the call target and places the first call

use crate::config::{validate_public_url, ConfigError};
use crate::runtime::VoicePlatform;
use crate::telephony::{OutboundCall, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Who to call, and where the platform should fetch instructions from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    pub phone_number: String,
    /// Public base URL (no trailing slash) that forwards to this server
    pub public_url: String,
}

impl CallTarget {
    pub fn new(phone_number: &str, public_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            phone_number: phone_number.trim().to_string(),
            public_url: validate_public_url(public_url)?,
        })
    }

    /// Webhook the platform requests once the call connects
    pub fn voice_url(&self) -> String {
        format!("{}/voice", self.public_url)
    }
}

pub fn print_setup_banner(port: u16) {
    println!("--- Ambulance IVR Click-to-Call Setup ---");
    println!("1. Make sure you have filled in your credentials in the .env file.");
    println!("2. Make sure a public tunnel is running (e.g., 'ngrok http {port}')");
}

/// Ask for the public URL and phone number. `Ok(None)` when the operator
/// skips either question.
pub async fn prompt_call_target() -> Result<Option<CallTarget>, OperatorError> {
    let answers = tokio::task::spawn_blocking(read_call_target)
        .await
        .map_err(|e| OperatorError::Prompt(e.to_string()))?
        .map_err(|e| OperatorError::Prompt(e.to_string()))?;

    match answers {
        Some(target) => Ok(Some(target?)),
        None => Ok(None),
    }
}

type PromptAnswers = Option<Result<CallTarget, ConfigError>>;

fn read_call_target() -> Result<PromptAnswers, inquire::InquireError> {
    let Some(url) =
        inquire::Text::new("3. Enter your public forwarding URL (e.g., https://xxxx.ngrok.io):")
            .prompt_skippable()?
    else {
        return Ok(None);
    };
    // Reject a bad URL before asking for the number
    if let Err(e) = validate_public_url(&url) {
        return Ok(Some(Err(e)));
    }

    let number =
        inquire::Text::new("4. Enter your phone number (with country code):").prompt_skippable()?;
    Ok(number
        .filter(|n| !n.trim().is_empty())
        .map(|n| CallTarget::new(&n, &url)))
}

/// Ask the platform to dial the target; returns the call SID
pub async fn place_initial_call(
    platform: &dyn VoicePlatform,
    from: &str,
    target: &CallTarget,
) -> Result<String, PlatformError> {
    println!("\nInitiating call to {}...", target.phone_number);

    let call = OutboundCall {
        to: target.phone_number.clone(),
        from: from.to_string(),
        url: target.voice_url(),
    };

    match platform.place_call(&call).await {
        Ok(sid) => {
            tracing::info!(call_sid = %sid, to = %call.to, "Outbound call placed");
            println!("Call initiated with SID: {sid}");
            println!("Waiting for you to answer the call...");
            Ok(sid)
        }
        Err(e) => {
            tracing::error!(to = %call.to, error = %e, "Outbound call failed");
            println!("\nERROR: Could not make the call. {e}");
            Err(e)
        }
    }
}
