//! HTTP request handlers

use super::types::{ErrorResponse, VoiceWebhook};
use super::AppState;
use crate::runtime::{TurnError, TurnRequest};
use crate::telephony::VoiceResponse;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};

/// Path the platform calls for every turn; also the `<Gather>` action
pub const VOICE_PATH: &str = "/voice";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Call setup and every subsequent turn
        .route(VOICE_PATH, get(voice).post(voice))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Voice Webhook
// ============================================================

/// `Form` reads the query string for GET and the urlencoded body for POST
async fn voice(
    State(state): State<AppState>,
    Form(params): Form<VoiceWebhook>,
) -> Result<Response, AppError> {
    let request = TurnRequest {
        caller_phone: params.caller_phone(),
        call_id: params.call_sid,
        utterance: params.speech_result,
    };
    let call_sid = request.call_id.clone().unwrap_or_default();

    let reply = state.sessions.handle_turn(request).await.map_err(|e| {
        tracing::error!(call_sid = %call_sid, error = %e, "Turn failed");
        AppError::from(e)
    })?;

    let response = VoiceResponse::new().say(&reply.prompt);
    let response = if reply.hang_up {
        response.hangup()
    } else {
        response.gather_speech(VOICE_PATH)
    };
    let twiml = response
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], twiml).into_response())
}

async fn get_version() -> &'static str {
    concat!("ambulance-ivr ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    Conflict(String),
    Internal(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::Transition(e) => AppError::Conflict(e.to_string()),
            e @ (TurnError::Report(_) | TurnError::NoReply) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
