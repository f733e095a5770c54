//! HTTP API: the voice platform webhook

mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::SharedSessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SharedSessionManager>,
}

impl AppState {
    pub fn new(sessions: SharedSessionManager) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }
}
