//! Admin HTTP surface
//!
//! A thin JSON layer over the store (states, stats, history, resets) plus
//! the ingestion endpoint the transport gateway delivers messages through.
//! Everything sits behind HTTP basic auth.

mod auth;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::RuntimeManager;
use std::sync::Arc;

/// Credentials the admin surface accepts.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
    pub credentials: Arc<AdminCredentials>,
}

impl AppState {
    pub fn new(runtime: Arc<RuntimeManager>, credentials: AdminCredentials) -> Self {
        Self {
            runtime,
            credentials: Arc::new(credentials),
        }
    }
}
