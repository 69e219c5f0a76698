//! API request and response types

use crate::state_machine::ConversationRecord;
use crate::store::{HistoryEntry, StoreStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response with every live conversation record
#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub states: HashMap<String, ConversationRecord>,
}

/// Response with store counters
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: StoreStats,
}

/// Query for the history listing
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Response with recent reset history
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryEntry>,
}

/// Request to reset a single chat
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetUserRequest {
    #[serde(default)]
    pub chat_id: String,
}

/// Response for the single-chat reset
#[derive(Debug, Serialize)]
pub struct ResetUserResponse {
    pub success: bool,
    pub message: String,
}

/// Response for the bulk reset
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAllResponse {
    pub success: bool,
    pub message: String,
    pub reset_count: usize,
}

/// Response for message ingestion: the replies the transport must deliver.
/// `processed` is false when the message was deliberately ignored (group
/// traffic or a chat already handed off to a person).
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub processed: bool,
    pub replies: Vec<String>,
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
