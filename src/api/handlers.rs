//! HTTP request handlers

use super::auth::require_basic_auth;
use super::types::{
    ErrorResponse, HistoryQuery, HistoryResponse, IngestResponse, ResetAllResponse,
    ResetUserRequest, ResetUserResponse, StatesResponse, StatsResponse,
};
use super::AppState;
use crate::runtime::Outcome;
use crate::state_machine::InboundMessage;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// History entries returned when the query has no explicit limit.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Read side: live records and aggregates
        .route("/api/states", get(get_states))
        .route("/api/stats", get(get_stats))
        .route("/api/history", get(get_history))
        // Command side: resets
        .route("/api/reset-user", post(reset_user))
        .route("/api/reset-all", post(reset_all))
        // Transport ingestion seam
        .route("/api/messages", post(ingest_message))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ))
        .with_state(state)
}

async fn get_states(State(state): State<AppState>) -> Json<StatesResponse> {
    Json(StatesResponse {
        states: state.runtime.store().all_states(),
    })
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.runtime.store().stats(),
    })
}

async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(HistoryResponse {
        success: true,
        history: state.runtime.store().history(limit),
    })
}

async fn reset_user(
    State(state): State<AppState>,
    Json(req): Json<ResetUserRequest>,
) -> Result<Json<ResetUserResponse>, AppError> {
    if req.chat_id.is_empty() {
        return Err(AppError::BadRequest("ChatId es requerido".to_string()));
    }
    if state.runtime.store().reset_one(&req.chat_id) {
        Ok(Json(ResetUserResponse {
            success: true,
            message: "Usuario reseteado correctamente".to_string(),
        }))
    } else {
        Err(AppError::NotFound("Usuario no encontrado".to_string()))
    }
}

async fn reset_all(State(state): State<AppState>) -> Json<ResetAllResponse> {
    let reset_count = state.runtime.store().reset_all();
    Json(ResetAllResponse {
        success: true,
        message: format!(
            "Todos los usuarios han sido reseteados ({reset_count} usuarios guardados en historial)"
        ),
        reset_count,
    })
}

/// The transport gateway posts each received message here and delivers
/// whatever replies come back.
async fn ingest_message(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> Result<Json<IngestResponse>, AppError> {
    if message.chat_id.is_empty() {
        return Err(AppError::BadRequest("ChatId es requerido".to_string()));
    }
    let outcome = state
        .runtime
        .handle_message(message)
        .await
        .map_err(AppError::Internal)?;
    let response = match outcome {
        Outcome::Replies(replies) => IngestResponse {
            processed: true,
            replies,
        },
        Outcome::Ignored(_) => IngestResponse {
            processed: false,
            replies: Vec::new(),
        },
    };
    Ok(Json(response))
}

// ============================================================
// Error handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
