//! HTTP basic auth for the admin surface

use super::types::ErrorResponse;
use super::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const REALM: &str = "Basic realm=\"Panel de Control Intake Bot\"";

/// Reject any request without valid `Authorization: Basic` credentials.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_authorized(&state, request.headers().get(header::AUTHORIZATION)) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, REALM)],
            Json(ErrorResponse::new("Unauthorized")),
        )
            .into_response()
    }
}

fn is_authorized(state: &AppState, header: Option<&HeaderValue>) -> bool {
    let Some(value) = header.and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(credentials) = String::from_utf8(decoded) else {
        return false;
    };
    credentials.split_once(':').is_some_and(|(user, pass)| {
        user == state.credentials.username && pass == state.credentials.password
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::BusinessHours;
    use crate::api::AdminCredentials;
    use crate::runtime::RuntimeManager;
    use crate::store::StateStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            Arc::new(RuntimeManager::new(
                Arc::new(StateStore::in_memory()),
                BusinessHours::default(),
                Default::default(),
            )),
            AdminCredentials {
                username: "admin".to_string(),
                password: "secreto".to_string(),
            },
        )
    }

    fn basic(user: &str, pass: &str) -> HeaderValue {
        let encoded = STANDARD.encode(format!("{user}:{pass}"));
        HeaderValue::from_str(&format!("Basic {encoded}")).unwrap()
    }

    #[test]
    fn accepts_matching_credentials() {
        let state = state();
        assert!(is_authorized(&state, Some(&basic("admin", "secreto"))));
    }

    #[test]
    fn rejects_wrong_or_missing_credentials() {
        let state = state();
        assert!(!is_authorized(&state, None));
        assert!(!is_authorized(&state, Some(&basic("admin", "otra"))));
        assert!(!is_authorized(&state, Some(&basic("otro", "secreto"))));
        assert!(!is_authorized(
            &state,
            Some(&HeaderValue::from_static("Bearer token"))
        ));
        assert!(!is_authorized(
            &state,
            Some(&HeaderValue::from_static("Basic no-es-base64!"))
        ));
    }
}
