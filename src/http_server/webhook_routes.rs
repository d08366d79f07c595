//! Payment Webhook Routes
//!
//! The payment provider notifies `/api/polka/webhooks` when a user upgrades.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::headers;

/// The only event this service acts on
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

pub fn webhook_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/polka/webhooks", post(polka_webhook_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    /// Only required for `user.upgraded`
    #[serde(default)]
    pub data: Option<WebhookData>,
}

/// Upgrade the named user; other events are acknowledged and ignored
async fn polka_webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let key = headers::api_key(&headers)?;
    state.identity.check_api_key(key, &state.polka_key)?;

    let Json(request) = payload?;
    if request.event != USER_UPGRADED_EVENT {
        return Ok(StatusCode::NO_CONTENT);
    }

    let data = request
        .data
        .ok_or_else(|| ApiError::BadRequest("Missing data.user_id".to_string()))?;
    state.repository.upgrade_user(data.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_data_decodes() {
        let request: WebhookRequest =
            serde_json::from_str(r#"{"event": "user.payment_failed"}"#).unwrap();
        assert_eq!(request.event, "user.payment_failed");
        assert!(request.data.is_none());
    }

    #[test]
    fn test_request_with_data_decodes() {
        let request: WebhookRequest =
            serde_json::from_str(r#"{"event": "user.upgraded", "data": {"user_id": 3}}"#).unwrap();
        assert_eq!(request.data.map(|d| d.user_id), Some(3));
    }
}
