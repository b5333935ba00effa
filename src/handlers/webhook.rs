//! Polka webhook 处理器

use crate::{error::AppError, middleware::AppState, models::auth::WebhookRequest};
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;

/// Polka 支付回调
///
/// 使用 "ApiKey <key>" 形式的 Authorization 头认证；
/// 只处理 user.upgraded 事件，其余事件直接确认。
pub async fn polka_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<WebhookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let mut parts = value.split_whitespace();
    let scheme_ok = parts.next() == Some("ApiKey");
    let key_ok =
        parts.next() == Some(state.config.security.polka_api_key.expose_secret().as_str());

    if !scheme_ok || !key_ok {
        tracing::warn!("Webhook rejected: bad API key");
        return Err(AppError::Unauthorized);
    }

    if req.event != "user.upgraded" {
        tracing::debug!(event = %req.event, "Ignoring webhook event");
        return Ok(Json(json!({})));
    }

    state.auth_service.upgrade_user(req.data.user_id).await?;

    Ok(Json(json!({})))
}
