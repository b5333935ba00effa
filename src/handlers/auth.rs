//! 认证相关的 HTTP 处理器
//!
//! refresh/revoke 直接处理原始的刷新令牌字符串，
//! 不经过访问令牌中间件。

use crate::{auth::middleware::extract_token, error::AppError, middleware::AppState};
use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<crate::models::auth::LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 用刷新令牌换取新的访问令牌
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = extract_token(&headers)?;

    let response = state.auth_service.refresh(&token).await?;

    Ok(Json(response))
}

/// 撤销刷新令牌
pub async fn revoke_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = extract_token(&headers)?;

    state.auth_service.revoke(&token).await?;

    Ok(Json(json!({"message": "Refresh token revoked"})))
}
