//! Chirp 的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::chirp::{ChirpListQuery, CreateChirpRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 发布 chirp
pub async fn create_chirp(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateChirpRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let chirp = state
        .chirp_service
        .create(auth_context.user_id, &req.body)
        .await?;

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// 列出 chirp（支持 ?author_id= 与 ?sort=asc|desc）
pub async fn list_chirps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChirpListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let chirps = state.chirp_service.list(query).await?;

    Ok(Json(chirps))
}

/// 获取单条 chirp
pub async fn get_chirp(
    State(state): State<Arc<AppState>>,
    Path(chirp_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let chirp = state.chirp_service.get(chirp_id).await?;

    Ok(Json(chirp))
}

/// 删除 chirp（仅作者本人）
pub async fn delete_chirp(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(chirp_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .chirp_service
        .delete(chirp_id, auth_context.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
