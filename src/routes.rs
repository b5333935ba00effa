//! 路由组装
//! 公共路由、需访问令牌的路由与管理端路由

use crate::{handlers, middleware::AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// 构建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let jwt_service = state.jwt_service.clone();

    // 公共路由（无需认证）
    let public_routes = Router::new()
        .route("/api/healthz", get(handlers::health::healthz))
        .route("/api/users", post(handlers::user::create_user))
        .route("/api/users/{user_id}", get(handlers::user::get_user))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/refresh", post(handlers::auth::refresh_token))
        .route("/api/revoke", post(handlers::auth::revoke_token))
        .route("/api/chirps", get(handlers::chirp::list_chirps))
        .route("/api/chirps/{chirp_id}", get(handlers::chirp::get_chirp))
        .route("/api/polka/webhooks", post(handlers::webhook::polka_webhook))
        .route("/api/reset", post(handlers::admin::reset_hits));

    // 需要访问令牌的路由
    let authenticated_routes = Router::new()
        .route("/api/chirps", post(handlers::chirp::create_chirp))
        .route("/api/chirps/{chirp_id}", delete(handlers::chirp::delete_chirp))
        .route("/api/users", put(handlers::user::update_user))
        .layer(axum::middleware::from_fn_with_state(
            jwt_service,
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 管理端路由
    let admin_routes = Router::new().route("/admin/metrics", get(handlers::admin::metrics_page));

    // 静态站点（带访问计数）
    let app_routes = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.server.static_dir))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::page_hit_middleware,
        ));

    // 前端在浏览器中直接调用 API，放开跨域
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .merge(app_routes)
        .layer(cors)
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
