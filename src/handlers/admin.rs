//! 管理端处理器
//! /app 页面访问计数的展示与重置

use crate::middleware::AppState;
use axum::{extract::State, response::Html};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// 管理页：显示 /app 页面访问次数
pub async fn metrics_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let hits = state.page_hits.load(Ordering::Relaxed);

    Html(format!(
        r#"<html>
<body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
</body>
</html>"#,
        hits
    ))
}

/// 重置访问计数
pub async fn reset_hits(State(state): State<Arc<AppState>>) -> &'static str {
    state.page_hits.store(0, Ordering::Relaxed);
    "OK"
}
