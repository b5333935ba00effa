//! 健康检查处理器

/// 存活探针
/// 快速响应，不检查依赖
pub async fn healthz() -> &'static str {
    "OK"
}
