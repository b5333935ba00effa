//! JWT 认证中间件

use crate::{auth::jwt::JwtService, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: u64,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
///
/// 接受 "Bearer <token>" 以及任意 "<scheme> <token>" 的空格分隔形式；
/// 头缺失或没有第二段时拒绝。
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    value
        .split_whitespace()
        .nth(1)
        .map(|t| t.to_string())
        .ok_or(AppError::Unauthorized)
}

/// JWT 认证中间件 - 要求有效的访问令牌
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Authorization 头提取令牌
    let token = extract_token(req.headers())?;

    // 验证令牌并要求 access 角色
    let claims = jwt_service.verify_access_token(&token)?;

    // 主体必须能解析回用户 ID
    let user_id = claims.subject_id()?;

    // 附加到请求扩展
    req.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        let token = extract_token(&headers).unwrap();
        assert_eq!(token, "test_token_123");
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn test_extract_token_no_second_part() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "InvalidFormat".parse().unwrap());

        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn test_extract_token_plain_space_split_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Token abc123".parse().unwrap());

        let token = extract_token(&headers).unwrap();
        assert_eq!(token, "abc123");
    }
}
