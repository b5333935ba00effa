//! 认证服务：注册、登录、令牌刷新与撤销

use crate::{
    auth::jwt::{JwtService, TokenRole},
    auth::password::PasswordHasher,
    error::AppError,
    models::auth::{LoginRequest, LoginResponse, RefreshResponse},
    models::user::{CreateUserRequest, UpdateUserRequest, UserResponse},
    repository::{TokenRepository, UserRepository},
    storage::JsonStore,
};
use std::sync::Arc;

pub struct AuthService {
    store: Arc<JsonStore>,
    jwt_service: Arc<JwtService>,
    hasher: Arc<PasswordHasher>,
}

impl AuthService {
    pub fn new(
        store: Arc<JsonStore>,
        jwt_service: Arc<JwtService>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            store,
            jwt_service,
            hasher,
        }
    }

    /// 用户注册
    pub async fn register(&self, req: CreateUserRequest) -> Result<UserResponse, AppError> {
        let password_hash = self.hasher.hash(&req.password)?;

        let user_repo = UserRepository::new(self.store.clone());
        let user = user_repo.create(&req.email, &password_hash).await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(UserResponse::from(user))
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.store.clone());

        let user = user_repo
            .find_by_email(&req.email)
            .await?
            .ok_or(AppError::not_found("user"))?;

        // 验证密码
        if !self.hasher.verify(&req.password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized);
        }

        // 签发令牌对
        let token_pair = self.jwt_service.issue_pair(user.id)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            id: user.id,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
            token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
        })
    }

    /// 用刷新令牌换取新的访问令牌
    pub async fn refresh(&self, token: &str) -> Result<RefreshResponse, AppError> {
        // 签名、过期、角色校验
        let claims = self.jwt_service.verify_refresh_token(token)?;

        // 撤销名单校验
        let token_repo = TokenRepository::new(self.store.clone());
        if !token_repo.is_valid(token).await? {
            tracing::debug!("Refresh rejected: token revoked");
            return Err(AppError::Unauthorized);
        }

        // 主体必须仍指向一个存在的用户
        let user_id = claims.subject_id()?;
        let user_repo = UserRepository::new(self.store.clone());
        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::not_found("user"))?;

        let access_token = self.jwt_service.issue(user.id, TokenRole::Access)?;

        Ok(RefreshResponse {
            token: access_token,
        })
    }

    /// 撤销刷新令牌（幂等）
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let claims = self.jwt_service.verify_refresh_token(token)?;

        let token_repo = TokenRepository::new(self.store.clone());
        token_repo
            .revoke(token, chrono::DateTime::from_timestamp(claims.exp, 0))
            .await?;

        tracing::info!("Refresh token revoked");

        Ok(())
    }

    /// 更新当前用户的邮箱和密码
    pub async fn update_user(
        &self,
        user_id: u64,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let user_repo = UserRepository::new(self.store.clone());

        let mut user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::not_found("user"))?;

        user.email = req.email;
        user.password_hash = self.hasher.hash(&req.password)?;

        let user = user_repo.update(user).await?;

        Ok(UserResponse::from(user))
    }

    /// 升级用户（Polka user.upgraded 事件）
    pub async fn upgrade_user(&self, user_id: u64) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.store.clone());
        user_repo.set_upgraded(user_id).await?;

        tracing::info!(user_id = user_id, "User upgraded");

        Ok(())
    }
}
