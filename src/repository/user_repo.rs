//! User repository (数据库访问层)

use crate::{error::AppError, models::user::User, storage::JsonStore};
use std::sync::Arc;

pub struct UserRepository {
    store: Arc<JsonStore>,
}

impl UserRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: u64) -> Result<Option<User>, AppError> {
        let user = self.store.read(|data| data.users.get(&id).cloned()).await?;

        Ok(user)
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let user = self
            .store
            .read(move |data| data.users.values().find(|u| u.email == email).cloned())
            .await?;

        Ok(user)
    }

    /// 创建用户，邮箱重复时返回 Conflict
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let email = email.to_string();
        let password_hash = password_hash.to_string();

        self.store
            .update(move |data| {
                if data.users.values().any(|u| u.email == email) {
                    return Err(AppError::Conflict("User already exists".to_string()));
                }

                let user = User {
                    id: data.next_user_id(),
                    email,
                    password_hash,
                    is_chirpy_red: false,
                };
                data.users.insert(user.id, user.clone());

                Ok(user)
            })
            .await
    }

    /// 整体更新用户记录
    pub async fn update(&self, user: User) -> Result<User, AppError> {
        self.store
            .update(move |data| {
                if !data.users.contains_key(&user.id) {
                    return Err(AppError::not_found("user"));
                }

                data.users.insert(user.id, user.clone());
                Ok(user)
            })
            .await
    }

    /// 标记用户为已升级（Polka webhook）
    pub async fn set_upgraded(&self, id: u64) -> Result<User, AppError> {
        self.store
            .update(move |data| {
                let user = data.users.get_mut(&id).ok_or(AppError::not_found("user"))?;
                user.is_chirpy_red = true;
                Ok(user.clone())
            })
            .await
    }
}
