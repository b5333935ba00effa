//! 刷新令牌撤销存储
//!
//! 拒绝名单语义：不在名单中的令牌视为有效，
//! 只要它本身能通过签名和过期校验。

use crate::{error::AppError, models::auth::RevocationRecord, storage::JsonStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct TokenRepository {
    store: Arc<JsonStore>,
}

impl TokenRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// 撤销令牌（幂等，重复撤销不报错）
    ///
    /// 顺带清理已过自身有效期的旧记录：过期令牌无法再通过校验，
    /// 记录留着没有意义。
    pub async fn revoke(
        &self,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let token = token.to_string();

        self.store
            .update(move |data| {
                let now = Utc::now();
                data.revoked_tokens
                    .retain(|_, record| record.expires_at.map_or(true, |exp| exp > now));

                data.revoked_tokens
                    .entry(token)
                    .or_insert(RevocationRecord {
                        revoked_at: now,
                        expires_at,
                    });

                Ok(())
            })
            .await
    }

    /// 令牌有效当且仅当它不在拒绝名单中
    pub async fn is_valid(&self, token: &str) -> Result<bool, AppError> {
        let token = token.to_string();
        let revoked = self
            .store
            .read(move |data| data.revoked_tokens.contains_key(&token))
            .await?;

        Ok(!revoked)
    }
}
