//! Chirp 服务：发布、查询与属主校验删除

use crate::{
    error::AppError,
    models::chirp::{Chirp, ChirpListQuery},
    profanity,
    repository::{ChirpRepository, UserRepository},
    storage::JsonStore,
};
use std::sync::Arc;

pub struct ChirpService {
    store: Arc<JsonStore>,
}

impl ChirpService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// 发布 chirp
    ///
    /// 长度校验由请求 DTO 完成；这里做敏感词清洗，
    /// 并要求令牌主体仍是一个存在的用户。
    pub async fn create(&self, author_id: u64, body: &str) -> Result<Chirp, AppError> {
        let user_repo = UserRepository::new(self.store.clone());
        if user_repo.find_by_id(author_id).await?.is_none() {
            tracing::debug!(author_id, "Chirp rejected: subject no longer exists");
            return Err(AppError::Unauthorized);
        }

        let cleaned = profanity::clean(body);

        let chirp_repo = ChirpRepository::new(self.store.clone());
        let chirp = chirp_repo.create(&cleaned, author_id).await?;

        tracing::info!(chirp_id = chirp.id, author_id, "Chirp created");

        Ok(chirp)
    }

    /// 列出 chirp，支持按作者过滤与排序方向
    pub async fn list(&self, query: ChirpListQuery) -> Result<Vec<Chirp>, AppError> {
        let chirp_repo = ChirpRepository::new(self.store.clone());
        let mut chirps = chirp_repo.list().await?;

        if let Some(author_id) = query.author_id {
            chirps.retain(|c| c.author_id == author_id);
        }

        if query.sort.as_deref() == Some("desc") {
            chirps.reverse();
        }

        Ok(chirps)
    }

    /// 根据 ID 获取 chirp
    pub async fn get(&self, id: u64) -> Result<Chirp, AppError> {
        let chirp_repo = ChirpRepository::new(self.store.clone());
        chirp_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::not_found("chirp"))
    }

    /// 删除 chirp：只有作者本人可以删除
    ///
    /// 属主检查是主体与作者 ID 的精确相等；任何不一致都拒绝。
    pub async fn delete(&self, id: u64, acting_user_id: u64) -> Result<(), AppError> {
        let chirp_repo = ChirpRepository::new(self.store.clone());

        let chirp = chirp_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::not_found("chirp"))?;

        if chirp.author_id != acting_user_id {
            tracing::warn!(
                chirp_id = id,
                author_id = chirp.author_id,
                acting_user_id,
                "Delete rejected: not the author"
            );
            return Err(AppError::Forbidden);
        }

        chirp_repo.delete(id).await?;

        tracing::info!(chirp_id = id, "Chirp deleted");

        Ok(())
    }
}
