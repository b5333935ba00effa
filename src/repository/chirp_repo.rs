//! Chirp repository (数据库访问层)

use crate::{error::AppError, models::chirp::Chirp, storage::JsonStore};
use std::sync::Arc;

pub struct ChirpRepository {
    store: Arc<JsonStore>,
}

impl ChirpRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    /// 创建 chirp
    pub async fn create(&self, body: &str, author_id: u64) -> Result<Chirp, AppError> {
        let body = body.to_string();

        self.store
            .update(move |data| {
                let chirp = Chirp {
                    id: data.next_chirp_id(),
                    body,
                    author_id,
                };
                data.chirps.insert(chirp.id, chirp.clone());

                Ok(chirp)
            })
            .await
    }

    /// 按 ID 升序列出所有 chirp
    pub async fn list(&self) -> Result<Vec<Chirp>, AppError> {
        let chirps = self
            .store
            .read(|data| data.chirps.values().cloned().collect())
            .await?;

        Ok(chirps)
    }

    /// 根据 ID 查找 chirp
    pub async fn find_by_id(&self, id: u64) -> Result<Option<Chirp>, AppError> {
        let chirp = self.store.read(|data| data.chirps.get(&id).cloned()).await?;

        Ok(chirp)
    }

    /// 删除 chirp，返回是否存在
    pub async fn delete(&self, id: u64) -> Result<bool, AppError> {
        self.store
            .update(move |data| Ok(data.chirps.remove(&id).is_some()))
            .await
    }
}
