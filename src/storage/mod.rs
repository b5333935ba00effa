//! JSON 文件存储
//! 整份文档作为一个单元读写，读-改-写周期由单一互斥锁串行化

use crate::error::AppError;
use crate::models::{auth::RevocationRecord, chirp::Chirp, user::User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// 存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store document: {0}")]
    Corrupt(String),
}

/// 磁盘上的完整文档结构
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub revoked_tokens: BTreeMap<String, RevocationRecord>,
}

impl StoreData {
    /// 下一个用户 ID（最大现有 ID + 1，删除不会导致 ID 复用）
    pub fn next_user_id(&self) -> u64 {
        self.users.keys().next_back().copied().unwrap_or(0) + 1
    }

    /// 下一个 chirp ID
    pub fn next_chirp_id(&self) -> u64 {
        self.chirps.keys().next_back().copied().unwrap_or(0) + 1
    }
}

/// 文件级 JSON 存储
///
/// 锁覆盖完整的 加载 -> 修改 -> 写回 周期；
/// 写入先落到临时文件再原子重命名，失败的更新不会留下半写状态。
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// 打开存储文件，不存在时初始化为空文档
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        if tokio::fs::try_exists(&store.path).await? {
            // 启动时快速失败：文档必须可解析
            store.load().await?;
        } else {
            store.persist(&StoreData::default()).await?;
            tracing::info!(path = %store.path.display(), "Initialized empty store document");
        }

        Ok(store)
    }

    /// 只读访问
    pub async fn read<T>(&self, f: impl FnOnce(&StoreData) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        let data = self.load().await?;
        Ok(f(&data))
    }

    /// 读-改-写更新
    ///
    /// 闭包返回错误时不写回，磁盘状态保持不变。
    pub async fn update<T>(
        &self,
        f: impl FnOnce(&mut StoreData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        let result = f(&mut data)?;
        self.persist(&data).await?;
        Ok(result)
    }

    async fn load(&self) -> Result<StoreData, StoreError> {
        let bytes = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec_pretty(data).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");

        let store = JsonStore::open(&path).await.unwrap();
        let count = store.read(|data| data.users.len()).await.unwrap();

        assert_eq!(count, 0);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_update_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");

        {
            let store = JsonStore::open(&path).await.unwrap();
            store
                .update(|data| {
                    let id = data.next_chirp_id();
                    data.chirps.insert(
                        id,
                        Chirp {
                            id,
                            body: "hello".to_string(),
                            author_id: 1,
                        },
                    );
                    Ok(id)
                })
                .await
                .unwrap();
        }

        let store = JsonStore::open(&path).await.unwrap();
        let body = store
            .read(|data| data.chirps.get(&1).map(|c| c.body.clone()))
            .await
            .unwrap();

        assert_eq!(body.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");

        let store = JsonStore::open(&path).await.unwrap();
        store
            .update(|data| {
                data.users.insert(
                    1,
                    User {
                        id: 1,
                        email: "a@b.com".to_string(),
                        password_hash: "hash".to_string(),
                        is_chirpy_red: false,
                    },
                );
                Ok(())
            })
            .await
            .unwrap();

        let result: Result<(), AppError> = store
            .update(|data| {
                data.users.clear();
                Err(AppError::Conflict("rolled back".to_string()))
            })
            .await;
        assert!(result.is_err());

        let count = store.read(|data| data.users.len()).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_next_id_skips_deleted_ids() {
        let mut data = StoreData::default();
        data.chirps.insert(
            1,
            Chirp {
                id: 1,
                body: "one".to_string(),
                author_id: 1,
            },
        );
        data.chirps.insert(
            3,
            Chirp {
                id: 3,
                body: "three".to_string(),
                author_id: 1,
            },
        );

        assert_eq!(data.next_chirp_id(), 4);
        assert_eq!(data.next_user_id(), 1);
    }
}
