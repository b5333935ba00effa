//! 测试公共模块
//! 提供测试配置和应用构建辅助函数

use chirpy::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::{AppConfig, LoggingConfig, SecurityConfig, ServerConfig, StorageConfig},
    middleware::AppState,
    routes,
    services::{AuthService, ChirpService},
    storage::JsonStore,
};
use secrecy::Secret;
use std::path::Path;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tempfile::TempDir;

/// 创建测试配置
///
/// 使用最低允许的 Argon2 成本，让测试跑得快。
pub fn create_test_config(dir: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            static_dir: dir.join("public").to_string_lossy().into_owned(),
        },
        storage: StorageConfig {
            path: dir.join("database.json").to_string_lossy().into_owned(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new("test-secret-key-for-testing-only-min-32-chars".to_string()),
            polka_api_key: Secret::new("test-polka-key".to_string()),
            access_token_exp_secs: 300,
            refresh_token_exp_secs: 3600,
            hash_memory_kib: 8192,
            hash_iterations: 1,
            hash_parallelism: 1,
        },
    }
}

/// 创建测试应用状态
pub async fn create_test_state(dir: &TempDir) -> Arc<AppState> {
    let config = create_test_config(dir.path());

    let store = Arc::new(
        JsonStore::open(&config.storage.path)
            .await
            .expect("Failed to open test store"),
    );

    let jwt_service =
        Arc::new(JwtService::from_config(&config).expect("Failed to create JWT service"));
    let hasher =
        Arc::new(PasswordHasher::from_config(&config).expect("Failed to create hasher"));

    Arc::new(AppState {
        auth_service: Arc::new(AuthService::new(
            store.clone(),
            jwt_service.clone(),
            hasher,
        )),
        chirp_service: Arc::new(ChirpService::new(store.clone())),
        jwt_service,
        store,
        config,
        page_hits: Arc::new(AtomicU64::new(0)),
    })
}

/// 创建测试路由
///
/// 返回 TempDir 以保证存储文件在测试期间存活。
pub async fn create_test_app() -> (TempDir, axum::Router) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("public")).expect("Failed to create static dir");

    let state = create_test_state(&dir).await;
    let app = routes::create_router(state);

    (dir, app)
}
