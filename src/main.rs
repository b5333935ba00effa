//! Chirpy 服务主入口

use chirpy::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    middleware::AppState,
    routes,
    services::{AuthService, ChirpService},
    storage::JsonStore,
    telemetry,
};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("chirpy {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    if let Ok(profile) = std::env::var("CHIRPY_ENV") {
        dotenv::from_filename(format!(".env.{}", profile)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志与指标
    telemetry::init_telemetry(&config);
    telemetry::init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Chirpy starting...");

    // 3. 打开存储文档
    let store = Arc::new(JsonStore::open(&config.storage.path).await?);

    tracing::info!(path = %config.storage.path, "Store initialized");

    // 4. 构建应用状态
    let jwt_service = Arc::new(JwtService::from_config(&config)?);
    let hasher = Arc::new(PasswordHasher::from_config(&config)?);

    let app_state = Arc::new(AppState {
        auth_service: Arc::new(AuthService::new(
            store.clone(),
            jwt_service.clone(),
            hasher,
        )),
        chirp_service: Arc::new(ChirpService::new(store.clone())),
        jwt_service,
        store,
        config: config.clone(),
        page_hits: Arc::new(AtomicU64::new(0)),
    });

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        "Server listening"
    );

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 关闭超时看门狗
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached");
    });
}

/// 打印帮助信息
fn print_help() {
    println!("chirpy {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: chirpy [选项]");
    println!();
    println!("选项:");
    println!("  --version    打印版本号");
    println!("  --help       打印帮助信息");
    println!();
    println!("配置通过 CHIRPY_ 前缀的环境变量加载，例如:");
    println!("  CHIRPY_SERVER__ADDR=0.0.0.0:8080");
    println!("  CHIRPY_STORAGE__PATH=./database.json");
    println!("  CHIRPY_SECURITY__JWT_SECRET=<至少 32 字符>");
}
