//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:8080"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 静态站点目录（/app 前缀）
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON 数据库文件路径
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 密钥（使用 Secret 包装，防止日志泄露）
    pub jwt_secret: Secret<String>,
    /// Polka webhook API key（使用 Secret 包装）
    pub polka_api_key: Secret<String>,
    /// 访问令牌过期时间（秒）
    pub access_token_exp_secs: u64,
    /// 刷新令牌过期时间（秒）
    pub refresh_token_exp_secs: u64,
    /// Argon2 内存成本（KiB），最低 8192
    pub hash_memory_kib: u32,
    /// Argon2 迭代次数，最低 1
    pub hash_iterations: u32,
    /// Argon2 并行度，最低 1
    pub hash_parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("server.static_dir", "./public")?
            .set_default("storage.path", "./database.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.jwt_secret", "change-this-secret-in-production-min-32-chars!")?
            .set_default("security.polka_api_key", "change-this-polka-key")?
            .set_default("security.access_token_exp_secs", 3600)?
            .set_default("security.refresh_token_exp_secs", 5_184_000)?
            .set_default("security.hash_memory_kib", 19456)?
            .set_default("security.hash_iterations", 2)?
            .set_default("security.hash_parallelism", 1)?;

        // 从环境变量加载配置（前缀为 CHIRPY_）
        settings = settings.add_source(
            Environment::with_prefix("CHIRPY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证数据库文件路径非空
        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::Message("storage.path must not be empty".to_string()));
        }

        // 验证 JWT 密钥长度（至少 32 字符）
        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // 验证令牌过期时间
        if self.security.access_token_exp_secs < 60 || self.security.access_token_exp_secs > 86400 {
            return Err(ConfigError::Message(
                "access_token_exp_secs must be between 60 and 86400 (1 minute to 24 hours)"
                    .to_string(),
            ));
        }

        if self.security.refresh_token_exp_secs < 3600
            || self.security.refresh_token_exp_secs > 7_776_000
        {
            return Err(ConfigError::Message(
                "refresh_token_exp_secs must be between 3600 and 7776000 (1 hour to 90 days)"
                    .to_string(),
            ));
        }

        // 验证 Argon2 成本参数下限
        if self.security.hash_memory_kib < 8192 {
            return Err(ConfigError::Message(
                "hash_memory_kib must be at least 8192 (8 MiB)".to_string(),
            ));
        }

        if self.security.hash_iterations < 1 {
            return Err(ConfigError::Message("hash_iterations must be at least 1".to_string()));
        }

        if self.security.hash_parallelism < 1 {
            return Err(ConfigError::Message("hash_parallelism must be at least 1".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_defaults() {
        // 清理所有可能的环境变量
        std::env::remove_var("CHIRPY_SERVER__ADDR");
        std::env::remove_var("CHIRPY_LOGGING__LEVEL");
        std::env::remove_var("CHIRPY_LOGGING__FORMAT");
        std::env::remove_var("CHIRPY_SECURITY__JWT_SECRET");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.storage.path, "./database.json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.access_token_exp_secs, 3600);
        assert_eq!(config.security.refresh_token_exp_secs, 5_184_000);
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_port() {
        std::env::remove_var("CHIRPY_SERVER__ADDR");

        std::env::set_var("CHIRPY_SERVER__ADDR", "0.0.0.0:80");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("CHIRPY_SERVER__ADDR");
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_log_level() {
        std::env::remove_var("CHIRPY_LOGGING__LEVEL");

        std::env::set_var("CHIRPY_LOGGING__LEVEL", "invalid");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("CHIRPY_LOGGING__LEVEL");
    }

    #[test]
    #[serial]
    fn test_config_validation_short_jwt_secret() {
        std::env::remove_var("CHIRPY_SECURITY__JWT_SECRET");

        std::env::set_var("CHIRPY_SECURITY__JWT_SECRET", "too-short");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("CHIRPY_SECURITY__JWT_SECRET");
    }

    #[test]
    #[serial]
    fn test_config_validation_weak_hash_params() {
        std::env::remove_var("CHIRPY_SECURITY__HASH_MEMORY_KIB");

        std::env::set_var("CHIRPY_SECURITY__HASH_MEMORY_KIB", "1024");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        std::env::remove_var("CHIRPY_SECURITY__HASH_MEMORY_KIB");
    }
}
