//! 服务配置
//!
//! 全部来自环境变量（启动时先尝试加载 `.env`），构造后显式传入各组件。

use std::path::PathBuf;

use crate::core::error::{Error, Result};

/// 默认外部用户数据源
pub const DEFAULT_USERS_API_URL: &str = "https://gorest.co.in/public-api/users";

/// 服务配置结构
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 存储配置
    pub database: DatabaseConfig,
    /// 外部数据源配置
    pub source: SourceConfig,
    /// CSV 导出配置
    pub export: ExportConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 绑定地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 明确允许的跨域来源
    pub cors_origins: Vec<String>,
    /// 为 true 时在 `cors_origins` 之外仍允许任意来源
    pub cors_permissive: bool,
}

/// 存储配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 连接串；未设置时使用内存存储
    pub url: Option<String>,
    pub max_connections: u32,
}

/// 外部数据源配置
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
    /// 原样放入 `Authorization` 头
    pub api_token: Option<String>,
}

/// CSV 导出配置
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub path: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            cors_permissive: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_USERS_API_URL.to_string(),
            api_token: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("users.csv"),
        }
    }
}

impl Config {
    /// 从进程环境加载配置
    pub fn from_env() -> Result<Self> {
        // .env 不存在不算错误
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 按给定的键值查找函数构造配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.http.host = host;
        }
        if let Some(port) = get("PORT") {
            config.http.port = parse_number("PORT", &port)?;
        }
        if let Some(origins) = get("CORS_ORIGIN") {
            config.http.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(permissive) = get("CORS_PERMISSIVE") {
            config.http.cors_permissive = parse_flag("CORS_PERMISSIVE", &permissive)?;
        }

        config.database.url = get("DATABASE_URL").or_else(|| get("MONGODB_URI"));
        if let Some(max) = get("DB_MAX_CONNECTIONS") {
            config.database.max_connections = parse_number("DB_MAX_CONNECTIONS", &max)?;
        }

        if let Some(url) = get("USERS_API_URL") {
            config.source.url = url;
        }
        config.source.api_token = get("API_TOKEN");

        if let Some(path) = get("EXPORT_PATH") {
            config.export.path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.http.host.is_empty() {
            return Err(Error::Config("HOST must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }
        if self.source.url.is_empty() {
            return Err(Error::Config("USERS_API_URL must not be empty".to_string()));
        }
        Ok(())
    }

    /// 监听地址，如 `0.0.0.0:3000`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} is not a valid number: {value}")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{key} is not a valid flag: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.http.cors_origins.is_empty());
        assert!(config.http.cors_permissive);
        assert!(config.database.url.is_none());
        assert_eq!(config.source.url, DEFAULT_USERS_API_URL);
        assert!(config.source.api_token.is_none());
        assert_eq!(config.export.path, PathBuf::from("users.csv"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("MONGODB_URI", "postgres://legacy"),
            ("API_TOKEN", "Bearer abc"),
            ("CORS_ORIGIN", "https://a.example, https://b.example"),
            ("EXPORT_PATH", "/tmp/out.csv"),
        ]))
        .unwrap();

        assert_eq!(config.http.port, 8081);
        assert_eq!(config.database.url.as_deref(), Some("postgres://legacy"));
        assert_eq!(config.source.api_token.as_deref(), Some("Bearer abc"));
        assert_eq!(
            config.http.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.export.path, PathBuf::from("/tmp/out.csv"));
        assert!(config.http.cors_permissive);
    }

    #[test]
    fn test_cors_permissive_flag() {
        let config = Config::from_lookup(lookup(&[("CORS_PERMISSIVE", "false")])).unwrap();
        assert!(!config.http.cors_permissive);
        assert!(Config::from_lookup(lookup(&[("CORS_PERMISSIVE", "maybe")])).is_err());
    }

    #[test]
    fn test_derived_default_uses_section_defaults() {
        let config = Config::default();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.source.url, DEFAULT_USERS_API_URL);
        assert_eq!(config.export.path, PathBuf::from("users.csv"));
    }

    #[test]
    fn test_database_url_wins_over_legacy_name() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://primary"),
            ("MONGODB_URI", "postgres://legacy"),
        ]))
        .unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://primary"));
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::from_lookup(lookup(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).is_err());

        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.http.host = String::new();
        assert!(config.validate().is_err());
    }
}
