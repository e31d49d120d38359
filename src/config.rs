/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CACHE_URL, Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は読み取り専用 (context::provider::init で一度だけ登録する)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // None のときはプロセス内の MemoryCache を使う
    pub cache_url: Option<String>,
    pub cache_default_ttl_seconds: u64,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub auth_jwt_secret: String,
    pub access_token_leeway_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secret / 接続文字列は出さない
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("cache_default_ttl_seconds", &self.cache_default_ttl_seconds)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let cache_url = std::env::var("CACHE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let cache_default_ttl_seconds = match std::env::var("CACHE_DEFAULT_TTL_SECONDS") {
            Ok(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("CACHE_DEFAULT_TTL_SECONDS"))?,
            Err(_) => 1800,
        };

        let auth_issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        let auth_jwt_secret = std::env::var("AUTH_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("AUTH_JWT_SECRET"))?;
        if auth_jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_JWT_SECRET"));
        }

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            cache_url,
            cache_default_ttl_seconds,
            auth_issuer,
            auth_audience,
            auth_jwt_secret,
            access_token_leeway_seconds,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        database_url: "postgres://localhost/skymall_test".to_string(),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        cache_url: None,
        cache_default_ttl_seconds: 60,
        auth_issuer: "skymall-test".to_string(),
        auth_audience: "skymall-api".to_string(),
        auth_jwt_secret: "test-secret-which-is-long-enough".to_string(),
        access_token_leeway_seconds: 0,
    }
}
