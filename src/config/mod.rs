use std::env;

/// Runtime configuration, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (default: local SQLite file)
    pub database_url: String,

    /// Address the HTTP server binds to (default: "127.0.0.1:8080")
    pub bind_addr: String,

    /// Shared secret for signing bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: 86400 = 24h)
    pub token_ttl_secs: i64,

    /// External inference endpoint (multipart POST target)
    pub inference_url: String,

    /// Connect timeout for the inference call in seconds (default: 5)
    pub inference_connect_timeout_secs: u64,

    /// Overall request timeout for the inference call in seconds (default: 30)
    pub inference_request_timeout_secs: u64,

    /// Directory uploaded scans are written to (default: "uploads")
    pub upload_dir: String,

    /// Maximum upload size in bytes (default: 10 MB)
    pub max_upload_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://septalyze.db?mode=rwc".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_secs: 86400,
            inference_url: "http://localhost:8000/infer".to_string(),
            inference_connect_timeout_secs: 5,
            inference_request_timeout_secs: 30,
            upload_dir: "uploads".to_string(),
            max_upload_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            bind_addr: env::var("BIND_ADDR").unwrap_or(default.bind_addr),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            token_ttl_secs: env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.token_ttl_secs),

            inference_url: env::var("INFERENCE_URL").unwrap_or(default.inference_url),

            inference_connect_timeout_secs: env::var("INFERENCE_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.inference_connect_timeout_secs),

            inference_request_timeout_secs: env::var("INFERENCE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.inference_request_timeout_secs),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),
        }
    }

    /// Create config for production (secret must be provided explicitly)
    pub fn production() -> Self {
        Self {
            jwt_secret: env::var("JWT_SECRET").expect("CRITICAL: JWT_SECRET must be set"),
            ..Self::from_env()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.token_ttl_secs, 86400);
        assert_eq!(config.inference_connect_timeout_secs, 5);
        assert_eq!(config.inference_request_timeout_secs, 30);
        assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_from_env_falls_back_to_defaults() {
        unsafe { env::remove_var("TOKEN_TTL_SECS") };
        let config = AppConfig::from_env();
        assert_eq!(config.token_ttl_secs, AppConfig::default().token_ttl_secs);
    }

    #[test]
    fn test_production_requires_secret() {
        unsafe { env::set_var("JWT_SECRET", "prod_secret") };
        let config = AppConfig::production();
        unsafe { env::remove_var("JWT_SECRET") };
        assert_eq!(config.jwt_secret, "prod_secret");
    }
}
