use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Secret used to sign bearer tokens (HMAC-SHA256)
    pub auth_secret_key: String,
    /// Server-side pepper mixed into password digests
    pub password_pepper: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
    /// Optional key gating the /admin endpoints; None disables them
    pub admin_secret_key: Option<String>,
    /// Attach tower-http request tracing when true
    pub log_requests: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/lifemon.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let auth_secret_key = env::var("AUTH_SECRET_KEY")
            .map_err(|_| "AUTH_SECRET_KEY must be set for token signing")?;

        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| "PASSWORD_PEPPER must be set for password hashing")?;

        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| "Invalid TOKEN_TTL_SECS")?;

        let admin_secret_key = env::var("ADMIN_SECRET_KEY").ok();

        let log_requests = env::var("LOG_REQUESTS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            auth_secret_key,
            password_pepper,
            token_ttl_secs,
            admin_secret_key,
            log_requests,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
