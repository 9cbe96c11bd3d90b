use std::env;

/// Runtime configuration loaded from the environment.
///
/// Every knob has a default so the server can boot from a bare checkout;
/// `.env` files are loaded by `main` via dotenvy before this is read.
#[derive(Debug, Clone)]
pub struct Settings {
    /// LLM provider name ("openai" or "anthropic"). The client runs in
    /// disabled mode when the provider's API key is missing.
    pub llm_provider: String,
    /// Model used for per-article summaries.
    pub small_model: String,
    /// Model used for competitive analysis and brief building.
    pub analyst_model: String,
    /// Model used for final article writing.
    pub writer_model: String,
    /// Maximum number of source URLs fed into the pipeline.
    pub max_urls: usize,
    /// HTTP bind host.
    pub app_host: String,
    /// HTTP bind port.
    pub app_port: u16,
    /// Sqlite database file path.
    pub database_path: String,
    /// Directory for exported markdown files.
    pub export_dir: String,
    /// Session lifetime in days.
    pub session_ttl_days: i64,
    /// Whether session cookies carry the Secure flag.
    pub cookie_secure: bool,
    /// Number of pipeline workers draining the queue.
    pub pipeline_workers: usize,
    /// Capacity of the bounded pipeline queue.
    pub queue_capacity: usize,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            llm_provider: env_or("LLM_PROVIDER", "openai"),
            small_model: env_or("SMALL_MODEL", "gpt-4.1-mini"),
            analyst_model: env_or("ANALYST_MODEL", "gpt-4.1-mini"),
            writer_model: env_or("WRITER_MODEL", "gpt-4.1"),
            max_urls: env_parse("MAX_URLS", 3),
            app_host: env_or("APP_HOST", "0.0.0.0"),
            app_port: env_parse("APP_PORT", 8000),
            database_path: env_or("DATABASE_PATH", "seoforge.db"),
            export_dir: env_or("EXPORT_DIR", "exports"),
            session_ttl_days: env_parse("SESSION_TTL_DAYS", 7),
            cookie_secure: env_parse("COOKIE_SECURE", false),
            pipeline_workers: env_parse("PIPELINE_WORKERS", 4),
            queue_capacity: env_parse("PIPELINE_QUEUE_CAPACITY", 64),
        }
    }
}
