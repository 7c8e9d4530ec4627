use gatehouse_core::session::SessionTtl;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session cookie / registry configuration.
    pub session: SessionConfig,
}

/// Session configuration: cookie name, TTL, and registry backend.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the session cookie (default: `session_id`).
    pub cookie_name: String,
    /// Session lifetime in seconds; `0` (the default) means sessions never
    /// expire.
    pub ttl_secs: i64,
    /// Which registry implementation backs sessions.
    pub backend: SessionBackend,
}

/// Registry implementation selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process-local map; sessions die with the process.
    Memory,
    /// Rows in the `user_sessions` table; sessions survive restarts.
    Database,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SESSION_NAME`         | `session_id`               |
    /// | `SESSION_DURATION`     | `0` (never expires)        |
    /// | `SESSION_BACKEND`      | `memory`                   |
    ///
    /// # Panics
    ///
    /// Panics on values that cannot be interpreted (invalid port, unknown
    /// session backend) -- misconfiguration should fail fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session: SessionConfig::from_env(),
        }
    }
}

impl SessionConfig {
    /// The expiration policy shared by every registry backend.
    pub fn ttl(&self) -> SessionTtl {
        SessionTtl::from_secs(self.ttl_secs)
    }

    /// Load session configuration from environment variables.
    ///
    /// A non-numeric `SESSION_DURATION` falls back to `0` (no expiry)
    /// rather than failing, since "unset" and "unparseable" both mean
    /// "no TTL configured" here.
    pub fn from_env() -> Self {
        let cookie_name = std::env::var("SESSION_NAME").unwrap_or_else(|_| "session_id".into());

        let ttl_secs: i64 = std::env::var("SESSION_DURATION")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);

        let backend = match std::env::var("SESSION_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .as_str()
        {
            "memory" => SessionBackend::Memory,
            "database" => SessionBackend::Database,
            other => panic!("SESSION_BACKEND must be 'memory' or 'database', got '{other}'"),
        };

        Self {
            cookie_name,
            ttl_secs,
            backend,
        }
    }
}
