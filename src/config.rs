use std::{env, time::Duration};

/// AppConfig
///
/// Holds the gateway's configuration. Immutable once loaded and shared with
/// handlers and extractors through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects log format and fail-fast rules.
    pub env: Env,
    // Base URL of the SkillBridge REST backend (no trailing slash).
    pub api_base_url: String,
    // Cookie under which the login flow stores the bearer token.
    pub token_cookie: String,
    // Upper bound on the profile fetch before a loading view is served instead.
    pub profile_timeout: Duration,
    // Overall HTTP client timeout for backend calls. Never shorter than
    // `profile_timeout`, so a fetch outlives the loading view it triggered.
    pub api_timeout: Duration,
    // Socket address the HTTP server binds to.
    pub listen_addr: String,
}

/// Env
///
/// Runtime context: local development or production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_TOKEN_COOKIE: &str = "token";
pub const DEFAULT_PROFILE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const LOCAL_API_BASE_URL: &str = "http://localhost:8080";

impl Default for AppConfig {
    /// Safe, non-panicking values for test scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: LOCAL_API_BASE_URL.to_string(),
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            profile_timeout: Duration::from_millis(DEFAULT_PROFILE_TIMEOUT_MS),
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `SKILLBRIDGE_API_URL` is missing, so the
    /// gateway never starts pointed at a development backend.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => env::var("SKILLBRIDGE_API_URL")
                .expect("FATAL: SKILLBRIDGE_API_URL must be set in production."),
            Env::Local => env::var("SKILLBRIDGE_API_URL")
                .unwrap_or_else(|_| LOCAL_API_BASE_URL.to_string()),
        };

        let profile_timeout = millis_var("PROFILE_TIMEOUT_MS", DEFAULT_PROFILE_TIMEOUT_MS);
        let api_timeout = millis_var("API_TIMEOUT_MS", DEFAULT_API_TIMEOUT_MS).max(profile_timeout);

        Self {
            env,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token_cookie: env::var("TOKEN_COOKIE")
                .unwrap_or_else(|_| DEFAULT_TOKEN_COOKIE.to_string()),
            profile_timeout,
            api_timeout,
            listen_addr: env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }
}

fn millis_var(name: &str, default_ms: u64) -> Duration {
    let millis = env::var(name)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(millis)
}
