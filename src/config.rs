use serde::{Deserialize, Serialize};

// Persisted client state keys, shared across tabs of the same origin.
pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";
// Session-scoped keys (cleared when the browser session ends).
pub const PENDING_BOOKING_KEY: &str = "pendingBookingData";
pub const CHAT_SESSION_KEY: &str = "chatSessionId";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url_development: String,
    pub api_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub request_timeout_ms: u32,
    pub auth_config: AuthConfig,
    pub booking_config: BookingConfig,
    pub chat_config: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Silent refresh interval while authenticated.
    pub refresh_interval_ms: u32,
    /// Tokens expiring within this buffer are treated as already expired.
    pub token_expiry_buffer_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 55 * 60 * 1000,
            token_expiry_buffer_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Delay between a successful login and the automatic resubmission of a
    /// stashed booking draft, so dependent components settle first.
    pub resubmit_grace_ms: u32,
    pub min_vehicle_year: i32,
    pub opening_hour: u32,
    pub closing_hour: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            resubmit_grace_ms: 400,
            min_vehicle_year: 1886,
            opening_hour: 9,
            closing_hour: 17,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum transcript entries kept in memory; oldest are dropped.
    pub transcript_cap: usize,
    /// Number of recent turns sent as context to the remote NLU endpoint.
    pub context_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            transcript_cap: 200,
            context_window: 20,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url_development: "http://localhost:5001".to_string(),
            api_url_production: "https://api.autocare.example.com".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            request_timeout_ms: 15_000,
            auth_config: AuthConfig::default(),
            booking_config: BookingConfig::default(),
            chat_config: ChatConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from compile-time environment variables
    /// (forwarded from .env by build.rs).
    pub fn from_env() -> Self {
        Self {
            api_url_development: option_env!("API_URL_DEVELOPMENT")
                .unwrap_or("http://localhost:5001")
                .to_string(),
            api_url_production: option_env!("API_URL_PRODUCTION")
                .unwrap_or("https://api.autocare.example.com")
                .to_string(),
            environment: option_env!("ENVIRONMENT").unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true")
                .parse()
                .unwrap_or(true),
            request_timeout_ms: option_env!("REQUEST_TIMEOUT_MS")
                .unwrap_or("15000")
                .parse()
                .unwrap_or(15_000),
            auth_config: AuthConfig::default(),
            booking_config: BookingConfig::default(),
            chat_config: ChatConfig::default(),
        }
    }

    /// Base URL of the remote API for the current environment.
    pub fn api_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.api_url_production,
            _ => &self.api_url_development,
        }
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
