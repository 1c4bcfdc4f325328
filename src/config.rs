use std::env;
use std::time::Duration;

use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    /// Unset means the in-memory store (dev mode, no MySQL required).
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    /// Days granted to every new employee at registration.
    pub annual_leave_allotment: i32,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Advisory backend; no key means advisory is disabled
    pub advisor_api_url: String,
    pub advisor_api_key: Option<String>,
    pub advisor_model: String,
    pub advisor_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").ok(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "36000".to_string()) // default 10 hours
                .parse()
                .unwrap(),

            annual_leave_allotment: env::var("ANNUAL_LEAVE_ALLOTMENT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            advisor_api_url: env::var("ADVISOR_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            advisor_api_key: env::var("ADVISOR_API_KEY").ok(),
            advisor_model: env::var("ADVISOR_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            advisor_timeout_ms: env::var("ADVISOR_TIMEOUT_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap(),
        }
    }

    pub fn advisor_timeout(&self) -> Duration {
        Duration::from_millis(self.advisor_timeout_ms)
    }
}
