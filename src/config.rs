use serde::Deserialize;
use time::Duration;

/// Lifetimes for the tokens this crate issues.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_days: i64,
    pub remember_me_ttl_days: i64,
    pub reset_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_days: 7,
            remember_me_ttl_days: 30,
            reset_token_ttl_minutes: 60,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            session_ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.session_ttl_days),
            remember_me_ttl_days: std::env::var("SESSION_REMEMBER_ME_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.remember_me_ttl_days),
            reset_token_ttl_minutes: std::env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.reset_token_ttl_minutes),
        }
    }

    pub fn session_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            Duration::days(self.remember_me_ttl_days)
        } else {
            Duration::days(self.session_ttl_days)
        }
    }

    pub fn reset_token_ttl(&self) -> Duration {
        Duration::minutes(self.reset_token_ttl_minutes)
    }
}
