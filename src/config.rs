use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub luis_app_id: String,
    pub luis_api_key: String,
    pub luis_api_host_name: String,
    pub recognizer_timeout_secs: u64,
    pub conversation_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3978),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "flightbot.db".to_string()),
            luis_app_id: env::var("LUIS_APP_ID").unwrap_or_default(),
            luis_api_key: env::var("LUIS_API_KEY").unwrap_or_default(),
            luis_api_host_name: env::var("LUIS_API_HOST_NAME").unwrap_or_default(),
            recognizer_timeout_secs: env::var("RECOGNIZER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            conversation_ttl_minutes: env::var("CONVERSATION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// All three LUIS settings must be non-blank for recognition to be attempted.
    pub fn luis_configured(&self) -> bool {
        [
            &self.luis_app_id,
            &self.luis_api_key,
            &self.luis_api_host_name,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(app_id: &str, key: &str, host: &str) -> AppConfig {
        AppConfig {
            port: 3978,
            database_url: ":memory:".to_string(),
            luis_app_id: app_id.to_string(),
            luis_api_key: key.to_string(),
            luis_api_host_name: host.to_string(),
            recognizer_timeout_secs: 10,
            conversation_ttl_minutes: 30,
        }
    }

    #[test]
    fn test_luis_configured_requires_all_settings() {
        assert!(config("app", "key", "westus.api.cognitive.microsoft.com").luis_configured());
        assert!(!config("", "key", "host").luis_configured());
        assert!(!config("app", "   ", "host").luis_configured());
        assert!(!config("app", "key", "").luis_configured());
    }
}
