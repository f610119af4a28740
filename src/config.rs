use std::env;
use secrecy::SecretString;

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub refresh_token_expiration_hours: i64,
    pub admin_usernames: Vec<String>,
    pub llm_api_base: String,
    pub llm_api_key: Option<SecretString>,
    pub llm_model: String,
    pub llm_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "campus-portal-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            refresh_token_expiration_hours: env::var("REFRESH_TOKEN_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(168),
            admin_usernames: parse_list(&env::var("ADMIN_USERNAMES").unwrap_or_default()),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_api_key: env::var("LLM_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            llm_timeout_seconds: env::var("LLM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn is_admin_username(&self, username: &str) -> bool {
        self.admin_usernames.iter().any(|u| u == username)
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if !self.is_production() {
            return;
        }

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.llm_api_key.is_none() {
            log::warn!("LLM_API_KEY is not set; the study assistant will report itself unavailable");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "campus-portal-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            refresh_token_expiration_hours: 24,
            admin_usernames: vec!["registrar".to_string()],
            llm_api_base: "http://localhost:9999/v1".to_string(),
            llm_api_key: None,
            llm_model: "test-model".to_string(),
            llm_timeout_seconds: 2,
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
