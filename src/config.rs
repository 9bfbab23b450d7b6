use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,

    pub chat_api_url: String,
    pub chat_api_timeout_secs: u64,
    pub prediction_api_url: Option<String>,

    pub session_key: String,
    pub leaderboard_limit: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://feelbetter.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            chat_api_url: env::var("CHAT_API_URL").expect("CHAT_API_URL must be set"),
            chat_api_timeout_secs: env::var("CHAT_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("CHAT_API_TIMEOUT_SECS must be a number"),
            prediction_api_url: env::var("PREDICTION_API_URL")
                .ok()
                .filter(|s| !s.is_empty()),

            session_key: env::var("SESSION_KEY").unwrap_or_else(|_| "chat_history".into()),
            leaderboard_limit: env::var("LEADERBOARD_LIMIT")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("LEADERBOARD_LIMIT must be a non-negative number"),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Session key scoped to one user. Every user gets their own
    /// "device-local" chat history slot.
    pub fn session_key_for(&self, user_id: &str) -> String {
        format!("{}:{}", self.session_key, user_id)
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(chat_api_url: &str, prediction_api_url: Option<&str>) -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            jwt_secret: "test-secret".into(),
            chat_api_url: chat_api_url.to_string(),
            chat_api_timeout_secs: 5,
            prediction_api_url: prediction_api_url.map(str::to_string),
            session_key: "chat_history".into(),
            leaderboard_limit: 10,
        }
    }
}
