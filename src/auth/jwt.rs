use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Access token issued by the app's identity provider. `sub` is the user id
/// every per-user document is keyed by.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
pub fn create_access_token(user_id: &str, name: Option<&str>, config: &Config) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        name: name.map(str::to_string),
        exp: (now + Duration::seconds(900)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .expect("Failed to create access token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_token_round_trips_claims() {
        let config = Config::for_tests("http://localhost/chat", None);
        let token = create_access_token("user-1", Some("Sam"), &config);

        let data = verify_token(&token, &config).unwrap();

        assert_eq!(data.claims.sub, "user-1");
        assert_eq!(data.claims.name.as_deref(), Some("Sam"));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = Config::for_tests("http://localhost/chat", None);
        let mut other = config.clone();
        other.jwt_secret = "someone-else".into();
        let token = create_access_token("user-1", None, &other);

        assert!(matches!(verify_token(&token, &config), Err(AppError::Unauthorized)));
    }

    #[test]
    fn garbage_is_rejected() {
        let config = Config::for_tests("http://localhost/chat", None);
        assert!(matches!(verify_token("nope", &config), Err(AppError::Unauthorized)));
    }
}
