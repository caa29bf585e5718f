/// JWT token generation and validation using HS256
///
/// Access tokens: 1-hour expiry. Password-reset tokens: 10-minute expiry,
/// single-purpose (`token_type: "reset"`), only accepted by the
/// password-reset endpoint.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const RESET_TOKEN_EXPIRY_MINUTES: i64 = 10;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_RESET: &str = "reset";

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "reset"
    pub token_type: String,
    /// Username at issue time
    pub username: String,
}

/// Signing and verification keys, carried in `AppState`
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Generate an access token for an authenticated user
pub fn generate_access_token(keys: &JwtKeys, user_id: Uuid, username: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS)).timestamp(),
        token_type: TOKEN_TYPE_ACCESS.to_string(),
        username: username.to_string(),
    };

    Ok(encode(&Header::default(), &claims, &keys.encoding)?)
}

/// Generate a short-lived password-reset token
pub fn generate_reset_token(keys: &JwtKeys, user_id: Uuid, username: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(RESET_TOKEN_EXPIRY_MINUTES)).timestamp(),
        token_type: TOKEN_TYPE_RESET.to_string(),
        username: username.to_string(),
    };

    Ok(encode(&Header::default(), &claims, &keys.encoding)?)
}

/// Validate an access token and return its claims
pub fn validate_access_token(keys: &JwtKeys, token: &str) -> Result<Claims> {
    let claims = decode_claims(keys, token)?;
    if claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(AppError::InvalidToken);
    }
    Ok(claims)
}

/// Validate a password-reset token and return the user it belongs to
pub fn validate_reset_token(keys: &JwtKeys, token: &str) -> Result<Uuid> {
    let claims = decode_claims(keys, token)?;
    if claims.token_type != TOKEN_TYPE_RESET {
        return Err(AppError::InvalidToken);
    }
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
}

fn decode_claims(keys: &JwtKeys, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::from_secret("test-secret")
    }

    #[test]
    fn test_access_token_roundtrip() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(&keys, user_id, "susan").unwrap();

        let claims = validate_access_token(&keys, &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "susan");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_reset_token_roundtrip() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = generate_reset_token(&keys, user_id, "susan").unwrap();

        assert_eq!(validate_reset_token(&keys, &token).unwrap(), user_id);
    }

    #[test]
    fn test_reset_token_rejected_as_access_token() {
        let keys = keys();
        let token = generate_reset_token(&keys, Uuid::new_v4(), "susan").unwrap();

        assert!(matches!(
            validate_access_token(&keys, &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_access_token_rejected_as_reset_token() {
        let keys = keys();
        let token = generate_access_token(&keys, Uuid::new_v4(), "susan").unwrap();

        assert!(matches!(
            validate_reset_token(&keys, &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
            token_type: "access".to_string(),
            username: "susan".to_string(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert!(matches!(
            validate_access_token(&keys, &token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            generate_access_token(&keys(), Uuid::new_v4(), "susan").unwrap();
        let other = JwtKeys::from_secret("other-secret");

        assert!(matches!(
            validate_access_token(&other, &token),
            Err(AppError::InvalidToken)
        ));
    }
}
