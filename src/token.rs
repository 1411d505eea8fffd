use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i32) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::TokenSigning)
    }

    /// Check signature and expiry, returning the embedded user id.
    pub fn verify(&self, token: &str) -> Result<i32> {
        let validation = Validation::default();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(AppError::InvalidToken)?
            .claims;

        Ok(claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify_token() {
        let tokens = service("test_secret_key");
        let token = tokens.issue(42).unwrap();

        assert_eq!(tokens.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let tokens = service("test_secret_key");
        assert_ne!(tokens.issue(1).unwrap(), tokens.issue(1).unwrap());
    }

    #[test]
    fn test_garbage_token() {
        let tokens = service("test_secret_key");
        let result = tokens.verify("invalid_token");
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token() {
        let tokens = service("test_secret_key");
        let token = tokens.issue(7).unwrap();

        // Swap the payload for one claiming a different user, keeping the signature.
        let forged = tokens.issue(8).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        let result = tokens.verify(&tampered);
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let token = service("secret1").issue(3).unwrap();

        let result = service("secret2").verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token() {
        // Well past the default validation leeway.
        let tokens = TokenService::new("test_secret_key", Duration::hours(-2));
        let token = tokens.issue(5).unwrap();

        let result = tokens.verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_claims_carry_user_id_and_expiry() {
        let tokens = service("test_secret_key");
        let token = tokens.issue(11).unwrap();

        let claims = decode::<Claims>(&token, &tokens.decoding_key, &Validation::default())
            .unwrap()
            .claims;
        assert_eq!(claims.sub, "11");
        assert_eq!(claims.user_id, 11);
        let expires_in = claims.exp - claims.iat;
        assert_eq!(expires_in, 3600);
    }
}
