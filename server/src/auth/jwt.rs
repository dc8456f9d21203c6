//! JWT Token Validation
//!
//! HS256 access tokens signed with the shared platform secret. The
//! platform's identity service issues tokens; this server only
//! validates them.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::error::{AuthError, AuthResult};

/// JWT claims for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

/// Validate an access token and return its claims.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    use super::*;

    /// Mint a token the way the identity service does.
    fn mint_token(user_id: Uuid, secret: &str, expiry_seconds: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::now_v7();
        let token = mint_token(user_id, "test-secret", 900);

        let claims = validate_access_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = mint_token(Uuid::now_v7(), "test-secret", 900);

        let result = validate_access_token(&token, "other-secret");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = mint_token(Uuid::now_v7(), "test-secret", -120);

        let result = validate_access_token(&token, "test-secret");
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }
}
