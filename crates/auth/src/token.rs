//! Signed bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. There is no
//! refresh token and no rotation: a token is valid until it expires.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use minimart_core::UserId;

use crate::config::AuthConfig;
use crate::service::AuthError;

/// JWT claims embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - user ID as a decimal string.
    pub sub: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

impl TokenClaims {
    /// The user ID this token was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenInvalid` if the subject is not a decimal
    /// user ID (a token we never issued).
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| AuthError::TokenInvalid("subject is not a user id".to_owned()))
    }
}

/// Issue a signed token for `user_id`.
///
/// # Errors
///
/// Returns `AuthError::TokenSigning` if encoding fails.
pub fn issue(user_id: UserId, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + i64::try_from(config.token_lifetime_secs).unwrap_or(i64::MAX),
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::TokenSigning(e.to_string()))
}

/// Decode and verify a token's signature and expiry.
///
/// # Errors
///
/// Returns `AuthError::TokenExpired` for an expired token and
/// `AuthError::TokenInvalid` for a tampered or malformed one.
pub fn decode(token: &str, config: &AuthConfig) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["sub", "exp", "iat"]);

    jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5001,
            public_url: "http://localhost:5001".to_string(),
            registry_url: "http://localhost:5000".to_string(),
            jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
            token_lifetime_secs: 900,
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_issue_then_decode() {
        let config = test_config();
        let token = issue(UserId::new(42), &config).unwrap();
        let claims = decode(&token, &config).unwrap();

        assert_eq!(claims.user_id().unwrap(), UserId::new(42));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_jti_is_unique() {
        let config = test_config();
        let t1 = issue(UserId::new(1), &config).unwrap();
        let t2 = issue(UserId::new(1), &config).unwrap();

        let c1 = decode(&t1, &config).unwrap();
        let c2 = decode(&t2, &config).unwrap();
        assert_ne!(c1.jti, c2.jti);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = test_config();
        config.token_lifetime_secs = 0;

        let token = issue(UserId::new(7), &config).unwrap();
        // Zero lifetime puts exp at "now"; jsonwebtoken's default leeway is
        // 60s, so disable it explicitly via decode with a shifted clock by
        // checking the error after the leeway window instead. Build a claim
        // set that is definitely expired.
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "7".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let key = EncodingKey::from_secret(
            config.jwt_secret.expose_secret().as_bytes(),
        );
        let expired =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        assert!(matches!(
            decode(&expired, &config),
            Err(AuthError::TokenExpired)
        ));
        // The non-expired token still verifies within the leeway window.
        assert!(decode(&token, &config).is_ok());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = test_config();
        let token = issue(UserId::new(42), &config).unwrap();

        // Flip a character in the payload segment.
        let mut tampered = token.into_bytes();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == b'a' { b'b' } else { b'a' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(
            decode(&tampered, &config),
            Err(AuthError::TokenExpired | AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue(UserId::new(42), &config).unwrap();

        let mut other = test_config();
        other.jwt_secret = SecretString::from("fedcba9876543210fedcba9876543210");

        assert!(matches!(
            decode(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let claims = TokenClaims {
            sub: "mongo-object-id".to_string(),
            iat: 0,
            exp: 0,
            jti: String::new(),
        };
        assert!(claims.user_id().is_err());
    }
}
