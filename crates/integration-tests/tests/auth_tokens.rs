//! Token issue/verify behavior across configuration boundaries.

use minimart_auth::config::AuthConfig;
use minimart_auth::service::AuthError;
use minimart_auth::token;
use minimart_core::UserId;
use secrecy::SecretString;

fn config_with_secret(secret: &str) -> AuthConfig {
    AuthConfig {
        database_url: SecretString::from("postgres://localhost/test"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 5001,
        public_url: "http://localhost:5001".to_string(),
        registry_url: "http://localhost:5000".to_string(),
        jwt_secret: SecretString::from(secret.to_owned()),
        token_lifetime_secs: 3600,
        sentry_dsn: None,
    }
}

#[test]
fn test_token_roundtrip_carries_user_id() {
    let config = config_with_secret("an-integration-test-secret-of-32ch");

    let issued = token::issue(UserId::new(1234), &config).expect("issue failed");
    let claims = token::decode(&issued, &config).expect("decode failed");

    assert_eq!(claims.user_id().expect("numeric subject"), UserId::new(1234));
}

#[test]
fn test_services_with_different_secrets_reject_each_other() {
    let issuer = config_with_secret("an-integration-test-secret-of-32ch");
    let other = config_with_secret("a-different-shared-secret-of-32chr");

    let issued = token::issue(UserId::new(1), &issuer).expect("issue failed");

    assert!(matches!(
        token::decode(&issued, &other),
        Err(AuthError::TokenInvalid(_))
    ));
}

#[test]
fn test_opaque_garbage_is_rejected() {
    let config = config_with_secret("an-integration-test-secret-of-32ch");

    assert!(token::decode("not-a-jwt", &config).is_err());
    assert!(token::decode("", &config).is_err());
}
