//! JWT token resolution
//!
//! This service only verifies tokens issued by the auth collaborator; it
//! never mints them. Handlers use `resolve_email` to map a bearer token to
//! the account email embedded in its claims.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret the issuer signed the token with
    pub secret: String,
    /// Expected issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            issuer: "evcharge".to_string(),
        }
    }
}

/// Claims carried by tokens from the auth collaborator
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn is_admin(&self) -> bool {
        self.role == "ADMIN"
    }
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Resolve a bearer token to the account email, or `None` when the token
/// is invalid or expired.
pub fn resolve_email(token: &str, config: &JwtConfig) -> Option<String> {
    verify_token(token, config).ok().map(|claims| claims.email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(claims: &TokenClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(config: &JwtConfig, exp_offset_hours: i64) -> TokenClaims {
        let now = Utc::now();
        TokenClaims {
            sub: "1".into(),
            email: "alice@example.com".into(),
            role: "USER".into(),
            exp: (now + Duration::hours(exp_offset_hours)).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    #[test]
    fn valid_token_resolves_to_email() {
        let config = JwtConfig {
            secret: "test-secret".into(),
            issuer: "evcharge".into(),
        };
        let token = sign(&claims(&config, 1), &config.secret);
        assert_eq!(
            resolve_email(&token, &config).as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = JwtConfig {
            secret: "test-secret".into(),
            issuer: "evcharge".into(),
        };
        let token = sign(&claims(&config, -1), &config.secret);
        assert!(resolve_email(&token, &config).is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = JwtConfig {
            secret: "test-secret".into(),
            issuer: "evcharge".into(),
        };
        let token = sign(&claims(&config, 1), "other-secret");
        assert!(resolve_email(&token, &config).is_none());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = JwtConfig {
            secret: "test-secret".into(),
            issuer: "evcharge".into(),
        };
        let mut c = claims(&config, 1);
        c.iss = "someone-else".into();
        let token = sign(&c, &config.secret);
        assert!(resolve_email(&token, &config).is_none());
    }

    #[test]
    fn admin_role_check() {
        let config = JwtConfig::default();
        let mut c = claims(&config, 1);
        assert!(!c.is_admin());
        c.role = "ADMIN".into();
        assert!(c.is_admin());
    }
}
