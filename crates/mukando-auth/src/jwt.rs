//! JWT (JSON Web Token) creation and decoding.
//!
//! Access tokens are HMAC-SHA-256 signed and carry the [`Claims`] the
//! gateway needs to authorize a request without touching the database:
//! the user id (subject), username, and role.
//!
//! Decoding validates the signature and expiry (with the default 60s
//! leeway) and then checks that the identity claims are actually usable;
//! a token whose subject or username is blank is rejected as
//! [`TokenError::ClaimsIncomplete`] even though it decoded cleanly.
//!
//! # Example
//!
//! ```ignore
//! use mukando_auth::{Role, create_access_token, decode_access_token};
//! use mukando_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! let token = create_access_token(user_id, "tendai", Role::Member, &config)?;
//! let claims = decode_access_token(&token, &config)?;
//! assert_eq!(claims.username, "tendai");
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use mukando_config::JwtConfig;

use crate::claims::Claims;
use crate::error::TokenError;
use crate::role::Role;

/// Creates a signed access token for the given user.
///
/// The token expires `jwt_config.access_token_expiry` seconds from now.
///
/// # Errors
///
/// Returns [`TokenError::Creation`] if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    username: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Creation(e.to_string()))
}

/// Decodes an access token, verifying its signature and expiry.
///
/// # Errors
///
/// Returns a [`TokenError`] naming the failure mode:
///
/// - [`TokenError::Expired`] when the token is past its expiry
/// - [`TokenError::InvalidSignature`] when the signature does not verify
/// - [`TokenError::UnsupportedAlgorithm`] when the header names an
///   algorithm other than HS256
/// - [`TokenError::ClaimsIncomplete`] when identity claims are absent or blank
/// - [`TokenError::Malformed`] for anything else that is not a valid token
pub fn decode_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)?;

    if claims.sub.trim().is_empty() || claims.username.trim().is_empty() {
        return Err(TokenError::ClaimsIncomplete);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;
    use serde::Serialize;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_create_access_token_success() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let result = create_access_token(user_id, "tendai", Role::Member, &config);

        assert!(result.is_ok());
        let token = result.unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_decode_access_token_round_trip() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(user_id, "tendai", Role::Treasurer, &config).unwrap();
        let claims = decode_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "tendai");
        assert_eq!(claims.role, Role::Treasurer);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_decode_access_token_wrong_secret() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(user_id, "tendai", Role::Member, &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        };

        let result = decode_access_token(&token, &wrong_config);
        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_decode_access_token_garbage() {
        let config = get_test_jwt_config();

        for garbage in ["not-a-token", "a.b", "a.b.c.d", ""] {
            let result = decode_access_token(garbage, &config);
            assert_eq!(result.unwrap_err(), TokenError::Malformed, "input: {garbage:?}");
        }
    }

    #[test]
    fn test_decode_access_token_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;

        // Expired an hour ago, well past the default 60s leeway.
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "tendai".to_string(),
            role: Role::Member,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = decode_access_token(&token, &config);
        assert_eq!(result.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_decode_access_token_unexpected_algorithm() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "tendai".to_string(),
            role: Role::Member,
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = decode_access_token(&token, &config);
        assert_eq!(result.unwrap_err(), TokenError::UnsupportedAlgorithm);
    }

    #[test]
    fn test_decode_access_token_missing_identity_claims() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;

        #[derive(Serialize)]
        struct BareClaims {
            sub: String,
            exp: usize,
            iat: usize,
        }

        let token = encode(
            &Header::default(),
            &BareClaims {
                sub: Uuid::new_v4().to_string(),
                exp: now + 3600,
                iat: now,
            },
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = decode_access_token(&token, &config);
        assert_eq!(result.unwrap_err(), TokenError::ClaimsIncomplete);
    }

    #[test]
    fn test_decode_access_token_blank_subject() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;

        let claims = Claims {
            sub: "  ".to_string(),
            username: "tendai".to_string(),
            role: Role::Member,
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = decode_access_token(&token, &config);
        assert_eq!(result.unwrap_err(), TokenError::ClaimsIncomplete);
    }

    #[test]
    fn test_decode_access_token_unknown_role_rejected() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;

        #[derive(Serialize)]
        struct OddClaims {
            sub: String,
            username: String,
            role: String,
            exp: usize,
            iat: usize,
        }

        let token = encode(
            &Header::default(),
            &OddClaims {
                sub: Uuid::new_v4().to_string(),
                username: "tendai".to_string(),
                role: "OVERLORD".to_string(),
                exp: now + 3600,
                iat: now,
            },
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = decode_access_token(&token, &config);
        assert_eq!(result.unwrap_err(), TokenError::Malformed);
    }
}
