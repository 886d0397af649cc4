//! Failure kinds for token creation and decoding.

use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Why an access token was rejected (or could not be created).
///
/// Every decode variant maps to the same client-facing 401; the variants
/// exist so callers can log the failure modes apart without leaking them
/// to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token algorithm is not supported")]
    UnsupportedAlgorithm,
    #[error("token claims are incomplete")]
    ClaimsIncomplete,
    #[error("failed to create token: {0}")]
    Creation(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedAlgorithm
            }
            ErrorKind::MissingRequiredClaim(_) => TokenError::ClaimsIncomplete,
            // serde reports absent claims as "missing field `name`"
            ErrorKind::Json(e) if e.to_string().contains("missing field") => {
                TokenError::ClaimsIncomplete
            }
            _ => TokenError::Malformed,
        }
    }
}
