use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::User;

/// Claims carried by the hosted auth service's access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl AccessClaims {
    pub fn user(&self) -> User {
        User {
            id: self.sub,
            email: self.email.clone(),
            identities: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed access token: {0}")]
    Malformed(String),
    #[error("access token signature rejected: {0}")]
    BadSignature(String),
}

/// Read the claims of an access token.
///
/// Expiry is never enforced here: the caller needs the `exp` of an expired
/// token to decide whether to refresh. With a secret the HS256 signature is
/// verified; without one the claims are read as-is and the auth service
/// remains the authority on validity.
pub fn decode_access_token(token: &str, secret: Option<&str>) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;

    let key = match secret {
        Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
        None => {
            validation.insecure_disable_signature_validation();
            DecodingKey::from_secret(&[])
        }
    };

    decode::<AccessClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::BadSignature(e.to_string()),
            _ => TokenError::Malformed(e.to_string()),
        })
}
