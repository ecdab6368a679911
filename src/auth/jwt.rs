use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long an issued token stays valid, in seconds (2 hours).
pub const TOKEN_VALIDITY_SECS: i64 = 2 * 60 * 60;

/// Claims carried inside every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    pub sub: i64,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Errors produced while issuing or verifying tokens.
///
/// These stay internal: the HTTP layer collapses every verification failure
/// into the same 401 response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("signing key is not configured")]
    MissingSigningKey,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token is malformed")]
    MalformedToken,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

/// Issues and verifies HS256 tokens bound to a user id and email.
///
/// The secret is supplied once at construction and only the derived keys are
/// kept; neither is ever printed by `Debug`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    ///
    /// # Errors
    /// Returns [`TokenError::MissingSigningKey`] when the secret is empty.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSigningKey);
        }

        // Expiry is checked against an explicit clock in `verify_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issues a token for the user, valid for two hours from now.
    pub fn issue(&self, email: &str, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(email, user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        email: &str,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat,
            exp: iat + TOKEN_VALIDITY_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a token and returns the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        self.verify_at(token, Utc::now()).map(|claims| claims.sub)
    }

    /// Verifies a token and returns its full claims.
    pub fn verify_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token against the given time.
    ///
    /// Checks run in order: shape, signature, claims, expiry. The signature is
    /// compared in constant time by the `jsonwebtoken` crypto backend.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if !has_three_segments(token) {
            return Err(TokenError::MalformedToken);
        }

        // The header selects the MAC, so a header we cannot read or that names
        // anything but HS256 fails the signature check.
        match decode_header(token) {
            Ok(header) if header.alg == Algorithm::HS256 => {}
            _ => return Err(TokenError::InvalidSignature),
        }

        // With the header settled, a base64 failure comes from the signature
        // segment: the payload is only decoded once the MAC matches.
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::MissingAlgorithm
                | ErrorKind::Base64(_) => TokenError::InvalidSignature,
                _ => TokenError::MalformedToken,
            })?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("validity_secs", &TOKEN_VALIDITY_SECS)
            .finish_non_exhaustive()
    }
}

fn has_three_segments(token: &str) -> bool {
    let mut segments = 0;
    for part in token.split('.') {
        if part.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}
