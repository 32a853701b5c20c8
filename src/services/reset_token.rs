//! Signed password-reset tokens.
//!
//! Tokens are compact HS256 JWTs carrying
//! `{"reset_password": <user id>, "exp": <unix seconds>, "cred": <fingerprint>}`.
//! The fingerprint is derived from the stored password hash, so a token dies
//! as soon as the password it was issued against changes.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";
const MAX_TOKEN_LEN: usize = 1024;

/// Why a token was rejected. Callers outside the identity service only
/// ever see a single invalid-or-expired outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetTokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unsupported algorithm: {0}")]
    WrongAlgorithm(String),

    #[error("signature mismatch")]
    BadSignature,

    #[error("token expired at {0}")]
    Expired(i64),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetClaims {
    pub reset_password: i32,
    pub exp: i64,
    /// Fingerprint of the password hash at issuance.
    pub cred: String,
}

fn mac_for(secret: &[u8]) -> Result<HmacSha256, ResetTokenError> {
    HmacSha256::new_from_slice(secret).map_err(|e| ResetTokenError::Malformed(e.to_string()))
}

fn encode_part<T: Serialize>(value: &T) -> Result<String, ResetTokenError> {
    let bytes = serde_json::to_vec(value).map_err(|e| ResetTokenError::Malformed(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn decode_part<T: for<'de> Deserialize<'de>>(part: &str) -> Result<T, ResetTokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .map_err(|e| ResetTokenError::Malformed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ResetTokenError::Malformed(e.to_string()))
}

/// Signs a token for `user_id` that expires `expires_in` seconds after `now`.
pub fn sign(
    user_id: i32,
    credential: &str,
    expires_in: u64,
    now: i64,
    secret: &[u8],
) -> Result<String, ResetTokenError> {
    let header = Header {
        alg: ALGORITHM.to_string(),
        typ: Some("JWT".to_string()),
    };
    let claims = ResetClaims {
        reset_password: user_id,
        exp: now.saturating_add(i64::try_from(expires_in).unwrap_or(i64::MAX)),
        cred: credential.to_string(),
    };

    let signing_input = format!("{}.{}", encode_part(&header)?, encode_part(&claims)?);

    let mut mac = mac_for(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

/// Checks structure, algorithm, signature and expiry, in that order.
/// A token stops being valid at the instant `now >= exp`.
pub fn verify(token: &str, now: i64, secret: &[u8]) -> Result<ResetClaims, ResetTokenError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(ResetTokenError::Malformed("token too long".to_string()));
    }

    let mut parts = token.split('.');
    let (Some(header_part), Some(claims_part), Some(signature_part), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ResetTokenError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let header: Header = decode_part(header_part)?;
    if header.alg != ALGORITHM {
        return Err(ResetTokenError::WrongAlgorithm(header.alg));
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature_part)
        .map_err(|e| ResetTokenError::Malformed(e.to_string()))?;

    let mut mac = mac_for(secret)?;
    mac.update(header_part.as_bytes());
    mac.update(b".");
    mac.update(claims_part.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| ResetTokenError::BadSignature)?;

    let claims: ResetClaims = decode_part(claims_part)?;
    if now >= claims.exp {
        return Err(ResetTokenError::Expired(claims.exp));
    }

    Ok(claims)
}
