use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::role::Role;

/// Base64url engine for token payloads. Issuers differ on whether the
/// trailing `=` padding is kept, so both forms are accepted.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reasons a bearer token payload could not be read.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("expected 3 dot-delimited segments, found {0}")]
    SegmentCount(usize),

    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// try_decode_payload
///
/// Decodes the middle segment of a `header.payload.signature` token into JSON.
/// The signature is **not** verified: the result is only fit for UI gating,
/// and the backend stays the authority on whether the token is valid.
pub fn try_decode_payload(token: &str) -> Result<Value, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let bytes = PAYLOAD_ENGINE.decode(segments[1])?;
    // Payload bytes are UTF-8, so multi-byte characters survive intact.
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}

/// decode_payload
///
/// Infallible wrapper around [`try_decode_payload`]: any failure collapses to `None`.
pub fn decode_payload(token: &str) -> Option<Value> {
    match try_decode_payload(token) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding undecodable bearer token");
            None
        }
    }
}

/// The `roles` claim is a single string for SkillBridge tokens, but some
/// issuers emit a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RolesClaim {
    One(String),
    Many(Vec<String>),
}

/// Claims
///
/// Typed view over the decoded payload. Unknown claims are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject; issuers use either an email string or a numeric id.
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub roles: Option<RolesClaim>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Claims {
    /// Decodes and types the token payload. Returns `None` on any failure,
    /// including a payload that is valid JSON but not an object.
    pub fn from_token(token: &str) -> Option<Claims> {
        let payload = decode_payload(token)?;
        serde_json::from_value(payload).ok()
    }

    /// The first recognised role in the `roles` claim.
    pub fn role(&self) -> Option<Role> {
        match self.roles.as_ref()? {
            RolesClaim::One(role) => Role::from_claim(role),
            RolesClaim::Many(roles) => roles.iter().find_map(|r| Role::from_claim(r)),
        }
    }
}
