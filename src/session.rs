use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    config::AppConfig,
    role::Role,
    token::Claims,
};

/// Session
///
/// The bearer token the login flow left behind for this visitor, if any.
/// Guards receive it explicitly rather than reading ambient storage, so tests
/// can hand them any fixture they like.
///
/// Presence of a token is never proof of validity. It only drives what the
/// UI offers; the backend authorizes every API call on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
}

/// Viewer
///
/// The identity a guard works with once the token has been decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub role: Role,
    pub claims: Claims,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn is_present(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Decodes the token into a viewer.
    ///
    /// A token that cannot be decoded, or that carries no recognised role,
    /// yields `None` and is treated exactly like a missing token.
    pub fn viewer(&self) -> Option<Viewer> {
        let token = self.token.as_deref().filter(|t| !t.trim().is_empty())?;
        let claims = Claims::from_token(token)?;
        let role = claims.role()?;
        Some(Viewer { role, claims })
    }

    /// Reads the token from the named cookie, falling back to an
    /// `Authorization: Bearer` header.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        // The jar percent-decodes values, so an encoded token reads back intact.
        let jar = CookieJar::from_headers(headers);
        let from_cookie = jar
            .get(cookie_name)
            .map(|cookie| cookie.value_trimmed().trim().to_string())
            .filter(|value| !value.is_empty());

        let token = from_cookie.or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
        });

        Self { token }
    }
}

/// expired_session_cookie
///
/// Removal cookie for the stored token: empty value, `Max-Age=0` and an
/// expiry in the past, scoped to the same path the login flow writes.
pub fn expired_session_cookie(cookie_name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build((cookie_name.to_string(), ""))
        .path("/")
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

/// Session extractor
///
/// Never rejects: an absent or unreadable token is a valid state
/// ("unauthenticated") that the guards decide how to handle.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(Session::from_headers(&parts.headers, &config.token_cookie))
    }
}
