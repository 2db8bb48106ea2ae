//! Session cookies for signed-in users.
//!
//! After the OAuth callback the user's profile is stored client-side in an
//! HS256 JWT inside an HttpOnly cookie. Nothing is kept server-side, so a
//! session is valid exactly as long as its signature and expiry check out.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const SESSION_COOKIE: &str = "trailmap_session";

/// Sessions last a week.
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Profile of a signed-in user as shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl SessionUser {
    /// Key used for per-user rate limiting.
    pub fn identity(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Email address
    sub: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    /// Expiry (Unix timestamp)
    exp: u64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign in to generate a roadmap")]
    MissingSession,

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("session expired")]
    Expired,

    #[error("too many requests, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn issue(&self, user: &SessionUser) -> Result<String, AuthError> {
        self.issue_until(user, unix_now() + SESSION_TTL_SECS)
    }

    fn issue_until(&self, user: &SessionUser, exp: u64) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: user.email.clone(),
            name: user.display_name.clone(),
            picture: user.photo.clone(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSession(e.to_string()),
            }
        })?;

        Ok(SessionUser {
            display_name: data.claims.name,
            email: data.claims.sub,
            photo: data.claims.picture,
        })
    }
}

/// Build the cookie that carries a session token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie used to remove the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Request extension describing whether sign-in is in force.
#[derive(Clone)]
pub struct SessionState {
    pub keys: Option<Arc<SessionKeys>>,
}

impl SessionState {
    pub fn configured(&self) -> bool {
        self.keys.is_some()
    }
}

/// Session of the current request, if any. Missing, invalid and expired
/// cookies all read as signed out.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(keys) = parts
            .extensions
            .get::<SessionState>()
            .and_then(|state| state.keys.clone())
        else {
            return Ok(MaybeSession(None));
        };

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(MaybeSession(None));
        };

        match keys.verify(cookie.value()) {
            Ok(user) => Ok(MaybeSession(Some(user))),
            Err(err) => {
                debug!(%err, "ignoring session cookie");
                Ok(MaybeSession(None))
            }
        }
    }
}

/// Payload of `GET /auth/session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub configured: bool,
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
