//! OAuth 2.0 authorization-code sign-in.
//!
//! `login` hands out a random `state` and the provider URL to redirect to;
//! `complete` checks that state, trades the code for an access token and
//! reads the user's profile from the userinfo endpoint. Defaults target
//! Google, but any provider with the same three endpoints works.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::SessionUser;

/// Pending `state` values expire after ten minutes.
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);

const SCOPES: &str = "openid email profile";

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("invalid OAuth endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("sign-in request expired or was already used")]
    UnknownState,

    #[error("sign-in was cancelled: {0}")]
    Denied(String),

    #[error("sign-in provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("could not reach sign-in provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("sign-in provider did not return an email address")]
    MissingEmail,
}

/// Single-use `state` values awaiting a callback.
#[derive(Debug)]
pub struct PendingStates {
    ttl: Duration,
    issued: Mutex<HashMap<String, Instant>>,
}

impl PendingStates {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            issued: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self) -> String {
        let state = uuid::Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut issued = self.issued.lock();
        issued.retain(|_, at| now.saturating_duration_since(*at) < self.ttl);
        issued.insert(state.clone(), now);
        state
    }

    /// Remove `state`, returning whether it was pending and still fresh.
    pub fn consume(&self, state: &str) -> bool {
        match self.issued.lock().remove(state) {
            Some(at) => at.elapsed() < self.ttl,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.issued.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct OAuthClient {
    settings: OAuthSettings,
    authorize: Url,
    http: reqwest::Client,
    states: PendingStates,
}

impl OAuthClient {
    pub fn new(settings: OAuthSettings) -> Result<Self, OAuthError> {
        let authorize =
            Url::parse(&settings.authorize_url).map_err(|e| OAuthError::InvalidEndpoint {
                url: settings.authorize_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            settings,
            authorize,
            http: reqwest::Client::new(),
            states: PendingStates::new(STATE_TTL),
        })
    }

    /// Start a sign-in: returns the provider URL to redirect the browser to.
    pub fn login(&self) -> String {
        let state = self.states.issue();
        self.authorize_url(&state)
    }

    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.authorize.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_url)
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .append_pair("prompt", "select_account");
        url.to_string()
    }

    /// Finish a sign-in from the callback's `code` and `state`.
    pub async fn complete(&self, code: &str, state: &str) -> Result<SessionUser, OAuthError> {
        if !self.states.consume(state) {
            warn!("OAuth callback with unknown or expired state");
            return Err(OAuthError::UnknownState);
        }

        let token = self.exchange_code(code).await?;
        let info = self.fetch_userinfo(&token).await?;

        let email = info
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(OAuthError::MissingEmail)?;
        let display_name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone());

        debug!(%email, "sign-in completed");
        Ok(SessionUser {
            display_name,
            email,
            photo: info.picture,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(&self.settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.settings.redirect_url.as_str()),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = read_json(response).await?;
        Ok(token.access_token)
    }

    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, OAuthError> {
        let response = self
            .http
            .get(&self.settings.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, OAuthError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(OAuthError::Provider {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> OAuthSettings {
        OAuthSettings {
            client_id: "client-123".into(),
            client_secret: "shh".into(),
            redirect_url: "http://localhost:8080/auth/callback".into(),
            authorize_url: "https://accounts.example.com/o/oauth2/auth".into(),
            token_url: "https://accounts.example.com/token".into(),
            userinfo_url: "https://accounts.example.com/userinfo".into(),
        }
    }

    #[test]
    fn test_authorize_url_carries_client_and_state() {
        let client = OAuthClient::new(settings()).unwrap();
        let url = Url::parse(&client.login()).unwrap();
        let query: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.example.com"));
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["client_id"], "client-123");
        assert_eq!(query["redirect_uri"], "http://localhost:8080/auth/callback");
        assert_eq!(query["scope"], "openid email profile");
        assert!(client.states.consume(&query["state"]));
    }

    #[test]
    fn test_invalid_authorize_url() {
        let mut bad = settings();
        bad.authorize_url = "not a url".into();
        assert!(matches!(
            OAuthClient::new(bad),
            Err(OAuthError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_states_are_single_use() {
        let states = PendingStates::new(STATE_TTL);
        let state = states.issue();
        assert!(states.consume(&state));
        assert!(!states.consume(&state));
        assert!(!states.consume("never-issued"));
        assert!(states.is_empty());
    }

    #[test]
    fn test_expired_states_are_rejected() {
        let states = PendingStates::new(Duration::ZERO);
        let state = states.issue();
        assert!(!states.consume(&state));
    }

    #[tokio::test]
    async fn test_complete_rejects_unknown_state_before_any_request() {
        let client = OAuthClient::new(settings()).unwrap();
        assert!(matches!(
            client.complete("code", "forged").await,
            Err(OAuthError::UnknownState)
        ));
    }
}
