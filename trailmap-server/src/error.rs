use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use trailmap_core::ProfileError;

use crate::auth::AuthError;
use crate::generate::GenerationError;
use crate::oauth::OAuthError;

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    OAuth(#[from] OAuthError),

    #[error("sign-in is not configured")]
    SignInDisabled,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::RateLimited { .. }) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidProfile(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
            ApiError::OAuth(OAuthError::UnknownState | OAuthError::Denied(_)) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::OAuth(OAuthError::InvalidEndpoint { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::OAuth(_) => StatusCode::BAD_GATEWAY,
            ApiError::SignInDisabled => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));

        match self {
            ApiError::Auth(AuthError::RateLimited { retry_after_secs }) => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ProfileError::MissingGoal).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::MissingSession).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(GenerationError::new("boom")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(OAuthError::UnknownState).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::from(AuthError::RateLimited {
            retry_after_secs: 7,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "7");
    }
}
