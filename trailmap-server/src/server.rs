use std::path::Path as FsPath;
use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use trailmap_core::{build_html, LearnerProfile};
use trailmap_render::{IndexTemplate, NotFoundTemplate};

use crate::{
    auth::{
        removal_cookie, session_cookie, AuthError, MaybeSession, SessionKeys, SessionState,
        SessionStatus, SessionUser,
    },
    config::ServeConfig,
    error::ApiError,
    generate::Generator,
    oauth::{OAuthClient, OAuthError},
    ratelimit::RateLimiter,
    ws::handle_ws,
};

/// Browser script and stylesheet
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const ANONYMOUS: &str = "anonymous";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServeConfig>,
    pub generator: Arc<dyn Generator>,
    pub sessions: SessionState,
    pub oauth: Option<Arc<OAuthClient>>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: ServeConfig, generator: Arc<dyn Generator>) -> Result<Self, OAuthError> {
        let (sessions, oauth) = match &config.sign_in {
            Some(sign_in) => (
                SessionState {
                    keys: Some(Arc::new(SessionKeys::new(&sign_in.session_secret))),
                },
                Some(Arc::new(OAuthClient::new(sign_in.oauth.clone())?)),
            ),
            None => (SessionState { keys: None }, None),
        };

        Ok(Self {
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            config: Arc::new(config),
            generator,
            sessions,
            oauth,
        })
    }

    pub fn sign_in_configured(&self) -> bool {
        self.sessions.configured()
    }

    /// Checks run before every generation: sign-in gate, profile validation
    /// and the per-identity rate limit, in that order.
    pub fn admit(
        &self,
        user: Option<&SessionUser>,
        profile: &LearnerProfile,
    ) -> Result<(), ApiError> {
        if self.sign_in_configured() && user.is_none() {
            return Err(AuthError::MissingSession.into());
        }
        profile.validate()?;

        let identity = user.map(SessionUser::identity).unwrap_or(ANONYMOUS);
        self.rate_limiter.check(identity).map_err(|wait| AuthError::RateLimited {
            retry_after_secs: wait.as_secs().max(1),
        })?;
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Pages and assets
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/static/{*path}", get(static_asset))
        // Sign-in
        .route("/auth/session", get(session_status))
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/auth/logout", post(logout))
        // Roadmaps
        .route("/api/render", post(render_markdown))
        .route("/api/roadmap", post(generate_roadmap))
        .route("/ws/roadmap", get(ws_roadmap))
        .fallback(not_found)
        .layer(Extension(state.sessions.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let page = IndexTemplate::new(&state.config.site, state.sign_in_configured());
    page.render()
        .map(Html)
        .map_err(|e| ApiError::Internal(format!("failed to render index: {e}")))
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn static_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match STATIC_ASSETS.get_file(&path) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type_for_path(&path))],
            file.contents(),
        )
            .into_response(),
        None => not_found(State(state)).await,
    }
}

async fn not_found(State(state): State<AppState>) -> Response {
    match NotFoundTemplate::new(&state.config.site).render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

fn content_type_for_path(path: &str) -> &'static str {
    match FsPath::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sign-in
// ─────────────────────────────────────────────────────────────────────────────

async fn session_status(
    State(state): State<AppState>,
    MaybeSession(user): MaybeSession,
) -> Json<SessionStatus> {
    Json(SessionStatus {
        configured: state.sign_in_configured(),
        authenticated: user.is_some(),
        user,
    })
}

async fn login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let oauth = state.oauth.as_ref().ok_or(ApiError::SignInDisabled)?;
    Ok(Redirect::to(&oauth.login()))
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let (Some(oauth), Some(keys)) = (state.oauth.as_ref(), state.sessions.keys.as_ref()) else {
        return Err(ApiError::SignInDisabled);
    };

    if let Some(error) = params.error {
        return Err(OAuthError::Denied(error).into());
    }
    let (Some(code), Some(oauth_state)) = (params.code, params.state) else {
        return Err(OAuthError::UnknownState.into());
    };

    let user = oauth.complete(&code, &oauth_state).await.map_err(|err| {
        warn!(%err, "sign-in failed");
        err
    })?;
    let token = keys.issue(&user)?;
    info!(email = %user.email, "user signed in");

    Ok((jar.add(session_cookie(token)), Redirect::to("/")))
}

async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(removal_cookie()), StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Roadmaps
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RenderRequest {
    markdown: String,
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    html: String,
}

async fn render_markdown(Json(request): Json<RenderRequest>) -> Json<RenderResponse> {
    Json(RenderResponse {
        html: build_html(&request.markdown),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoadmapResponse {
    pub markdown: String,
    pub html: String,
    pub generated_at: DateTime<Utc>,
}

async fn generate_roadmap(
    State(state): State<AppState>,
    MaybeSession(user): MaybeSession,
    Json(profile): Json<LearnerProfile>,
) -> Result<Json<RoadmapResponse>, ApiError> {
    state.admit(user.as_ref(), &profile)?;

    let markdown = state.generator.generate(&profile).await.map_err(|err| {
        warn!(status = ?err.status, message = %err.message, "generation failed");
        err
    })?;

    Ok(Json(RoadmapResponse {
        html: build_html(&markdown),
        markdown,
        generated_at: Utc::now(),
    }))
}

async fn ws_roadmap(
    State(state): State<AppState>,
    MaybeSession(user): MaybeSession,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        if let Err(err) = handle_ws(socket, state, user).await {
            warn!(?err, "websocket session ended with error");
        }
    })
}
