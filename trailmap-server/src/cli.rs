use clap::Args;

/// Flags for `trailmap serve`. Every value falls back to an environment
/// variable, and anything set here overrides `trailmap.yml`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Listen address for HTTP/WS endpoints
    #[arg(long, env = "TRAILMAP_LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Generation options
    // ─────────────────────────────────────────────────────────────────────────

    /// API key for the completion provider. Without it generation requests
    /// fail with "generation is not configured".
    #[arg(long, env = "TRAILMAP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Root of an OpenAI-compatible API (overrides generation.base_url)
    #[arg(long, env = "TRAILMAP_BASE_URL")]
    pub base_url: Option<String>,

    /// Model name (overrides generation.model)
    #[arg(long, env = "TRAILMAP_MODEL")]
    pub model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Sign-in options
    // ─────────────────────────────────────────────────────────────────────────

    /// Secret for signing session cookies (HS256). Sign-in is only enabled
    /// when this and the OAuth client settings are all present.
    #[arg(long, env = "TRAILMAP_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// OAuth client id
    #[arg(long, env = "TRAILMAP_OAUTH_CLIENT_ID")]
    pub oauth_client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "TRAILMAP_OAUTH_CLIENT_SECRET", hide_env_values = true)]
    pub oauth_client_secret: Option<String>,

    /// Callback URL registered with the provider, e.g.
    /// https://trailmap.example/auth/callback
    #[arg(long, env = "TRAILMAP_OAUTH_REDIRECT_URL")]
    pub oauth_redirect_url: Option<String>,

    /// Authorization endpoint
    #[arg(
        long,
        env = "TRAILMAP_OAUTH_AUTHORIZE_URL",
        default_value = "https://accounts.google.com/o/oauth2/v2/auth"
    )]
    pub oauth_authorize_url: String,

    /// Token endpoint
    #[arg(
        long,
        env = "TRAILMAP_OAUTH_TOKEN_URL",
        default_value = "https://oauth2.googleapis.com/token"
    )]
    pub oauth_token_url: String,

    /// Userinfo endpoint
    #[arg(
        long,
        env = "TRAILMAP_OAUTH_USERINFO_URL",
        default_value = "https://openidconnect.googleapis.com/v1/userinfo"
    )]
    pub oauth_userinfo_url: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Rate limiting options
    // ─────────────────────────────────────────────────────────────────────────

    /// Turn off rate limiting of generation requests
    #[arg(long, env = "TRAILMAP_RATE_LIMIT_DISABLED")]
    pub no_rate_limit: bool,

    /// Maximum burst of generation requests per identity
    #[arg(long, env = "TRAILMAP_RATE_BURST", default_value_t = 5)]
    pub rate_burst: u32,

    /// Sustained generation requests per second per identity
    #[arg(long, env = "TRAILMAP_RATE_PER_SEC", default_value_t = 0.05)]
    pub rate_per_sec: f64,
}
