use trailmap_core::config::SiteConfig;
use trailmap_core::{Config, Pacing};

use crate::cli::ServeArgs;
use crate::oauth::OAuthSettings;
use crate::ratelimit::RateLimitConfig;

/// Runtime configuration derived from `trailmap.yml` plus CLI/env.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub listen_addr: String,
    pub site: SiteConfig,
    pub generation: GenerationSettings,
    pub pacing: Pacing,
    /// Sign-in settings; `None` leaves generation open to everyone
    pub sign_in: Option<SignInSettings>,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignInSettings {
    pub session_secret: String,
    pub oauth: OAuthSettings,
}

impl ServeConfig {
    /// Configuration from the YAML file alone: no API key, no sign-in.
    pub fn new(config: &Config) -> Self {
        let generation = &config.generation;
        Self {
            listen_addr: config.server.listen_addr.clone(),
            site: config.site.clone(),
            generation: GenerationSettings {
                base_url: generation.base_url.clone(),
                model: generation.model.clone(),
                temperature: generation.temperature,
                max_tokens: generation.max_tokens,
                api_key: None,
            },
            pacing: Pacing::from(&config.reveal),
            sign_in: None,
            rate_limit: RateLimitConfig::default(),
        }
    }

    pub fn from_args(args: &ServeArgs, config: &Config) -> Self {
        let mut cfg = Self::new(config);

        if let Some(addr) = &args.listen_addr {
            cfg.listen_addr = addr.clone();
        }
        if let Some(base_url) = &args.base_url {
            cfg.generation.base_url = base_url.clone();
        }
        if let Some(model) = &args.model {
            cfg.generation.model = model.clone();
        }
        cfg.generation.api_key = non_empty(&args.api_key);

        cfg.sign_in = sign_in_from_args(args);

        cfg.rate_limit = RateLimitConfig {
            burst: args.rate_burst,
            refill_rate: args.rate_per_sec,
            enabled: !args.no_rate_limit,
        };

        cfg
    }

    pub fn sign_in_configured(&self) -> bool {
        self.sign_in.is_some()
    }
}

fn sign_in_from_args(args: &ServeArgs) -> Option<SignInSettings> {
    let secret = non_empty(&args.session_secret);
    let client_id = non_empty(&args.oauth_client_id);
    let client_secret = non_empty(&args.oauth_client_secret);
    let redirect_url = non_empty(&args.oauth_redirect_url);

    match (secret, client_id, client_secret, redirect_url) {
        (Some(session_secret), Some(client_id), Some(client_secret), Some(redirect_url)) => {
            Some(SignInSettings {
                session_secret,
                oauth: OAuthSettings {
                    client_id,
                    client_secret,
                    redirect_url,
                    authorize_url: args.oauth_authorize_url.clone(),
                    token_url: args.oauth_token_url.clone(),
                    userinfo_url: args.oauth_userinfo_url.clone(),
                },
            })
        }
        (None, None, None, None) => None,
        _ => {
            tracing::warn!(
                "sign-in is partially configured; set the session secret, OAuth client id, \
                 client secret and redirect URL together. Generation stays open."
            );
            None
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeArgs,
    }

    fn args(extra: &[&str]) -> ServeArgs {
        let mut argv = vec!["trailmap"];
        argv.extend_from_slice(extra);
        TestCli::parse_from(argv).serve
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = Config::default();
        config.server.listen_addr = "0.0.0.0:9000".to_string();

        let cfg = ServeConfig::from_args(
            &args(&["--listen-addr", "127.0.0.1:3000", "--model", "local-model"]),
            &config,
        );
        assert_eq!(cfg.listen_addr, "127.0.0.1:3000");
        assert_eq!(cfg.generation.model, "local-model");
        assert_eq!(cfg.generation.base_url, config.generation.base_url);
    }

    #[test]
    fn test_sign_in_requires_every_setting() {
        let config = Config::default();

        let partial = ServeConfig::from_args(
            &args(&["--session-secret", "s", "--oauth-client-id", "id"]),
            &config,
        );
        assert!(!partial.sign_in_configured());

        let full = ServeConfig::from_args(
            &args(&[
                "--session-secret",
                "s",
                "--oauth-client-id",
                "id",
                "--oauth-client-secret",
                "secret",
                "--oauth-redirect-url",
                "http://localhost:8080/auth/callback",
            ]),
            &config,
        );
        let sign_in = full.sign_in.expect("sign-in configured");
        assert_eq!(sign_in.oauth.client_id, "id");
        assert!(sign_in.oauth.authorize_url.starts_with("https://accounts.google.com/"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let cfg = ServeConfig::from_args(&args(&["--api-key", "  "]), &Config::default());
        assert_eq!(cfg.generation.api_key, None);
    }

    #[test]
    fn test_rate_limit_flags() {
        let cfg = ServeConfig::from_args(
            &args(&["--no-rate-limit", "--rate-burst", "2"]),
            &Config::default(),
        );
        assert!(!cfg.rate_limit.enabled);
        assert_eq!(cfg.rate_limit.burst, 2);
    }
}
