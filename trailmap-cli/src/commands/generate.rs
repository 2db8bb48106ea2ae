//! Generate command: one roadmap from the command line.

use anyhow::{Context, Result};
use askama::Template;
use chrono::Utc;
use clap::Args;
use std::path::{Path, PathBuf};
use trailmap_core::{Config, LearnerProfile};
use trailmap_render::RoadmapPageTemplate;
use trailmap_server::{ChatCompletionsClient, GenerationSettings, Generator, ServeConfig};

use super::write_output;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// What you want to learn
    #[arg(long)]
    pub goal: String,

    /// Where you are starting from
    #[arg(long)]
    pub experience: Option<String>,

    /// Hours available per week (1-80)
    #[arg(long)]
    pub weekly_hours: Option<u32>,

    /// When you want to get there, e.g. "3 months"
    #[arg(long)]
    pub timeframe: Option<String>,

    /// How you like to learn
    #[arg(long)]
    pub preferences: Option<String>,

    /// Write a standalone HTML page instead of markdown
    #[arg(long)]
    pub html: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// API key for the chat completions endpoint
    #[arg(long, env = "TRAILMAP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override `generation.model`
    #[arg(long, env = "TRAILMAP_MODEL")]
    pub model: Option<String>,
}

impl GenerateArgs {
    fn profile(&self) -> LearnerProfile {
        LearnerProfile {
            goal: self.goal.clone(),
            experience: self.experience.clone(),
            weekly_hours: self.weekly_hours,
            timeframe: self.timeframe.clone(),
            preferences: self.preferences.clone(),
        }
    }

    fn settings(&self, config: &Config) -> GenerationSettings {
        let mut settings = ServeConfig::new(config).generation;
        settings.api_key = self.api_key.clone().filter(|key| !key.trim().is_empty());
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        settings
    }
}

pub async fn generate_roadmap(config_path: &Path, args: &GenerateArgs) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;

    let profile = args.profile();
    profile.validate()?;

    let client = ChatCompletionsClient::new(&args.settings(&config));
    tracing::info!(endpoint = %client.endpoint(), goal = %profile.goal.trim(), "generating roadmap");
    let markdown = client
        .generate(&profile)
        .await
        .context("Roadmap generation failed")?;

    let contents = if args.html {
        RoadmapPageTemplate::new(&config.site, &markdown)
            .with_profile(&profile)
            .with_generated_at(Utc::now())
            .render()
            .context("Failed to render roadmap page")?
    } else {
        markdown
    };

    write_output(args.output.as_deref(), &contents)
}
