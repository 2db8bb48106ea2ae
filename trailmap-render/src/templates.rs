//! Askama template definitions.

use askama::Template;
use chrono::{DateTime, Datelike, Utc};
use trailmap_core::config::SiteConfig;
use trailmap_core::{build_html, LearnerProfile};

/// Interactive page: profile form, sign-in controls and the roadmap pane
/// that the reveal stream paints into.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    // Site metadata
    pub site_title: String,
    pub tagline: String,
    pub year: i32,

    /// Show the sign-in controls
    pub auth_configured: bool,
}

impl IndexTemplate {
    pub fn new(site: &SiteConfig, auth_configured: bool) -> Self {
        Self {
            site_title: site.title.clone(),
            tagline: site.tagline.clone(),
            year: Utc::now().year(),
            auth_configured,
        }
    }
}

/// Self-contained page holding one rendered roadmap.
#[derive(Template)]
#[template(path = "roadmap.html")]
pub struct RoadmapPageTemplate {
    pub title: String,
    pub site_title: String,
    pub goal: Option<String>,
    pub generated_at: Option<String>,
    pub year: i32,

    /// Output of the collapsible builder, inserted unescaped
    pub content: String,
}

impl RoadmapPageTemplate {
    pub fn new(site: &SiteConfig, markdown: &str) -> Self {
        Self {
            title: format!("{} roadmap", site.title),
            site_title: site.title.clone(),
            goal: None,
            generated_at: None,
            year: Utc::now().year(),
            content: build_html(markdown),
        }
    }

    pub fn with_profile(mut self, profile: &LearnerProfile) -> Self {
        self.title = format!("Roadmap: {}", profile.goal.trim());
        self.goal = Some(profile.goal.trim().to_string());
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at.format("%Y-%m-%d %H:%M UTC").to_string());
        self
    }
}

/// 404 error page template
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub site_title: String,
    pub year: i32,
}

impl NotFoundTemplate {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            site_title: site.title.clone(),
            year: Utc::now().year(),
        }
    }
}
