//! # trailmap-core
//!
//! Core library for trailmap.
//!
//! This crate turns the free-form markdown a language model returns for a
//! learning roadmap into a navigable, phase-by-phase collapsible HTML
//! document. Every text function here is total: model output is untrusted
//! and can never be rejected, only degraded gracefully.

pub mod builder;
pub mod config;
pub mod markdown;
pub mod models;
pub mod profile;
pub mod reveal;

pub use builder::{build_html, RoadmapBuilder};
pub use config::{Config, ConfigError};
pub use markdown::classify::classify_subsection;
pub use markdown::inline::render_inline;
pub use markdown::links::{strip_links, strip_links_except_resources};
pub use markdown::segment::{segment, split_subsections};
pub use models::{Section, SectionKind, SegmentedDocument, Subsection, SubsectionSplit, SubsectionTitle};
pub use profile::{LearnerProfile, ProfileError};
pub use reveal::{JobId, JobTracker, Pacing, Revealer, Surface};
