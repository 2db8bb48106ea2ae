//! # trailmap-render
//!
//! Page templates for trailmap.
//!
//! This crate renders the HTML pages around a roadmap using Askama: the
//! interactive index page served by `trailmap serve` and the standalone page
//! written by `trailmap render --standalone`.

pub mod templates;

pub use templates::{IndexTemplate, NotFoundTemplate, RoadmapPageTemplate};
