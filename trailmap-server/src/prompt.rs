//! Chat prompt for roadmap generation.

use serde::Serialize;
use trailmap_core::LearnerProfile;

const SYSTEM_PROMPT: &str = "\
You are an experienced mentor who writes practical, phased learning roadmaps.

Answer in markdown with exactly this shape:

1. A short introduction paragraph.
2. Three to six phases, each starting with a heading `## Phase N: Title`.
   Inside every phase use these subsections, each on its own line:
   Duration, Objectives, Concrete Tasks/Activities, Suggested Project Ideas,
   Recommended Resources.
3. After the last phase, the sections `## Tips for Staying Consistent`,
   `## How to Measure Progress` and `## Recommended Next Step`.
4. A final section `## YT Tutorials` listing a few relevant YouTube searches
   or channels.

Only put links inside Recommended Resources. Use bullet lists, keep each
bullet to one line and do not use tables or code blocks.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// System and user messages for one profile.
pub fn build_messages(profile: &LearnerProfile) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user",
            content: user_prompt(profile),
        },
    ]
}

fn user_prompt(profile: &LearnerProfile) -> String {
    let mut lines = vec![format!("Learning goal: {}", profile.goal.trim())];

    if let Some(experience) = profile.experience() {
        lines.push(format!("Current experience: {experience}"));
    }
    if let Some(hours) = profile.weekly_hours {
        lines.push(format!("Time available: {hours} hours per week"));
    }
    if let Some(timeframe) = profile.timeframe() {
        lines.push(format!("Target timeframe: {timeframe}"));
    }
    if let Some(preferences) = profile.preferences() {
        lines.push(format!("Learning preferences: {preferences}"));
    }

    lines.push(String::new());
    lines.push("Write my roadmap.".to_string());
    lines.join("\n")
}
