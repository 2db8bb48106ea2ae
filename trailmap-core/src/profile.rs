//! The learner profile a roadmap is generated from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_GOAL_CHARS: usize = 500;
pub const MAX_WEEKLY_HOURS: u32 = 80;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("a learning goal is required")]
    MissingGoal,

    #[error("the learning goal must be at most 500 characters")]
    GoalTooLong,

    #[error("weekly hours must be between 1 and 80")]
    WeeklyHoursOutOfRange,
}

/// What the user told us about themselves on the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub goal: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hours: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

impl LearnerProfile {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let goal = self.goal.trim();
        if goal.is_empty() {
            return Err(ProfileError::MissingGoal);
        }
        if goal.chars().count() > MAX_GOAL_CHARS {
            return Err(ProfileError::GoalTooLong);
        }
        if let Some(hours) = self.weekly_hours {
            if hours == 0 || hours > MAX_WEEKLY_HOURS {
                return Err(ProfileError::WeeklyHoursOutOfRange);
            }
        }
        Ok(())
    }

    /// Optional text fields with blank values treated as absent.
    pub fn experience(&self) -> Option<&str> {
        non_blank(&self.experience)
    }

    pub fn timeframe(&self) -> Option<&str> {
        non_blank(&self.timeframe)
    }

    pub fn preferences(&self) -> Option<&str> {
        non_blank(&self.preferences)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
