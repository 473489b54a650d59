//! Difficulty tier policy
//!
//! Picks the credit multiplier of a task from the skills tagged on it.

use serde::{Deserialize, Serialize};

use super::skill::Skill;

/// Skill count at which a task becomes hard
pub const HARD_SKILL_COUNT: usize = 4;
/// Point total at which a task becomes hard
pub const HARD_POINT_TOTAL: u32 = 5;

/// Difficulty tier of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DifficultyTier {
    #[default]
    Simple,
    Hard,
}

impl DifficultyTier {
    /// Classify a skill set
    pub fn classify<'a, I>(skills: I) -> Self
    where
        I: IntoIterator<Item = &'a Skill>,
    {
        let (count, points) = skills
            .into_iter()
            .fold((0usize, 0u32), |(count, points), skill| {
                (count + 1, points + u32::from(skill.points()))
            });

        if count >= HARD_SKILL_COUNT || points >= HARD_POINT_TOTAL {
            DifficultyTier::Hard
        } else {
            DifficultyTier::Simple
        }
    }

    pub fn multiplier(&self) -> u32 {
        match self {
            DifficultyTier::Simple => 1,
            DifficultyTier::Hard => 2,
        }
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifficultyTier::Simple => write!(f, "Simple"),
            DifficultyTier::Hard => write!(f, "Hard"),
        }
    }
}
