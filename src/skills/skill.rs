//! Skill definition

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::error::{Result, ValidationError};
use crate::types::SkillId;

/// Lowest accepted difficulty score
pub const MIN_SKILL_POINTS: u8 = 1;
/// Highest accepted difficulty score
pub const MAX_SKILL_POINTS: u8 = 3;

/// A named capability with a difficulty score.
///
/// Skills are immutable once created. Two skills are equal when they carry
/// the same id, whatever their names say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    id: SkillId,
    name: String,
    points: u8,
}

impl Skill {
    /// Create a skill; the name is trimmed and lowercased
    pub fn new(id: SkillId, name: &str, points: i64) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("skill name").into());
        }
        if points < i64::from(MIN_SKILL_POINTS) || points > i64::from(MAX_SKILL_POINTS) {
            return Err(ValidationError::SkillPoints(points).into());
        }

        Ok(Self {
            id,
            name: name.to_lowercase(),
            points: points as u8,
        })
    }

    pub fn id(&self) -> SkillId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> u8 {
        self.points
    }
}

impl PartialEq for Skill {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Skill {}

impl Hash for Skill {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID: {}, Skill: {}, Points: {}", self.id, self.name, self.points)
    }
}
