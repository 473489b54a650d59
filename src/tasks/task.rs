//! Task lifecycle
//!
//! A task is created open, may be tagged with skills while open, and is
//! completed exactly once. Completion freezes the skill set and the tier.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::error::{ConflictError, Result, ValidationError};
use crate::skills::{DifficultyTier, Skill};
use crate::types::{MemberId, TaskId};

/// Completion record of a finished task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub by: MemberId,
    pub on: NaiveDate,
}

/// A unit of requested work
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: TaskId,
    description: String,
    author: MemberId,
    /// Keyed by skill name
    required_skills: BTreeMap<String, Skill>,
    /// Half-hour units
    estimated_effort: u32,
    deadline_days: u32,
    created_on: NaiveDate,
    completion: Option<Completion>,
    tier: DifficultyTier,
}

impl Task {
    pub fn new(
        id: TaskId,
        author: MemberId,
        description: &str,
        estimated_effort: i64,
        deadline_days: i64,
        created_on: NaiveDate,
    ) -> Result<Self> {
        if description.trim().is_empty() {
            return Err(ValidationError::Empty("task description").into());
        }
        let estimated_effort = bounded("estimated effort", estimated_effort)?;
        let deadline_days = bounded("deadline", deadline_days)?;

        Ok(Self {
            id,
            description: description.to_string(),
            author,
            required_skills: BTreeMap::new(),
            estimated_effort,
            deadline_days,
            created_on,
            completion: None,
            tier: DifficultyTier::Simple,
        })
    }

    /// Tag a required skill and recompute the tier.
    ///
    /// A skill whose name is already tagged is ignored.
    pub fn add_skill(&mut self, skill: Skill) -> Result<DifficultyTier> {
        if self.is_finalized() {
            return Err(ConflictError::TaskFinalized(self.id).into());
        }

        if !self.required_skills.contains_key(skill.name()) {
            self.required_skills.insert(skill.name().to_string(), skill);
            self.tier = DifficultyTier::classify(self.required_skills.values());
            debug!("Task {} tagged, tier now {}", self.id, self.tier);
        }

        Ok(self.tier)
    }

    /// Mark the task done; irreversible
    pub(crate) fn complete(&mut self, by: MemberId, on: NaiveDate) -> Result<()> {
        if self.is_finalized() {
            return Err(ConflictError::AlreadyCompleted(self.id).into());
        }

        self.completion = Some(Completion { by, on });
        self.tier = DifficultyTier::classify(self.required_skills.values());
        Ok(())
    }

    /// Credits earned by whoever completes the task
    pub fn credits(&self) -> i64 {
        i64::from(self.estimated_effort / 6) * 2 * i64::from(self.tier.multiplier())
    }

    /// Credits charged to the author
    pub fn authoring_debit(&self) -> i64 {
        i64::from(self.estimated_effort / 2)
    }

    /// Days between creation and completion, or `today` while still open
    pub fn time_to_attend(&self, today: NaiveDate) -> i64 {
        let end = self.completion.map(|c| c.on).unwrap_or(today);
        (end - self.created_on).num_days()
    }

    /// Days late (positive) or early (negative) relative to the deadline
    pub fn schedule_variance(&self) -> Result<i64> {
        match self.completion {
            Some(completion) => {
                Ok(self.time_to_attend(completion.on) - i64::from(self.deadline_days))
            }
            None => Err(ConflictError::TaskNotCompleted(self.id).into()),
        }
    }

    /// Required skill names for which `held` returns false
    pub fn missing_skills<F>(&self, held: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.required_skills
            .keys()
            .filter(|name| !held(name))
            .cloned()
            .collect()
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn author(&self) -> MemberId {
        self.author
    }

    pub fn required_skills(&self) -> impl Iterator<Item = &Skill> {
        self.required_skills.values()
    }

    pub fn requires(&self, skill_name: &str) -> bool {
        self.required_skills.contains_key(skill_name)
    }

    pub fn estimated_effort(&self) -> u32 {
        self.estimated_effort
    }

    pub fn deadline_days(&self) -> u32 {
        self.deadline_days
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completion.map(|c| c.on)
    }

    pub fn completed_by(&self) -> Option<MemberId> {
        self.completion.map(|c| c.by)
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    pub fn is_finalized(&self) -> bool {
        self.completion.is_some()
    }
}

/// Positive and representable as `u32`
fn bounded(field: &'static str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value }.into());
    }
    u32::try_from(value).map_err(|_| {
        ValidationError::TooLarge {
            field,
            value,
            max: i64::from(u32::MAX),
        }
        .into()
    })
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Description: {}, Credits: {}, Effort: {} (30min units), Author: {}, Status: {}, Tier: {}",
            self.id,
            self.description,
            self.credits(),
            self.estimated_effort,
            self.author,
            match self.completion {
                Some(c) => format!("Completed by {}", c.by),
                None => "Open".to_string(),
            },
            self.tier,
        )
    }
}
