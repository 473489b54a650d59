//! Providers: members who hold skills and fulfil tasks

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use super::Creditable;
use crate::error::{ConflictError, PolicyError, Result};
use crate::skills::Skill;
use crate::tasks::{Task, TaskBook};
use crate::types::{MemberId, TaskId};

/// Provider-specific state
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderProfile {
    /// Keyed by skill name
    skills: BTreeMap<String, Skill>,
    completed_tasks: BTreeSet<TaskId>,
}

impl ProviderProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a skill, replacing any skill with the same name
    pub fn assign_skill(&mut self, skill: Skill) {
        self.skills.insert(skill.name().to_string(), skill);
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    /// Every skill the task requires is held, by name
    pub fn has_required_skills(&self, task: &Task) -> bool {
        task.required_skills().all(|s| self.has_skill(s.name()))
    }

    /// Accept and complete a task.
    ///
    /// All checks run before anything changes; on success the task is
    /// completed and recorded here.
    pub fn accept(&mut self, me: MemberId, task: &mut Task, on: NaiveDate) -> Result<()> {
        let missing = task.missing_skills(|name| self.has_skill(name));
        if !missing.is_empty() {
            return Err(PolicyError::MissingSkills {
                task: task.id(),
                provider: me,
                missing,
            }
            .into());
        }
        if self.completed_tasks.contains(&task.id()) {
            return Err(ConflictError::AlreadyAccepted {
                task: task.id(),
                provider: me,
            }
            .into());
        }

        task.complete(me, on)?;
        self.completed_tasks.insert(task.id());
        info!("Member {} completed task {} for {} credits", me, task.id(), task.credits());
        Ok(())
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn completed_tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.completed_tasks.iter().copied()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_tasks.len()
    }
}

impl Creditable for ProviderProfile {
    fn earned(&self, tasks: &TaskBook) -> i64 {
        self.completed_tasks
            .iter()
            .filter_map(|id| tasks.get(id))
            .map(Task::credits)
            .sum()
    }
}
