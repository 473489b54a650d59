//! Read-only reports over the association

use serde::Serialize;
use tracing::warn;

use super::Association;
use crate::error::{PolicyError, Result};
use crate::members::{Member, Product};
use crate::skills::Skill;
use crate::tasks::Task;
use crate::types::{MemberId, MemberRole, SkillId, TaskId};

/// Member row for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub id: MemberId,
    pub name: String,
    pub cpf: String,
    pub role: MemberRole,
    pub balance: i64,
}

/// Task row for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub id: TaskId,
    pub description: String,
    pub credits: i64,
    pub estimated_effort: u32,
    pub completed_by: Option<MemberId>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            description: task.description().to_string(),
            credits: task.credits(),
            estimated_effort: task.estimated_effort(),
            completed_by: task.completed_by(),
        }
    }
}

/// Headcounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssociationSummary {
    pub members: usize,
    pub providers: usize,
    pub producers: usize,
    pub skills: usize,
    pub tasks: usize,
    pub completed_tasks: usize,
}

impl Association {
    pub fn summarize_member(&self, member: &Member) -> MemberSummary {
        MemberSummary {
            id: member.id(),
            name: member.name().to_string(),
            cpf: member.cpf().to_string(),
            role: member.role(),
            balance: member.credit_balance(&self.tasks),
        }
    }

    /// Members who cannot author a task right now
    pub fn members_below_credit_threshold(&self) -> Vec<&Member> {
        self.members
            .values()
            .filter(|m| m.credit_balance(&self.tasks) < self.policy.credit_floor)
            .collect()
    }

    /// Tasks nobody has completed yet
    pub fn unassigned_tasks(&self) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.completed_by().is_none())
            .collect()
    }

    pub fn top_10_members_by_balance(&self) -> Vec<&Member> {
        self.top_members_by_balance(self.policy.top_members)
    }

    /// Highest balances first; equal balances keep registration order
    pub fn top_members_by_balance(&self, n: usize) -> Vec<&Member> {
        let mut ranked: Vec<(&Member, i64)> = self
            .members
            .values()
            .map(|m| (m, m.credit_balance(&self.tasks)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(m, _)| m).collect()
    }

    /// Mean days late over completed tasks, truncated toward zero
    pub fn average_schedule_variance(&self) -> i64 {
        let variances: Vec<i64> = self
            .tasks
            .values()
            .filter_map(|t| t.schedule_variance().ok())
            .collect();

        if variances.is_empty() {
            return 0;
        }
        variances.iter().sum::<i64>() / variances.len() as i64
    }

    /// Every product of every producer
    pub fn all_products(&self) -> Vec<&Product> {
        self.members
            .values()
            .filter_map(Member::as_producer)
            .flat_map(|p| p.products())
            .collect()
    }

    /// Open tasks the provider with `cpf` qualifies for
    pub fn tasks_attendable_by(&self, cpf: &str) -> Result<Vec<&Task>> {
        let id = self.member_id(cpf)?;
        let member = self.find_member_by_id(id).filter(|m| m.as_provider().is_some());
        let Some(member) = member else {
            return Err(PolicyError::NotAProvider(cpf.to_string()).into());
        };

        Ok(self
            .tasks
            .values()
            .filter(|t| t.completed_by().is_none() && member.has_required_skills(t))
            .collect())
    }

    /// Completed tasks worth the most credits
    pub fn top_tasks_by_credits(&self, n: usize) -> Vec<&Task> {
        let mut completed: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.is_finalized())
            .collect();
        completed.sort_by(|a, b| b.credits().cmp(&a.credits()));
        completed.truncate(n);
        completed
    }

    /// Tasks whose every required skill is among `skill_ids`.
    ///
    /// Unknown ids are ignored.
    pub fn tasks_solvable_with(&self, skill_ids: &[SkillId]) -> Vec<&Task> {
        let offered: Vec<&Skill> = skill_ids
            .iter()
            .filter_map(|id| {
                let skill = self.skills.get(id);
                if skill.is_none() {
                    warn!("Skill {} not found; ignoring it", id);
                }
                skill
            })
            .collect();
        if offered.is_empty() {
            return Vec::new();
        }

        self.tasks
            .values()
            .filter(|t| t.required_skills().all(|req| offered.contains(&req)))
            .collect()
    }

    pub fn summary(&self) -> AssociationSummary {
        let providers = self
            .members
            .values()
            .filter(|m| m.role() == MemberRole::Provider)
            .count();

        AssociationSummary {
            members: self.members.len(),
            providers,
            producers: self.members.len() - providers,
            skills: self.skills.len(),
            tasks: self.tasks.len(),
            completed_tasks: self.tasks.values().filter(|t| t.is_finalized()).count(),
        }
    }
}
