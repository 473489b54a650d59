//! Low-credit remediation
//!
//! Best-effort, randomized: a provider below the credit floor is offered a
//! few randomly drawn unassigned tasks and accepts the ones it qualifies for.
//! Producers only get told to produce more.

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::Association;
use crate::error::{NotFoundError, Result};
use crate::types::{MemberId, MemberRole, TaskId};

/// What a remediation run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemediationOutcome {
    /// Balance was at or above the floor
    NotNeeded { balance: i64 },
    /// Provider was offered tasks
    Attempted(RemediationReport),
    /// Producer must raise its production; nothing was changed
    NeedsMoreProduction { balance: i64 },
}

/// Draws made for a provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemediationReport {
    pub accepted: Vec<TaskId>,
    /// Drawn but not qualified
    pub skipped: Vec<TaskId>,
    /// Ran out of unassigned tasks before using every attempt
    pub pool_exhausted: bool,
    pub balance_before: i64,
    pub balance_after: i64,
}

impl Association {
    /// Remediate the member with `cpf` using the thread-local RNG
    pub fn remediate(&mut self, cpf: &str) -> Result<RemediationOutcome> {
        let id = self.member_id(cpf)?;
        self.remediate_with(id, &mut rand::rng())
    }

    pub fn remediate_with<R: Rng>(
        &mut self,
        member_id: MemberId,
        rng: &mut R,
    ) -> Result<RemediationOutcome> {
        let member = self
            .members
            .get(&member_id)
            .ok_or(NotFoundError::MemberId(member_id))?;
        let balance = member.credit_balance(&self.tasks);
        if balance >= self.policy.credit_floor {
            return Ok(RemediationOutcome::NotNeeded { balance });
        }

        match member.role() {
            MemberRole::Producer => {
                warn!(
                    "Producer {} needs to raise production to recover credit (balance {})",
                    member.name(),
                    balance
                );
                Ok(RemediationOutcome::NeedsMoreProduction { balance })
            }
            MemberRole::Provider => {
                let report = self.offer_random_tasks(member_id, balance, rng)?;
                Ok(RemediationOutcome::Attempted(report))
            }
        }
    }

    fn offer_random_tasks<R: Rng>(
        &mut self,
        member_id: MemberId,
        balance_before: i64,
        rng: &mut R,
    ) -> Result<RemediationReport> {
        let mut pool: Vec<TaskId> = self
            .tasks
            .values()
            .filter(|t| t.completed_by().is_none())
            .map(|t| t.id())
            .collect();
        let mut report = RemediationReport {
            balance_before,
            ..RemediationReport::default()
        };

        for _ in 0..self.policy.remediation_attempts {
            if pool.is_empty() {
                info!("No unassigned tasks left to offer member {}", member_id);
                report.pool_exhausted = true;
                break;
            }

            let task_id = pool.swap_remove(rng.random_range(0..pool.len()));
            let qualified = match (self.members.get(&member_id), self.tasks.get(&task_id)) {
                (Some(member), Some(task)) => member.has_required_skills(task),
                _ => false,
            };

            if qualified {
                self.accept_task_by_id(member_id, task_id)?;
                report.accepted.push(task_id);
            } else {
                info!(
                    "Member {} lacks the skills for task {}; drawing the next one",
                    member_id, task_id
                );
                report.skipped.push(task_id);
            }
        }

        report.balance_after = self.balance_of(member_id)?;
        Ok(report)
    }
}
