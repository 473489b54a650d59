//! Provider matching
//!
//! Greedy load balancing: among the providers that hold every skill a task
//! requires, prefer the one with the fewest completed tasks. Ties go to the
//! earliest registered member.

use tracing::{debug, info};

use super::Association;
use crate::error::{ConflictError, NotFoundError, PolicyError, Result};
use crate::members::Member;
use crate::tasks::Task;
use crate::types::{MemberId, TaskId};

/// Returned by [`Association::eligible_members_description`] when nobody qualifies
pub const NO_ELIGIBLE_MEMBERS: &str = "No eligible members found.";

impl Association {
    /// Providers holding every skill the task requires, in registration order
    pub fn candidates_for(&self, task: &Task) -> Vec<&Member> {
        self.members
            .values()
            .filter(|m| m.has_required_skills(task))
            .collect()
    }

    /// Pick the qualified provider with the fewest completed tasks.
    ///
    /// Completed tasks have no best provider.
    pub fn find_best_provider(&self, task: &Task) -> Option<&Member> {
        if task.is_finalized() {
            debug!("Task {} is already completed", task.id());
            return None;
        }

        let best = self
            .candidates_for(task)
            .into_iter()
            .filter_map(|m| m.as_provider().map(|p| (m, p.completed_count())))
            .min_by_key(|(_, load)| *load)
            .map(|(m, _)| m);

        match best {
            Some(member) => debug!("Best provider for task {}: {}", task.id(), member.id()),
            None => debug!("No provider qualifies for task {}", task.id()),
        }
        best
    }

    /// Have the best provider accept the task with `task_id`
    pub fn assign_best_provider(&mut self, task_id: TaskId) -> Result<MemberId> {
        let task = self
            .tasks
            .get(&task_id)
            .ok_or(NotFoundError::Task(task_id))?;
        if task.is_finalized() {
            return Err(ConflictError::AlreadyCompleted(task_id).into());
        }
        let provider = self
            .find_best_provider(task)
            .map(Member::id)
            .ok_or(PolicyError::NoEligibleProvider(task_id))?;

        self.accept_task_by_id(provider, task_id)?;
        info!("Task {} assigned to member {}", task_id, provider);
        Ok(provider)
    }

    /// Qualified providers for a task, lowest balance first
    pub fn qualified_providers_for(&self, task_id: TaskId) -> Result<Vec<&Member>> {
        let task = self
            .tasks
            .get(&task_id)
            .ok_or(NotFoundError::Task(task_id))?;
        Ok(self.by_balance_ascending(task))
    }

    /// Text listing of qualified members ordered by balance
    pub fn eligible_members_description(&self, task: &Task) -> String {
        let lines: Vec<String> = self
            .by_balance_ascending(task)
            .into_iter()
            .map(|m| m.describe(&self.tasks))
            .collect();

        if lines.is_empty() {
            NO_ELIGIBLE_MEMBERS.to_string()
        } else {
            lines.join("\n")
        }
    }

    fn by_balance_ascending(&self, task: &Task) -> Vec<&Member> {
        let mut qualified: Vec<(&Member, i64)> = self
            .candidates_for(task)
            .into_iter()
            .map(|m| (m, m.credit_balance(&self.tasks)))
            .collect();
        qualified.sort_by_key(|(_, balance)| *balance);
        qualified.into_iter().map(|(m, _)| m).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::PolicyConfig;
    use crate::error::{AssociationError, ErrorKind};
    use crate::types::SkillId;
    use chrono::NaiveDate;

    fn association() -> Association {
        // The requester authors many tasks; keep the gate out of the way
        let policy = PolicyConfig {
            credit_floor: i64::MIN,
            ..PolicyConfig::default()
        };
        Association::with_policy(policy)
            .with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
    }

    /// Association with a requester and two plumbers
    fn plumbing() -> (Association, SkillId) {
        let mut amx = association();
        amx.add_producer("Requester", "100").unwrap();
        let plumber = amx.add_skill("plumber", 1).unwrap();
        for (name, cpf) in [("First", "1"), ("Second", "2")] {
            amx.add_provider(name, cpf).unwrap();
            amx.assign_skill(cpf, plumber).unwrap();
        }
        (amx, plumber)
    }

    fn open_task(amx: &mut Association, skill: SkillId) -> TaskId {
        let id = amx.create_task("100", "pipe", 12, 10).unwrap();
        amx.tag_task_skill(id, skill).unwrap();
        id
    }

    #[test]
    fn test_fewer_completed_tasks_wins() {
        let (mut amx, plumber) = plumbing();
        for _ in 0..3 {
            let id = open_task(&mut amx, plumber);
            amx.accept_task("1", id).unwrap();
        }

        let task = open_task(&mut amx, plumber);
        let task = amx.find_task(task).unwrap();
        // "1" has the higher balance but more load
        assert_eq!(amx.find_best_provider(task).unwrap().cpf(), "2");
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let (mut amx, plumber) = plumbing();
        let task = open_task(&mut amx, plumber);
        let task = amx.find_task(task).unwrap();
        assert_eq!(amx.find_best_provider(task).unwrap().id(), MemberId(2));
    }

    #[test]
    fn test_no_candidates() {
        let (mut amx, _) = plumbing();
        let welder = amx.add_skill("welder", 3).unwrap();
        let task = open_task(&mut amx, welder);
        let task = amx.find_task(task).unwrap();

        assert!(amx.find_best_provider(task).is_none());
        assert_eq!(amx.eligible_members_description(task), NO_ELIGIBLE_MEMBERS);
    }

    #[test]
    fn test_qualified_providers_sorted_by_balance() {
        let (mut amx, plumber) = plumbing();
        let done = open_task(&mut amx, plumber);
        amx.accept_task("1", done).unwrap();

        let task = open_task(&mut amx, plumber);
        let cpfs: Vec<_> = amx
            .qualified_providers_for(task)
            .unwrap()
            .iter()
            .map(|m| m.cpf().to_string())
            .collect();
        assert_eq!(cpfs, vec!["2", "1"]);

        let text = amx.eligible_members_description(amx.find_task(task).unwrap());
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("CPF: 2"));
    }

    #[test]
    fn test_completed_task_has_no_best_provider() {
        let (mut amx, plumber) = plumbing();
        let task = open_task(&mut amx, plumber);
        amx.accept_task("1", task).unwrap();

        assert!(amx.find_best_provider(amx.find_task(task).unwrap()).is_none());
    }

    #[test]
    fn test_assign_best_provider() {
        let (mut amx, plumber) = plumbing();
        let first = open_task(&mut amx, plumber);
        let second = open_task(&mut amx, plumber);

        assert_eq!(amx.assign_best_provider(first).unwrap(), MemberId(2));
        assert_eq!(amx.assign_best_provider(second).unwrap(), MemberId(3));
        assert_eq!(amx.find_task(first).unwrap().completed_by(), Some(MemberId(2)));
        assert_eq!(amx.credit_balance("1").unwrap(), 4);
    }

    #[test]
    fn test_assign_best_provider_errors() {
        let (mut amx, plumber) = plumbing();

        let err = amx.assign_best_provider(TaskId(404)).unwrap_err();
        assert_eq!(err, AssociationError::NotFound(NotFoundError::Task(TaskId(404))));

        let done = open_task(&mut amx, plumber);
        amx.accept_task("2", done).unwrap();
        let err = amx.assign_best_provider(done).unwrap_err();
        assert_eq!(err, AssociationError::Conflict(ConflictError::AlreadyCompleted(done)));

        let welder = amx.add_skill("welder", 3).unwrap();
        let orphan = open_task(&mut amx, welder);
        let err = amx.assign_best_provider(orphan).unwrap_err();
        assert_eq!(err, AssociationError::Policy(PolicyError::NoEligibleProvider(orphan)));
        assert!(!amx.find_task(orphan).unwrap().is_finalized());
    }

    #[test]
    fn test_qualified_providers_unknown_task() {
        let (amx, _) = plumbing();
        let err = amx.qualified_providers_for(TaskId(404)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
