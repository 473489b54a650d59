//! Association registry
//!
//! Owns every member, skill and task, issues their ids and enforces
//! uniqueness. Relationships between entities are ids into these maps.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::PolicyConfig;
use crate::error::{ConflictError, NotFoundError, Result};
use crate::members::{Member, Product};
use crate::skills::{DifficultyTier, Skill};
use crate::tasks::{Task, TaskBook};
use crate::types::{IdSequence, MemberId, SkillId, TaskId};

/// The association: sole owner of members, skills and tasks
pub struct Association {
    pub(super) members: BTreeMap<MemberId, Member>,
    pub(super) cpf_index: HashMap<String, MemberId>,
    pub(super) skills: BTreeMap<SkillId, Skill>,
    pub(super) tasks: TaskBook,
    member_ids: IdSequence<MemberId>,
    skill_ids: IdSequence<SkillId>,
    task_ids: IdSequence<TaskId>,
    pub(super) policy: PolicyConfig,
    clock: Box<dyn Clock>,
}

impl Association {
    /// Create an empty association with the default policy
    pub fn new() -> Self {
        Self::with_policy(PolicyConfig::default())
    }

    pub fn with_policy(policy: PolicyConfig) -> Self {
        Self {
            members: BTreeMap::new(),
            cpf_index: HashMap::new(),
            skills: BTreeMap::new(),
            tasks: TaskBook::new(),
            member_ids: IdSequence::new(),
            skill_ids: IdSequence::new(),
            task_ids: IdSequence::new(),
            policy,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the date source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    // ── Drafts ───────────────────────────────────────────────────────────

    /// Build an unregistered skill carrying a fresh id
    pub fn new_skill(&mut self, name: &str, points: i64) -> Result<Skill> {
        Skill::new(self.skill_ids.next_id(), name, points)
    }

    pub fn new_provider(&mut self, name: &str, cpf: &str) -> Result<Member> {
        Member::provider(self.member_ids.next_id(), name, cpf)
    }

    pub fn new_producer(&mut self, name: &str, cpf: &str) -> Result<Member> {
        Member::producer(self.member_ids.next_id(), name, cpf)
    }

    /// Build an unregistered task dated today
    pub fn new_task(
        &mut self,
        author: MemberId,
        description: &str,
        estimated_effort: i64,
        deadline_days: i64,
    ) -> Result<Task> {
        let today = self.clock.today();
        Task::new(
            self.task_ids.next_id(),
            author,
            description,
            estimated_effort,
            deadline_days,
            today,
        )
    }

    // ── Registration ─────────────────────────────────────────────────────

    pub fn register_member(&mut self, member: Member) -> Result<MemberId> {
        if self.cpf_index.contains_key(member.cpf()) {
            return Err(ConflictError::DuplicateCpf(member.cpf().to_string()).into());
        }
        if self.members.contains_key(&member.id()) {
            return Err(ConflictError::DuplicateMemberId(member.id()).into());
        }

        let id = member.id();
        info!("Registered {} {} ({})", member.role(), member.name(), id);
        self.cpf_index.insert(member.cpf().to_string(), id);
        self.members.insert(id, member);
        Ok(id)
    }

    pub fn register_skill(&mut self, skill: Skill) -> Result<SkillId> {
        if self.skills.contains_key(&skill.id()) {
            return Err(ConflictError::DuplicateSkillId(skill.id()).into());
        }
        if self.find_skill_by_name(skill.name()).is_some() {
            return Err(ConflictError::DuplicateSkillName(skill.name().to_string()).into());
        }

        let id = skill.id();
        info!("Registered skill: {} ({})", skill.name(), id);
        self.skills.insert(id, skill);
        Ok(id)
    }

    /// Register a task and record it as authored.
    ///
    /// Fails when the author is unknown or below the credit floor; nothing is
    /// stored in that case.
    pub fn register_task(&mut self, task: Task) -> Result<TaskId> {
        if self.tasks.contains_key(&task.id()) {
            return Err(ConflictError::DuplicateTaskId(task.id()).into());
        }
        let author = self
            .members
            .get_mut(&task.author())
            .ok_or(NotFoundError::MemberId(task.author()))?;

        author.author_task(&task, &self.tasks, self.policy.credit_floor)?;

        let id = task.id();
        info!("Registered task {} by member {}", id, task.author());
        self.tasks.insert(id, task);
        Ok(id)
    }

    /// Mint and register a skill
    pub fn add_skill(&mut self, name: &str, points: i64) -> Result<SkillId> {
        let skill = self.new_skill(name, points)?;
        self.register_skill(skill)
    }

    pub fn add_provider(&mut self, name: &str, cpf: &str) -> Result<MemberId> {
        let member = self.new_provider(name, cpf)?;
        self.register_member(member)
    }

    pub fn add_producer(&mut self, name: &str, cpf: &str) -> Result<MemberId> {
        let member = self.new_producer(name, cpf)?;
        self.register_member(member)
    }

    /// Author a task on behalf of the member with `author_cpf`
    pub fn create_task(
        &mut self,
        author_cpf: &str,
        description: &str,
        estimated_effort: i64,
        deadline_days: i64,
    ) -> Result<TaskId> {
        let author = self.member_id(author_cpf)?;
        let task = self.new_task(author, description, estimated_effort, deadline_days)?;
        self.register_task(task)
    }

    // ── Lookups ──────────────────────────────────────────────────────────

    /// Look a member up by cpf; surrounding whitespace is ignored as at registration
    pub fn find_member(&self, cpf: &str) -> Option<&Member> {
        self.cpf_index.get(cpf.trim()).and_then(|id| self.members.get(id))
    }

    pub fn find_member_by_id(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn find_skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    pub fn find_skill_by_name(&self, name: &str) -> Option<&Skill> {
        let name = name.trim().to_lowercase();
        self.skills.values().find(|s| s.name() == name)
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn task_book(&self) -> &TaskBook {
        &self.tasks
    }

    pub(super) fn member_id(&self, cpf: &str) -> Result<MemberId> {
        self.cpf_index
            .get(cpf.trim())
            .copied()
            .ok_or_else(|| NotFoundError::Member(cpf.trim().to_string()).into())
    }

    fn skill(&self, id: SkillId) -> Result<Skill> {
        self.skills
            .get(&id)
            .cloned()
            .ok_or_else(|| NotFoundError::Skill(id).into())
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Tag a registered skill onto an open task
    pub fn tag_task_skill(&mut self, task_id: TaskId, skill_id: SkillId) -> Result<DifficultyTier> {
        let skill = self.skill(skill_id)?;
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or(NotFoundError::Task(task_id))?;
        task.add_skill(skill)
    }

    /// Grant a registered skill to a provider
    pub fn assign_skill(&mut self, cpf: &str, skill_id: SkillId) -> Result<()> {
        let skill = self.skill(skill_id)?;
        let id = self.member_id(cpf)?;
        let member = self
            .members
            .get_mut(&id)
            .ok_or(NotFoundError::MemberId(id))?;
        debug!("Assigning skill {} to {}", skill.name(), member.name());
        member.assign_skill(skill)
    }

    pub fn register_product(&mut self, cpf: &str, product: Product) -> Result<()> {
        let id = self.member_id(cpf)?;
        let member = self
            .members
            .get_mut(&id)
            .ok_or(NotFoundError::MemberId(id))?;
        debug!("Logging product {} for {}", product, member.name());
        member.register_product(product)
    }

    /// Have a provider accept and complete a task
    pub fn accept_task(&mut self, cpf: &str, task_id: TaskId) -> Result<()> {
        let id = self.member_id(cpf)?;
        self.accept_task_by_id(id, task_id)
    }

    pub fn accept_task_by_id(&mut self, member_id: MemberId, task_id: TaskId) -> Result<()> {
        let today = self.clock.today();
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or(NotFoundError::Task(task_id))?;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(NotFoundError::MemberId(member_id))?;
        member.accept(task, today)
    }

    pub fn credit_balance(&self, cpf: &str) -> Result<i64> {
        let id = self.member_id(cpf)?;
        self.balance_of(id)
    }

    pub(super) fn balance_of(&self, id: MemberId) -> Result<i64> {
        self.members
            .get(&id)
            .map(|m| m.credit_balance(&self.tasks))
            .ok_or_else(|| NotFoundError::MemberId(id).into())
    }
}

impl Default for Association {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Association {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Association with {} members, {} skills and {} tasks.",
            self.members.len(),
            self.skills.len(),
            self.tasks.len()
        )?;
        for member in self.members.values() {
            writeln!(f, "{}", member.describe(&self.tasks))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::{AssociationError, ErrorKind};
    use chrono::NaiveDate;

    fn association() -> Association {
        Association::new().with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()))
    }

    #[test]
    fn test_skill_round_trip() {
        let mut amx = association();
        let id = amx.add_skill("Plumber", 2).unwrap();

        let found = amx.find_skill(id).unwrap();
        assert_eq!(found.name(), "plumber");
        assert_eq!(found.points(), 2);
        assert!(amx.find_skill(SkillId(999)).is_none());
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let mut amx = association();
        let skill = amx.new_skill("painter", 1).unwrap();
        amx.register_skill(skill.clone()).unwrap();

        assert_eq!(
            amx.register_skill(skill).unwrap_err(),
            AssociationError::Conflict(ConflictError::DuplicateSkillId(SkillId(1)))
        );
        assert_eq!(
            amx.add_skill("PAINTER", 3).unwrap_err(),
            AssociationError::Conflict(ConflictError::DuplicateSkillName("painter".into()))
        );
        assert_eq!(amx.skills().count(), 1);
    }

    #[test]
    fn test_member_round_trip_and_duplicate_cpf() {
        let mut amx = association();
        let id = amx.add_provider("Ana", "00000000001").unwrap();
        assert_eq!(amx.find_member("00000000001").unwrap().id(), id);
        assert!(amx.find_member("00000000002").is_none());

        let err = amx.add_producer("Other", "00000000001").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(amx.members().count(), 1);
    }

    #[test]
    fn test_padded_cpf_round_trip() {
        let mut amx = association();
        let id = amx.add_provider("Ana", " 00000000001 ").unwrap();

        assert_eq!(amx.find_member(" 00000000001 ").unwrap().id(), id);
        assert_eq!(amx.find_member("00000000001").unwrap().cpf(), "00000000001");
        assert_eq!(amx.credit_balance("\t00000000001").unwrap(), 0);

        let err = amx.add_producer("Other", "00000000001  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_task_registration_requires_known_author() {
        let mut amx = association();
        let task = amx.new_task(MemberId(42), "orphan", 6, 3).unwrap();
        let err = amx.register_task(task).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(amx.tasks().count(), 0);
    }

    #[test]
    fn test_task_dated_by_clock() {
        let mut amx = association();
        amx.add_producer("Ana", "1").unwrap();
        let id = amx.create_task("1", "paint fence", 12, 7).unwrap();

        let task = amx.find_task(id).unwrap();
        assert_eq!(task.created_on(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(amx.credit_balance("1").unwrap(), -6);
    }

    #[test]
    fn test_gate_blocks_without_storing_task() {
        let mut amx = association();
        amx.add_producer("Ana", "1").unwrap();
        amx.create_task("1", "big job", 22, 7).unwrap();
        assert_eq!(amx.credit_balance("1").unwrap(), -11);

        let err = amx.create_task("1", "another", 2, 7).unwrap_err();
        assert!(err.is_insufficient_credit());
        assert_eq!(amx.tasks().count(), 1);
    }

    #[test]
    fn test_tag_unknown_entities() {
        let mut amx = association();
        amx.add_producer("Ana", "1").unwrap();
        let task = amx.create_task("1", "job", 6, 3).unwrap();

        assert_eq!(amx.tag_task_skill(task, SkillId(5)).unwrap_err().kind(), ErrorKind::NotFound);
        let skill = amx.add_skill("welder", 3).unwrap();
        assert_eq!(amx.tag_task_skill(TaskId(77), skill).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(amx.tag_task_skill(task, skill).unwrap(), DifficultyTier::Simple);
    }

    #[test]
    fn test_accept_task_completes_it() {
        let mut amx = association();
        amx.add_producer("Ana", "1").unwrap();
        let provider = amx.add_provider("Bia", "2").unwrap();
        let skill = amx.add_skill("plumber", 2).unwrap();
        amx.assign_skill("2", skill).unwrap();

        let task = amx.create_task("1", "leak", 12, 10).unwrap();
        amx.tag_task_skill(task, skill).unwrap();
        amx.accept_task("2", task).unwrap();

        assert_eq!(amx.find_task(task).unwrap().completed_by(), Some(provider));
        assert_eq!(amx.credit_balance("2").unwrap(), 4);
        assert_eq!(amx.accept_task("2", task).unwrap_err().kind(), ErrorKind::Conflict);
        assert_eq!(amx.accept_task("3", task).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_independent_registries_issue_independent_ids() {
        let mut a = association();
        let mut b = association();
        assert_eq!(a.add_skill("x", 1).unwrap(), SkillId(1));
        assert_eq!(b.add_skill("x", 1).unwrap(), SkillId(1));
    }
}
