//! Association members

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use super::producer::{ProducerProfile, Product};
use super::provider::ProviderProfile;
use super::Creditable;
use crate::error::{PolicyError, Result, ValidationError};
use crate::skills::Skill;
use crate::tasks::{Task, TaskBook};
use crate::types::{MemberId, MemberRole, TaskId};

/// Capability-specific part of a member
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum MemberKind {
    Provider(ProviderProfile),
    Producer(ProducerProfile),
}

/// A registered participant
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    id: MemberId,
    name: String,
    cpf: String,
    authored_tasks: BTreeSet<TaskId>,
    kind: MemberKind,
}

impl Member {
    pub fn new(id: MemberId, name: &str, cpf: &str, kind: MemberKind) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("member name").into());
        }
        if cpf.trim().is_empty() {
            return Err(ValidationError::Empty("cpf").into());
        }

        Ok(Self {
            id,
            name: name.trim().to_string(),
            cpf: cpf.trim().to_string(),
            authored_tasks: BTreeSet::new(),
            kind,
        })
    }

    pub fn provider(id: MemberId, name: &str, cpf: &str) -> Result<Self> {
        Self::new(id, name, cpf, MemberKind::Provider(ProviderProfile::new()))
    }

    pub fn producer(id: MemberId, name: &str, cpf: &str) -> Result<Self> {
        Self::new(id, name, cpf, MemberKind::Producer(ProducerProfile::new()))
    }

    /// Earned component minus the debit of every authored task
    pub fn credit_balance(&self, tasks: &TaskBook) -> i64 {
        let earned = match &self.kind {
            MemberKind::Provider(profile) => profile.earned(tasks),
            MemberKind::Producer(profile) => profile.earned(tasks),
        };
        let debit: i64 = self
            .authored_tasks
            .iter()
            .filter_map(|id| tasks.get(id))
            .map(Task::authoring_debit)
            .sum();

        earned - debit
    }

    /// Record a task as authored by this member.
    ///
    /// The gate uses the balance before this task's own debit.
    pub fn author_task(&mut self, task: &Task, tasks: &TaskBook, floor: i64) -> Result<()> {
        let balance = self.credit_balance(tasks);
        if balance < floor {
            return Err(PolicyError::InsufficientCredit { balance, floor }.into());
        }

        self.authored_tasks.insert(task.id());
        Ok(())
    }

    /// Only providers can qualify; producers never do
    pub fn has_required_skills(&self, task: &Task) -> bool {
        match &self.kind {
            MemberKind::Provider(profile) => profile.has_required_skills(task),
            MemberKind::Producer(_) => false,
        }
    }

    pub fn assign_skill(&mut self, skill: Skill) -> Result<()> {
        match &mut self.kind {
            MemberKind::Provider(profile) => {
                profile.assign_skill(skill);
                Ok(())
            }
            MemberKind::Producer(_) => Err(PolicyError::NotAProvider(self.cpf.clone()).into()),
        }
    }

    pub fn register_product(&mut self, product: Product) -> Result<()> {
        match &mut self.kind {
            MemberKind::Producer(profile) => {
                profile.register_product(product);
                Ok(())
            }
            MemberKind::Provider(_) => Err(PolicyError::NotAProducer(self.cpf.clone()).into()),
        }
    }

    pub fn accept(&mut self, task: &mut Task, on: NaiveDate) -> Result<()> {
        let id = self.id;
        match &mut self.kind {
            MemberKind::Provider(profile) => profile.accept(id, task, on),
            MemberKind::Producer(_) => Err(PolicyError::NotAProvider(self.cpf.clone()).into()),
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    pub fn role(&self) -> MemberRole {
        match self.kind {
            MemberKind::Provider(_) => MemberRole::Provider,
            MemberKind::Producer(_) => MemberRole::Producer,
        }
    }

    pub fn as_provider(&self) -> Option<&ProviderProfile> {
        match &self.kind {
            MemberKind::Provider(profile) => Some(profile),
            MemberKind::Producer(_) => None,
        }
    }

    pub fn as_producer(&self) -> Option<&ProducerProfile> {
        match &self.kind {
            MemberKind::Producer(profile) => Some(profile),
            MemberKind::Provider(_) => None,
        }
    }

    pub fn authored_tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.authored_tasks.iter().copied()
    }

    /// One-line description including the current balance
    pub fn describe(&self, tasks: &TaskBook) -> String {
        let detail = match &self.kind {
            MemberKind::Provider(profile) => format!("Skills: {}", profile.skills().count()),
            MemberKind::Producer(profile) => {
                format!("Product points: {}", profile.product_points())
            }
        };
        format!(
            "ID: {}, Name: {}, CPF: {}, Balance: {}, Role: {}, {}",
            self.id,
            self.name,
            self.cpf,
            self.credit_balance(tasks),
            self.role(),
            detail
        )
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
