//! Synthetic load generator
//!
//! Populates an association with skills, members and tasks, then runs every
//! generated task through matching. Authors that hit the credit floor are
//! sent to remediation instead.

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::association::{Association, RemediationOutcome};
use crate::config::SimulationConfig;
use crate::error::{AssociationError, PolicyError};
use crate::members::{Product, PRODUCT_POINT_VALUES};
use crate::types::{MemberId, SkillId};

/// Skills registered when the association has fewer than [`MIN_SKILLS`]
pub const DEFAULT_SKILLS: [&str; 15] = [
    "electrician",
    "plumber",
    "gardener",
    "painter",
    "carpenter",
    "mason",
    "web developer",
    "graphic designer",
    "financial consultant",
    "accountant",
    "cook",
    "driver",
    "seamstress",
    "tutor",
    "therapist",
];

/// Providers are drawn with up to this many skills
pub const MIN_SKILLS: usize = 7;

/// Share of providers per skill count; the remainder get 2 skills
const PROVIDER_SKILL_MIX: [(usize, usize); 4] = [(7, 10), (5, 20), (4, 20), (3, 20)];
const PROVIDER_FALLBACK_SKILLS: usize = 2;

/// Share of tasks per required-skill count, in percent
const TASK_SKILL_MIX: [(usize, usize); 5] = [(5, 10), (4, 20), (3, 20), (2, 20), (1, 30)];

/// Effort is drawn in minutes and converted to half-hour units
const HALF_HOUR: u32 = 30;

/// Counters for a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub skills_seeded: usize,
    pub producers: usize,
    pub providers: usize,
    pub products: usize,
    pub tasks_registered: usize,
    pub tasks_assigned: usize,
    pub tasks_unmatched: usize,
    pub blocked_authors: usize,
    pub remediated_tasks: usize,
}

/// Drives a generation run with a caller-supplied RNG
pub struct Simulation<'a, R: Rng> {
    association: &'a mut Association,
    config: &'a SimulationConfig,
    rng: R,
    report: SimulationReport,
}

impl<'a, R: Rng> Simulation<'a, R> {
    pub fn new(association: &'a mut Association, config: &'a SimulationConfig, rng: R) -> Self {
        Self {
            association,
            config,
            rng,
            report: SimulationReport::default(),
        }
    }

    /// Seed skills, generate members, then generate and match tasks
    pub fn run(mut self) -> Result<SimulationReport> {
        self.seed_default_skills()?;
        self.generate_members()?;
        self.generate_tasks()?;

        info!(
            "Simulation finished: {} tasks registered, {} assigned, {} blocked",
            self.report.tasks_registered, self.report.tasks_assigned, self.report.blocked_authors
        );
        Ok(self.report)
    }

    /// Top up the skill list from [`DEFAULT_SKILLS`] when it is too short
    pub fn seed_default_skills(&mut self) -> Result<()> {
        if self.association.skills().count() >= MIN_SKILLS {
            return Ok(());
        }

        for name in DEFAULT_SKILLS {
            if self.association.find_skill_by_name(name).is_some() {
                continue;
            }
            let points = self.rng.random_range(1..=3);
            self.association
                .add_skill(name, points)
                .with_context(|| format!("Failed to seed skill '{}'", name))?;
            self.report.skills_seeded += 1;
        }
        Ok(())
    }

    pub fn generate_members(&mut self) -> Result<()> {
        self.config.validate()?;
        let skills: Vec<SkillId> = self.association.skills().map(|s| s.id()).collect();
        if skills.len() < MIN_SKILLS {
            bail!(
                "At least {} skills are needed to generate members, found {}",
                MIN_SKILLS,
                skills.len()
            );
        }

        let total = self.config.members;
        let producers = (total as f64 * self.config.producer_share) as usize;
        let providers = total.saturating_sub(producers);
        let mut serial = self.association.members().count() + 1;

        info!("Generating {} producers", producers);
        for _ in 0..producers {
            self.add_producer(serial)?;
            serial += 1;
        }

        info!("Generating {} providers", providers);
        let mut assigned = 0;
        let mut batches: Vec<(usize, usize)> = PROVIDER_SKILL_MIX
            .iter()
            .map(|&(skill_count, percent)| (skill_count, providers * percent / 100))
            .collect();
        for (_, count) in &batches {
            assigned += count;
        }
        batches.push((PROVIDER_FALLBACK_SKILLS, providers - assigned));

        for (skill_count, count) in batches {
            for _ in 0..count {
                self.add_provider(serial, &skills, skill_count)?;
                serial += 1;
            }
        }
        Ok(())
    }

    fn add_producer(&mut self, serial: usize) -> Result<MemberId> {
        let name = format!("Producer {}", serial);
        let cpf = format!("{:011}", serial);
        let id = self.association.add_producer(&name, &cpf)?;

        let products = self.rng.random_range(1..=3u8);
        for n in 0..products {
            let label = format!("Product {} of {}", char::from(b'A' + n), name);
            let points = PRODUCT_POINT_VALUES[self.rng.random_range(0..PRODUCT_POINT_VALUES.len())];
            let product = Product::new(&label, i64::from(points))?;
            self.association.register_product(&cpf, product)?;
            self.report.products += 1;
        }

        self.report.producers += 1;
        Ok(id)
    }

    fn add_provider(&mut self, serial: usize, skills: &[SkillId], count: usize) -> Result<MemberId> {
        let name = format!("Provider {}", serial);
        let cpf = format!("{:011}", serial);
        let id = self.association.add_provider(&name, &cpf)?;

        for skill in self.pick_skills(skills, count) {
            self.association.assign_skill(&cpf, skill)?;
        }

        self.report.providers += 1;
        Ok(id)
    }

    fn pick_skills(&mut self, skills: &[SkillId], count: usize) -> Vec<SkillId> {
        let mut shuffled = skills.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled.truncate(count);
        shuffled
    }

    pub fn generate_tasks(&mut self) -> Result<()> {
        let authors: Vec<MemberId> = self.association.members().map(|m| m.id()).collect();
        let skills: Vec<SkillId> = self.association.skills().map(|s| s.id()).collect();
        if authors.is_empty() || skills.is_empty() {
            bail!("Members and skills must exist before generating tasks");
        }

        let total = self.config.tasks;
        let mut serial = 1;
        for (skill_count, percent) in TASK_SKILL_MIX {
            if skill_count > skills.len() {
                bail!(
                    "Not enough skills to draw {} per task, found {}",
                    skill_count,
                    skills.len()
                );
            }

            for _ in 0..total * percent / 100 {
                let author = authors[self.rng.random_range(0..authors.len())];
                self.generate_task(serial, author, &skills, skill_count)?;
                serial += 1;
            }
        }
        Ok(())
    }

    fn generate_task(
        &mut self,
        serial: usize,
        author: MemberId,
        skills: &[SkillId],
        skill_count: usize,
    ) -> Result<()> {
        let effort = effort_for(&mut self.rng, skill_count);
        let deadline = self.rng.random_range(5..60);
        let mut task = self.association.new_task(
            author,
            &format!("Task {}", serial),
            i64::from(effort),
            deadline,
        )?;

        for skill_id in self.pick_skills(skills, skill_count) {
            let skill = self
                .association
                .find_skill(skill_id)
                .cloned()
                .with_context(|| format!("Skill {} vanished during generation", skill_id))?;
            task.add_skill(skill)?;
        }

        let task_id = match self.association.register_task(task) {
            Ok(id) => id,
            Err(e) if e.is_insufficient_credit() => {
                warn!("Member {} cannot author task {}: {}", author, serial, e);
                self.report.blocked_authors += 1;
                let outcome = self.association.remediate_with(author, &mut self.rng)?;
                if let RemediationOutcome::Attempted(report) = outcome {
                    self.report.remediated_tasks += report.accepted.len();
                }
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        self.report.tasks_registered += 1;

        match self.association.assign_best_provider(task_id) {
            Ok(provider) => {
                debug!("Task {} assigned to member {}", task_id, provider);
                self.report.tasks_assigned += 1;
            }
            Err(AssociationError::Policy(PolicyError::NoEligibleProvider(_))) => {
                self.report.tasks_unmatched += 1;
            }
            Err(e) => {
                return Err(
                    anyhow::Error::new(e).context(format!("Failed to assign task {}", task_id))
                );
            }
        }
        Ok(())
    }
}

/// Effort in half-hour units; more skills means a longer job
fn effort_for<R: Rng>(rng: &mut R, skill_count: usize) -> u32 {
    let minutes = match skill_count {
        1 | 2 => rng.random_range(30..180),
        3 | 4 => rng.random_range(180..480),
        _ => rng.random_range(480..960),
    };
    minutes / HALF_HOUR
}
