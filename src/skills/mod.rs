//! Skills module
//!
//! Skills are the capabilities providers hold and tasks require. The tier
//! policy turns a task's skill set into a credit multiplier, and the loader
//! bootstraps skills from a seed file.

pub mod skill;
pub mod tier;
pub mod loader;

pub use skill::{Skill, MAX_SKILL_POINTS, MIN_SKILL_POINTS};
pub use tier::DifficultyTier;
pub use loader::{load_seed_file, parse_seed, SeedReport};
