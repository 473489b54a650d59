//! Configuration management
//!
//! Credit policy knobs and simulation defaults, stored as TOML in the
//! platform config directory.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Credit and remediation policy
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Synthetic load generation
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Lowest balance at which a member may still author tasks
    #[serde(default = "default_credit_floor")]
    pub credit_floor: i64,
    /// Random draws per remediation run
    #[serde(default = "default_remediation_attempts")]
    pub remediation_attempts: usize,
    /// Size of the top-members report
    #[serde(default = "default_top_n")]
    pub top_members: usize,
    /// Size of the top-tasks report
    #[serde(default = "default_top_n")]
    pub top_tasks: usize,
}

fn default_credit_floor() -> i64 {
    -10
}

fn default_remediation_attempts() -> usize {
    2
}

fn default_top_n() -> usize {
    10
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            credit_floor: default_credit_floor(),
            remediation_attempts: default_remediation_attempts(),
            top_members: default_top_n(),
            top_tasks: default_top_n(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Members to generate
    #[serde(default = "default_members")]
    pub members: usize,
    /// Tasks to generate
    #[serde(default = "default_tasks")]
    pub tasks: usize,
    /// Fraction of generated members that are producers
    #[serde(default = "default_producer_share")]
    pub producer_share: f64,
    /// Seed file of `name points` lines
    #[serde(default)]
    pub skills_file: Option<PathBuf>,
}

fn default_members() -> usize {
    250
}

fn default_tasks() -> usize {
    2500
}

fn default_producer_share() -> f64 {
    0.2
}

impl SimulationConfig {
    /// Reject settings that cannot describe a member mix
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.producer_share) {
            bail!(
                "simulation.producer_share must be between 0.0 and 1.0 (got {})",
                self.producer_share
            );
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            members: default_members(),
            tasks: default_tasks(),
            producer_share: default_producer_share(),
            skills_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if absent
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;
        config.simulation.validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("org", "mutual-aid", "mutual-aid")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    println!("Config file: {}", path.display());
    println!();
    println!("[policy]");
    println!("  credit floor          {}", config.policy.credit_floor);
    println!("  remediation attempts  {}", config.policy.remediation_attempts);
    println!("  top members report    {}", config.policy.top_members);
    println!("  top tasks report      {}", config.policy.top_tasks);
    println!("[simulation]");
    println!("  members               {}", config.simulation.members);
    println!("  tasks                 {}", config.simulation.tasks);
    println!("  producer share        {:.2}", config.simulation.producer_share);
    println!(
        "  skills file           {}",
        config
            .simulation
            .skills_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in defaults)".to_string())
    );
    Ok(())
}
