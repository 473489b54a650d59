//! CLI interface for mutual-aid

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::association::{Association, AssociationSummary, MemberSummary, TaskSummary};
use crate::config::{self, Config};
use crate::simulation::{self, SimulationReport};
use crate::skills::{load_seed_file, SeedReport};

#[derive(Parser)]
#[command(name = "mutual-aid")]
#[command(about = "Credit and task matching engine for a mutual-aid association", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate members and tasks, match them and print the reports
    Simulate {
        /// Members to generate (default from config)
        #[arg(short, long)]
        members: Option<usize>,
        /// Tasks to generate (default from config)
        #[arg(short, long)]
        tasks: Option<usize>,
        /// Seed skills from a `name points` file before generating
        #[arg(short, long, env = "MUTUAL_AID_SKILLS_FILE")]
        skills_file: Option<PathBuf>,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a skill seed file and list what it would register
    Skills {
        /// Seed file of `name points` lines
        #[arg(short, long)]
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        /// Display current configuration
        #[arg(long)]
        show: bool,
        /// Write a default config file, replacing any existing one
        #[arg(long)]
        init: bool,
    },
}

/// Everything a simulation run reports
#[derive(Debug, Serialize)]
struct RunReport {
    seed: Option<SeedReport>,
    simulation: SimulationReport,
    summary: AssociationSummary,
    top_members: Vec<MemberSummary>,
    top_tasks: Vec<TaskSummary>,
    members_below_threshold: usize,
    unassigned_tasks: usize,
    average_schedule_variance: i64,
    products: usize,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { members, tasks, skills_file, seed, json } => {
            let mut config = Config::load()?;
            if let Some(members) = members {
                config.simulation.members = members;
            }
            if let Some(tasks) = tasks {
                config.simulation.tasks = tasks;
            }
            if skills_file.is_some() {
                config.simulation.skills_file = skills_file;
            }

            let report = run_simulation(&config, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_run_report(&report);
            }
        }
        Commands::Skills { file, json } => {
            let mut association = Association::new();
            let report = load_seed_file(&file, &mut association)?;
            if json {
                let skills: Vec<_> = association.skills().collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "skills": skills,
                        "skipped": report.skipped,
                    }))?
                );
            } else {
                print_seed(&file, &association, &report);
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = config::config_path()?;
                Config::default().save_to(&path)?;
                println!("Wrote default configuration to {}", path.display());
            } else if show {
                let config = Config::load()?;
                config::show_config(&config)?;
            } else {
                println!("Configuration options:");
                println!("  --show    Display current configuration");
                println!("  --init    Write a default configuration file");
            }
        }
    }

    Ok(())
}

fn run_simulation(config: &Config, seed: Option<u64>) -> Result<RunReport> {
    let mut association = Association::with_policy(config.policy.clone());

    let seed_report = match &config.simulation.skills_file {
        Some(path) => Some(
            load_seed_file(path, &mut association)
                .with_context(|| format!("Failed to seed skills from {}", path.display()))?,
        ),
        None => None,
    };

    let simulation = simulation::simulate(&mut association, &config.simulation, seed)?;

    let top_members = association
        .top_10_members_by_balance()
        .into_iter()
        .map(|m| association.summarize_member(m))
        .collect();
    let top_tasks = association
        .top_tasks_by_credits(config.policy.top_tasks)
        .into_iter()
        .map(TaskSummary::from)
        .collect();

    Ok(RunReport {
        seed: seed_report,
        simulation,
        summary: association.summary(),
        top_members,
        top_tasks,
        members_below_threshold: association.members_below_credit_threshold().len(),
        unassigned_tasks: association.unassigned_tasks().len(),
        average_schedule_variance: association.average_schedule_variance(),
        products: association.all_products().len(),
    })
}

fn print_run_report(report: &RunReport) {
    if let Some(seed) = &report.seed {
        println!("Seed skills: {} loaded, {} skipped", seed.loaded.len(), seed.skipped.len());
    }

    let sim = &report.simulation;
    let summary = &report.summary;
    println!(
        "Members: {} ({} providers, {} producers with {} products)",
        summary.members, summary.providers, summary.producers, report.products
    );
    println!("Skills: {} ({} seeded with defaults)", summary.skills, sim.skills_seeded);
    println!(
        "Tasks: {} registered, {} completed, {} unassigned",
        summary.tasks, summary.completed_tasks, report.unassigned_tasks
    );
    println!(
        "Matching: {} assigned, {} without a qualified provider",
        sim.tasks_assigned, sim.tasks_unmatched
    );
    println!(
        "Credit gate: {} tasks blocked, {} recovered through remediation",
        sim.blocked_authors, sim.remediated_tasks
    );
    println!("Members below the credit floor: {}", report.members_below_threshold);
    println!("Average schedule variance: {} days", report.average_schedule_variance);

    println!();
    println!("Top members by balance:");
    for (rank, member) in report.top_members.iter().enumerate() {
        println!(
            "  {:>2}. {:<16} {:<11} {:<8} {:>6}",
            rank + 1,
            member.name,
            member.cpf,
            member.role.to_string(),
            member.balance
        );
    }

    println!();
    println!("Top completed tasks by credits:");
    for task in &report.top_tasks {
        println!(
            "  {:<12} effort {:>3}  credits {:>3}",
            task.description, task.estimated_effort, task.credits
        );
    }
}

fn print_seed(file: &Path, association: &Association, report: &SeedReport) {
    println!("Seed file: {}", file.display());
    for skill in association.skills() {
        println!("  {:<24} {} point(s)", skill.name(), skill.points());
    }
    if !report.skipped.is_empty() {
        println!();
        println!("Skipped lines:");
        for line in &report.skipped {
            println!("  {:>4}: {} ({})", line.line_no, line.line, line.reason);
        }
    }
}
