//! Seed skill loading
//!
//! Reads skills from a plain text file, one `name points` pair per line.
//! Bad lines are reported and skipped; they never abort the load.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::association::Association;
use crate::types::SkillId;

/// A seed line that was not loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line_no: usize,
    pub line: String,
    pub reason: String,
}

/// Outcome of a seed load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub loaded: Vec<SkillId>,
    pub skipped: Vec<SkippedLine>,
}

/// Register every well-formed line of `contents`
pub fn parse_seed(contents: &str, association: &mut Association) -> SeedReport {
    let mut report = SeedReport::default();

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut skip = |reason: String| {
            warn!("Skipping seed line {} ('{}'): {}", idx + 1, line, reason);
            report.skipped.push(SkippedLine {
                line_no: idx + 1,
                line: line.to_string(),
                reason,
            });
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        let [name, points] = parts.as_slice() else {
            skip("expected 'name points'".to_string());
            continue;
        };
        let Ok(points) = points.parse::<i64>() else {
            skip(format!("points '{}' is not a number", points));
            continue;
        };

        match association.add_skill(name, points) {
            Ok(id) => report.loaded.push(id),
            Err(e) => skip(e.to_string()),
        }
    }

    info!("Loaded {} seed skills ({} skipped)", report.loaded.len(), report.skipped.len());
    report
}

/// Load a seed file; a missing file yields an empty report
pub fn load_seed_file(path: &Path, association: &mut Association) -> Result<SeedReport> {
    if !path.exists() {
        warn!("Seed file {} not found; no skills loaded", path.display());
        return Ok(SeedReport::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    Ok(parse_seed(&contents, association))
}
