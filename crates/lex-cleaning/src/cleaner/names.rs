//! Column name normalization and canonical renames.

use crate::config::NameCollisionPolicy;
use crate::error::{CleaningError, Result};
use crate::types::{ActionType, CleaningAction, CleaningSummary};
use crate::utils::column_names;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info};

static NON_ALPHANUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex: non-alphanumeric run"));
static UNDERSCORE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("Invalid regex: underscore run"));

/// Renames applied after normalization, as (normalized source, target).
pub const COLUMN_RENAMES: &[(&str, &str)] = &[("st", "state")];

/// Normalize a single column name.
///
/// `position` is the zero-based column index, used only when the name has
/// no alphanumeric characters at all.
pub fn normalize_name(raw: &str, position: usize) -> String {
    let lowered = raw.trim().to_lowercase();
    let replaced = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        format!("column_{}", position)
    } else {
        trimmed.to_string()
    }
}

/// Normalize every column name to lowercase snake case.
pub fn normalize_column_names(
    mut df: DataFrame,
    policy: NameCollisionPolicy,
    summary: &mut CleaningSummary,
) -> Result<DataFrame> {
    let originals = column_names(&df);
    let proposed: Vec<String> = originals
        .iter()
        .enumerate()
        .map(|(i, name)| normalize_name(name, i))
        .collect();

    let resolved = resolve_collisions(&originals, &proposed, policy)?;

    let mut renamed = 0;
    for (from, to) in originals.iter().zip(&resolved) {
        if from != to {
            renamed += 1;
            debug!("Normalized column name '{}' -> '{}'", from, to);
        }
    }

    df.set_column_names(resolved.iter().map(|s| s.as_str()))?;

    if renamed > 0 {
        info!("Normalized {} column names", renamed);
        summary.add_action(CleaningAction::new(
            ActionType::ColumnRenamed,
            "dataset",
            renamed,
            format!("Normalized {} column names", renamed),
        ));
    }

    Ok(df)
}

/// Apply [`COLUMN_RENAMES`] to an already-normalized table.
pub fn rename_columns(
    mut df: DataFrame,
    policy: NameCollisionPolicy,
    summary: &mut CleaningSummary,
) -> Result<DataFrame> {
    for &(from, to) in COLUMN_RENAMES {
        let names = column_names(&df);
        if !names.iter().any(|n| n == from) {
            continue;
        }

        let target = if names.iter().any(|n| n == to) {
            match policy {
                NameCollisionPolicy::Fail => {
                    return Err(CleaningError::DuplicateColumn {
                        name: to.to_string(),
                        sources: vec![from.to_string(), to.to_string()],
                    });
                }
                NameCollisionPolicy::Suffix => {
                    let taken: HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
                    next_free_suffix(to, &taken)
                }
            }
        } else {
            to.to_string()
        };

        df.rename(from, target.as_str().into())?;
        debug!("Renamed column '{}' -> '{}'", from, target);
        summary.add_action(CleaningAction::new(
            ActionType::ColumnRenamed,
            target.as_str(),
            1,
            format!("Renamed '{}' to '{}'", from, target),
        ));
    }

    Ok(df)
}

/// Make `proposed` unique according to `policy`.
fn resolve_collisions(
    originals: &[String],
    proposed: &[String],
    policy: NameCollisionPolicy,
) -> Result<Vec<String>> {
    let natural: HashSet<&str> = proposed.iter().map(|s| s.as_str()).collect();
    let mut assigned: HashSet<String> = HashSet::with_capacity(proposed.len());
    let mut resolved = Vec::with_capacity(proposed.len());

    for name in proposed {
        if !assigned.contains(name) {
            assigned.insert(name.clone());
            resolved.push(name.clone());
            continue;
        }

        match policy {
            NameCollisionPolicy::Fail => {
                let sources = originals
                    .iter()
                    .zip(proposed)
                    .filter(|(_, p)| *p == name)
                    .map(|(o, _)| o.clone())
                    .collect();
                return Err(CleaningError::DuplicateColumn {
                    name: name.clone(),
                    sources,
                });
            }
            NameCollisionPolicy::Suffix => {
                // Never steal a name another column produces naturally.
                let taken: HashSet<&str> = assigned
                    .iter()
                    .map(|s| s.as_str())
                    .chain(natural.iter().copied())
                    .collect();
                let unique = next_free_suffix(name, &taken);
                assigned.insert(unique.clone());
                resolved.push(unique);
            }
        }
    }

    Ok(resolved)
}

fn next_free_suffix(base: &str, taken: &HashSet<&str>) -> String {
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
