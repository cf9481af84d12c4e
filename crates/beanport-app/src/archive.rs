//! The `archive` use case: plan where claimed documents get filed.
//!
//! Planning is pure given the loaded documents; the CLI executes the moves.

use crate::{load_inputs, registry, resolve};
use anyhow::Context;
use beanport_settings::Overrides;
use camino::Utf8PathBuf;
use std::collections::BTreeMap;
use time::Date;

#[derive(Clone, Debug)]
pub struct ArchiveInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// Files and directories to scan.
    pub inputs: Vec<Utf8PathBuf>,
    /// Fallback filing date for documents without a statement date.
    pub today: Date,
    /// Allow overwriting existing archive entries.
    pub force: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveAction {
    pub source: Utf8PathBuf,
    pub dest: Utf8PathBuf,
}

#[derive(Clone, Debug, Default)]
pub struct ArchivePlan {
    pub actions: Vec<ArchiveAction>,
    pub unmatched: Vec<Utf8PathBuf>,
}

/// Plan the archive layout: `documents/<Account/As/Path>/<date>.<name>`.
///
/// Refuses when two sources collide on one destination, or when a
/// destination already exists (unless `force`).
pub fn plan_archive(input: ArchiveInput<'_>) -> anyhow::Result<ArchivePlan> {
    let cfg = resolve(input.config_text, input.overrides)?;
    let importers = registry::build_registry(&cfg)?;
    let docs = load_inputs(&cfg, &input.inputs)?;

    let mut plan = ArchivePlan::default();
    for doc in &docs {
        let Some(imp) = importers.iter().find(|imp| imp.identify(doc)) else {
            plan.unmatched.push(doc.path.clone());
            continue;
        };

        let date = imp.date(doc).unwrap_or(input.today);
        let name = imp
            .filename(doc)
            .unwrap_or_else(|| doc.file_name().to_string());

        let mut dest = cfg.documents_dir.clone();
        for component in imp.account(doc).as_path_components() {
            dest.push(component);
        }
        dest.push(format!("{date}.{name}"));

        plan.actions.push(ArchiveAction {
            source: doc.path.clone(),
            dest,
        });
    }

    check_collisions(&plan).context("archive plan has collisions")?;
    if !input.force {
        for action in &plan.actions {
            if action.dest.exists() {
                anyhow::bail!(
                    "destination already exists: {} (use --force to overwrite)",
                    action.dest
                );
            }
        }
    }

    tracing::info!(
        actions = plan.actions.len(),
        unmatched = plan.unmatched.len(),
        "archive planned"
    );
    Ok(plan)
}

fn check_collisions(plan: &ArchivePlan) -> anyhow::Result<()> {
    let mut by_dest: BTreeMap<&Utf8PathBuf, &Utf8PathBuf> = BTreeMap::new();
    for action in &plan.actions {
        if let Some(existing) = by_dest.insert(&action.dest, &action.source) {
            anyhow::bail!(
                "both {} and {} archive to {}",
                existing,
                action.source,
                action.dest
            );
        }
    }
    Ok(())
}
