//! Use case orchestration for beanport.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, ingest, engine, and render layers. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing and the
//! actual file moves for `archive`.

#![forbid(unsafe_code)]

mod archive;
mod extract;
mod identify;
mod registry;

pub use archive::{plan_archive, ArchiveAction, ArchiveInput, ArchivePlan};
pub use extract::{extract_exit_code, run_extract, ExtractInput, ExtractOutput};
pub use identify::{run_identify, IdentifyInput};
pub use registry::build_registry;

use anyhow::Context;
use beanport_core::Document;
use beanport_ingest::DiscoveryFilters;
use beanport_settings::{Overrides, ResolvedConfig};
use camino::Utf8PathBuf;

/// Parse + resolve config text (empty is allowed, defaults apply).
fn resolve(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        beanport_settings::BeanportConfigV1::default()
    } else {
        beanport_settings::parse_config_toml(config_text).context("parse config")?
    };
    beanport_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Discover and load candidate documents for the given input paths.
fn load_inputs(cfg: &ResolvedConfig, inputs: &[Utf8PathBuf]) -> anyhow::Result<Vec<Document>> {
    let filters = DiscoveryFilters {
        include: cfg.include.clone(),
        exclude: cfg.exclude.clone(),
    };
    let paths =
        beanport_ingest::discover_documents(inputs, &filters).context("discover documents")?;
    tracing::debug!(count = paths.len(), "documents discovered");
    beanport_ingest::load_documents(&paths).context("load documents")
}
