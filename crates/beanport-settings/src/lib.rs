//! Config parsing and importer registry resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration
//! provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{
    ArchiveConfig, BeanportConfigV1, ExtractConfig, ImporterConfig, IngestConfig,
};
pub use resolve::{Overrides, ResolvedConfig, ResolvedImporter};

/// Parse `beanport.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<BeanportConfigV1> {
    let cfg: BeanportConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the runtime config used by the engine (defaults + overrides +
/// validated importer declarations).
pub fn resolve_config(
    cfg: BeanportConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
