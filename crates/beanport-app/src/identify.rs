//! The `identify` use case: which importer claims which document.

use crate::{load_inputs, registry, resolve};
use beanport_core::IdentifyReport;
use beanport_settings::Overrides;
use camino::Utf8PathBuf;

#[derive(Clone, Debug)]
pub struct IdentifyInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// Files and directories to scan.
    pub inputs: Vec<Utf8PathBuf>,
}

pub fn run_identify(input: IdentifyInput<'_>) -> anyhow::Result<IdentifyReport> {
    let cfg = resolve(input.config_text, input.overrides)?;
    let importers = registry::build_registry(&cfg)?;
    if importers.is_empty() {
        tracing::warn!("no importers configured; nothing will be claimed");
    }
    let docs = load_inputs(&cfg, &input.inputs)?;

    let report = beanport_core::identify_documents(&importers, &docs);
    tracing::info!(
        matched = report.matches.len(),
        unmatched = report.unmatched.len(),
        "identify finished"
    );
    Ok(report)
}
