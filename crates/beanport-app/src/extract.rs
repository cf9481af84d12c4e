//! The `extract` use case: run the engine and render beancount text.

use crate::{load_inputs, registry, resolve};
use beanport_core::{ExtractOptions, ExtractReport};
use beanport_settings::Overrides;
use camino::Utf8PathBuf;

#[derive(Clone, Debug)]
pub struct ExtractInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// Files and directories to scan.
    pub inputs: Vec<Utf8PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ExtractOutput {
    /// The beancount text for the whole run.
    pub rendered: String,
    pub report: ExtractReport,
}

pub fn run_extract(input: ExtractInput<'_>) -> anyhow::Result<ExtractOutput> {
    let cfg = resolve(input.config_text, input.overrides)?;
    let importers = registry::build_registry(&cfg)?;
    let docs = load_inputs(&cfg, &input.inputs)?;

    let report = beanport_core::extract_documents(
        &importers,
        &docs,
        ExtractOptions {
            mark_duplicates: cfg.mark_duplicates,
        },
    );
    tracing::info!(
        files = report.files.len(),
        directives = report.directive_count(),
        failed = report.failed_files(),
        "extract finished"
    );

    let rendered = beanport_render::render_extraction(&report);
    Ok(ExtractOutput { rendered, report })
}

/// Map the run to an exit code: 0 = all claimed files extracted, 2 = some
/// file failed.
pub fn extract_exit_code(report: &ExtractReport) -> i32 {
    if report.failed_files() > 0 { 2 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanport_test_util::{
        write_file, APPLECARD_CSV, APPLECARD_CSV_NAME, OFX_CREDIT_CARD, SCHWAB_CHECKING_JSON,
        SCHWAB_CHECKING_JSON_NAME,
    };
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[[importers]]
kind = "ofx"
acctid = "1234567890123456"
account = "Liabilities:CreditCard"

[[importers]]
kind = "applecard"
account = "Liabilities:AppleCard"

[[importers]]
kind = "schwab_json"
acctid = "XXXXXX1234"
account = "Assets:Schwab:Checking"
"#;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn extract_runs_all_importers_and_renders() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("statement.qfx"), OFX_CREDIT_CARD);
        write_file(&root.join(APPLECARD_CSV_NAME), APPLECARD_CSV);
        write_file(&root.join(SCHWAB_CHECKING_JSON_NAME), SCHWAB_CHECKING_JSON);

        let output = run_extract(ExtractInput {
            config_text: CONFIG,
            overrides: Overrides::default(),
            inputs: vec![root],
        })
        .expect("extract");

        assert_eq!(output.report.files.len(), 3);
        assert_eq!(output.report.failed_files(), 0);
        assert_eq!(extract_exit_code(&output.report), 0);

        assert!(output.rendered.starts_with(";; -*- mode: beancount -*-\n"));
        assert!(output.rendered.contains("COFFEE & BAKERY / CARD PURCHASE"));
        assert!(output.rendered.contains("Acme Coffee"));
        assert!(output.rendered.contains("Check Paid #1021"));
        assert!(output
            .rendered
            .contains("2021-03-02 balance Liabilities:CreditCard  -125.40 USD"));
    }

    #[test]
    fn broken_documents_fail_the_run_but_not_the_rest() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join(APPLECARD_CSV_NAME), APPLECARD_CSV);
        write_file(
            &root.join(SCHWAB_CHECKING_JSON_NAME),
            "{\"PostedTransactions\": truncated",
        );

        let output = run_extract(ExtractInput {
            config_text: CONFIG,
            overrides: Overrides::default(),
            inputs: vec![root],
        })
        .expect("extract");

        assert_eq!(output.report.files.len(), 2);
        assert_eq!(output.report.failed_files(), 1);
        assert_eq!(extract_exit_code(&output.report), 2);
        assert!(output.rendered.contains("; error:"));
        assert!(output.rendered.contains("Acme Coffee"));
    }

    #[test]
    fn the_same_export_twice_marks_duplicates() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("a").join(APPLECARD_CSV_NAME), APPLECARD_CSV);
        write_file(&root.join("b").join(APPLECARD_CSV_NAME), APPLECARD_CSV);

        let output = run_extract(ExtractInput {
            config_text: CONFIG,
            overrides: Overrides::default(),
            inputs: vec![root],
        })
        .expect("extract");

        let commented = output
            .rendered
            .lines()
            .filter(|line| line.starts_with("; 2021-"))
            .count();
        assert_eq!(commented, 4);
    }
}
