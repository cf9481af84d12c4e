use crate::error::ExtractError;
use crate::fingerprint::fingerprint_transaction;
use crate::importer::Importer;
use crate::model::{Document, DUPLICATE_META};
use beanport_types::{sort_directives, Account, Directive};
use camino::Utf8PathBuf;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug)]
pub struct ExtractOptions {
    /// Mark repeated transactions (same fingerprint) within the run.
    pub mark_duplicates: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mark_duplicates: true,
        }
    }
}

#[derive(Clone, Debug)]
pub enum ExtractionOutcome {
    Extracted(Vec<Directive>),
    Failed(ExtractError),
}

#[derive(Clone, Debug)]
pub struct FileExtraction {
    pub source: Utf8PathBuf,
    pub importer: &'static str,
    pub account: Account,
    pub outcome: ExtractionOutcome,
}

#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    pub files: Vec<FileExtraction>,
    pub unmatched: Vec<Utf8PathBuf>,
}

impl ExtractReport {
    pub fn failed_files(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, ExtractionOutcome::Failed(_)))
            .count()
    }

    pub fn directive_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                ExtractionOutcome::Extracted(d) => d.len(),
                ExtractionOutcome::Failed(_) => 0,
            })
            .sum()
    }
}

#[derive(Clone, Debug)]
pub struct IdentifiedDocument {
    pub source: Utf8PathBuf,
    pub importer: &'static str,
    pub account: Account,
}

#[derive(Clone, Debug, Default)]
pub struct IdentifyReport {
    pub matches: Vec<IdentifiedDocument>,
    pub unmatched: Vec<Utf8PathBuf>,
}

/// Find the first importer claiming a document. Registry order decides ties.
fn claim<'a>(importers: &'a [Box<dyn Importer>], doc: &Document) -> Option<&'a dyn Importer> {
    importers.iter().map(|imp| &**imp).find(|imp| imp.identify(doc))
}

pub fn identify_documents(importers: &[Box<dyn Importer>], docs: &[Document]) -> IdentifyReport {
    let mut report = IdentifyReport::default();
    for doc in docs {
        match claim(importers, doc) {
            Some(imp) => report.matches.push(IdentifiedDocument {
                source: doc.path.clone(),
                importer: imp.name(),
                account: imp.account(doc),
            }),
            None => report.unmatched.push(doc.path.clone()),
        }
    }
    report
}

/// Run extraction over the documents.
///
/// Per-document failures are captured in the report; a broken download never
/// aborts the run. Directives are date-sorted within each file.
pub fn extract_documents(
    importers: &[Box<dyn Importer>],
    docs: &[Document],
    options: ExtractOptions,
) -> ExtractReport {
    let mut report = ExtractReport::default();

    for doc in docs {
        let Some(imp) = claim(importers, doc) else {
            report.unmatched.push(doc.path.clone());
            continue;
        };

        let outcome = match imp.extract(doc) {
            Ok(mut directives) => {
                sort_directives(&mut directives);
                ExtractionOutcome::Extracted(directives)
            }
            Err(err) => ExtractionOutcome::Failed(err),
        };

        report.files.push(FileExtraction {
            source: doc.path.clone(),
            importer: imp.name(),
            account: imp.account(doc),
            outcome,
        });
    }

    if options.mark_duplicates {
        mark_duplicates(&mut report);
    }

    report
}

/// Mark repeated transactions across the whole run. The first occurrence
/// stays clean; later ones get the internal duplicate marker.
fn mark_duplicates(report: &mut ExtractReport) {
    let mut seen: HashSet<String> = HashSet::new();
    for file in &mut report.files {
        let ExtractionOutcome::Extracted(directives) = &mut file.outcome else {
            continue;
        };
        for directive in directives {
            let Some(txn) = directive.as_transaction() else {
                continue;
            };
            let fp = fingerprint_transaction(txn);
            if !seen.insert(fp) {
                directive.meta_mut().insert(DUPLICATE_META, "true");
            }
        }
    }
}
