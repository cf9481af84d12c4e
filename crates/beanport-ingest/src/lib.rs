//! Filesystem adapters: discover candidate documents and read them.
//!
//! This crate is allowed to do filesystem IO. Identification and extraction
//! stay pure; they receive fully loaded `Document`s from here.

#![forbid(unsafe_code)]

mod discover;

use anyhow::Context;
use beanport_core::Document;
use camino::Utf8PathBuf;
use rayon::prelude::*;

pub use discover::{discover_documents, DiscoveryFilters};

/// Read the discovered files into documents, in parallel. Order of the
/// input paths is preserved.
pub fn load_documents(paths: &[Utf8PathBuf]) -> anyhow::Result<Vec<Document>> {
    paths
        .par_iter()
        .map(|path| {
            let contents =
                std::fs::read_to_string(path).with_context(|| format!("read {}", path))?;
            Ok(Document::new(path.clone(), contents))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    #[test]
    fn load_preserves_input_order_and_contents() {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");

        beanport_test_util::write_file(&root.join("b.csv"), "b-contents");
        beanport_test_util::write_file(&root.join("a.csv"), "a-contents");

        let paths = vec![root.join("b.csv"), root.join("a.csv")];
        let docs = load_documents(&paths).expect("load");

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].contents, "b-contents");
        assert_eq!(docs[1].contents, "a-contents");
        assert_eq!(docs[1].mime(), Some("text/csv"));
    }

    #[test]
    fn load_reports_the_failing_path() {
        let err = load_documents(&[Utf8PathBuf::from("does/not/exist.csv")])
            .expect_err("should fail");
        assert!(format!("{err:#}").contains("does/not/exist.csv"));
    }
}
