use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Include/exclude globs applied to paths relative to each walked root.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryFilters {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Discover candidate documents under the given roots.
///
/// Behavior:
/// - A root that is a file is taken as-is (filters don't apply; the user
///   asked for it explicitly).
/// - A root that is a directory is walked recursively; hidden entries are
///   skipped, then include/exclude globs apply (empty include means all).
pub fn discover_documents(
    roots: &[Utf8PathBuf],
    filters: &DiscoveryFilters,
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let include = build_globset(&filters.include).context("compile include globset")?;
    let exclude = build_globset(&filters.exclude).context("compile exclude globset")?;

    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for root in roots {
        if !root.exists() {
            anyhow::bail!("input path does not exist: {root}");
        }
        if root.is_file() {
            out.push(root.clone());
            continue;
        }

        for abs in WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        {
            let rel = abs
                .strip_prefix(root)
                .unwrap_or(&abs)
                .as_str()
                .replace('\\', "/");

            if is_hidden(&rel) {
                continue;
            }
            let included = filters.include.is_empty() || include.is_match(&rel);
            if included && !exclude.is_match(&rel) {
                out.push(abs);
            }
        }
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn is_hidden(rel: &str) -> bool {
    Utf8Path::new(rel)
        .components()
        .any(|c| c.as_str().starts_with('.'))
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanport_test_util::write_file;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn rel_names(root: &Utf8Path, paths: &[Utf8PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap_or(p).as_str().to_string())
            .collect()
    }

    #[test]
    fn discover_walks_directories_and_sorts() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("b/statement.qfx"), "");
        write_file(&root.join("a/export.csv"), "");

        let found =
            discover_documents(&[root.clone()], &DiscoveryFilters::default()).expect("discover");
        assert_eq!(
            rel_names(&root, &found),
            vec!["a/export.csv", "b/statement.qfx"]
        );
    }

    #[test]
    fn discover_skips_hidden_entries() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join(".DS_Store"), "");
        write_file(&root.join(".cache/export.csv"), "");
        write_file(&root.join("export.csv"), "");

        let found =
            discover_documents(&[root.clone()], &DiscoveryFilters::default()).expect("discover");
        assert_eq!(rel_names(&root, &found), vec!["export.csv"]);
    }

    #[test]
    fn discover_applies_include_and_exclude_globs() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("statements/a.qfx"), "");
        write_file(&root.join("statements/skip/b.qfx"), "");
        write_file(&root.join("notes/readme.md"), "");

        let filters = DiscoveryFilters {
            include: vec!["statements/**".to_string()],
            exclude: vec!["statements/skip/**".to_string()],
        };
        let found = discover_documents(&[root.clone()], &filters).expect("discover");
        assert_eq!(rel_names(&root, &found), vec!["statements/a.qfx"]);
    }

    #[test]
    fn explicit_file_roots_bypass_filters() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        write_file(&root.join("export.csv"), "");

        let filters = DiscoveryFilters {
            include: vec!["nothing/**".to_string()],
            exclude: Vec::new(),
        };
        let found = discover_documents(&[root.join("export.csv")], &filters).expect("discover");
        assert_eq!(found, vec![root.join("export.csv")]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = discover_documents(
            &[Utf8PathBuf::from("no/such/dir")],
            &DiscoveryFilters::default(),
        )
        .expect_err("should fail");
        assert!(err.to_string().contains("no/such/dir"));
    }

    #[test]
    fn invalid_glob_returns_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        let filters = DiscoveryFilters {
            include: vec!["[".to_string()],
            exclude: Vec::new(),
        };
        let err = discover_documents(&[root], &filters).expect_err("should fail");
        assert!(err.to_string().contains("compile include globset"));
    }
}
