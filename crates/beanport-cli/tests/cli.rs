//! End-to-end CLI tests over temp-dir fixtures.

use assert_cmd::Command;
use beanport_test_util::{
    write_file, APPLECARD_CSV, APPLECARD_CSV_NAME, OFX_CREDIT_CARD, SCHWAB_CHECKING_JSON_NAME,
};
use camino::{Utf8Path, Utf8PathBuf};
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
schema = "beanport.config.v1"

[[importers]]
kind = "ofx"
acctid = "1234567890123456"
account = "Liabilities:CreditCard"
basename = "creditcard"

[[importers]]
kind = "applecard"
account = "Liabilities:AppleCard"
"#;

/// Helper to get a Command for the beanport binary.
#[allow(deprecated)]
fn beanport_cmd() -> Command {
    Command::cargo_bin("beanport").unwrap()
}

/// A workspace with a config file and a downloads directory holding an OFX
/// statement and an Apple Card export.
fn setup() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");

    write_file(&root.join("beanport.toml"), CONFIG);
    write_file(&root.join("downloads/statement.qfx"), OFX_CREDIT_CARD);
    write_file(
        &root.join("downloads").join(APPLECARD_CSV_NAME),
        APPLECARD_CSV,
    );

    (tmp, root)
}

fn run(root: &Utf8Path, args: &[&str]) -> assert_cmd::assert::Assert {
    beanport_cmd()
        .arg("--config")
        .arg(root.join("beanport.toml").as_str())
        .args(args)
        .arg(root.join("downloads").as_str())
        .assert()
}

#[test]
fn identify_lists_claimed_documents() {
    let (_tmp, root) = setup();

    run(&root, &["identify"])
        .success()
        .stdout(predicate::str::contains("importer: ofx"))
        .stdout(predicate::str::contains("account: Liabilities:CreditCard"))
        .stdout(predicate::str::contains("importer: applecard"));
}

#[test]
fn identify_reports_unclaimed_documents() {
    let (_tmp, root) = setup();
    write_file(&root.join("downloads/random.bin"), "junk");

    run(&root, &["identify"])
        .success()
        .stdout(predicate::str::contains("*** unidentified"))
        .stdout(predicate::str::contains("random.bin"));
}

#[test]
fn extract_prints_beancount_text() {
    let (_tmp, root) = setup();

    run(&root, &["extract"])
        .success()
        .stdout(predicate::str::starts_with(";; -*- mode: beancount -*-"))
        .stdout(predicate::str::contains(
            "\"COFFEE & BAKERY / CARD PURCHASE\"",
        ))
        .stdout(predicate::str::contains("* \"Acme Coffee\" \"\""))
        .stdout(predicate::str::contains(
            "2021-03-02 balance Liabilities:CreditCard  -125.40 USD",
        ));
}

#[test]
fn extract_writes_to_output_file() {
    let (_tmp, root) = setup();
    let out = root.join("out/ledger.beancount");

    beanport_cmd()
        .arg("--config")
        .arg(root.join("beanport.toml").as_str())
        .args(["extract", "--output", out.as_str()])
        .arg(root.join("downloads").as_str())
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).expect("output file");
    assert!(written.contains("**** "));
    assert!(written.contains("Acme Coffee"));
}

#[test]
fn extract_exits_2_when_a_claimed_file_is_broken() {
    let (_tmp, root) = setup();
    // Claimed by name, but the body is not JSON.
    let config = format!(
        "{CONFIG}\n[[importers]]\nkind = \"schwab_json\"\nacctid = \"XXXXXX1234\"\naccount = \"Assets:Schwab:Checking\"\n"
    );
    write_file(&root.join("beanport.toml"), &config);
    write_file(
        &root.join("downloads").join(SCHWAB_CHECKING_JSON_NAME),
        "not json at all",
    );

    run(&root, &["extract"])
        .code(2)
        .stdout(predicate::str::contains("; error:"))
        .stderr(predicate::str::contains("failed to extract"));
}

#[test]
fn archive_dry_run_plans_but_moves_nothing() {
    let (_tmp, root) = setup();
    let documents = root.join("documents");

    beanport_cmd()
        .arg("--config")
        .arg(root.join("beanport.toml").as_str())
        .args(["archive", "--documents", documents.as_str(), "--dry-run"])
        .arg(root.join("downloads").as_str())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Liabilities/AppleCard/2021-03-31.AppleCard.csv",
        ));

    assert!(root.join("downloads/statement.qfx").exists());
    assert!(!documents.exists());
}

#[test]
fn archive_moves_claimed_files_into_the_tree() {
    let (_tmp, root) = setup();
    let documents = root.join("documents");

    beanport_cmd()
        .arg("--config")
        .arg(root.join("beanport.toml").as_str())
        .args(["archive", "--documents", documents.as_str()])
        .arg(root.join("downloads").as_str())
        .assert()
        .success();

    assert!(documents
        .join("Liabilities/AppleCard/2021-03-31.AppleCard.csv")
        .exists());
    assert!(documents
        .join("Liabilities/CreditCard/2021-03-01.creditcard.qfx")
        .exists());
    assert!(!root.join("downloads/statement.qfx").exists());
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let tmp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
    write_file(&root.join("downloads/export.csv"), "a,b\n1,2\n");

    beanport_cmd()
        .arg("--config")
        .arg(root.join("nonexistent.toml").as_str())
        .arg("identify")
        .arg(root.join("downloads").as_str())
        .assert()
        .success()
        .stdout(predicate::str::contains("*** unidentified"));
}
