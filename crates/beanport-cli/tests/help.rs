use assert_cmd::Command;

/// Helper to get a Command for the beanport binary.
#[allow(deprecated)]
fn beanport_cmd() -> Command {
    Command::cargo_bin("beanport").unwrap()
}

#[test]
fn help_works() {
    beanport_cmd().arg("--help").assert().success();
}

#[test]
fn subcommand_help_works() {
    for sub in ["identify", "extract", "archive"] {
        beanport_cmd().args([sub, "--help"]).assert().success();
    }
}

#[test]
fn missing_paths_argument_fails() {
    beanport_cmd().arg("extract").assert().failure();
}
