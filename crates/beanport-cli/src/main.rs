//! CLI entry point for beanport.
//!
//! This module is intentionally thin: it handles argument parsing, IO, and
//! exit codes. The use cases live in the `beanport-app` crate.

use anyhow::Context;
use beanport_app::{
    extract_exit_code, plan_archive, run_extract, run_identify, ArchiveInput, ArchivePlan,
    ExtractInput, IdentifyInput,
};
use beanport_settings::Overrides;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "beanport",
    version,
    about = "Beancount importers for downloaded statement files"
)]
struct Cli {
    /// Path to the beanport config TOML.
    #[arg(long, default_value = "beanport.toml")]
    config: Utf8PathBuf,

    /// Override the currency assumed by importers whose format carries none.
    #[arg(long)]
    currency: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List which importer claims each document.
    Identify {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,
    },

    /// Extract directives and render them as beancount text.
    Extract {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,

        /// Write the output here instead of stdout.
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// File claimed documents into the date/account archive tree.
    Archive {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,

        /// Archive root (overrides the config value).
        #[arg(long)]
        documents: Option<Utf8PathBuf>,

        /// Print the plan without moving anything.
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing archive entries.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Missing config file is allowed; defaults apply.
    let config_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

    match cli.cmd {
        Commands::Identify { ref paths } => cmd_identify(&cli, &config_text, paths.clone()),
        Commands::Extract {
            ref paths,
            ref output,
        } => cmd_extract(&cli, &config_text, paths.clone(), output.clone()),
        Commands::Archive {
            ref paths,
            ref documents,
            dry_run,
            force,
        } => cmd_archive(
            &cli,
            &config_text,
            paths.clone(),
            documents.clone(),
            dry_run,
            force,
        ),
    }
}

fn overrides(cli: &Cli, documents: Option<Utf8PathBuf>) -> Overrides {
    Overrides {
        currency: cli.currency.clone(),
        documents,
    }
}

fn cmd_identify(cli: &Cli, config_text: &str, paths: Vec<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = run_identify(IdentifyInput {
        config_text,
        overrides: overrides(cli, None),
        inputs: paths,
    })?;
    print!("{}", beanport_render::render_identify(&report));
    Ok(())
}

fn cmd_extract(
    cli: &Cli,
    config_text: &str,
    paths: Vec<Utf8PathBuf>,
    output: Option<Utf8PathBuf>,
) -> anyhow::Result<()> {
    let result = run_extract(ExtractInput {
        config_text,
        overrides: overrides(cli, None),
        inputs: paths,
    })?;

    match output {
        Some(path) => write_text_file(&path, &result.rendered)?,
        None => print!("{}", result.rendered),
    }

    for path in &result.report.unmatched {
        eprintln!("beanport: no importer for {path}");
    }

    let code = extract_exit_code(&result.report);
    if code != 0 {
        eprintln!(
            "beanport: {} file(s) failed to extract",
            result.report.failed_files()
        );
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_archive(
    cli: &Cli,
    config_text: &str,
    paths: Vec<Utf8PathBuf>,
    documents: Option<Utf8PathBuf>,
    dry_run: bool,
    force: bool,
) -> anyhow::Result<()> {
    let today = time::OffsetDateTime::now_utc().date();
    let plan = plan_archive(ArchiveInput {
        config_text,
        overrides: overrides(cli, documents),
        inputs: paths,
        today,
        force,
    })?;

    for action in &plan.actions {
        println!("{} -> {}", action.source, action.dest);
    }
    for path in &plan.unmatched {
        eprintln!("beanport: no importer for {path}");
    }

    if !dry_run {
        execute_plan(&plan)?;
    }
    Ok(())
}

fn execute_plan(plan: &ArchivePlan) -> anyhow::Result<()> {
    for action in &plan.actions {
        if let Some(parent) = action.dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {parent}"))?;
        }
        move_file(&action.source, &action.dest)
            .with_context(|| format!("archive {} to {}", action.source, action.dest))?;
    }
    Ok(())
}

/// Rename, falling back to copy+remove for cross-device moves.
fn move_file(source: &Utf8PathBuf, dest: &Utf8PathBuf) -> std::io::Result<()> {
    match std::fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(source, dest)?;
            std::fs::remove_file(source)
        }
    }
}

fn write_text_file(path: &Utf8PathBuf, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write output: {path}"))?;
    Ok(())
}
