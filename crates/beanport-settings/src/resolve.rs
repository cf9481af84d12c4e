use crate::model::{BeanportConfigV1, ImporterConfig};
use anyhow::Context;
use beanport_core::BalanceType;
use beanport_types::Account;
use camino::Utf8PathBuf;
use globset::Glob;
use regex::Regex;

/// CLI-level overrides, folded in over the file config.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub currency: Option<String>,
    pub documents: Option<Utf8PathBuf>,
}

/// Validated runtime configuration.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub currency: String,
    pub documents_dir: Utf8PathBuf,
    pub mark_duplicates: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub importers: Vec<ResolvedImporter>,
}

/// An importer declaration with every field parsed and validated.
#[derive(Clone, Debug)]
pub enum ResolvedImporter {
    Ofx {
        acctid: Regex,
        account: Account,
        basename: Option<String>,
        balance: BalanceType,
    },
    SchwabJson {
        acctid: Regex,
        account: Account,
        basename: Option<String>,
    },
    SchwabCsv {
        lastfour: String,
        account: Account,
    },
    Applecard {
        account: Account,
    },
    Chase {
        lastfour: String,
        account: Account,
    },
    Paystub {
        matcher: Regex,
        account: Account,
        income: Account,
        taxes: Account,
        deductions: Account,
        basename: Option<String>,
    },
}

pub fn resolve_config(
    cfg: BeanportConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let currency = overrides
        .currency
        .or(cfg.currency)
        .unwrap_or_else(|| "USD".to_string());

    let documents_dir = overrides
        .documents
        .or(cfg.archive.documents.map(Utf8PathBuf::from))
        .unwrap_or_else(|| Utf8PathBuf::from("documents"));

    validate_globs("ingest.include", &cfg.ingest.include)?;
    validate_globs("ingest.exclude", &cfg.ingest.exclude)?;

    let importers = cfg
        .importers
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            resolve_importer(spec).with_context(|| format!("importers[{i}] ({})", kind_name(spec)))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ResolvedConfig {
        currency,
        documents_dir,
        mark_duplicates: cfg.extract.mark_duplicates.unwrap_or(true),
        include: cfg.ingest.include,
        exclude: cfg.ingest.exclude,
        importers,
    })
}

fn kind_name(spec: &ImporterConfig) -> &'static str {
    match spec {
        ImporterConfig::Ofx { .. } => "ofx",
        ImporterConfig::SchwabJson { .. } => "schwab_json",
        ImporterConfig::SchwabCsv { .. } => "schwab_csv",
        ImporterConfig::Applecard { .. } => "applecard",
        ImporterConfig::Chase { .. } => "chase",
        ImporterConfig::Paystub { .. } => "paystub",
    }
}

fn resolve_importer(spec: &ImporterConfig) -> anyhow::Result<ResolvedImporter> {
    match spec {
        ImporterConfig::Ofx {
            acctid,
            account,
            basename,
            balance,
        } => Ok(ResolvedImporter::Ofx {
            acctid: parse_regex("acctid", acctid)?,
            account: parse_account("account", account)?,
            basename: basename.clone(),
            balance: parse_balance(balance.as_deref())?,
        }),
        ImporterConfig::SchwabJson {
            acctid,
            account,
            basename,
        } => Ok(ResolvedImporter::SchwabJson {
            acctid: parse_regex("acctid", acctid)?,
            account: parse_account("account", account)?,
            basename: basename.clone(),
        }),
        ImporterConfig::SchwabCsv { lastfour, account } => Ok(ResolvedImporter::SchwabCsv {
            lastfour: lastfour.clone(),
            account: parse_account("account", account)?,
        }),
        ImporterConfig::Applecard { account } => Ok(ResolvedImporter::Applecard {
            account: parse_account("account", account)?,
        }),
        ImporterConfig::Chase { lastfour, account } => Ok(ResolvedImporter::Chase {
            lastfour: lastfour.clone(),
            account: parse_account("account", account)?,
        }),
        ImporterConfig::Paystub {
            r#match,
            account,
            income,
            taxes,
            deductions,
            basename,
        } => Ok(ResolvedImporter::Paystub {
            matcher: parse_regex("match", r#match)?,
            account: parse_account("account", account)?,
            income: parse_account("income", income)?,
            taxes: parse_account("taxes", taxes)?,
            deductions: parse_account("deductions", deductions)?,
            basename: basename.clone(),
        }),
    }
}

fn parse_regex(field: &str, pattern: &str) -> anyhow::Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid {field} regex: {pattern}"))
}

fn parse_account(field: &str, value: &str) -> anyhow::Result<Account> {
    Account::parse(value).with_context(|| format!("invalid {field} account: {value}"))
}

fn parse_balance(v: Option<&str>) -> anyhow::Result<BalanceType> {
    match v {
        None => Ok(BalanceType::Declared),
        Some("none") => Ok(BalanceType::None),
        Some("declared") => Ok(BalanceType::Declared),
        Some("last") => Ok(BalanceType::Last),
        Some(other) => anyhow::bail!("unknown balance type: {other} (expected none|declared|last)"),
    }
}

fn validate_globs(field: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid {field} glob: {pattern}"))?;
    }
    Ok(())
}
