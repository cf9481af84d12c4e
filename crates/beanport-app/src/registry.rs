use anyhow::Context;
use beanport_core::Importer;
use beanport_importers::{
    AppleCardImporter, ChaseImporter, OfxImporter, PaystubImporter, SchwabCsvImporter,
    SchwabJsonImporter,
};
use beanport_settings::{ResolvedConfig, ResolvedImporter};

/// Instantiate the importer registry from the resolved config, preserving
/// declaration order (the engine gives earlier importers claim priority).
pub fn build_registry(cfg: &ResolvedConfig) -> anyhow::Result<Vec<Box<dyn Importer>>> {
    cfg.importers
        .iter()
        .enumerate()
        .map(|(i, spec)| build_importer(spec, &cfg.currency).with_context(|| format!("importers[{i}]")))
        .collect()
}

fn build_importer(spec: &ResolvedImporter, currency: &str) -> anyhow::Result<Box<dyn Importer>> {
    Ok(match spec {
        ResolvedImporter::Ofx {
            acctid,
            account,
            basename,
            balance,
        } => Box::new(OfxImporter::new(
            acctid.clone(),
            account.clone(),
            basename.clone(),
            *balance,
        )),
        ResolvedImporter::SchwabJson {
            acctid,
            account,
            basename,
        } => Box::new(SchwabJsonImporter::new(
            acctid.clone(),
            account.clone(),
            basename.clone(),
            currency,
        )),
        ResolvedImporter::SchwabCsv { lastfour, account } => {
            Box::new(SchwabCsvImporter::new(lastfour, account.clone(), currency)?)
        }
        ResolvedImporter::Applecard { account } => {
            Box::new(AppleCardImporter::new(account.clone(), currency)?)
        }
        ResolvedImporter::Chase { lastfour, account } => {
            Box::new(ChaseImporter::new(lastfour, account.clone(), currency)?)
        }
        ResolvedImporter::Paystub {
            matcher,
            account,
            income,
            taxes,
            deductions,
            basename,
        } => Box::new(PaystubImporter::new(
            matcher.clone(),
            account.clone(),
            income.clone(),
            taxes.clone(),
            deductions.clone(),
            basename.clone(),
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanport_settings::{parse_config_toml, resolve_config, Overrides};

    #[test]
    fn registry_preserves_declaration_order() {
        let cfg = parse_config_toml(
            r#"
[[importers]]
kind = "applecard"
account = "Liabilities:AppleCard"

[[importers]]
kind = "chase"
lastfour = "5678"
account = "Liabilities:Chase:Visa"
"#,
        )
        .expect("parse");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        let registry = build_registry(&resolved).expect("registry");

        let names: Vec<&str> = registry.iter().map(|imp| imp.name()).collect();
        assert_eq!(names, vec!["applecard", "chase"]);
    }
}
