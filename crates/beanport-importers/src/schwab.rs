//! Importers for Charles Schwab checking account exports.
//!
//! Two generations of export format: the current JSON transaction files and
//! the legacy CSV download. Schwab files carry no account id in the body, so
//! both identify off the partially redacted account number in the file name.

use crate::utils::{matches_start, parse_mdy, parse_money, titled};
use beanport_core::{Document, ExtractError, Importer};
use beanport_types::{Account, Amount, Directive, Flag, Metadata, Posting, Transaction};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use time::Date;

/// An importer for Schwab checking account JSON transaction files.
pub struct SchwabJsonImporter {
    acctid: Regex,
    account: Account,
    basename: Option<String>,
    currency: String,
}

impl SchwabJsonImporter {
    /// `acctid` matches against the redacted account number in the file
    /// stem; the stem format has changed over time, so it is config-driven.
    pub fn new(
        acctid: Regex,
        account: Account,
        basename: Option<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            acctid,
            account,
            basename,
            currency: currency.into(),
        }
    }

    fn parse(&self, doc: &Document) -> Result<CheckingExport, ExtractError> {
        serde_json::from_str(&doc.contents)
            .map_err(|err| ExtractError::malformed("schwab json", err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct CheckingExport {
    #[serde(rename = "ToDate")]
    to_date: String,
    #[serde(rename = "PostedTransactions", default)]
    posted_transactions: Vec<PostedTransaction>,
}

#[derive(Debug, Deserialize)]
struct PostedTransaction {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "CheckNumber", default)]
    check_number: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Withdrawal", default)]
    withdrawal: Option<String>,
    #[serde(rename = "Deposit", default)]
    deposit: Option<String>,
}

impl Importer for SchwabJsonImporter {
    fn name(&self) -> &'static str {
        "schwab_json"
    }

    fn identify(&self, doc: &Document) -> bool {
        if doc.mime() != Some("application/json") {
            return false;
        }
        let stem = doc.stem();
        stem.to_lowercase().contains("checking_transactions") && matches_start(&self.acctid, stem)
    }

    fn account(&self, _doc: &Document) -> Account {
        self.account.clone()
    }

    fn date(&self, doc: &Document) -> Option<Date> {
        let export = self.parse(doc).ok()?;
        parse_mdy(&export.to_date, 0).ok()
    }

    fn filename(&self, doc: &Document) -> Option<String> {
        self.basename
            .as_ref()
            .map(|base| format!("{}.{}", base, doc.extension().unwrap_or("json")))
    }

    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError> {
        let export = self.parse(doc)?;

        let mut entries = Vec::new();
        for (i, row) in export.posted_transactions.iter().enumerate() {
            let index = i as u32;
            let date = parse_mdy(&row.date, index)?;

            let withdrawal = row.withdrawal.as_deref().unwrap_or("");
            let deposit = row.deposit.as_deref().unwrap_or("");
            let number = if !withdrawal.is_empty() {
                -parse_money(withdrawal, index)?
            } else if !deposit.is_empty() {
                parse_money(deposit, index)?
            } else {
                continue;
            };

            let mut meta = Metadata::from_source(doc.path.as_str(), index);
            if let Some(kind) = row.kind.as_deref() {
                meta.insert("transaction_type", kind);
            }
            match row.check_number.as_deref() {
                Some("") | None => {}
                Some(check) => meta.insert("check_number", check),
            }

            entries.push(Directive::Transaction(Transaction {
                meta,
                date,
                flag: Flag::Okay,
                payee: None,
                narration: row.description.clone().unwrap_or_default(),
                tags: BTreeSet::new(),
                links: BTreeSet::new(),
                postings: vec![Posting::new(
                    self.account.clone(),
                    Amount::new(number, self.currency.clone()),
                )],
            }));
        }

        Ok(entries)
    }
}

/// An importer for the legacy Schwab checking CSV download: a few preamble
/// lines, a `Posted Transactions` marker, then positional rows.
pub struct SchwabCsvImporter {
    lastfour: String,
    filename_re: Regex,
    range_re: Regex,
    account: Account,
    currency: String,
}

impl SchwabCsvImporter {
    pub fn new(
        lastfour: &str,
        account: Account,
        currency: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let filename_re = Regex::new(&format!(
            r"XXXXXX.*{}_Checking_Transactions_.*\.CSV",
            regex::escape(lastfour)
        ))?;
        let range_re = Regex::new(r"(?i)to (\d{1,2}/\d{1,2}/\d{4})")?;
        Ok(Self {
            lastfour: lastfour.to_string(),
            filename_re,
            range_re,
            account,
            currency: currency.into(),
        })
    }
}

impl Importer for SchwabCsvImporter {
    fn name(&self) -> &'static str {
        "schwab_csv"
    }

    fn identify(&self, doc: &Document) -> bool {
        matches_start(&self.filename_re, doc.file_name())
    }

    fn account(&self, _doc: &Document) -> Account {
        self.account.clone()
    }

    fn date(&self, doc: &Document) -> Option<Date> {
        // The statement range lives in the title line: "... to 02/28/2021".
        let first = doc.contents.lines().next()?;
        let caps = self.range_re.captures(first)?;
        parse_mdy(caps.get(1)?.as_str(), 0).ok()
    }

    fn filename(&self, _doc: &Document) -> Option<String> {
        Some(format!("SchwabBank{}.csv", self.lastfour))
    }

    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError> {
        let marker = doc
            .contents
            .lines()
            .position(|line| line.contains("Posted Transactions"))
            .ok_or_else(|| {
                ExtractError::malformed("schwab csv", "missing 'Posted Transactions' marker")
            })?;
        let body = doc
            .contents
            .lines()
            .skip(marker + 1)
            .collect::<Vec<_>>()
            .join("\n");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body.as_bytes());

        let mut entries = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let index = i as u32;
            let record =
                record.map_err(|err| ExtractError::malformed("schwab csv", err.to_string()))?;

            let date_field = record.get(0).unwrap_or("");
            if date_field.is_empty() || date_field == "Date" {
                continue;
            }
            let date = parse_mdy(date_field, index)?;

            let withdrawal = record.get(4).unwrap_or("");
            let deposit = record.get(5).unwrap_or("");
            let number = if !withdrawal.is_empty() {
                -parse_money(withdrawal, index)?
            } else if !deposit.is_empty() {
                parse_money(deposit, index)?
            } else {
                // Zero dollar transaction (pending hold).
                continue;
            };

            let payee = titled(record.get(3).unwrap_or(""));

            entries.push(Directive::Transaction(Transaction {
                meta: Metadata::from_source(doc.path.as_str(), index),
                date,
                flag: Flag::Okay,
                payee: Some(payee),
                narration: String::new(),
                tags: BTreeSet::new(),
                links: BTreeSet::new(),
                postings: vec![Posting::new(
                    self.account.clone(),
                    Amount::new(number, self.currency.clone()),
                )],
            }));
        }

        Ok(entries)
    }
}
