//! Importer for Chase account activity CSV downloads.

use crate::utils::{matches_start, parse_mdy, parse_money, parse_ymd_compact, titled};
use beanport_core::{Document, ExtractError, Importer};
use beanport_types::{Account, Amount, Directive, Flag, Metadata, Posting, Transaction};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use time::Date;

/// An importer for `Chase{lastfour}_Activity….CSV` downloads.
pub struct ChaseImporter {
    lastfour: String,
    filename_re: Regex,
    stamp_re: Regex,
    account: Account,
    currency: String,
}

impl ChaseImporter {
    pub fn new(
        lastfour: &str,
        account: Account,
        currency: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let filename_re = Regex::new(&format!(r"Chase{}.*\.CSV", regex::escape(lastfour)))?;
        // Chase stamps the download with three dates; the second is the end
        // of the activity range.
        let stamp_re = Regex::new(r"(?i)Chase\d{4}_Activity\d{8}_(\d{8})_\d{8}\.CSV")?;
        Ok(Self {
            lastfour: lastfour.to_string(),
            filename_re,
            stamp_re,
            account,
            currency: currency.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Transaction Date")]
    transaction_date: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Amount")]
    amount: String,
}

impl Importer for ChaseImporter {
    fn name(&self) -> &'static str {
        "chase"
    }

    fn identify(&self, doc: &Document) -> bool {
        matches_start(&self.filename_re, doc.file_name())
    }

    fn account(&self, _doc: &Document) -> Account {
        self.account.clone()
    }

    fn date(&self, doc: &Document) -> Option<Date> {
        let caps = self.stamp_re.captures(doc.file_name())?;
        parse_ymd_compact(caps.get(1)?.as_str(), 0).ok()
    }

    fn filename(&self, _doc: &Document) -> Option<String> {
        Some(format!("Chase{}.csv", self.lastfour))
    }

    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError> {
        let mut reader = csv::Reader::from_reader(doc.contents.as_bytes());

        let mut entries = Vec::new();
        for (i, row) in reader.deserialize::<Row>().enumerate() {
            let index = i as u32;
            let row = row.map_err(|err| ExtractError::malformed("chase", err.to_string()))?;

            let date = parse_mdy(&row.transaction_date, index)?;
            let number = parse_money(&row.amount, index)?;

            let mut meta = Metadata::from_source(doc.path.as_str(), index);
            meta.insert("original-description", row.description.as_str());

            entries.push(Directive::Transaction(Transaction {
                meta,
                date,
                flag: Flag::Okay,
                payee: Some(titled(&row.description)),
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
