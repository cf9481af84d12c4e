//! Importer for Apple Card monthly CSV exports.

use crate::utils::{last_day_of_month, month_from_name, parse_money, titled};
use beanport_core::{Document, ExtractError, Importer};
use beanport_types::{
    Account, AccountError, Amount, Directive, Flag, Metadata, Posting, Transaction,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use time::Date;

const FILENAME_PREFIX: &str = "Apple Card Transactions";

/// An importer for `Apple Card Transactions - <Month> <Year>.csv` exports.
pub struct AppleCardImporter {
    account: Account,
    installments: Account,
    transfer: Account,
    currency: String,
}

impl AppleCardImporter {
    pub fn new(account: Account, currency: impl Into<String>) -> Result<Self, AccountError> {
        let installments = account.join("Installments")?;
        // Card payments offset against a transfer suspense account until the
        // funding side shows up in its own statement.
        let transfer = Account::parse("Equity:TransferSuspense")?;
        Ok(Self {
            account,
            installments,
            transfer,
            currency: currency.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Transaction Date")]
    transaction_date: String,
    #[serde(rename = "Merchant", default)]
    merchant: String,
    #[serde(rename = "Amount (USD)")]
    amount: String,
    #[serde(rename = "Type", default)]
    kind: String,
}

impl Importer for AppleCardImporter {
    fn name(&self) -> &'static str {
        "applecard"
    }

    fn identify(&self, doc: &Document) -> bool {
        doc.file_name().starts_with(FILENAME_PREFIX)
    }

    fn account(&self, _doc: &Document) -> Account {
        self.account.clone()
    }

    fn date(&self, doc: &Document) -> Option<Date> {
        // "Apple Card Transactions - March 2021" -> end of that month.
        let rest = doc.stem().strip_prefix(FILENAME_PREFIX)?;
        let rest = rest.trim_start_matches([' ', '-']);
        let mut parts = rest.split_whitespace();
        let month = month_from_name(parts.next()?)?;
        let year: i32 = parts.next()?.parse().ok()?;
        last_day_of_month(year, month)
    }

    fn filename(&self, _doc: &Document) -> Option<String> {
        Some("AppleCard.csv".to_string())
    }

    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError> {
        let mut reader = csv::Reader::from_reader(doc.contents.as_bytes());

        let mut entries = Vec::new();
        for (i, row) in reader.deserialize::<Row>().enumerate() {
            let index = i as u32;
            let row =
                row.map_err(|err| ExtractError::malformed("apple card", err.to_string()))?;

            let date = crate::utils::parse_mdy(&row.transaction_date, index)?;
            let number = parse_money(&row.amount, index)?;
            let units = Amount::new(number, self.currency.clone());

            let mut meta = Metadata::from_source(doc.path.as_str(), index);
            meta.insert("original-description", row.merchant.as_str());

            let mut postings = vec![Posting::new(self.account.clone(), units.clone())];
            match row.kind.as_str() {
                // Installments accrue against their own sub-account so the
                // outstanding device balance stays visible.
                "Installment" => {
                    postings.push(Posting::new(self.installments.clone(), units.negated()));
                }
                "Payment" => {
                    postings.push(Posting::new(self.transfer.clone(), units.negated()));
                }
                _ => {}
            }

            entries.push(Directive::Transaction(Transaction {
                meta,
                date,
                flag: Flag::Okay,
                payee: Some(titled(&row.merchant)),
                narration: String::new(),
                tags: BTreeSet::new(),
                links: BTreeSet::new(),
                postings,
            }));
        }

        Ok(entries)
    }
}
