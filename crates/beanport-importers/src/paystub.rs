//! Importer for employer pay-stub text extracts.
//!
//! Pay stubs arrive as PDFs; external tooling turns them into text where
//! columns are flattened to runs of two or more spaces. This importer reads
//! the header key/values and the sectioned tables and builds one
//! multi-posting transaction per stub: earnings against the income account,
//! taxes and deductions against their roots, and the net distribution into
//! the checking account.

use crate::utils::{account_leaf, parse_mdy, parse_money};
use beanport_core::{Document, ExtractError, Importer};
use beanport_types::{Account, Amount, Directive, Flag, Metadata, Posting, Transaction};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use time::{Date, Month};

const INFO_KEYS: &[&str] = &[
    "Name",
    "My ID",
    "Badge",
    "Cost Center",
    "SubArea",
    "EE Grp",
    "EE SGrp",
    "Pay Date",
    "Pay Period",
    "Hours worked",
];

const SECTIONS: &[&str] = &[
    "Earnings",
    "Deductions",
    "Taxes",
    "Other Benefits & Information",
    "Quota Information",
    "Distribution of Net Payment",
];

/// An importer for pay-stub text extracts.
pub struct PaystubImporter {
    match_re: Regex,
    account: Account,
    income: Account,
    taxes: Account,
    deductions: Account,
    basename: Option<String>,
    columns_re: Regex,
    period_re: Regex,
}

impl PaystubImporter {
    /// `match_re` is matched against the document body (typically the
    /// employer name); `account` receives the net payment.
    pub fn new(
        match_re: Regex,
        account: Account,
        income: Account,
        taxes: Account,
        deductions: Account,
        basename: Option<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            match_re,
            account,
            income,
            taxes,
            deductions,
            basename,
            columns_re: Regex::new(r"\s{2,}")?,
            period_re: Regex::new(
                r"(\d{1,2})/(\d{1,2})/(\d{4})- ?(\d{1,2})/(\d{1,2})/(\d{4}) Period No: (\d{1,2})/(\d{4})",
            )?,
        })
    }

    fn parse_stub(&self, contents: &str) -> Stub {
        let mut stub = Stub::default();
        let mut current: Option<String> = None;

        for line in contents.lines() {
            let stripped = line.trim();
            if stripped.is_empty() {
                current = None;
                continue;
            }

            if SECTIONS.contains(&stripped) {
                current = Some(table_key(stripped));
                continue;
            }

            let cols: Vec<String> = self
                .columns_re
                .split(stripped)
                .map(str::to_string)
                .collect();

            match &current {
                Some(table) => stub.tables.entry(table.clone()).or_default().push(cols),
                None => {
                    // Header area: key/value pairs flattened onto shared
                    // lines ("Pay Date:  02/19/2021  Pay Period:  ...").
                    for i in 0..cols.len().saturating_sub(1) {
                        if let Some(key) = cols[i].strip_suffix(':') {
                            if INFO_KEYS.contains(&key) {
                                stub.info.insert(key.to_string(), cols[i + 1].clone());
                            }
                        }
                    }
                }
            }
        }

        // The tax table's authority and description columns arrive split;
        // rejoin them so each data row starts with one description.
        if let Some(taxes) = stub.tables.get_mut("taxes") {
            for row in taxes.iter_mut().skip(1) {
                if row.len() >= 2 {
                    let merged = format!("{} {}", row[0], row[1]);
                    row.splice(0..2, [merged]);
                }
            }
        }

        // Deduction rows without a remark drop the column entirely.
        if let Some(deductions) = stub.tables.get_mut("deductions") {
            for row in deductions.iter_mut().skip(1) {
                if row.len() == 3 {
                    row.insert(2, String::new());
                }
            }
        }

        stub
    }
}

#[derive(Debug, Default)]
struct Stub {
    info: BTreeMap<String, String>,
    tables: BTreeMap<String, Vec<Vec<String>>>,
}

impl Stub {
    /// Data rows of a table: header skipped, `Total…` summary rows skipped.
    fn data_rows(&self, table: &str) -> impl Iterator<Item = &Vec<String>> {
        self.tables
            .get(table)
            .map(|rows| rows.as_slice())
            .unwrap_or_default()
            .iter()
            .skip(1)
            .filter(|row| {
                !row.first()
                    .is_some_and(|d| d.to_lowercase().starts_with("total"))
            })
    }
}

fn table_key(section: &str) -> String {
    let mut out = String::with_capacity(section.len());
    let mut pending = false;
    for c in section.chars() {
        if c.is_ascii_alphanumeric() {
            if pending && !out.is_empty() {
                out.push('_');
            }
            pending = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending = true;
        }
    }
    out
}

struct PayPeriod {
    start: Date,
    end: Date,
    number: u32,
    year: u32,
}

impl Importer for PaystubImporter {
    fn name(&self) -> &'static str {
        "paystub"
    }

    fn identify(&self, doc: &Document) -> bool {
        doc.mime() == Some("text/plain")
            && doc.contents.contains("Pay Date")
            && doc.contents.contains("Distribution of Net Payment")
            && self.match_re.is_match(&doc.contents)
    }

    fn account(&self, _doc: &Document) -> Account {
        self.account.clone()
    }

    fn date(&self, doc: &Document) -> Option<Date> {
        let stub = self.parse_stub(&doc.contents);
        parse_mdy(stub.info.get("Pay Date")?, 0).ok()
    }

    fn filename(&self, doc: &Document) -> Option<String> {
        self.basename
            .as_ref()
            .map(|base| format!("{}.{}", base, doc.extension().unwrap_or("txt")))
    }

    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError> {
        let stub = self.parse_stub(&doc.contents);

        let pay_date = stub
            .info
            .get("Pay Date")
            .ok_or(ExtractError::MissingField {
                field: "Pay Date",
                index: 0,
            })?;
        let date = parse_mdy(pay_date, 0)?;

        let mut postings: Vec<Posting> = Vec::new();
        let mut push = |account: Result<Account, _>, number: Decimal| match account {
            Ok(account) => {
                postings.push(Posting::new(account, Amount::new(number, "USD")));
                Ok(())
            }
            Err(err) => Err(ExtractError::malformed("paystub", format!("{err}"))),
        };

        // Earnings are income: negative from the income account's view.
        for row in stub.data_rows("earnings") {
            let Some(number) = row.get(1).and_then(|v| parse_money(v, 0).ok()) else {
                continue;
            };
            push(self.income.join(&account_leaf(&row[0])), -number)?;
        }
        for row in stub.data_rows("deductions") {
            let Some(number) = row.get(1).and_then(|v| parse_money(v, 0).ok()) else {
                continue;
            };
            push(self.deductions.join(&account_leaf(&row[0])), number)?;
        }
        for row in stub.data_rows("taxes") {
            let Some(number) = row.get(1).and_then(|v| parse_money(v, 0).ok()) else {
                continue;
            };
            push(self.taxes.join(&account_leaf(&row[0])), number)?;
        }

        // Net payment, one leg per destination account on the stub.
        let mut distributed = false;
        for row in stub.data_rows("distribution_of_net_payment") {
            let Some(number) = row.last().and_then(|v| parse_money(v, 0).ok()) else {
                continue;
            };
            push(Ok::<_, beanport_types::AccountError>(self.account.clone()), number)?;
            distributed = true;
        }
        if !distributed {
            return Err(ExtractError::malformed(
                "paystub",
                "no net payment distribution found",
            ));
        }

        let mut meta = Metadata::from_source(doc.path.as_str(), 0);
        let period = stub
            .info
            .get("Pay Period")
            .and_then(|raw| self.parse_period(raw));
        if let Some(period) = &period {
            meta.insert("pay-period-start", period.start.to_string());
            meta.insert("pay-period-end", period.end.to_string());
            meta.insert(
                "pay-period",
                format!("{:02}/{}", period.number, period.year),
            );
        }
        if let Some(hours) = stub.info.get("Hours worked") {
            meta.insert("hours-worked", hours.as_str());
        }

        let narration = match &period {
            Some(period) => format!("Pay stub {:02}/{}", period.number, period.year),
            None => "Pay stub".to_string(),
        };

        // A stub that doesn't net to zero needs a second look.
        let residual: Decimal = postings
            .iter()
            .filter_map(|p| p.units.as_ref())
            .map(|a| a.number)
            .sum();
        let flag = if residual.abs() <= Decimal::new(5, 3) {
            Flag::Okay
        } else {
            Flag::Warning
        };

        Ok(vec![Directive::Transaction(Transaction {
            meta,
            date,
            flag,
            payee: None,
            narration,
            tags: BTreeSet::new(),
            links: BTreeSet::new(),
            postings,
        })])
    }
}

impl PaystubImporter {
    fn parse_period(&self, raw: &str) -> Option<PayPeriod> {
        let caps = self.period_re.captures(raw)?;
        let date_from = |m: usize, d: usize, y: usize| -> Option<Date> {
            let month: u8 = caps.get(m)?.as_str().parse().ok()?;
            let day: u8 = caps.get(d)?.as_str().parse().ok()?;
            let year: i32 = caps.get(y)?.as_str().parse().ok()?;
            Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
        };
        Some(PayPeriod {
            start: date_from(1, 2, 3)?,
            end: date_from(4, 5, 6)?,
            number: caps.get(7)?.as_str().parse().ok()?,
            year: caps.get(8)?.as_str().parse().ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanport_test_util::{PAYSTUB_TXT, PAYSTUB_TXT_NAME};
    use time::macros::date;

    fn importer() -> PaystubImporter {
        PaystubImporter::new(
            Regex::new("Northrop Grumman").expect("regex"),
            Account::parse("Assets:Schwab:Checking").expect("account"),
            Account::parse("Income:NorthropGrumman").expect("account"),
            Account::parse("Expenses:Taxes").expect("account"),
            Account::parse("Expenses:Deductions").expect("account"),
            Some("paystub".to_string()),
        )
        .expect("importer")
    }

    fn doc() -> Document {
        Document::new(PAYSTUB_TXT_NAME, PAYSTUB_TXT)
    }

    #[test]
    fn identify_needs_the_stub_markers_and_employer() {
        let imp = importer();
        assert!(imp.identify(&doc()));
        assert!(!imp.identify(&Document::new("notes.txt", "Pay Date: nothing else")));
    }

    #[test]
    fn pay_date_is_the_statement_date() {
        assert_eq!(importer().date(&doc()), Some(date!(2021 - 02 - 19)));
    }

    #[test]
    fn extract_builds_one_balanced_transaction() {
        let entries = importer().extract(&doc()).expect("extract");
        assert_eq!(entries.len(), 1);
        let txn = entries[0].as_transaction().expect("transaction");

        assert_eq!(txn.date, date!(2021 - 02 - 19));
        assert_eq!(txn.flag, Flag::Okay);
        assert_eq!(txn.narration, "Pay stub 04/2021");

        let legs: Vec<(String, String)> = txn
            .postings
            .iter()
            .map(|p| {
                (
                    p.account.as_str().to_string(),
                    p.units.as_ref().expect("units").to_string(),
                )
            })
            .collect();
        assert_eq!(
            legs,
            vec![
                (
                    "Income:NorthropGrumman:Regular-Pay".to_string(),
                    "-3200.00 USD".to_string()
                ),
                (
                    "Income:NorthropGrumman:Overtime".to_string(),
                    "-150.00 USD".to_string()
                ),
                (
                    "Expenses:Deductions:401k-Pretax".to_string(),
                    "320.00 USD".to_string()
                ),
                (
                    "Expenses:Deductions:Medical".to_string(),
                    "75.00 USD".to_string()
                ),
                (
                    "Expenses:Taxes:Fed-Withholding-Tax".to_string(),
                    "512.00 USD".to_string()
                ),
                (
                    "Expenses:Taxes:Ca-Withholding-Tax".to_string(),
                    "160.00 USD".to_string()
                ),
                (
                    "Assets:Schwab:Checking".to_string(),
                    "2283.00 USD".to_string()
                ),
            ]
        );
    }

    #[test]
    fn pay_period_lands_in_metadata() {
        let entries = importer().extract(&doc()).expect("extract");
        let txn = entries[0].as_transaction().expect("transaction");
        assert_eq!(txn.meta.get("pay-period-start"), Some("2021-01-30"));
        assert_eq!(txn.meta.get("pay-period-end"), Some("2021-02-12"));
        assert_eq!(txn.meta.get("pay-period"), Some("04/2021"));
        assert_eq!(txn.meta.get("hours-worked"), Some("80.00"));
    }

    #[test]
    fn unbalanced_stub_is_flagged() {
        let trimmed = PAYSTUB_TXT.replace("2283.00", "2000.00");
        let entries = importer()
            .extract(&Document::new(PAYSTUB_TXT_NAME, trimmed))
            .expect("extract");
        let txn = entries[0].as_transaction().expect("transaction");
        assert_eq!(txn.flag, Flag::Warning);
    }

    #[test]
    fn stub_without_distribution_fails() {
        let gutted: String = PAYSTUB_TXT
            .lines()
            .take_while(|line| !line.contains("Distribution of Net Payment"))
            .collect::<Vec<_>>()
            .join("\n");
        let with_marker = format!("{gutted}\nDistribution of Net Payment\nBANK  ACCOUNT  AMOUNT\n");
        let err = importer()
            .extract(&Document::new(PAYSTUB_TXT_NAME, with_marker))
            .expect_err("should fail");
        assert!(matches!(err, ExtractError::Malformed { .. }));
    }
}
