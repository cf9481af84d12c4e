use beanport_core::{ExtractReport, ExtractionOutcome, DUPLICATE_META};
use beanport_types::{Balance, Directive, Transaction};

/// Render a full extraction run as beancount text: a modeline header, one
/// section per source file, error comments for failed files. Duplicate
/// transactions render commented out.
pub fn render_extraction(report: &ExtractReport) -> String {
    let mut out = String::new();
    out.push_str(";; -*- mode: beancount -*-\n");

    for file in &report.files {
        out.push('\n');
        out.push_str(&format!("**** {}\n\n", file.source));
        match &file.outcome {
            ExtractionOutcome::Extracted(directives) => {
                for directive in directives {
                    out.push_str(&render_directive(directive));
                    out.push('\n');
                }
            }
            ExtractionOutcome::Failed(err) => {
                out.push_str(&format!("; error: {err}\n"));
            }
        }
    }

    out
}

/// Render one directive. Internal marker metadata (`__…__` keys) never
/// renders; a directive marked duplicate renders fully commented out.
pub fn render_directive(directive: &Directive) -> String {
    let body = match directive {
        Directive::Transaction(txn) => render_transaction(txn),
        Directive::Balance(balance) => render_balance(balance),
    };

    if directive.meta().get(DUPLICATE_META).is_some() {
        let mut out = String::new();
        for line in body.lines() {
            out.push_str("; ");
            out.push_str(line);
            out.push('\n');
        }
        out
    } else {
        body
    }
}

fn render_transaction(txn: &Transaction) -> String {
    let mut out = String::new();

    out.push_str(&txn.date.to_string());
    out.push(' ');
    out.push(txn.flag.as_char());
    if let Some(payee) = &txn.payee {
        out.push_str(&format!(" \"{}\"", escape(payee)));
    }
    out.push_str(&format!(" \"{}\"", escape(&txn.narration)));
    for tag in &txn.tags {
        out.push_str(&format!(" #{tag}"));
    }
    for link in &txn.links {
        out.push_str(&format!(" ^{link}"));
    }
    out.push('\n');

    for (key, value) in &txn.meta.entries {
        if key.starts_with("__") {
            continue;
        }
        out.push_str(&format!("  {key}: \"{}\"\n", escape(value)));
    }

    // Align amounts within the transaction.
    let account_width = txn
        .postings
        .iter()
        .map(|p| p.account.as_str().len())
        .max()
        .unwrap_or(0);
    let number_width = txn
        .postings
        .iter()
        .filter_map(|p| p.units.as_ref())
        .map(|a| a.number.to_string().len())
        .max()
        .unwrap_or(0);

    for posting in &txn.postings {
        out.push_str("  ");
        if let Some(flag) = posting.flag {
            out.push(flag.as_char());
            out.push(' ');
        }
        match &posting.units {
            Some(units) => {
                out.push_str(&format!(
                    "{:<aw$}  {:>nw$} {}",
                    posting.account.as_str(),
                    units.number.to_string(),
                    units.currency,
                    aw = account_width,
                    nw = number_width,
                ));
            }
            None => out.push_str(posting.account.as_str()),
        }
        out.push('\n');
    }

    out
}

fn render_balance(balance: &Balance) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} balance {}  {}\n",
        balance.date, balance.account, balance.amount
    ));
    for (key, value) in &balance.meta.entries {
        if key.starts_with("__") {
            continue;
        }
        out.push_str(&format!("  {key}: \"{}\"\n", escape(value)));
    }
    out
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanport_core::{Document, ExtractError, FileExtraction};
    use beanport_types::{Account, Amount, Flag, Metadata, Posting};
    use camino::Utf8PathBuf;
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;
    use std::str::FromStr;
    use time::macros::date;

    fn amount(s: &str) -> Amount {
        Amount::new(Decimal::from_str(s).expect("decimal"), "USD")
    }

    fn sample_txn() -> Transaction {
        let mut meta = Metadata::from_source("stmt.qfx", 0);
        meta.insert("original-description", "ACME COFFEE");
        Transaction {
            meta,
            date: date!(2021 - 02 - 15),
            flag: Flag::Okay,
            payee: Some("Acme Coffee".to_string()),
            narration: String::new(),
            tags: BTreeSet::new(),
            links: BTreeSet::new(),
            postings: vec![Posting::new(
                Account::parse("Liabilities:CreditCard").expect("account"),
                amount("-25.40"),
            )],
        }
    }

    #[test]
    fn transaction_renders_payee_meta_and_posting() {
        let rendered = render_directive(&Directive::Transaction(sample_txn()));
        let expected = concat!(
            "2021-02-15 * \"Acme Coffee\" \"\"\n",
            "  original-description: \"ACME COFFEE\"\n",
            "  Liabilities:CreditCard  -25.40 USD\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn multi_leg_amounts_align() {
        let mut txn = sample_txn();
        txn.postings = vec![
            Posting::new(
                Account::parse("Liabilities:AppleCard").expect("account"),
                amount("45.79"),
            ),
            Posting::new(
                Account::parse("Liabilities:AppleCard:Installments").expect("account"),
                amount("-45.79"),
            ),
        ];
        let rendered = render_directive(&Directive::Transaction(txn));

        // Both legs line their currency column up.
        let columns: Vec<usize> = rendered
            .lines()
            .filter(|line| line.ends_with("USD"))
            .map(|line| line.find(" USD").expect("currency"))
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn narration_quotes_are_escaped() {
        let mut txn = sample_txn();
        txn.payee = None;
        txn.narration = "SAY \"CHEESE\"".to_string();
        let rendered = render_directive(&Directive::Transaction(txn));
        assert!(rendered.starts_with("2021-02-15 * \"SAY \\\"CHEESE\\\"\"\n"));
    }

    #[test]
    fn balance_renders_on_one_line() {
        let balance = Balance {
            meta: Metadata::default(),
            date: date!(2021 - 03 - 02),
            account: Account::parse("Liabilities:CreditCard").expect("account"),
            amount: amount("-125.40"),
        };
        assert_eq!(
            render_directive(&Directive::Balance(balance)),
            "2021-03-02 balance Liabilities:CreditCard  -125.40 USD\n"
        );
    }

    #[test]
    fn duplicates_render_commented_out() {
        let mut txn = sample_txn();
        txn.meta.insert(DUPLICATE_META, "true");
        let rendered = render_directive(&Directive::Transaction(txn));
        for line in rendered.lines() {
            assert!(line.starts_with("; "), "uncommented line: {line}");
        }
        // The marker itself never renders.
        assert!(!rendered.contains("__duplicate__"));
    }

    #[test]
    fn extraction_report_sections_and_errors() {
        let doc = Document::new("downloads/stmt.qfx", "");
        let report = ExtractReport {
            files: vec![
                FileExtraction {
                    source: doc.path.clone(),
                    importer: "ofx",
                    account: Account::parse("Liabilities:CreditCard").expect("account"),
                    outcome: ExtractionOutcome::Extracted(vec![Directive::Transaction(
                        sample_txn(),
                    )]),
                },
                FileExtraction {
                    source: Utf8PathBuf::from("downloads/broken.csv"),
                    importer: "chase",
                    account: Account::parse("Liabilities:Chase:Visa").expect("account"),
                    outcome: ExtractionOutcome::Failed(ExtractError::malformed(
                        "chase",
                        "truncated file",
                    )),
                },
            ],
            unmatched: vec![Utf8PathBuf::from("downloads/unknown.bin")],
        };

        let rendered = render_extraction(&report);
        assert!(rendered.starts_with(";; -*- mode: beancount -*-\n"));
        assert!(rendered.contains("**** downloads/stmt.qfx\n"));
        assert!(rendered.contains("2021-02-15 * \"Acme Coffee\" \"\"\n"));
        assert!(rendered.contains("**** downloads/broken.csv\n"));
        assert!(rendered.contains("; error: malformed chase document: truncated file\n"));
    }
}
