//! OFX file format importer for bank and credit card statements.
//!
//! <https://en.wikipedia.org/wiki/Open_Financial_Exchange>
//!
//! OFX 1.x is SGML with optional closing tags, so this module reads the
//! format with a lenient tag scanner rather than an XML parser: leaf values
//! run from `<TAG>` to the next `<` or end of line.

use crate::utils::{matches_start, parse_money, parse_ymd_compact};
use beanport_core::{BalanceType, Document, ExtractError, Importer};
use beanport_types::{
    sort_directives, Account, Amount, Balance, Directive, Flag, Metadata, Posting, Transaction,
};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::ops::Range;
use time::Date;

const OFX_MIMES: &[&str] = &[
    "application/x-ofx",
    "application/vnd.intu.qbo",
    "application/vnd.intu.qfx",
];

/// An importer for Open Financial Exchange files.
pub struct OfxImporter {
    acctid: Regex,
    account: Account,
    basename: Option<String>,
    balance_type: BalanceType,
}

impl OfxImporter {
    /// Create a new importer posting to `account` for statements whose
    /// `<ACCTID>` matches `acctid` at the start.
    pub fn new(
        acctid: Regex,
        account: Account,
        basename: Option<String>,
        balance_type: BalanceType,
    ) -> Self {
        Self {
            acctid,
            account,
            basename,
            balance_type,
        }
    }
}

impl Importer for OfxImporter {
    fn name(&self) -> &'static str {
        "ofx"
    }

    fn identify(&self, doc: &Document) -> bool {
        let Some(mime) = doc.mime() else {
            return false;
        };
        if !OFX_MIMES.contains(&mime) {
            return false;
        }
        let scanner = Scanner::new(&doc.contents);
        scanner
            .acctids()
            .iter()
            .any(|id| matches_start(&self.acctid, id))
    }

    fn account(&self, _doc: &Document) -> Account {
        self.account.clone()
    }

    fn date(&self, doc: &Document) -> Option<Date> {
        let scanner = Scanner::new(&doc.contents);
        scanner.max_balance_date()
    }

    fn filename(&self, doc: &Document) -> Option<String> {
        self.basename
            .as_ref()
            .map(|base| format!("{}.{}", base, doc.extension().unwrap_or("ofx")))
    }

    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError> {
        let scanner = Scanner::new(&doc.contents);
        let mut entries: Vec<Directive> = Vec::new();
        let mut counter: u32 = 0;

        for stmt in scanner.statements() {
            if !matches_start(&self.acctid, &stmt.acctid) {
                continue;
            }
            let currency = stmt
                .currency
                .clone()
                .ok_or_else(|| ExtractError::malformed("ofx", "statement without CURDEF"))?;

            let mut stmt_entries: Vec<Directive> = Vec::new();
            for trn in &stmt.transactions {
                let txn = build_transaction(
                    &scanner, trn, &currency, &self.account, doc, &mut counter,
                )?;
                stmt_entries.push(Directive::Transaction(txn));
            }
            sort_directives(&mut stmt_entries);

            let balance = match self.balance_type {
                BalanceType::None => None,
                BalanceType::Declared => stmt.balance.clone(),
                BalanceType::Last => stmt.balance.clone().map(|(declared, number)| {
                    let date = stmt_entries.last().map(Directive::date).unwrap_or(declared);
                    (date, number)
                }),
            };
            entries.append(&mut stmt_entries);

            if let Some((date, number)) = balance {
                // The assertion holds at the beginning of the date, so move
                // it to the following day.
                let date = date
                    .next_day()
                    .ok_or_else(|| ExtractError::malformed("ofx", "balance date out of range"))?;
                let index = counter;
                counter += 1;
                entries.push(Directive::Balance(Balance {
                    meta: Metadata::from_source(doc.path.as_str(), index),
                    date,
                    account: self.account.clone(),
                    amount: Amount::new(number, currency.clone()),
                }));
            }
        }

        Ok(entries)
    }
}

fn build_transaction(
    scanner: &Scanner<'_>,
    trn: &Range<usize>,
    currency: &str,
    account: &Account,
    doc: &Document,
    counter: &mut u32,
) -> Result<Transaction, ExtractError> {
    let index = *counter;
    *counter += 1;

    let posted = scanner
        .tag_value("dtposted", trn.clone())
        .ok_or(ExtractError::MissingField {
            field: "DTPOSTED",
            index,
        })?;
    let date = parse_ofx_time(posted).ok_or_else(|| ExtractError::InvalidDate {
        value: posted.to_string(),
        index,
    })?;

    // Construct a description from all the text content in the node. Memos
    // duplicated from the name are dropped, and so is a transaction type
    // that says nothing beyond the amount's sign.
    let name = scanner.tag_value("name", trn.clone()).map(unescape);
    let mut memo = scanner.tag_value("memo", trn.clone()).map(unescape);
    if memo == name {
        memo = None;
    }
    let mut trntype = scanner.tag_value("trntype", trn.clone()).map(unescape);
    if matches!(trntype.as_deref(), Some("DEBIT") | Some("CREDIT")) {
        trntype = None;
    }
    let narration = [name, memo, trntype]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" / ");

    let raw_amount = scanner
        .tag_value("trnamt", trn.clone())
        .ok_or(ExtractError::MissingField {
            field: "TRNAMT",
            index,
        })?;
    let number = parse_money(raw_amount, index)?;

    // A single leg; the user categorizes the other side by hand.
    let posting = Posting::new(account.clone(), Amount::new(number, currency));

    Ok(Transaction {
        meta: Metadata::from_source(doc.path.as_str(), index),
        date,
        flag: Flag::Okay,
        payee: None,
        narration,
        tags: BTreeSet::new(),
        links: BTreeSet::new(),
        postings: vec![posting],
    })
}

/// Parse an OFX time string (`YYYYMMDD` or `YYYYMMDDHHMMSS[.XXX][zone]`)
/// down to its date.
fn parse_ofx_time(value: &str) -> Option<Date> {
    let value = value.trim();
    if value.len() < 8 {
        return None;
    }
    parse_ymd_compact(&value[..8], 0).ok()
}

/// Decode the character entity references SGML emitters actually produce.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// One statement response block (`STMTRS` / `CCSTMTRS` / `INVSTMTRS`).
#[derive(Clone, Debug)]
struct Statement {
    acctid: String,
    currency: Option<String>,
    transactions: Vec<Range<usize>>,
    balance: Option<(Date, Decimal)>,
}

/// Case-insensitive tag scanner. Keeps a lowercased shadow of the text for
/// position finding; offsets are shared because ASCII lowercasing preserves
/// byte positions.
struct Scanner<'a> {
    text: &'a str,
    lower: String,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_ascii_lowercase(),
        }
    }

    /// Byte positions of `<tag>` openings within `range`.
    fn tag_positions(&self, tag: &str, range: Range<usize>) -> Vec<usize> {
        let needle = format!("<{tag}>");
        self.lower[range.clone()]
            .match_indices(&needle)
            .map(|(i, _)| range.start + i)
            .collect()
    }

    /// First `<tag>` leaf value within `range`: the text up to the next `<`
    /// or end of line, trimmed.
    fn tag_value(&self, tag: &str, range: Range<usize>) -> Option<&'a str> {
        let open = *self.tag_positions(tag, range.clone()).first()?;
        let start = open + tag.len() + 2;
        let rest = &self.text[start..range.end];
        let end = rest
            .find(['<', '\r', '\n'])
            .unwrap_or(rest.len());
        let value = rest[..end].trim();
        (!value.is_empty()).then_some(value)
    }

    /// The contents of every `<ACCTID>` tag in the file. A tag scan, not a
    /// parse; good enough to route files to importers.
    fn acctids(&self) -> Vec<&'a str> {
        let whole = 0..self.text.len();
        self.tag_positions("acctid", whole)
            .into_iter()
            .filter_map(|open| {
                let start = open + "acctid".len() + 2;
                let rest = &self.text[start..];
                let end = rest.find(['<', '\r', '\n']).unwrap_or(rest.len());
                let value = rest[..end].trim();
                (!value.is_empty()).then_some(value)
            })
            .collect()
    }

    /// Statement block ranges: each runs from its opening tag to its closing
    /// tag, the next statement opening, or end of file.
    fn statement_ranges(&self) -> Vec<Range<usize>> {
        let whole = 0..self.text.len();
        let mut opens: Vec<usize> = ["stmtrs", "ccstmtrs", "invstmtrs"]
            .iter()
            .flat_map(|tag| self.tag_positions(tag, whole.clone()))
            .collect();
        opens.sort_unstable();
        opens.dedup();

        opens
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let hard_end = opens.get(i + 1).copied().unwrap_or(self.text.len());
                let close = ["</stmtrs>", "</ccstmtrs>", "</invstmtrs>"]
                    .iter()
                    .filter_map(|needle| {
                        self.lower[start..hard_end].find(needle).map(|p| start + p)
                    })
                    .min();
                start..close.unwrap_or(hard_end)
            })
            .collect()
    }

    /// Ranges of every `<STMTTRN>` block within `range`.
    fn transaction_ranges(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let opens = self.tag_positions("stmttrn", range.clone());
        opens
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let hard_end = opens.get(i + 1).copied().unwrap_or(range.end);
                let close = self.lower[start..hard_end]
                    .find("</stmttrn>")
                    .map(|p| start + p);
                start..close.unwrap_or(hard_end)
            })
            .collect()
    }

    fn statements(&self) -> Vec<Statement> {
        self.statement_ranges()
            .into_iter()
            .map(|range| {
                let acctid = self
                    .tag_value("acctid", range.clone())
                    .unwrap_or_default()
                    .to_string();
                let currency = self
                    .tag_value("curdef", range.clone())
                    .map(str::to_string);
                let balance = self.ledger_balance(range.clone());
                let transactions = self.transaction_ranges(range);
                Statement {
                    acctid,
                    currency,
                    transactions,
                    balance,
                }
            })
            .collect()
    }

    /// The `LEDGERBAL` (date, amount) for a statement block, if well formed.
    fn ledger_balance(&self, range: Range<usize>) -> Option<(Date, Decimal)> {
        let open = *self.tag_positions("ledgerbal", range.clone()).first()?;
        let end = self.lower[open..range.end]
            .find("</ledgerbal>")
            .map(|p| open + p)
            .unwrap_or(range.end);
        let block = open..end;
        let date = parse_ofx_time(self.tag_value("dtasof", block.clone())?)?;
        let number = parse_money(self.tag_value("balamt", block)?, 0).ok()?;
        Some((date, number))
    }

    /// Report date: the latest `LEDGERBAL/DTASOF` in the file.
    fn max_balance_date(&self) -> Option<Date> {
        self.statement_ranges()
            .into_iter()
            .filter_map(|range| self.ledger_balance(range))
            .map(|(date, _)| date)
            .max()
    }
}
