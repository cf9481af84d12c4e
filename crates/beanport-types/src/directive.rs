use crate::{Account, Amount, Metadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::Date;

/// Transaction flag: `*` for settled, `!` for needs-attention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    #[default]
    Okay,
    Warning,
}

impl Flag {
    pub fn as_char(self) -> char {
        match self {
            Flag::Okay => '*',
            Flag::Warning => '!',
        }
    }
}

/// One leg of a transaction. Importers usually emit a single leg and leave
/// categorizing the other side to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: Account,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<Flag>,
    #[serde(default)]
    pub meta: Metadata,
}

impl Posting {
    pub fn new(account: Account, units: Amount) -> Self {
        Self {
            account,
            units: Some(units),
            flag: None,
            meta: Metadata::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub meta: Metadata,
    pub date: Date,
    pub flag: Flag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    pub narration: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub links: BTreeSet<String>,
    pub postings: Vec<Posting>,
}

/// A balance assertion. Beancount checks these at the *start* of the date, so
/// importers date them the day after the balance was effective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub meta: Metadata,
    pub date: Date,
    pub account: Account,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Directive {
    Transaction(Transaction),
    Balance(Balance),
}

impl Directive {
    pub fn date(&self) -> Date {
        match self {
            Directive::Transaction(t) => t.date,
            Directive::Balance(b) => b.date,
        }
    }

    pub fn meta(&self) -> &Metadata {
        match self {
            Directive::Transaction(t) => &t.meta,
            Directive::Balance(b) => &b.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut Metadata {
        match self {
            Directive::Transaction(t) => &mut t.meta,
            Directive::Balance(b) => &mut b.meta,
        }
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Directive::Transaction(t) => Some(t),
            _ => None,
        }
    }
}

/// Sort directives by date, keeping extraction order for same-day entries.
pub fn sort_directives(directives: &mut [Directive]) {
    directives.sort_by_key(Directive::date);
}
