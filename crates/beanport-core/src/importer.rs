use crate::error::ExtractError;
use crate::model::Document;
use beanport_types::{Account, Directive};
use time::Date;

/// Whether and where a balance assertion is emitted for a statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BalanceType {
    /// Don't emit a balance directive.
    None,
    /// At the date the statement declares for the balance.
    #[default]
    Declared,
    /// The day following the last extracted transaction.
    Last,
}

/// A statement importer for one institution/format pair.
///
/// The protocol mirrors the classic beancount ingest flow: a cheap
/// `identify` claim check, then `extract` plus the archiving accessors
/// (`account`, `date`, `filename`).
pub trait Importer: Send + Sync {
    /// Stable importer id used in config and reports (`"ofx"`, `"applecard"`).
    fn name(&self) -> &'static str;

    /// Whether this importer claims the document. Must be cheap; the engine
    /// asks every importer about every document.
    fn identify(&self, doc: &Document) -> bool;

    /// The account extracted postings land on.
    fn account(&self, doc: &Document) -> Account;

    /// Statement date, used to file the document in the archive.
    fn date(&self, doc: &Document) -> Option<Date>;

    /// Canonical archive file name for the document (extension included).
    /// `None` keeps the original file name.
    fn filename(&self, doc: &Document) -> Option<String> {
        let _ = doc;
        None
    }

    /// Extract directives from a claimed document.
    fn extract(&self, doc: &Document) -> Result<Vec<Directive>, ExtractError>;
}
