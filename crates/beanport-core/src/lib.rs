//! Importer abstraction and extraction engine.
//!
//! Input: documents read off disk elsewhere, plus an ordered importer
//! registry. Output: directives with per-file outcomes. No IO here.

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod importer;
pub mod model;

pub use engine::{
    extract_documents, identify_documents, ExtractOptions, ExtractReport, ExtractionOutcome,
    FileExtraction, IdentifiedDocument, IdentifyReport,
};
pub use error::ExtractError;
pub use fingerprint::fingerprint_transaction;
pub use importer::{BalanceType, Importer};
pub use model::{Document, DUPLICATE_META};
