//! The concrete statement importers.
//!
//! One module per institution/format pair. Each importer implements the
//! `beanport_core::Importer` protocol and is constructed from the resolved
//! configuration by the application layer.

#![forbid(unsafe_code)]

pub mod applecard;
pub mod chase;
pub mod ofx;
pub mod paystub;
pub mod schwab;
mod utils;

pub use applecard::AppleCardImporter;
pub use chase::ChaseImporter;
pub use ofx::OfxImporter;
pub use paystub::PaystubImporter;
pub use schwab::{SchwabCsvImporter, SchwabJsonImporter};
