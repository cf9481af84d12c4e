//! Ledger data types used across the beanport workspace.
//!
//! This crate is intentionally boring:
//! - canonical account name handling
//! - decimal amounts with their currency
//! - the directive shapes importers produce (transactions, balances)
//!
//! It performs no IO and knows nothing about where documents come from.

#![forbid(unsafe_code)]

pub mod account;
pub mod amount;
pub mod directive;
pub mod metadata;

pub use account::{Account, AccountError};
pub use amount::Amount;
pub use directive::{sort_directives, Balance, Directive, Flag, Posting, Transaction};
pub use metadata::{Metadata, SourceRef};
