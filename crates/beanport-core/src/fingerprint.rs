use beanport_types::Transaction;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for an extracted transaction.
///
/// Identity fields:
/// - date
/// - flag
/// - payee (if present)
/// - narration
/// - every posting as `account=amount`
///
/// Source refs and metadata are excluded so the same statement row imported
/// from two overlapping exports hashes identically.
pub fn fingerprint_transaction(txn: &Transaction) -> String {
    let mut parts: Vec<String> = vec![
        txn.date.to_string(),
        txn.flag.as_char().to_string(),
        txn.payee.clone().unwrap_or_default(),
        txn.narration.clone(),
    ];
    for posting in &txn.postings {
        let units = posting
            .units
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_default();
        parts.push(format!("{}={}", posting.account, units));
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanport_types::{Account, Amount, Flag, Metadata, Posting, Transaction};
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;
    use std::str::FromStr;
    use time::macros::date;

    fn sample(narration: &str, meta_index: u32) -> Transaction {
        Transaction {
            meta: Metadata::from_source("a.csv", meta_index),
            date: date!(2021 - 03 - 01),
            flag: Flag::Okay,
            payee: None,
            narration: narration.to_string(),
            tags: BTreeSet::new(),
            links: BTreeSet::new(),
            postings: vec![Posting::new(
                Account::parse("Assets:Checking").expect("account"),
                Amount::new(Decimal::from_str("-4.50").expect("decimal"), "USD"),
            )],
        }
    }

    #[test]
    fn identical_rows_from_different_sources_collide() {
        assert_eq!(
            fingerprint_transaction(&sample("COFFEE", 1)),
            fingerprint_transaction(&sample("COFFEE", 9))
        );
    }

    #[test]
    fn narration_changes_the_fingerprint() {
        assert_ne!(
            fingerprint_transaction(&sample("COFFEE", 1)),
            fingerprint_transaction(&sample("TEA", 1))
        );
    }
}
