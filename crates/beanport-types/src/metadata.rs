use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a directive came from: source document plus a record index within it.
///
/// Source refs are carried for diagnostics and duplicate fingerprinting; they
/// are never rendered into ledger output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub file: String,
    pub index: u32,
}

/// Directive metadata: an ordered key/value map plus the source reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,

    /// Rendered as `key: "value"` lines under the directive.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, String>,
}

impl Metadata {
    pub fn from_source(file: impl Into<String>, index: u32) -> Self {
        Self {
            source: Some(SourceRef {
                file: file.into(),
                index,
            }),
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}
