use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `beanport.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so
/// forward-compat is easy. Validation happens during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BeanportConfigV1 {
    /// Optional schema string for tooling (`beanport.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Currency assumed by importers whose source format doesn't carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub extract: ExtractConfig,

    /// Importer declarations, in claim-priority order.
    #[serde(default)]
    pub importers: Vec<ImporterConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IngestConfig {
    /// Globs (relative to each walked root) selecting candidate documents.
    /// Empty means everything.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveConfig {
    /// Root of the document archive tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractConfig {
    /// Mark repeated transactions within a run (default true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_duplicates: Option<bool>,
}

/// One `[[importers]]` table, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImporterConfig {
    Ofx {
        /// Regex matched against `<ACCTID>` tags.
        acctid: String,
        account: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basename: Option<String>,
        /// `none` | `declared` | `last` (default `declared`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        balance: Option<String>,
    },
    SchwabJson {
        /// Regex matched against the redacted account number in the stem.
        acctid: String,
        account: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basename: Option<String>,
    },
    SchwabCsv {
        lastfour: String,
        account: String,
    },
    Applecard {
        account: String,
    },
    Chase {
        lastfour: String,
        account: String,
    },
    Paystub {
        /// Regex matched against the stub body (the employer name).
        r#match: String,
        /// Net payment destination.
        account: String,
        income: String,
        taxes: String,
        deductions: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basename: Option<String>,
    },
}
