/// Extraction failures. Payloads are plain strings so outcomes stay `Clone`
/// across report types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("malformed {format} document: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },

    #[error("record {index}: missing field '{field}'")]
    MissingField { field: &'static str, index: u32 },

    #[error("record {index}: cannot parse date '{value}'")]
    InvalidDate { value: String, index: u32 },

    #[error("record {index}: cannot parse amount '{value}'")]
    InvalidAmount { value: String, index: u32 },
}

impl ExtractError {
    pub fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}
