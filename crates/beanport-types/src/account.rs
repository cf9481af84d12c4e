use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical beancount account name: colon-separated segments, each starting
/// with an uppercase letter or digit (`Assets:Schwab:Checking`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("account name is empty")]
    Empty,
    #[error("account segment '{0}' must start with an uppercase letter or digit")]
    BadSegmentStart(String),
    #[error("account '{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("account segment '{0}' contains invalid character '{1}'")]
    BadCharacter(String, char),
}

impl Account {
    /// Parse and validate an account name.
    pub fn parse<S: AsRef<str>>(s: S) -> Result<Self, AccountError> {
        let s = s.as_ref();
        if s.is_empty() {
            return Err(AccountError::Empty);
        }
        for segment in s.split(':') {
            if segment.is_empty() {
                return Err(AccountError::EmptySegment(s.to_string()));
            }
            let first = segment.chars().next().unwrap_or(' ');
            if !(first.is_ascii_uppercase() || first.is_ascii_digit()) {
                return Err(AccountError::BadSegmentStart(segment.to_string()));
            }
            if let Some(bad) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
            {
                return Err(AccountError::BadCharacter(segment.to_string(), bad));
            }
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a sub-account segment (or segments) to this account.
    pub fn join(&self, segment: &str) -> Result<Account, AccountError> {
        Account::parse(format!("{}:{}", self.0, segment))
    }

    /// The account as a relative filesystem path (`Assets:A` -> `Assets/A`).
    pub fn as_path_components(&self) -> impl Iterator<Item = &str> {
        self.0.split(':')
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
