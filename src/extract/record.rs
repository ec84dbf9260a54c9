use crate::extract::{ExtractError, ExtractResult};
use regex::Captures;
use serde::{Deserialize, Serialize};

/// A country's calling code as extracted from the source document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallingCode {
    /// ISO 3166-1 alpha-2 code
    pub code2: String,

    /// ISO 3166-1 alpha-3 code
    pub code3: String,

    /// International dialing code
    pub code: String,
}

impl CallingCode {
    pub fn new(
        code2: impl Into<String>,
        code3: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            code2: code2.into(),
            code3: code3.into(),
            code: code.into(),
        }
    }

    /// Builds a record from one pattern match
    ///
    /// Every required group must have participated in the match; values are taken
    /// verbatim.
    pub(crate) fn from_captures(captures: &Captures<'_>) -> ExtractResult<Self> {
        let offset = captures.get(0).map_or(0, |m| m.start());
        let field = |name: &'static str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .ok_or(ExtractError::MissingField { field: name, offset })
        };

        Ok(Self {
            code2: field("code2")?,
            code3: field("code3")?,
            code: field("code")?,
        })
    }

    /// Identity used for deduplication
    pub fn key(&self) -> (&str, &str) {
        (&self.code2, &self.code3)
    }
}
