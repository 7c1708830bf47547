/// Error type for ebuild-atom parsing and operations
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Grammar violation: unmatched delimiter, invalid identifier character,
    /// malformed USE token. `offset` is the byte position of the offending
    /// region within `input`.
    #[error("syntax error at offset {offset}: {reason}: {input:?}")]
    Syntax {
        input: String,
        offset: usize,
        reason: String,
    },

    /// A version sub-region exists but fails the version grammar.
    #[error("invalid version: {reason}: {input:?}")]
    Version { input: String, reason: String },

    /// Structurally well-formed but logically inconsistent combination,
    /// e.g. an operator without a version.
    #[error("invalid atom: {reason}: {input:?}")]
    Semantic { input: String, reason: String },
}

impl Error {
    pub(crate) fn syntax(input: &str, offset: usize, reason: impl Into<String>) -> Self {
        Error::Syntax {
            input: input.to_string(),
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn version(input: &str, reason: impl Into<String>) -> Self {
        Error::Version {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn semantic(input: &str, reason: impl Into<String>) -> Self {
        Error::Semantic {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for ebuild-atom operations
pub type Result<T> = std::result::Result<T, Error>;
