//! Parse error taxonomy
//!
//! Every failure aborts the whole parse; no partial tree is returned.

use thiserror::Error;

/// Tokenizer failures, propagated opaquely through [`XmlParseError::Tokenizer`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A `<` was never closed by a `>` outside quotes
    #[error("unterminated markup starting at byte {position}")]
    UnterminatedMarkup { position: usize },

    /// Input bytes are not valid UTF-8
    #[error("input is not valid UTF-8 (first invalid byte at {position})")]
    InvalidUtf8 { position: usize },
}

/// Errors raised while building a tree from a token sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlParseError {
    #[error("wrong attribute {attribute} in tag {tag}")]
    MalformedAttribute { attribute: String, tag: String },

    #[error("attribute {attribute} appears more than once in tag {tag}")]
    DuplicateAttribute { attribute: String, tag: String },

    #[error("tag mismatch: <{expected}> closed with </{found}>")]
    MismatchedTag { expected: String, found: String },

    #[error(
        "only standalone XML 1.0 in utf-8 is supported \
         (version={version:?}, encoding={encoding:?}, standalone={standalone:?})"
    )]
    UnsupportedDeclaration {
        version: Option<String>,
        encoding: Option<String>,
        standalone: Option<String>,
    },

    #[error("no open root tag, found {token:?}")]
    MissingRootElement { token: String },

    #[error("text {data:?} not allowed inside <{section}>")]
    UnexpectedData { data: String, section: String },

    #[error("unexpected token {token:?}")]
    UnexpectedToken { token: String },

    #[error("unclosed tag: <{name}>")]
    UnclosedTag { name: String },

    #[error(transparent)]
    Tokenizer(#[from] TokenizeError),
}

impl XmlParseError {
    /// Stable snake_case name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            XmlParseError::MalformedAttribute { .. } => "malformed_attribute",
            XmlParseError::DuplicateAttribute { .. } => "duplicate_attribute",
            XmlParseError::MismatchedTag { .. } => "mismatched_tag",
            XmlParseError::UnsupportedDeclaration { .. } => "unsupported_declaration",
            XmlParseError::MissingRootElement { .. } => "missing_root_element",
            XmlParseError::UnexpectedData { .. } => "unexpected_data",
            XmlParseError::UnexpectedToken { .. } => "unexpected_token",
            XmlParseError::UnclosedTag { .. } => "unclosed_tag",
            XmlParseError::Tokenizer(_) => "tokenizer_failure",
        }
    }
}
