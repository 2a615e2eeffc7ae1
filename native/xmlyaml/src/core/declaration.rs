//! Document declaration gate
//!
//! Only standalone XML 1.0 documents in UTF-8 are accepted.

use super::matcher::Declaration;
use crate::error::XmlParseError;

/// How a leading `<?xml ...?>` declaration is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationPolicy {
    /// Version, encoding and standalone must be exactly `1.0`, `utf-8`
    /// (any case) and `yes`; a missing field is a mismatch
    #[default]
    Strict,
    /// Any well-formed declaration is accepted and skipped
    Lenient,
}

impl DeclarationPolicy {
    pub fn check(self, decl: &Declaration<'_>) -> Result<(), XmlParseError> {
        if self == DeclarationPolicy::Lenient || is_supported(decl) {
            return Ok(());
        }
        Err(XmlParseError::UnsupportedDeclaration {
            version: decl.version.map(str::to_string),
            encoding: decl.encoding.map(str::to_string),
            standalone: decl.standalone.map(str::to_string),
        })
    }
}

fn is_supported(decl: &Declaration<'_>) -> bool {
    decl.version == Some("1.0")
        && decl.encoding.is_some_and(|e| e.eq_ignore_ascii_case("utf-8"))
        && decl.standalone == Some("yes")
}
