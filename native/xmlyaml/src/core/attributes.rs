//! XML Attribute Parsing
//!
//! Parses the raw attribute string captured by the matcher into an ordered,
//! duplicate-free list of name/value pairs.

use crate::error::XmlParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[\p{L}_:][\p{L}\p{N}_.:\-]*="[^"]*"$"#).unwrap());

/// A parsed attribute, borrowed from the tag token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Ordered attribute list; names are unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes<'a> {
    entries: Vec<Attribute<'a>>,
}

impl<'a> Attributes<'a> {
    pub fn new() -> Self {
        Attributes { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.entries.iter().find(|a| a.name == name).map(|a| a.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute<'a>> {
        self.entries.iter()
    }

    /// Append a pair, refusing a name that is already present
    fn insert(&mut self, attr: Attribute<'a>, tag: &str) -> Result<(), XmlParseError> {
        if self.get(attr.name).is_some() {
            return Err(XmlParseError::DuplicateAttribute {
                attribute: attr.name.to_string(),
                tag: tag.to_string(),
            });
        }
        self.entries.push(attr);
        Ok(())
    }
}

/// Parse a whitespace-separated `name="value"` list.
///
/// `tag` is only used to give errors context. Values may not contain
/// whitespace, since splitting happens before the grammar check.
pub fn parse_attributes<'a>(
    input: Option<&'a str>,
    tag: &str,
) -> Result<Attributes<'a>, XmlParseError> {
    let mut attrs = Attributes::new();
    let Some(input) = input else {
        return Ok(attrs);
    };

    for token in input.split_whitespace() {
        if !ATTRIBUTE_RE.is_match(token) {
            return Err(XmlParseError::MalformedAttribute {
                attribute: token.to_string(),
                tag: tag.to_string(),
            });
        }
        // The grammar guarantees an '=' followed by a quoted value
        let Some((name, quoted)) = token.split_once('=') else {
            continue;
        };
        let value = &quoted[1..quoted.len() - 1];
        attrs.insert(Attribute { name, value }, tag)?;
    }

    Ok(attrs)
}
