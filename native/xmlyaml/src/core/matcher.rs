//! Tag Matcher - classifies a single token
//!
//! Each category is an anchored regular grammar. The grammars are mutually
//! exclusive, so the order they are tried in never changes the answer.

use once_cell::sync::Lazy;
use regex::Regex;

const NAME: &str = r"[\p{L}_:][\p{L}\p{N}_.:\-]*";

// Each pseudo-attribute may be single- or double-quoted
static DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^<\?xml"#,
        r#"(?:\s+version=(?:"(?P<ver>[^"]*)"|'(?P<ver_sq>[^']*)'))?"#,
        r#"(?:\s+encoding=(?:"(?P<enc>[^"]*)"|'(?P<enc_sq>[^']*)'))?"#,
        r#"(?:\s+standalone=(?:"(?P<stand>[^"]*)"|'(?P<stand_sq>[^']*)'))?"#,
        r#"\s*\?>$"#,
    ))
    .unwrap()
});

// One whitespace-free attribute run. Quoted stretches may hold '<', '>' and
// '/'; outside quotes a '/' must be followed by more of the run, so a run
// never ends in '/' and open and self-closed tags stay disjoint.
const ATTR_RUN: &str = r#"(?:/*(?:[^<>"/\s]|"[^"]*"))+"#;

static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^<(?P<name>{NAME})(?:\s+(?P<attrs>{ATTR_RUN}(?:\s+{ATTR_RUN})*))?\s*>$"
    ))
    .unwrap()
});

static SELF_CLOSED_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^<(?P<name>{NAME})(?:\s+(?P<attrs>{ATTR_RUN}(?:\s+{ATTR_RUN})*))?\s*/>$"
    ))
    .unwrap()
});

static CLOSE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^</(?P<name>{NAME})\s*>$")).unwrap());

static DATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<data>[^<]+)$").unwrap());

/// Fields captured from a document declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Declaration<'a> {
    pub version: Option<&'a str>,
    pub encoding: Option<&'a str>,
    pub standalone: Option<&'a str>,
}

/// A classified token with its borrowed captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag<'a> {
    /// `<?xml version=".." encoding=".." standalone=".."?>`
    Declaration(Declaration<'a>),
    /// `<name attrs>`
    Open { name: &'a str, attrs: Option<&'a str> },
    /// `</name>`
    Close { name: &'a str },
    /// `<name attrs/>`
    SelfClosed { name: &'a str, attrs: Option<&'a str> },
    /// Text between tags
    Data(&'a str),
}

impl<'a> Tag<'a> {
    #[inline]
    pub fn is_close_of(&self, open_name: &str) -> bool {
        matches!(*self, Tag::Close { name } if name == open_name)
    }
}

/// Classify a token; `None` when it fits no category
pub fn classify(token: &str) -> Option<Tag<'_>> {
    match token.as_bytes() {
        [b'<', b'?', ..] => match_declaration(token).map(Tag::Declaration),
        [b'<', b'/', ..] => match_close_tag(token),
        [b'<', ..] if token.ends_with("/>") => match_self_closed_tag(token),
        [b'<', ..] => match_open_tag(token),
        _ => match_data(token),
    }
}

pub fn match_declaration(token: &str) -> Option<Declaration<'_>> {
    let caps = DECL_RE.captures(token)?;
    Some(Declaration {
        version: caps.name("ver").or(caps.name("ver_sq")).map(|m| m.as_str()),
        encoding: caps.name("enc").or(caps.name("enc_sq")).map(|m| m.as_str()),
        standalone: caps.name("stand").or(caps.name("stand_sq")).map(|m| m.as_str()),
    })
}

pub fn match_open_tag(token: &str) -> Option<Tag<'_>> {
    let caps = OPEN_TAG_RE.captures(token)?;
    Some(Tag::Open {
        name: caps.name("name")?.as_str(),
        attrs: caps.name("attrs").map(|m| m.as_str()),
    })
}

pub fn match_self_closed_tag(token: &str) -> Option<Tag<'_>> {
    let caps = SELF_CLOSED_TAG_RE.captures(token)?;
    Some(Tag::SelfClosed {
        name: caps.name("name")?.as_str(),
        attrs: caps.name("attrs").map(|m| m.as_str()),
    })
}

pub fn match_close_tag(token: &str) -> Option<Tag<'_>> {
    let caps = CLOSE_TAG_RE.captures(token)?;
    Some(Tag::Close {
        name: caps.name("name")?.as_str(),
    })
}

pub fn match_data(token: &str) -> Option<Tag<'_>> {
    let caps = DATA_RE.captures(token)?;
    Some(Tag::Data(caps.name("data")?.as_str()))
}
