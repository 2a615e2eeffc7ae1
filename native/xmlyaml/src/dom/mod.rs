//! DOM Module - Arena-based section/element tree
//!
//! Implements the parsed document as:
//! - Arena allocation for nodes and attributes
//! - NodeId (u32) indices for children and parent links
//! - String interning for names and values
//! - A single-pass builder over the token sequence

pub mod builder;
pub mod node;
mod strings;
pub mod tree;

pub use builder::{parse, parse_tokens, parse_tokens_with_options, parse_with_options, ParseOptions};
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use tree::XmlTree;
