//! Output formats for a parsed tree

pub mod yaml;

pub use yaml::{emit, emit_document, to_yaml_string, YamlEmitter};
