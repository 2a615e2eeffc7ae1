//! YAML-like text output for a parsed tree
//!
//! Sections become nested mappings, elements become `name: value` lines.
//! Siblings sharing a name are told apart by suffixing the second occurrence
//! with `1`, the third with `2`, and so on. Attributes are written as an
//! `attributes:` block; an element that has attributes moves its value to a
//! `value:` line inside the same block.
//!
//! The writer takes one call frame per section, so stack use grows with the
//! document's nesting depth.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::dom::{NodeId, NodeKind, XmlTree};

const DEFAULT_INDENT: &str = "  ";

/// Tree-to-YAML writer
#[derive(Debug, Clone)]
pub struct YamlEmitter {
    indent: String,
}

impl Default for YamlEmitter {
    fn default() -> Self {
        YamlEmitter {
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

impl YamlEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `indent` as the per-level indentation unit
    pub fn with_indent(indent: impl Into<String>) -> Self {
        YamlEmitter {
            indent: indent.into(),
        }
    }

    /// Write the children of `section`; the section's own name is not written
    pub fn emit<W: Write>(&self, tree: &XmlTree, section: NodeId, writer: &mut W) -> io::Result<()> {
        self.write_children(tree, section, writer, 0)
    }

    /// Write the whole document with the root as the top-level key
    pub fn emit_document<W: Write>(&self, tree: &XmlTree, writer: &mut W) -> io::Result<()> {
        let root = tree.root_id();
        writeln!(writer, "{}:", tree.node_name(root).unwrap_or_default())?;
        if tree.has_attributes(root) {
            self.write_attributes(tree, root, writer, 1)?;
        }
        self.write_children(tree, root, writer, 1)
    }

    /// Render the root's children into a string
    pub fn render(&self, tree: &XmlTree) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.emit(tree, tree.root_id(), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn pad<W: Write>(&self, writer: &mut W, depth: usize) -> io::Result<()> {
        for _ in 0..depth {
            writer.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn write_children<W: Write>(
        &self,
        tree: &XmlTree,
        section: NodeId,
        writer: &mut W,
        depth: usize,
    ) -> io::Result<()> {
        // Occurrence counts are local to this one section
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for child in tree.children(section) {
            let Some(node) = tree.get_node(child) else {
                continue;
            };
            let name = tree.node_name(child).unwrap_or_default();
            let count = seen.entry(name).or_insert(0);
            *count += 1;

            self.pad(writer, depth)?;
            if *count == 1 {
                write!(writer, "{name}:")?;
            } else {
                write!(writer, "{name}{}:", *count - 1)?;
            }

            match node.kind {
                NodeKind::Element => {
                    let value = tree.value(child).unwrap_or_default();
                    if node.has_attributes() {
                        writer.write_all(b"\n")?;
                        self.write_attributes(tree, child, writer, depth + 1)?;
                        self.pad(writer, depth + 1)?;
                        writeln!(writer, "value: {value}")?;
                    } else {
                        writeln!(writer, " {value}")?;
                    }
                }
                NodeKind::Section => {
                    writer.write_all(b"\n")?;
                    if node.has_attributes() {
                        self.write_attributes(tree, child, writer, depth + 1)?;
                    }
                    self.write_children(tree, child, writer, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    fn write_attributes<W: Write>(
        &self,
        tree: &XmlTree,
        id: NodeId,
        writer: &mut W,
        depth: usize,
    ) -> io::Result<()> {
        self.pad(writer, depth)?;
        writer.write_all(b"attributes:\n")?;
        for (name, value) in tree.attributes(id) {
            self.pad(writer, depth + 1)?;
            writeln!(writer, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Write the children of `section` with the default indentation
pub fn emit<W: Write>(tree: &XmlTree, section: NodeId, writer: &mut W) -> io::Result<()> {
    YamlEmitter::default().emit(tree, section, writer)
}

/// Write the whole document, root included, with the default indentation
pub fn emit_document<W: Write>(tree: &XmlTree, writer: &mut W) -> io::Result<()> {
    YamlEmitter::default().emit_document(tree, writer)
}

pub fn to_yaml_string(tree: &XmlTree) -> String {
    YamlEmitter::default().render(tree)
}
