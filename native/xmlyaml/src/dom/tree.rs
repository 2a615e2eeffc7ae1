//! XML Tree - Arena-based section/element representation
//!
//! Efficient tree storage with:
//! - Arena allocation for nodes and attributes
//! - NodeId indices for traversal and parent links
//! - String interning for names and values
//!
//! Node 0 is always the root section. The tree is only grown by the builder
//! (appends to the currently open section) and is read-only afterwards.

use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use crate::core::attributes::Attributes;

/// A parsed document stored in arena format
#[derive(Debug)]
pub struct XmlTree {
    /// Arena of nodes
    nodes: Vec<XmlNode>,
    /// Arena of attributes
    attributes: Vec<XmlAttribute>,
    /// Interned strings
    strings: StringPool,
}

impl XmlTree {
    /// Create a tree holding only the root section
    pub(crate) fn with_root(name: &str, attrs: &Attributes<'_>) -> Self {
        let mut tree = XmlTree {
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
        };
        let name_id = tree.strings.intern(name);
        tree.push_node(XmlNode::section(name_id, None, 0), attrs);
        tree
    }

    /// Append an empty section to `parent`, returning its id
    pub(crate) fn append_section(
        &mut self,
        parent: NodeId,
        name: &str,
        attrs: &Attributes<'_>,
    ) -> NodeId {
        let depth = self.depth(parent) + 1;
        let name_id = self.strings.intern(name);
        let id = self.push_node(XmlNode::section(name_id, Some(parent), depth), attrs);
        self.link_child(parent, id);
        id
    }

    /// Append a leaf element to `parent`, returning its id
    pub(crate) fn append_element(
        &mut self,
        parent: NodeId,
        name: &str,
        value: &str,
        attrs: &Attributes<'_>,
    ) -> NodeId {
        let depth = self.depth(parent) + 1;
        let name_id = self.strings.intern(name);
        let value_id = self.strings.intern(value);
        let id = self.push_node(XmlNode::element(name_id, value_id, parent, depth), attrs);
        self.link_child(parent, id);
        id
    }

    fn push_node(&mut self, mut node: XmlNode, attrs: &Attributes<'_>) -> NodeId {
        node.attr_start = self.attributes.len() as u32;
        node.attr_count = attrs.len() as u32;
        for attr in attrs.iter() {
            let name_id = self.strings.intern(attr.name);
            let value_id = self.strings.intern(attr.value);
            self.attributes.push(XmlAttribute::new(name_id, value_id));
        }

        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Link a child to its parent (maintains sibling links)
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let prev_last = self.nodes[parent_id as usize].last_child;

        if let Some(last_id) = prev_last {
            self.nodes[last_id as usize].next_sibling = Some(child_id);
            self.nodes[child_id as usize].prev_sibling = Some(last_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    /// Root section ID
    #[inline]
    pub fn root_id(&self) -> NodeId {
        0
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(|n| n.kind)
    }

    /// Get node name as string
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        self.strings.get_str(node.name_id)
    }

    /// Value of an element; `None` for sections
    pub fn value(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings.get_str(node.value_id)
        } else {
            None
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent
    }

    pub fn depth(&self, id: NodeId) -> u32 {
        self.get_node(id).map_or(0, |n| n.depth)
    }

    /// Deepest node depth; a lone root has depth 0
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct interned strings, the empty string included
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    fn attribute_slice(&self, id: NodeId) -> &[XmlAttribute] {
        match self.get_node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or(&[])
            }
            None => &[],
        }
    }

    pub fn has_attributes(&self, id: NodeId) -> bool {
        !self.attribute_slice(id).is_empty()
    }

    /// Attribute name/value pairs in document order
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attribute_slice(id).iter().filter_map(|attr| {
            let name = self.strings.get_str(attr.name_id)?;
            let value = self.strings.get_str(attr.value_id)?;
            Some((name, value))
        })
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id).find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { tree: self, next: first }
    }

    /// Iterate over all descendants of a node in document order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(id) {
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { tree: self, stack }
    }
}

/// Iterator over child nodes
pub struct ChildIter<'a> {
    tree: &'a XmlTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes
pub struct DescendantIter<'a> {
    tree: &'a XmlTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.tree.get_node(current) {
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.tree.get_node(id).and_then(|n| n.prev_sibling);
            }
        }
        Some(current)
    }
}
