//! Tree node representation
//!
//! Uses NodeId (u32) for compact, index-based node references. Parent links
//! are plain ids into the same arena, so they never own anything.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Container node with ordered children
    Section,
    /// Leaf node with a text value
    Element,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Owning section (None only for the root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for the tag name
    pub name_id: u32,
    /// Index into string pool for the element value, 0 for sections
    pub value_id: u32,
    /// Start of attributes in attribute arena
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u32,
    /// Depth in tree, 0 for the root
    pub depth: u32,
}

impl XmlNode {
    /// Create a new section node
    pub fn section(name_id: u32, parent: Option<NodeId>, depth: u32) -> Self {
        XmlNode {
            kind: NodeKind::Section,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            value_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Create a new element node; every element has a parent
    pub fn element(name_id: u32, value_id: u32, parent: NodeId, depth: u32) -> Self {
        XmlNode {
            kind: NodeKind::Element,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            value_id,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attr_count > 0
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl XmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        XmlAttribute { name_id, value_id }
    }
}
