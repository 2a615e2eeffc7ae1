//! ResourceArc Wrappers
//!
//! Keeps a parsed tree alive on the Rust side between NIF calls.

use crate::dom::XmlTree;
use rustler::ResourceArc;
use std::sync::Mutex;

/// Wrapper for XmlTree that can be stored in a ResourceArc
pub struct TreeResource {
    /// The fully parsed tree, built once
    pub tree: Mutex<Option<XmlTree>>,
}

impl TreeResource {
    pub fn new(tree: XmlTree) -> Self {
        TreeResource {
            tree: Mutex::new(Some(tree)),
        }
    }

    /// Run `f` against the stored tree.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if the tree mutex is poisoned,
    /// or `"no_document"` if no tree is present.
    pub fn with_tree<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&XmlTree) -> R,
    {
        let guard = self.tree.lock().map_err(|_| "mutex_poisoned")?;
        let tree = guard.as_ref().ok_or("no_document")?;
        Ok(f(tree))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for TreeResource {}

/// Type alias for tree ResourceArc
pub type TreeRef = ResourceArc<TreeResource>;
