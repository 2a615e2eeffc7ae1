//! Elixir Term Conversion Utilities
//!
//! Converts parsed trees, token lists and parse errors to Elixir terms.

use rustler::{Atom, Encoder, Env, NewBinary, Term};

use crate::dom::{NodeId, NodeKind, XmlTree};
use crate::error::XmlParseError;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    section,
    element,
    malformed_attribute,
    duplicate_attribute,
    mismatched_tag,
    unsupported_declaration,
    missing_root_element,
    unexpected_data,
    unexpected_token,
    unclosed_tag,
    tokenizer_failure,
}

/// Convert a node to an Elixir term
///
/// Sections become `{:section, name, attrs, children}`,
/// elements become `{:element, name, attrs, value}`.
pub fn node_to_term<'a>(env: Env<'a>, tree: &XmlTree, node_id: NodeId) -> Term<'a> {
    let node = match tree.get_node(node_id) {
        Some(n) => n,
        None => return rustler::types::atom::nil().encode(env),
    };

    let name_term = str_to_binary(env, tree.node_name(node_id).unwrap_or(""));
    let attrs = attributes_to_term(env, tree, node_id);

    match node.kind {
        NodeKind::Section => {
            // Build children by traversing last_child->prev_sibling chain
            let mut children = Term::list_new_empty(env);
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                children = children.list_prepend(node_to_term(env, tree, cid));
                child_id = tree.get_node(cid).and_then(|n| n.prev_sibling);
            }
            (section(), name_term, attrs, children).encode(env)
        }
        NodeKind::Element => {
            let value = str_to_binary(env, tree.value(node_id).unwrap_or(""));
            (element(), name_term, attrs, value).encode(env)
        }
    }
}

/// Attributes as a list of `{name, value}` tuples in document order
fn attributes_to_term<'a>(env: Env<'a>, tree: &XmlTree, node_id: NodeId) -> Term<'a> {
    let pairs: Vec<(&str, &str)> = tree.attributes(node_id).collect();
    let mut attrs = Term::list_new_empty(env);
    for (name, value) in pairs.into_iter().rev() {
        let tuple = (str_to_binary(env, name), str_to_binary(env, value));
        attrs = attrs.list_prepend(tuple.encode(env));
    }
    attrs
}

/// Convert tokens to a list of binaries
pub fn tokens_to_term<'a>(env: Env<'a>, tokens: &[&str]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for token in tokens.iter().rev() {
        list = list.list_prepend(str_to_binary(env, token));
    }
    list
}

fn error_kind_atom(err: &XmlParseError) -> Atom {
    match err {
        XmlParseError::MalformedAttribute { .. } => malformed_attribute(),
        XmlParseError::DuplicateAttribute { .. } => duplicate_attribute(),
        XmlParseError::MismatchedTag { .. } => mismatched_tag(),
        XmlParseError::UnsupportedDeclaration { .. } => unsupported_declaration(),
        XmlParseError::MissingRootElement { .. } => missing_root_element(),
        XmlParseError::UnexpectedData { .. } => unexpected_data(),
        XmlParseError::UnexpectedToken { .. } => unexpected_token(),
        XmlParseError::UnclosedTag { .. } => unclosed_tag(),
        XmlParseError::Tokenizer(_) => tokenizer_failure(),
    }
}

/// `{:error, {kind, message}}`
pub fn error_to_term<'a>(env: Env<'a>, err: &XmlParseError) -> Term<'a> {
    let reason = (error_kind_atom(err), str_to_binary(env, &err.to_string()));
    (error(), reason).encode(env)
}

/// `{:ok, value}`
pub fn ok_tuple<'a>(env: Env<'a>, value: Term<'a>) -> Term<'a> {
    (ok(), value).encode(env)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
