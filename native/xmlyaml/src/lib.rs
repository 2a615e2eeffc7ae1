//! XmlYaml - restricted XML to YAML conversion
//!
//! Pipeline:
//! raw text -> tokenizer -> tree builder (matcher + attribute parser) ->
//! arena tree -> YAML emitter
//!
//! Only standalone XML 1.0 in UTF-8 is accepted; no namespaces, CDATA,
//! comments, entities or mixed content.
//!
//! The crate is both a plain Rust library (`dom::parse`, `emit::emit`) and an
//! Erlang NIF loaded as `Elixir.XmlYaml.Native`.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod dom;
pub mod emit;
pub mod error;
mod resource;
mod term;

pub use dom::{NodeId, NodeKind, ParseOptions, XmlTree};
pub use error::{TokenizeError, XmlParseError};

use resource::{TreeRef, TreeResource};
use term::{error_to_term, node_to_term, ok_tuple, str_to_binary, tokens_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Tokens
// ============================================================================

/// Split a document into its token list
#[rustler::nif]
fn tokenize<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match core::tokenizer::tokenize_bytes(input.as_slice()) {
        Ok(tokens) => Ok(ok_tuple(env, tokens_to_term(env, &tokens))),
        Err(e) => Ok(error_to_term(env, &XmlParseError::from(e))),
    }
}

// ============================================================================
// Tree
// ============================================================================

fn parse_bytes(input: &[u8], options: ParseOptions) -> Result<Option<XmlTree>, XmlParseError> {
    let tokens = core::tokenizer::tokenize_bytes(input)?;
    dom::parse_tokens_with_options(&tokens, options)
}

fn parse_to_resource<'a>(env: Env<'a>, input: &[u8], options: ParseOptions) -> Term<'a> {
    match parse_bytes(input, options) {
        Ok(Some(tree)) => {
            let arc = ResourceArc::new(TreeResource::new(tree));
            ok_tuple(env, arc.encode(env))
        }
        Ok(None) => rustler::types::atom::nil().encode(env),
        Err(e) => error_to_term(env, &e),
    }
}

/// Parse a document into a tree resource
/// Returns {:ok, ref}, {:error, {kind, message}} or nil for an empty document
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(parse_to_resource(env, input.as_slice(), ParseOptions::default()))
}

/// Same as parse/1 but accepts any well-formed declaration
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_lenient<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(parse_to_resource(env, input.as_slice(), ParseOptions::lenient()))
}

/// Get the root section as nested {:section, ...} / {:element, ...} tuples
///
/// Term conversion recurses once per nesting level. Very deep documents need
/// the dirty CPU scheduler stack raised with `+sssdcpu`.
#[rustler::nif(schedule = "DirtyCpu")]
fn get_root<'a>(env: Env<'a>, tree_ref: TreeRef) -> NifResult<Term<'a>> {
    let result = tree_ref.with_tree(|tree| node_to_term(env, tree, tree.root_id()));

    match result {
        Ok(term) => Ok(term),
        Err(_) => Ok(rustler::types::atom::nil().encode(env)),
    }
}

// ============================================================================
// YAML
// ============================================================================

/// YAML for the root's children
#[rustler::nif(schedule = "DirtyCpu")]
fn to_yaml<'a>(env: Env<'a>, tree_ref: TreeRef) -> NifResult<Term<'a>> {
    let result = tree_ref.with_tree(emit::to_yaml_string);

    match result {
        Ok(yaml) => Ok(str_to_binary(env, &yaml)),
        Err(_) => Ok("".encode(env)),
    }
}

/// YAML for the whole document, root key included
#[rustler::nif(schedule = "DirtyCpu")]
fn to_yaml_document<'a>(env: Env<'a>, tree_ref: TreeRef) -> NifResult<Term<'a>> {
    let result = tree_ref.with_tree(|tree| {
        let mut buf = Vec::new();
        emit::emit_document(tree, &mut buf).map(|_| buf)
    });

    match result {
        Ok(Ok(buf)) => Ok(str_to_binary(env, &String::from_utf8_lossy(&buf))),
        _ => Ok("".encode(env)),
    }
}

/// Parse and convert in one call, without keeping the tree
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_to_yaml<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match parse_bytes(input.as_slice(), ParseOptions::default()) {
        Ok(Some(tree)) => {
            let yaml = emit::to_yaml_string(&tree);
            Ok(ok_tuple(env, str_to_binary(env, &yaml)))
        }
        Ok(None) => Ok(rustler::types::atom::nil().encode(env)),
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.XmlYaml.Native");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_end_to_end() {
        let input = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
            <catalog>\n  <book id=\"1\">\n    <title>Dune</title>\n    <tag>sf</tag>\n    \
            <tag>classic</tag>\n  </book>\n  <book id=\"2\"/>\n</catalog>\n";
        let tree = parse_bytes(input, ParseOptions::default()).unwrap().unwrap();
        assert_eq!(
            emit::to_yaml_string(&tree),
            "book:\n  attributes:\n    id: 1\n  title: Dune\n  tag: sf\n  tag1: classic\n\
             book1:\n  attributes:\n    id: 2\n  value: \n"
        );
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = parse_bytes(b"<a>\xfe</a>", ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "tokenizer_failure");
    }

    #[test]
    fn test_parse_bytes_empty() {
        assert!(parse_bytes(b"", ParseOptions::default()).unwrap().is_none());
    }
}
