//! Tree Builder - turns a token sequence into an [`XmlTree`]
//!
//! The walk is a single left-to-right loop over the tokens with a cursor on
//! the currently open section and a stack of open tag names. The stack only
//! validates close tags; nodes are reached through the cursor.
//!
//! An open tag is collapsed into a leaf element when it is immediately
//! followed by `data, close` or by `close` with the same name. Anything else
//! opens a new section.

use super::node::NodeId;
use super::tree::XmlTree;
use crate::core::attributes::parse_attributes;
use crate::core::declaration::DeclarationPolicy;
use crate::core::matcher::{self, Tag};
use crate::core::tokenizer::tokenize;
use crate::error::XmlParseError;

/// Parse configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// How a leading declaration is checked
    pub declaration: DeclarationPolicy,
}

impl ParseOptions {
    pub fn lenient() -> Self {
        ParseOptions {
            declaration: DeclarationPolicy::Lenient,
        }
    }
}

/// Parse a document with default options.
///
/// Returns `Ok(None)` when the input holds no tokens at all.
pub fn parse(input: &str) -> Result<Option<XmlTree>, XmlParseError> {
    parse_with_options(input, ParseOptions::default())
}

pub fn parse_with_options(
    input: &str,
    options: ParseOptions,
) -> Result<Option<XmlTree>, XmlParseError> {
    let tokens = tokenize(input)?;
    parse_tokens_with_options(&tokens, options)
}

/// Build a tree from an already tokenized document
pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Option<XmlTree>, XmlParseError> {
    parse_tokens_with_options(tokens, ParseOptions::default())
}

pub fn parse_tokens_with_options<S: AsRef<str>>(
    tokens: &[S],
    options: ParseOptions,
) -> Result<Option<XmlTree>, XmlParseError> {
    let Some(first) = tokens.first() else {
        log::debug!("empty token sequence, no document");
        return Ok(None);
    };

    let mut start = 0;
    if let Some(decl) = matcher::match_declaration(first.as_ref()) {
        options.declaration.check(&decl)?;
        start = 1;
    }

    let root_token = tokens.get(start).map_or("", |t| t.as_ref());
    let Some(Tag::Open { name, attrs }) = matcher::match_open_tag(root_token) else {
        return Err(XmlParseError::MissingRootElement {
            token: root_token.to_string(),
        });
    };

    let root_attrs = parse_attributes(attrs, name)?;
    let mut tree = XmlTree::with_root(name, &root_attrs);
    build(&mut tree, tokens, start + 1, name)?;

    log::debug!(
        "parsed <{}>: {} tokens, {} nodes, {} strings, depth {}",
        name,
        tokens.len(),
        tree.node_count(),
        tree.string_count(),
        tree.max_depth()
    );
    Ok(Some(tree))
}

#[inline]
fn lookahead<S: AsRef<str>>(tokens: &[S], pos: usize) -> Option<Tag<'_>> {
    tokens.get(pos).and_then(|t| matcher::classify(t.as_ref()))
}

/// Walk tokens from `pos` until the root closes
fn build<'t, S: AsRef<str>>(
    tree: &mut XmlTree,
    tokens: &'t [S],
    mut pos: usize,
    root_name: &'t str,
) -> Result<(), XmlParseError> {
    let mut section: NodeId = tree.root_id();
    let mut stack: Vec<&'t str> = vec![root_name];

    while let Some(token) = tokens.get(pos).map(|t| t.as_ref()) {
        let tag = matcher::classify(token).ok_or_else(|| XmlParseError::UnexpectedToken {
            token: token.to_string(),
        })?;
        log::trace!("token {pos}: {tag:?}");

        match tag {
            Tag::Open { name, attrs } => {
                let attrs = parse_attributes(attrs, name)?;
                match (lookahead(tokens, pos + 1), lookahead(tokens, pos + 2)) {
                    (Some(Tag::Data(data)), Some(close)) if close.is_close_of(name) => {
                        tree.append_element(section, name, data, &attrs);
                        pos += 3;
                    }
                    (Some(close), _) if close.is_close_of(name) => {
                        tree.append_element(section, name, "", &attrs);
                        pos += 2;
                    }
                    _ => {
                        stack.push(name);
                        section = tree.append_section(section, name, &attrs);
                        pos += 1;
                    }
                }
            }
            Tag::SelfClosed { name, attrs } => {
                let attrs = parse_attributes(attrs, name)?;
                tree.append_element(section, name, "", &attrs);
                pos += 1;
            }
            Tag::Close { name } => {
                match stack.pop() {
                    Some(open) if open == name => {}
                    Some(open) => {
                        return Err(XmlParseError::MismatchedTag {
                            expected: open.to_string(),
                            found: name.to_string(),
                        });
                    }
                    None => {
                        return Err(XmlParseError::UnexpectedToken {
                            token: token.to_string(),
                        });
                    }
                }

                if stack.is_empty() {
                    let trailing = tokens.len() - pos - 1;
                    if trailing > 0 {
                        log::warn!("ignoring {trailing} tokens after </{name}>");
                    }
                    return Ok(());
                }

                section = tree.parent(section).unwrap_or(tree.root_id());
                pos += 1;
            }
            Tag::Data(data) => {
                return Err(XmlParseError::UnexpectedData {
                    data: data.to_string(),
                    section: tree.node_name(section).unwrap_or_default().to_string(),
                });
            }
            Tag::Declaration(_) => {
                return Err(XmlParseError::UnexpectedToken {
                    token: token.to_string(),
                });
            }
        }
    }

    Err(XmlParseError::UnclosedTag {
        name: stack.last().copied().unwrap_or(root_name).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeKind;
    use proptest::prelude::*;

    const DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>";

    fn parse_ok(input: &str) -> XmlTree {
        parse(input).unwrap().unwrap()
    }

    fn only_child(tree: &XmlTree) -> NodeId {
        let children: Vec<_> = tree.children(tree.root_id()).collect();
        assert_eq!(children.len(), 1);
        children[0]
    }

    #[test]
    fn test_empty_input_is_no_document() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("  \n ").unwrap().is_none());
        assert!(parse_tokens::<&str>(&[]).unwrap().is_none());
    }

    #[test]
    fn test_leaf_with_text() {
        let tree = parse_ok("<r><a>text</a></r>");
        let a = only_child(&tree);
        assert_eq!(tree.kind(a), Some(NodeKind::Element));
        assert_eq!(tree.node_name(a), Some("a"));
        assert_eq!(tree.value(a), Some("text"));
    }

    #[test]
    fn test_empty_leaf_forms() {
        for input in ["<r><a></a></r>", "<r><a/></r>", "<r><a /></r>"] {
            let tree = parse_ok(input);
            let a = only_child(&tree);
            assert_eq!(tree.kind(a), Some(NodeKind::Element), "{input}");
            assert_eq!(tree.value(a), Some(""), "{input}");
        }
    }

    #[test]
    fn test_nested_sections() {
        let tree = parse_ok("<r><s><t><u>1</u></t></s><v/></r>");
        let names: Vec<_> = tree
            .descendants(tree.root_id())
            .map(|id| (tree.node_name(id).unwrap(), tree.kind(id).unwrap()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("s", NodeKind::Section),
                ("t", NodeKind::Section),
                ("u", NodeKind::Element),
                ("v", NodeKind::Element),
            ]
        );
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_self_closed_does_not_stop_the_walk() {
        let tree = parse_ok("<r><a/><b>2</b><c x=\"1\"/></r>");
        let names: Vec<_> = tree
            .children(tree.root_id())
            .filter_map(|id| tree.node_name(id))
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parent_links_are_consistent() {
        let tree = parse_ok("<r><s><a>1</a><t><b/></t></s><c/></r>");
        for id in tree.descendants(tree.root_id()) {
            let parent = tree.parent(id).unwrap();
            assert_eq!(tree.kind(parent), Some(NodeKind::Section));
            assert!(tree.children(parent).any(|c| c == id));
        }
        assert_eq!(tree.parent(tree.root_id()), None);
    }

    #[test]
    fn test_attributes_in_order() {
        let tree = parse_ok("<r id=\"0\"><a x=\"1\" y=\"2\">v</a></r>");
        let a = only_child(&tree);
        let attrs: Vec<_> = tree.attributes(a).collect();
        assert_eq!(attrs, vec![("x", "1"), ("y", "2")]);
        assert_eq!(tree.get_attribute(tree.root_id(), "id"), Some("0"));
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = parse("<r><a x=\"1\" x=\"2\"></a></r>").unwrap_err();
        assert_eq!(err.kind(), "duplicate_attribute");
        let err = parse("<a x=\"1\" x=\"2\"></a>").unwrap_err();
        assert_eq!(err.kind(), "duplicate_attribute");
    }

    #[test]
    fn test_malformed_attribute_reports_tag() {
        let err = parse("<r><item size=big/></r>").unwrap_err();
        assert_eq!(
            err,
            XmlParseError::MalformedAttribute {
                attribute: "size=big".to_string(),
                tag: "item".to_string(),
            }
        );
    }

    #[test]
    fn test_markup_characters_in_attribute_values() {
        let tree = parse_ok("<r><a x=\"1>0\"/><b y=\"a<b\">v</b><c z=\"/\"/></r>");
        let ids: Vec<_> = tree.children(tree.root_id()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(tree.get_attribute(ids[0], "x"), Some("1>0"));
        assert_eq!(tree.value(ids[0]), Some(""));
        assert_eq!(tree.get_attribute(ids[1], "y"), Some("a<b"));
        assert_eq!(tree.value(ids[1]), Some("v"));
        assert_eq!(tree.get_attribute(ids[2], "z"), Some("/"));
    }

    #[test]
    fn test_greater_than_in_text() {
        let tree = parse_ok("<r><a>1 > 0</a></r>");
        assert_eq!(tree.value(only_child(&tree)), Some("1 > 0"));
    }

    #[test]
    fn test_mismatched_tag() {
        let err = parse("<a><b></a></b>").unwrap_err();
        assert_eq!(
            err,
            XmlParseError::MismatchedTag {
                expected: "b".to_string(),
                found: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_declaration_gate() {
        let tree = parse_ok(&format!("{DECL}\n<r><a>1</a></r>"));
        assert_eq!(tree.node_name(tree.root_id()), Some("r"));

        let err = parse("<?xml version=\"1.1\" encoding=\"utf-8\" standalone=\"yes\"?><r></r>")
            .unwrap_err();
        assert_eq!(err.kind(), "unsupported_declaration");

        let err = parse("<?xml version=\"1.0\" encoding=\"utf-8\"?><r></r>").unwrap_err();
        assert_eq!(err.kind(), "unsupported_declaration");

        let tree = parse_ok("<?xml version='1.0' encoding='UTF-8' standalone='yes'?><r></r>");
        assert_eq!(tree.node_name(tree.root_id()), Some("r"));

        let err = parse("<?xml version='1.1' encoding='utf-8' standalone='yes'?><r></r>")
            .unwrap_err();
        assert_eq!(
            err,
            XmlParseError::UnsupportedDeclaration {
                version: Some("1.1".to_string()),
                encoding: Some("utf-8".to_string()),
                standalone: Some("yes".to_string()),
            }
        );
    }

    #[test]
    fn test_lenient_declaration() {
        let input = "<?xml version=\"2.0\"?><r><a>1</a></r>";
        let tree = parse_with_options(input, ParseOptions::lenient()).unwrap().unwrap();
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_missing_root_element() {
        for input in ["<a/>", "text", "</a>", DECL] {
            let err = parse(input).unwrap_err();
            assert_eq!(err.kind(), "missing_root_element", "{input}");
        }
    }

    #[test]
    fn test_root_without_children() {
        let tree = parse_ok("<r></r>");
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.kind(tree.root_id()), Some(NodeKind::Section));
    }

    #[test]
    fn test_unclosed_tag() {
        let err = parse("<r><s><a>1</a>").unwrap_err();
        assert_eq!(err, XmlParseError::UnclosedTag { name: "s".to_string() });
    }

    #[test]
    fn test_open_tag_at_end_of_tokens() {
        let err = parse_tokens(&["<r>", "<a>"]).unwrap_err();
        assert_eq!(err, XmlParseError::UnclosedTag { name: "a".to_string() });
    }

    #[test]
    fn test_mixed_content_is_rejected() {
        let err = parse("<r><s>text<a/></s></r>").unwrap_err();
        assert_eq!(
            err,
            XmlParseError::UnexpectedData {
                data: "text".to_string(),
                section: "s".to_string(),
            }
        );
    }

    #[test]
    fn test_unclassifiable_token() {
        let err = parse("<r><!-- note --></r>").unwrap_err();
        assert_eq!(err.kind(), "unexpected_token");
    }

    #[test]
    fn test_tokenizer_failure_propagates() {
        let err = parse("<r><a").unwrap_err();
        assert_eq!(err.kind(), "tokenizer_failure");
    }

    #[test]
    fn test_trailing_tokens_are_ignored() {
        let tree = parse_ok("<r><a>1</a></r><junk/>");
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_text_then_other_close_opens_section() {
        // <a>text</b> is not a leaf triple, so <a> opens and the text is stray
        let err = parse("<r><a>text</b></r>").unwrap_err();
        assert_eq!(err.kind(), "unexpected_data");
    }

    #[derive(Debug, Clone)]
    struct Shape(Vec<Shape>);

    fn shape() -> impl Strategy<Value = Shape> {
        Just(Shape(Vec::new())).prop_recursive(6, 64, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Shape)
        })
    }

    fn render(shape: &Shape, depth: usize, out: &mut Vec<String>) {
        out.push(format!("<n{depth}>"));
        for child in &shape.0 {
            render(child, depth + 1, out);
        }
        out.push(format!("</n{depth}>"));
    }

    fn shape_depth(shape: &Shape) -> u32 {
        shape.0.iter().map(|c| 1 + shape_depth(c)).max().unwrap_or(0)
    }

    fn assert_matches(tree: &XmlTree, id: NodeId, shape: &Shape) {
        let children: Vec<_> = tree.children(id).collect();
        assert_eq!(children.len(), shape.0.len());
        for (&child, child_shape) in children.iter().zip(&shape.0) {
            if child_shape.0.is_empty() {
                assert_eq!(tree.kind(child), Some(NodeKind::Element));
                assert_eq!(tree.value(child), Some(""));
            } else {
                assert_eq!(tree.kind(child), Some(NodeKind::Section));
                assert_matches(tree, child, child_shape);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_nesting_round_trip(root in shape()) {
            let mut tokens = Vec::new();
            render(&root, 0, &mut tokens);

            let tree = parse_tokens(&tokens).unwrap().unwrap();
            prop_assert_eq!(tree.max_depth(), shape_depth(&root));
            assert_matches(&tree, tree.root_id(), &root);
        }
    }
}
