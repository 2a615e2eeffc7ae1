//! XML Tokenizer - splits raw text into tag and data tokens
//!
//! Every token is either one markup run (`<` up to the first unquoted `>`)
//! or one run of text between markup, trimmed. Whitespace-only text runs
//! carry no content in this format and are dropped. Tokens borrow from the
//! input; classification is left to the matcher.

use super::scanner::Scanner;
use crate::error::TokenizeError;

/// Split a document into its ordered token sequence
pub fn tokenize(input: &str) -> Result<Vec<&str>, TokenizeError> {
    let mut scanner = Scanner::new(input.as_bytes());
    let mut tokens = Vec::new();

    while !scanner.is_eof() {
        let start = scanner.position();
        let tag_start = scanner.find_tag_start().unwrap_or(input.len());

        if tag_start > start {
            push_text(&mut tokens, &input[start..tag_start]);
        }
        if tag_start == input.len() {
            break;
        }

        scanner.set_position(tag_start);
        let tag_end = scanner
            .find_tag_end_quoted()
            .ok_or(TokenizeError::UnterminatedMarkup { position: tag_start })?;

        tokens.push(&input[tag_start..=tag_end]);
        scanner.set_position(tag_end + 1);
    }

    log::trace!("tokenized {} bytes into {} tokens", input.len(), tokens.len());
    Ok(tokens)
}

/// Tokenize raw bytes, rejecting anything that is not UTF-8
pub fn tokenize_bytes(input: &[u8]) -> Result<Vec<&str>, TokenizeError> {
    let text = std::str::from_utf8(input).map_err(|e| TokenizeError::InvalidUtf8 {
        position: e.valid_up_to(),
    })?;
    tokenize(text)
}

#[inline]
fn push_text<'a>(tokens: &mut Vec<&'a str>, run: &'a str) {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_and_data() {
        let tokens = tokenize("<a>\n  <b x=\"1\">text</b>\n  <c/>\n</a>").unwrap();
        assert_eq!(tokens, vec!["<a>", "<b x=\"1\">", "text", "</b>", "<c/>", "</a>"]);
    }

    #[test]
    fn test_declaration_is_one_token() {
        let tokens = tokenize(
            "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n<root></root>",
        )
        .unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens[0].starts_with("<?xml"));
    }

    #[test]
    fn test_quoted_gt_stays_inside_tag() {
        let tokens = tokenize("<a note=\"1 > 0\"/>").unwrap();
        assert_eq!(tokens, vec!["<a note=\"1 > 0\"/>"]);
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_text_is_kept() {
        let tokens = tokenize("<a></a> tail ").unwrap();
        assert_eq!(tokens, vec!["<a>", "</a>", "tail"]);
    }

    #[test]
    fn test_unterminated_markup() {
        let err = tokenize("<a><b").unwrap_err();
        assert_eq!(err, TokenizeError::UnterminatedMarkup { position: 3 });
    }

    #[test]
    fn test_invalid_utf8() {
        let err = tokenize_bytes(b"<a>\xff</a>").unwrap_err();
        assert_eq!(err, TokenizeError::InvalidUtf8 { position: 3 });
    }

    #[test]
    fn test_multibyte_text() {
        let tokens = tokenize("<имя>значение</имя>").unwrap();
        assert_eq!(tokens, vec!["<имя>", "значение", "</имя>"]);
    }
}
