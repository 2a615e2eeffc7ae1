//! Markup boundary scanning using memchr
//!
//! memchr picks SSE2/AVX2/NEON at runtime, so locating the next `<` in a long
//! text run is cheap.

use memchr::{memchr, memchr3};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cursor over the raw document bytes
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner, skipping a leading UTF-8 byte order mark
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        let pos = if input.starts_with(UTF8_BOM) { UTF8_BOM.len() } else { 0 };
        Scanner { input, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Find next '<' (tag start)
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find the '>' closing the markup at the current position.
    ///
    /// A '>' inside a single- or double-quoted run does not count. Quote
    /// bytes are located with memchr3 so long attribute strings are skipped
    /// in bulk.
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;

        while pos < self.input.len() {
            let hit = pos + memchr3(b'>', b'"', b'\'', &self.input[pos..])?;
            match self.input[hit] {
                b'>' => return Some(hit),
                quote => {
                    let close = memchr(quote, &self.input[hit + 1..])?;
                    pos = hit + 1 + close + 1;
                }
            }
        }
        None
    }
}
