//! UTF-16 offset to codepoint offset mapping.

use crate::error::CodepointError;

/// Maps UTF-16 code-unit offsets to Unicode codepoint offsets within one string.
///
/// The last lookup is cached per string, so a run of calls with non-decreasing
/// offsets on the same string scans each character only once overall. A call on a
/// different string, or with a smaller offset, restarts the scan from the beginning.
#[derive(Debug, Default)]
pub struct CodepointIndexer<'a> {
    content: Option<&'a str>,
    /// Total UTF-16 length of `content`, computed once per string
    utf16_len: usize,
    last_utf16: usize,
    last_codepoint: usize,
    /// Byte offset in `content` matching `last_utf16`
    last_byte: usize,
}

impl<'a> CodepointIndexer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the codepoint offset corresponding to `utf16_offset` in `content`.
    ///
    /// Fails if `utf16_offset` is not within `[0, len)` where `len` is the UTF-16
    /// length of `content`. An offset that lands on the trailing half of a surrogate
    /// pair counts the pair as consumed.
    pub fn codepoint_index_for(
        &mut self,
        content: &'a str,
        utf16_offset: usize,
    ) -> Result<usize, CodepointError> {
        if !self.is_cached(content) {
            self.content = Some(content);
            self.utf16_len = content.encode_utf16().count();
            self.rewind();
        }

        if utf16_offset >= self.utf16_len {
            return Err(CodepointError::OutOfRange {
                offset: utf16_offset,
                len: self.utf16_len,
            });
        }

        if utf16_offset < self.last_utf16 {
            self.rewind();
        }

        let mut utf16 = self.last_utf16;
        let mut codepoint = self.last_codepoint;
        let mut byte = self.last_byte;
        for c in content[byte..].chars() {
            if utf16 >= utf16_offset {
                break;
            }
            utf16 += c.len_utf16();
            byte += c.len_utf8();
            codepoint += 1;
        }

        self.last_utf16 = utf16;
        self.last_codepoint = codepoint;
        self.last_byte = byte;

        Ok(codepoint)
    }

    fn is_cached(&self, content: &str) -> bool {
        self.content.is_some_and(|cached| std::ptr::eq(cached, content))
    }

    const fn rewind(&mut self) {
        self.last_utf16 = 0;
        self.last_codepoint = 0;
        self.last_byte = 0;
    }
}
