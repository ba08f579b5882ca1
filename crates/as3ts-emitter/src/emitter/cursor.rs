//! Source cursor and append-only output buffer.
//!
//! The cursor marks how much of the source has been consumed. Output only
//! grows at the end; every append is logged as a [`Chunk`] recording whether
//! the text was copied from the source or synthesized. The one sanctioned
//! edit of already-emitted text, wrapping a span in a comment after the
//! cursor has moved past it, is recorded as a deferred wrap and applied when
//! the buffer is finished.

use crate::error::EmitError;
use std::ops::Range;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    index: u32,
}

impl Cursor {
    pub fn at(index: u32) -> Cursor {
        Cursor { index }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Move forward to `target`. Moving backwards or past `len` is a defect in
    /// the calling handler.
    pub fn advance_to(&mut self, target: u32, len: usize) -> Result<(), EmitError> {
        if target < self.index {
            return Err(EmitError::CursorMisuse {
                index: self.index,
                reason: format!("cannot move back to {target}"),
            });
        }
        if target as usize > len {
            return Err(EmitError::CursorMisuse {
                index: self.index,
                reason: format!("{target} is past the end of the source ({len} bytes)"),
            });
        }
        self.index = target;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkOrigin {
    /// Verbatim copy of `source[start..end]`.
    Source { start: u32, end: u32 },
    Inserted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub origin: ChunkOrigin,
    /// Byte range in the output.
    pub range: Range<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct DeferredWrap {
    range: Range<usize>,
    prefix: &'static str,
    suffix: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
    text: String,
    chunks: Vec<Chunk>,
    wraps: Vec<DeferredWrap>,
}

impl OutputBuffer {
    pub fn new() -> OutputBuffer {
        OutputBuffer::default()
    }

    pub fn push_source(&mut self, text: &str, start: u32, end: u32) {
        self.push(text, ChunkOrigin::Source { start, end });
    }

    pub fn push_inserted(&mut self, text: &str) {
        self.push(text, ChunkOrigin::Inserted);
    }

    fn push(&mut self, text: &str, origin: ChunkOrigin) {
        if text.is_empty() {
            return;
        }
        let begin = self.text.len();
        self.text.push_str(text);
        self.chunks.push(Chunk {
            origin,
            range: begin..self.text.len(),
        });
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    /// Trailing run of spaces and tabs.
    pub fn trailing_blanks(&self) -> &str {
        let trimmed = self.text.trim_end_matches([' ', '\t']);
        &self.text[trimmed.len()..]
    }

    /// Leading whitespace of the line currently being written.
    pub fn current_line_indent(&self) -> &str {
        let line_start = self.text.rfind('\n').map_or(0, |pos| pos + 1);
        let line = &self.text[line_start..];
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..indent_len]
    }

    /// The last of `terminators` written and everything after it.
    pub fn tail_after_last(&self, terminators: &[char]) -> Option<(char, &str)> {
        let pos = self.text.rfind(terminators)?;
        let terminator = self.text[pos..].chars().next()?;
        Some((terminator, &self.text[pos + terminator.len_utf8()..]))
    }

    /// Comment out the last occurrence of `needle` once the buffer is
    /// finished. Returns `false` when the needle was never emitted.
    pub fn wrap_last_occurrence(&mut self, needle: &str, prefix: &'static str, suffix: &'static str) -> bool {
        if needle.is_empty() {
            return false;
        }
        match self.text.rfind(needle) {
            Some(start) => {
                self.wraps.push(DeferredWrap {
                    range: start..start + needle.len(),
                    prefix,
                    suffix,
                });
                true
            }
            None => false,
        }
    }

    /// Final text, with deferred wraps applied.
    pub fn finish(self) -> String {
        let OutputBuffer { mut text, wraps, .. } = self;
        let mut wraps = wraps;
        // Apply back to front so earlier ranges stay valid.
        wraps.sort_by(|a, b| b.range.start.cmp(&a.range.start));
        for wrap in wraps {
            text.insert_str(wrap.range.end, wrap.suffix);
            text.insert_str(wrap.range.start, wrap.prefix);
        }
        text
    }
}

#[cfg(test)]
#[path = "../../tests/cursor.rs"]
mod tests;
