//! Deduplicated pool of literal token spellings.

use indexmap::IndexMap;

use pretok_format::BitWriter;

/// Maps each distinct literal spelling to a stable pool offset.
///
/// Offsets are assigned at first sight, `len + 1` apart (each entry is the
/// spelling followed by one NUL), and never change afterwards: token
/// records written long before the pool itself store them. Emission order
/// is insertion order, so the assigned offsets are exactly where each
/// spelling lands relative to the section start.
#[derive(Default)]
pub struct SpellingPool {
    entries: IndexMap<Box<[u8]>, u32>,
    cur_offset: u32,
}

impl SpellingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool offset for `spelling`, assigning one on first sight.
    pub fn intern(&mut self, spelling: &[u8]) -> u32 {
        if let Some(&offset) = self.entries.get(spelling) {
            return offset;
        }
        let offset = self.cur_offset;
        self.entries.insert(spelling.into(), offset);
        self.cur_offset += spelling.len() as u32 + 1;
        offset
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every distinct spelling, NUL-terminated, in insertion order.
    /// Returns the section's starting offset.
    pub fn emit(&self, out: &mut BitWriter) -> u32 {
        let start = out.tell();
        for spelling in self.entries.keys() {
            out.emit_bytes(spelling);
            out.emit_u8(0);
        }
        start
    }
}
