//! Position tracker over an immutable source buffer

/// A byte index into a shared `&str`.
///
/// Cursors are plain values: copying one yields an independent position
/// over the same buffer, so lookahead is just `let mut ahead = *cursor;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    buffer: &'a str,
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self { buffer, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn buffer(&self) -> &'a str {
        self.buffer
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.buffer[self.index..]
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.buffer.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advance by `n` characters, stopping at end of input
    pub fn next(&mut self, n: usize) {
        for c in self.rest().chars().take(n) {
            self.index += c.len_utf8();
        }
    }

    /// Copy only the position of `other`
    pub fn move_to(&mut self, other: &Cursor<'a>) {
        debug_assert!(std::ptr::eq(self.buffer, other.buffer));
        self.index = other.index;
    }

    /// Source text between this cursor and `other`; empty if `other` is behind
    pub fn take_until(&self, other: &Cursor<'a>) -> &'a str {
        debug_assert!(std::ptr::eq(self.buffer, other.buffer));
        self.buffer.get(self.index..other.index).unwrap_or("")
    }
}
