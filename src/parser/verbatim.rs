//! Verbatim blocks: `={ … }=`, `==={ … }===`, …
//!
//! The fence width is chosen by the author. A block only closes on `}`
//! followed by exactly as many `=` as opened it, so `}=` runs of any other
//! width are ordinary content.

use super::ast::{Block, Node};
use super::cursor::Cursor;

/// How a verbatim block was delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub width: usize,
    /// False when end of input arrived before a matching closer
    pub closed: bool,
}

/// Parse a verbatim block.
///
/// The cursor must sit on the run of `=` that precedes the opening `{`:
///
/// ```text
/// \code(md) ==={ Hello, World! }===
///           ^
/// ```
///
/// On return the cursor is past the closing fence, or at end of input.
pub fn parse_verbatim_block(cursor: &mut Cursor<'_>) -> (Block, Fence) {
    let width = verbatim_postfix_level(cursor);
    // opening brace
    cursor.next(1);

    let mut body = Vec::new();
    let mut mark = *cursor;
    let mut closed = false;

    while !cursor.is_eof() {
        if cursor.starts_with("}") {
            let mut lookahead = *cursor;
            lookahead.next(1);

            if verbatim_postfix_level(&mut lookahead) == width {
                push_text(&mut body, mark.take_until(cursor));
                cursor.move_to(&lookahead);
                mark.move_to(cursor);
                closed = true;
                break;
            }
        }
        cursor.next(1);
    }

    if !closed {
        push_text(&mut body, mark.take_until(cursor));
    }

    (Block::verbatim(body), Fence { width, closed })
}

/// Count and consume a run of `=`
pub fn verbatim_postfix_level(cursor: &mut Cursor<'_>) -> usize {
    let mut level = 0;
    while cursor.starts_with("=") {
        cursor.next(1);
        level += 1;
    }
    level
}

/// True when the cursor sits on `=`* followed by `{`
pub(crate) fn opens_verbatim(cursor: &Cursor<'_>) -> bool {
    let mut lookahead = *cursor;
    verbatim_postfix_level(&mut lookahead) > 0 && lookahead.starts_with("{")
}

fn push_text(body: &mut Vec<Node>, value: &str) {
    if !value.is_empty() {
        body.push(Node::text(value));
    }
}
