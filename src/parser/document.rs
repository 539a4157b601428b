//! Cursor-based document parser
//!
//! Text, tags and block bodies are scanned directly over the source;
//! tag headers are handed to the token grammar in [`super::grammar`].

use super::ast::{Block, Document, Identifier, Node, Tag};
use super::cursor::Cursor;
use super::grammar::{parse_header, Header};
use super::verbatim::{opens_verbatim, parse_verbatim_block};
use crate::ParseError;

/// Default limit on nested `{…}` blocks
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser options
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Report blocks that are still open at end of input instead of
    /// silently truncating them
    pub strict_fences: bool,
    /// Deepest allowed nesting of `{…}` blocks; deeper blocks are
    /// reported as [`ParseError::NestingTooDeep`]
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_fences: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_fences(mut self, strict: bool) -> Self {
        self.strict_fences = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse source text into a document with default options
pub fn parse(input: &str) -> Result<Document, Vec<ParseError>> {
    parse_with_config(input, &ParserConfig::default())
}

/// Parse source text into a document
///
/// Every diagnostic is collected before returning; a single malformed tag
/// header does not hide errors further down the document.
pub fn parse_with_config(input: &str, config: &ParserConfig) -> Result<Document, Vec<ParseError>> {
    let mut parser = DocumentParser {
        config,
        errors: Vec::new(),
        depth: 0,
    };
    let mut cursor = Cursor::new(input);
    let body = parser.parse_nodes(&mut cursor, false);

    if parser.errors.is_empty() {
        Ok(Document { body })
    } else {
        Err(parser.errors)
    }
}

struct DocumentParser<'c> {
    config: &'c ParserConfig,
    errors: Vec<ParseError>,
    /// Number of `{…}` blocks currently open
    depth: usize,
}

impl DocumentParser<'_> {
    /// Parse text and tags until end of input, or until an unescaped `}`
    /// when inside a block (the `}` is left for the caller)
    fn parse_nodes(&mut self, cursor: &mut Cursor<'_>, in_block: bool) -> Vec<Node> {
        let mut body = Vec::new();
        let mut text = String::new();
        let mut mark = *cursor;

        while !cursor.is_eof() {
            if in_block && cursor.starts_with("}") {
                break;
            }

            if !cursor.starts_with("\\") {
                cursor.next(1);
                continue;
            }

            text.push_str(mark.take_until(cursor));
            let mut lookahead = *cursor;
            lookahead.next(1);

            match lookahead.peek() {
                Some(c) if is_name_start(c) => {
                    flush_text(&mut body, &mut text);
                    let tag = self.parse_tag(cursor);
                    body.push(Node::Tag(tag));
                }
                Some(c) => {
                    // escaped character
                    text.push(c);
                    lookahead.next(1);
                    cursor.move_to(&lookahead);
                }
                None => {
                    text.push('\\');
                    cursor.move_to(&lookahead);
                }
            }
            mark.move_to(cursor);
        }

        text.push_str(mark.take_until(cursor));
        flush_text(&mut body, &mut text);
        body
    }

    /// Cursor sits on the backslash of `\name`
    fn parse_tag(&mut self, cursor: &mut Cursor<'_>) -> Tag {
        let start = cursor.index();
        cursor.next(1);

        let name_start = *cursor;
        while cursor.peek().is_some_and(is_name_char) {
            cursor.next(1);
        }
        let id = Identifier::new(name_start.take_until(cursor));

        let header = if cursor.starts_with("(") || cursor.starts_with("[") {
            self.parse_tag_header(cursor)
        } else {
            Header::default()
        };

        let mut blocks = Vec::new();
        loop {
            let mut lookahead = *cursor;
            while lookahead.starts_with(" ") || lookahead.starts_with("\t") {
                lookahead.next(1);
            }

            if lookahead.starts_with("{") {
                cursor.move_to(&lookahead);
                let open = cursor.index();
                cursor.next(1);
                if self.depth >= self.config.max_depth {
                    self.errors.push(ParseError::NestingTooDeep {
                        span: open..open + 1,
                        limit: self.config.max_depth,
                    });
                    skip_block(cursor);
                    blocks.push(Block::default());
                    continue;
                }

                self.depth += 1;
                let body = self.parse_nodes(cursor, true);
                self.depth -= 1;
                if cursor.starts_with("}") {
                    cursor.next(1);
                } else {
                    self.unterminated(open..cursor.index(), 0);
                }
                blocks.push(Block::new(body));
            } else if opens_verbatim(&lookahead) {
                cursor.move_to(&lookahead);
                let open = cursor.index();
                let (block, fence) = parse_verbatim_block(cursor);
                if !fence.closed {
                    self.unterminated(open..cursor.index(), fence.width);
                }
                blocks.push(block);
            } else {
                break;
            }
        }

        Tag {
            id,
            attrs: header.attrs,
            params: header.params,
            blocks,
            span: start..cursor.index(),
        }
    }

    /// Extract `(…)` and/or `[…]` and run the header grammar over it
    fn parse_tag_header(&mut self, cursor: &mut Cursor<'_>) -> Header {
        let start = *cursor;

        for (open, close) in [("(", ')'), ("[", ']')] {
            if cursor.starts_with(open) && !skip_delimited(cursor, close) {
                self.errors.push(ParseError::Syntax {
                    span: start.index()..cursor.index(),
                    message: "Unterminated tag header".to_string(),
                    expected: vec![format!("'{}'", close)],
                });
                return Header::default();
            }
        }

        match parse_header(start.take_until(cursor), start.index()) {
            Ok(header) => header,
            Err(errors) => {
                self.errors.extend(errors);
                Header::default()
            }
        }
    }

    fn unterminated(&mut self, span: std::ops::Range<usize>, fence: usize) {
        if self.config.strict_fences {
            self.errors.push(ParseError::UnterminatedBlock { span, fence });
        } else {
            log::debug!("block at {:?} truncated at end of input", span);
        }
    }
}

/// Advance past the opening delimiter up to and including `close`,
/// skipping over quoted strings. Returns false at end of input.
fn skip_delimited(cursor: &mut Cursor<'_>, close: char) -> bool {
    cursor.next(1);
    while let Some(c) = cursor.peek() {
        cursor.next(1);
        if c == close {
            return true;
        }
        if c == '"' {
            while let Some(s) = cursor.peek() {
                cursor.next(1);
                if s == '\\' {
                    cursor.next(1);
                } else if s == '"' {
                    break;
                }
            }
        }
    }
    false
}

/// Skip the rest of a `{…}` block whose opening brace was consumed,
/// balancing braces without building nodes
fn skip_block(cursor: &mut Cursor<'_>) {
    let mut open = 1usize;
    while let Some(c) = cursor.peek() {
        cursor.next(1);
        match c {
            '\\' => {
                cursor.next(1);
            }
            '{' => open += 1,
            '}' => {
                open -= 1;
                if open == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

fn flush_text(body: &mut Vec<Node>, text: &mut String) {
    if !text.is_empty() {
        body.push(Node::text(std::mem::take(text)));
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Literal, Text};
    use pretty_assertions::assert_eq;

    fn tag(node: &Node) -> &Tag {
        match node {
            Node::Tag(t) => t,
            other => panic!("Expected tag, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_text() {
        let doc = parse("just words { and } braces").expect("Should parse");
        assert_eq!(doc.body, vec![Node::text("just words { and } braces")]);
    }

    #[test]
    fn test_simple_tag() {
        let doc = parse(r"Hello \b{world}!").expect("Should parse");
        assert_eq!(doc.body.len(), 3);
        assert_eq!(doc.body[0], Node::text("Hello "));
        let b = tag(&doc.body[1]);
        assert_eq!(b.name(), "b");
        assert_eq!(b.blocks, vec![Block::new(vec![Node::text("world")])]);
        assert_eq!(b.span, 6..15);
        assert_eq!(doc.body[2], Node::text("!"));
    }

    #[test]
    fn test_tag_without_blocks_keeps_following_space() {
        let doc = parse(r"a\br b").expect("Should parse");
        assert_eq!(doc.body.len(), 3);
        assert!(tag(&doc.body[1]).blocks.is_empty());
        assert_eq!(doc.body[2], Node::text(" b"));
    }

    #[test]
    fn test_header_and_multiple_blocks() {
        let doc = parse(r#"\link("/home")[rel=nofollow] {Home} {alt}"#).expect("Should parse");
        let link = tag(&doc.body[0]);
        assert_eq!(link.param_values(), vec![serde_json::json!("/home")]);
        assert_eq!(link.attrs[0].value, Literal::Ident("nofollow".into()));
        assert_eq!(link.blocks.len(), 2);
        assert_eq!(link.blocks[1].body, vec![Node::text("alt")]);
    }

    #[test]
    fn test_header_strings_may_contain_delimiters() {
        let doc = parse(r#"\x(")", "]")[k="(]"]"#).expect("Should parse");
        let x = tag(&doc.body[0]);
        assert_eq!(x.params.len(), 2);
        assert_eq!(x.attrs[0].value, Literal::String("(]".into()));
    }

    #[test]
    fn test_nested_tags() {
        let doc = parse(r"\p{one \i{two} three}").expect("Should parse");
        let p = tag(&doc.body[0]);
        let body = &p.blocks[0].body;
        assert_eq!(body.len(), 3);
        assert_eq!(tag(&body[1]).name(), "i");
        assert_eq!(body[2], Node::text(" three"));
    }

    #[test]
    fn test_verbatim_block_after_header() {
        let doc = parse(r"\code(md) ==={ \b{x} }=== done").expect("Should parse");
        let code = tag(&doc.body[0]);
        assert_eq!(code.blocks, vec![Block::verbatim(vec![Node::text(r" \b{x} ")])]);
        assert_eq!(doc.body[1], Node::text(" done"));
    }

    #[test]
    fn test_escapes_merge_into_text() {
        let doc = parse(r"a \{b\} \\ \= c\").expect("Should parse");
        assert_eq!(doc.body, vec![Node::Text(Text::new(r"a {b} \ = c\"))]);
    }

    #[test]
    fn test_escaped_brace_inside_block() {
        let doc = parse(r"\b{x\}y}").expect("Should parse");
        assert_eq!(tag(&doc.body[0]).blocks[0].body, vec![Node::text("x}y")]);
    }

    #[test]
    fn test_unterminated_block_lenient() {
        let doc = parse(r"\b{open ==={x").expect("Should parse");
        assert_eq!(tag(&doc.body[0]).blocks[0].body, vec![Node::text("open ==={x")]);

        let doc = parse(r"\c=={abc").expect("Should parse");
        assert_eq!(tag(&doc.body[0]).blocks[0].body, vec![Node::text("abc")]);
    }

    #[test]
    fn test_unterminated_block_strict() {
        let config = ParserConfig::new().with_strict_fences(true);
        let errors = parse_with_config(r"\c=={abc}=", &config).expect_err("Should fail");
        assert_eq!(
            errors,
            vec![ParseError::UnterminatedBlock { span: 2..10, fence: 2 }]
        );

        let errors = parse_with_config(r"\b{x", &config).expect_err("Should fail");
        assert!(matches!(errors[0], ParseError::UnterminatedBlock { fence: 0, .. }));
    }

    #[test]
    fn test_header_errors_are_collected() {
        let errors = parse(r"\a(1 2) text \b[k] more").expect_err("Should fail");
        assert!(errors.iter().all(|e| matches!(e, ParseError::Syntax { .. })));
        assert!(errors.iter().any(|e| e.span().start < 7));
        assert!(errors.iter().any(|e| e.span().start > 12));
    }

    #[test]
    fn test_unrecognised_header_characters_are_errors() {
        let errors = parse(r"\a(x!)[k=v $]").expect_err("Should fail");
        let starts: Vec<_> = errors.iter().map(|e| e.span().start).collect();
        assert_eq!(starts, vec![4, 11]);
        assert!(errors.iter().all(|e| matches!(e, ParseError::Syntax { .. })));
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", r"\b{".repeat(depth), "}".repeat(depth))
    }

    #[test]
    fn test_nesting_at_limit() {
        let config = ParserConfig::new().with_max_depth(3);
        let doc = parse_with_config(&nested(3), &config).expect("Should parse");
        let mut node = &doc.body[0];
        for _ in 0..2 {
            node = &tag(node).blocks[0].body[0];
        }
        assert_eq!(tag(node).blocks[0].body, vec![Node::text("x")]);
    }

    #[test]
    fn test_nesting_past_limit() {
        let config = ParserConfig::new().with_max_depth(3);
        let errors = parse_with_config(&format!("{} \\b{{y}}", nested(4)), &config).expect_err("Should fail");
        assert_eq!(errors, vec![ParseError::NestingTooDeep { span: 11..12, limit: 3 }]);
    }

    #[test]
    fn test_default_nesting_limit() {
        assert!(parse(&nested(DEFAULT_MAX_DEPTH)).is_ok());
        let errors = parse(&nested(DEFAULT_MAX_DEPTH + 1)).expect_err("Should fail");
        assert!(matches!(errors[..], [ParseError::NestingTooDeep { .. }]));

        // far past the limit is still a diagnostic, not a crash
        let errors = parse(&nested(100_000)).expect_err("Should fail");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_unterminated_header() {
        let errors = parse(r#"\a("x"#).expect_err("Should fail");
        match &errors[0] {
            ParseError::Syntax { message, .. } => assert_eq!(message, "Unterminated tag header"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
