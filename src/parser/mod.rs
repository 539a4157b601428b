//! Parser for tagmark documents

pub mod ast;
pub mod cursor;
mod document;
mod grammar;
pub mod lexer;
pub mod verbatim;

pub use ast::*;
pub use cursor::Cursor;
pub use document::{parse, parse_with_config, ParserConfig, DEFAULT_MAX_DEPTH};
pub use grammar::{parse_header, Header};
pub use verbatim::{parse_verbatim_block, verbatim_postfix_level, Fence};
