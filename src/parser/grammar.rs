//! Tag header parser implementation using chumsky
//!
//! Only the `(params)[attrs]` header goes through the token grammar; text
//! and block bodies are scanned by the cursor-based document parser.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::{lex, Token};

/// Parsed `(params)[attrs]` header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    pub params: Vec<Param>,
    pub attrs: Vec<Attr>,
}

/// Parse a header slice that starts at byte `offset` of the full source.
///
/// Spans in the returned errors are absolute. Characters the lexer does
/// not recognise are reported alongside any grammar errors.
pub fn parse_header(input: &str, offset: usize) -> Result<Header, Vec<crate::ParseError>> {
    let len = offset + input.len();
    let (tokens, invalid) = lex(input);

    let mut errors: Vec<crate::ParseError> = invalid
        .into_iter()
        .map(|span| crate::ParseError::Syntax {
            message: format!("Unexpected character '{}'", &input[span.clone()]),
            span: span.start + offset..span.end + offset,
            expected: Vec::new(),
        })
        .collect();

    let token_iter = tokens
        .into_iter()
        .map(move |(tok, span)| (tok, (span.start + offset..span.end + offset).into()));

    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    match header_parser().parse(token_stream).into_result() {
        Ok(header) if errors.is_empty() => Ok(header),
        Ok(_) => Err(errors),
        Err(errs) => {
            errors.extend(errs.into_iter().map(|e| e.into()));
            errors.sort_by_key(|e| e.span().start);
            Err(errors)
        }
    }
}

fn header_parser<'a, I>() -> impl Parser<'a, I, Header, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .labelled("attribute name");

    let literal = select! {
        Token::String(s) => Literal::String(s),
        Token::Number(n) => Literal::Number(n),
        Token::True => Literal::Bool(true),
        Token::False => Literal::Bool(false),
        Token::Ident(s) => Literal::Ident(s),
    }
    .labelled("value");

    let params = literal
        .clone()
        .map(|value| Param { value })
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    let attr = identifier
        .then_ignore(just(Token::Equals))
        .then(literal)
        .map(|(id, value)| Attr { id, value });

    let attrs = attr
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    params
        .or_not()
        .then(attrs.or_not())
        .then_ignore(end())
        .map(|(params, attrs)| Header {
            params: params.unwrap_or_default(),
            attrs: attrs.unwrap_or_default(),
        })
}
