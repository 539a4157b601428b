//! Error types for parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    /// A block reached end of input without its closer.
    /// `fence` is the verbatim fence width, 0 for a plain `{…}` block.
    #[error("Unterminated block at {span:?} (fence width {fence})")]
    UnterminatedBlock { span: Span, fence: usize },

    /// A `{…}` block opened deeper than the configured nesting limit
    #[error("Block at {span:?} nested deeper than {limit} levels")]
    NestingTooDeep { span: Span, limit: usize },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. }
            | ParseError::UnterminatedBlock { span, .. }
            | ParseError::NestingTooDeep { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let (message, label) = match self {
            ParseError::Syntax {
                message, expected, ..
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                (message.clone(), format!("{}{}", message, expected_str))
            }
            ParseError::UnterminatedBlock { fence, .. } => {
                let closer = format!("}}{}", "=".repeat(*fence));
                (
                    "Unterminated block".to_string(),
                    format!("block opened here is never closed by `{}`", closer),
                )
            }
            ParseError::NestingTooDeep { limit, .. } => (
                "Blocks nested too deeply".to_string(),
                format!("this block exceeds the nesting limit of {}", limit),
            ),
        };

        let span = self.span().clone();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(message)
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::parser::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::parser::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of tag header".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of tag header".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::parser::lexer::Token) -> String {
    use crate::parser::lexer::Token;
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Equals => "'='".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_unterminated_block() {
        let source = r"\code =={ never closed";
        let err = ParseError::UnterminatedBlock {
            span: 6..22,
            fence: 2,
        };
        let report = err.format(source, "doc.tm");
        assert!(report.contains("Unterminated block"));
        assert!(report.contains("}=="));
        assert!(report.contains("doc.tm"));
    }

    #[test]
    fn test_display() {
        let err = ParseError::Syntax {
            span: 1..2,
            message: "Unexpected ','".into(),
            expected: vec![],
        };
        assert_eq!(err.to_string(), "Parse error at 1..2: Unexpected ','");
    }
}
