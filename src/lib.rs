//! Tagmark - a small markup language compiled through pluggable tag resolvers
//!
//! This library provides a parser, a static command generator, a dispatch
//! engine and printers for the tagmark markup.
//!
//! Document text is copied into HTML output as written: `<`, `>` and `&`
//! are not escaped, so raw markup in the source reaches the output. Only
//! render trusted input, or sanitize the result.
//!
//! # Example
//!
//! ```rust
//! use tagmark::render;
//!
//! let html = render(r"\p{Hello \b{world}}").unwrap();
//! assert_eq!(html, "<p>Hello <strong>world</strong></p>");
//! ```

pub mod engine;
pub mod error;
pub mod generator;
pub mod parser;
pub mod printer;
pub mod resolver;
pub mod tags;

pub use engine::{Command, Data, DisplayType, Engine, EngineError, Policy, Registry};
pub use error::ParseError;
pub use generator::{Generator, GeneratorInput};
pub use parser::{parse, parse_with_config, Document, ParserConfig};
pub use printer::{HtmlPrinter, Printer, TextPrinter};
pub use resolver::{CommandSequence, Module, ResolveContext, Resolver, ResolverMap, TemplateResolver};
pub use tags::{TagSet, TagSetError};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error raised by the engine under [`Policy::Strict`]
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Html,
    /// Document text with all markup removed
    Text,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Html => "html",
            Target::Text => "text",
        }
    }
}

/// How tags are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Drive each tag's resolver sequence through the dispatch engine
    #[default]
    Dynamic,
    /// Generate a command tree first, then print it
    Static,
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Tags available to the document
    pub tags: TagSet,
    pub target: Target,
    /// Only meaningful for HTML; the text target always renders statically
    pub mode: Mode,
    pub policy: Policy,
    pub parser: ParserConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag set
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the parser options
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}

/// Render tagmark source to HTML with the built-in tags
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render tagmark source with custom configuration
///
/// # Example
///
/// ```rust
/// use tagmark::{render_with_config, Mode, RenderConfig, Target};
///
/// let config = RenderConfig::new().with_mode(Mode::Static);
/// let html = render_with_config(r"\i{tilted}", &config).unwrap();
/// assert_eq!(html, "<em>tilted</em>");
///
/// let config = RenderConfig::new().with_target(Target::Text);
/// let text = render_with_config(r"\i{tilted}", &config).unwrap();
/// assert_eq!(text, "tilted");
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let doc = parse_with_config(source, &config.parser)?;
    let resolvers = config.tags.resolvers();

    let output = match (config.target, config.mode) {
        (Target::Html, Mode::Dynamic) => HtmlPrinter::new(resolvers)
            .with_policy(config.policy)
            .render(&doc)?,
        (Target::Html, Mode::Static) => {
            let root = generate(&doc, config.target, &resolvers);
            HtmlPrinter::new(resolvers).with_policy(config.policy).run(&[root])?
        }
        (Target::Text, _) => {
            let root = generate(&doc, config.target, &resolvers);
            TextPrinter::new(resolvers).with_policy(config.policy).run(&[root])?
        }
    };

    Ok(output)
}

fn generate(doc: &Document, target: Target, resolvers: &ResolverMap) -> Command<'static> {
    Generator::with_resolvers(resolvers.clone()).generate(GeneratorInput {
        ast: doc,
        target: target.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rstest::rstest;

    #[test]
    fn test_render_nested_tags() {
        let html = render(r"\p{Hello \b{world}}").expect("Should render");
        assert_snapshot!(html, @"<p>Hello <strong>world</strong></p>");
    }

    #[rstest]
    #[case(Mode::Dynamic)]
    #[case(Mode::Static)]
    fn test_modes_agree(#[case] mode: Mode) {
        let source = r#"\h1{Title} \link("https://x.dev"){the \i{site}}"#;
        let html = render_with_config(source, &RenderConfig::new().with_mode(mode)).expect("Should render");
        assert_eq!(html, r#"<h1>Title</h1> <a href="https://x.dev">the <em>site</em></a>"#);
    }

    #[test]
    fn test_render_text_target() {
        let config = RenderConfig::new().with_target(Target::Text);
        let text = render_with_config(r"\h1{Title} body \b{bold}", &config).expect("Should render");
        assert_snapshot!(text, @"Title body bold");
    }

    #[test]
    fn test_render_verbatim_block() {
        let html = render(r"\code=={a}=b}==").expect("Should render");
        assert_snapshot!(html, @"<code>a}=b</code>");
    }

    #[test]
    fn test_render_section_attrs() {
        let html = render(r"\section[id=intro]{x}\section{y}").expect("Should render");
        assert_snapshot!(html, @r#"<section id="intro">x</section><section>y</section>"#);
    }

    #[test]
    fn test_template_error_drops_only_that_tag() {
        // `link` needs a param
        let html = render(r"a \link{x} \b{b}").expect("Should render");
        assert_eq!(html, "a  <strong>b</strong>");
    }

    #[test]
    fn test_unknown_tag_renders_nothing() {
        let html = render(r"a\nope{b}c").expect("Should render");
        assert_eq!(html, "ac");
    }

    #[rstest]
    #[case(Target::Html, Mode::Dynamic)]
    #[case(Target::Html, Mode::Static)]
    #[case(Target::Text, Mode::Static)]
    fn test_unknown_tag_body_is_dropped_on_every_target(#[case] target: Target, #[case] mode: Mode) {
        let config = RenderConfig::new().with_target(target).with_mode(mode);
        let out = render_with_config(r"a\zz{b}c", &config).expect("Should render");
        assert_eq!(out, "ac");
    }

    #[test]
    fn test_text_is_emitted_unescaped() {
        let html = render(r"\b{<i>x</i> & y}").expect("Should render");
        assert_eq!(html, "<strong><i>x</i> & y</strong>");

        let html = render_with_config(r"<hr>\i{a<b}", &RenderConfig::new().with_mode(Mode::Static))
            .expect("Should render");
        assert_eq!(html, "<hr><em>a<b</em>");
    }

    #[test]
    fn test_deep_nesting() {
        let nested = |depth: usize| format!("{}x{}", r"\b{".repeat(depth), "}".repeat(depth));

        let html = render(&nested(parser::DEFAULT_MAX_DEPTH)).expect("Should render");
        assert!(html.starts_with("<strong><strong>"));
        assert!(html.contains("<strong>x</strong>"));

        match render(&nested(parser::DEFAULT_MAX_DEPTH + 1)) {
            Err(RenderError::Parse(errors)) => {
                assert!(matches!(errors[..], [ParseError::NestingTooDeep { .. }]))
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_tags() {
        let tags = TagSet::from_str(
            "[tags.kbd]\ntemplate = \"<kbd>{{ data.content }}</kbd>\"\ndisplay = \"inline\"\n",
        )
        .expect("Should parse");
        let config = RenderConfig::new().with_tags(tags);
        assert_eq!(
            render_with_config(r"\kbd{C-x} \b{gone}", &config).expect("Should render"),
            "<kbd>C-x</kbd> "
        );
    }

    #[test]
    fn test_render_parse_error() {
        let result = render(r"\a(1 2)");
        assert!(matches!(result, Err(RenderError::Parse(_))));
    }

    #[test]
    fn test_strict_fences() {
        let source = r"\code=={never closed";
        assert_eq!(render(source).expect("lenient"), "<code>never closed</code>");

        let config = RenderConfig::new().with_parser(ParserConfig::new().with_strict_fences(true));
        match render_with_config(source, &config) {
            Err(RenderError::Parse(errors)) => {
                assert!(matches!(errors[0], ParseError::UnterminatedBlock { fence: 2, .. }))
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_policy_renders_well_formed_input() {
        let config = RenderConfig::new().with_policy(Policy::Strict);
        let html = render_with_config(r"\p{ok \zz{x}}", &config).expect("Should render");
        assert_eq!(html, "<p>ok </p>");
    }
}
