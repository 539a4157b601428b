//! HTML target

use serde_json::Value;

use super::{collect, Printer, Tree, Undefined};
use crate::engine::{
    Command, Context, Data, DisplayType, Emit, Engine, EngineError, Interpret, Policy, Registry, Step,
    TemplateEngine, HTML, UNDEFINED,
};
use crate::parser::ast::Document;
use crate::resolver::ResolverMap;

/// Text leaves become inline html fragments, unescaped
struct TextAsHtml;

impl Interpret for TextAsHtml {
    fn interpret<'a>(&self, command: &Command<'a>, _cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let content = command.text_content.clone().unwrap_or_default();
        emit(Data::html(Some(DisplayType::Inline), content))?;
        Ok(None)
    }
}

/// Renders to a single HTML string.
///
/// Runs generator output through [`Printer::run`], or a parsed document
/// through the resolver-driven render chain with [`HtmlPrinter::render`].
#[derive(Debug)]
pub struct HtmlPrinter {
    engine: Engine,
}

impl HtmlPrinter {
    pub fn new(resolvers: ResolverMap) -> Self {
        let registry = Registry::builder()
            .with_builtins()
            .public("tree", Tree)
            .public("text", TextAsHtml)
            .public(UNDEFINED, Undefined)
            .build();
        Self {
            engine: Engine::new(registry, resolvers).with_target(HTML),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.engine = self.engine.with_policy(policy);
        self
    }

    pub fn with_templates(mut self, templates: impl TemplateEngine + 'static) -> Self {
        self.engine = self.engine.with_templates(templates);
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Render a document by driving each tag's resolver sequence
    pub fn render(&self, document: &Document) -> Result<String, EngineError> {
        let dispatch = self.engine.render(document)?;
        Ok(collect([dispatch], HTML))
    }
}

impl Printer for HtmlPrinter {
    type Artifact = String;

    fn run(&self, commands: &[Command<'_>]) -> Result<String, EngineError> {
        let dispatches = commands
            .iter()
            .map(|command| self.engine.dispatch(command))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collect(dispatches, HTML))
    }
}
