//! Plain-text target: keeps the document's text, drops all markup

use serde_json::Value;

use super::{collect, Printer, Tree, Undefined};
use crate::engine::{Command, Context, Data, Emit, Engine, EngineError, Interpret, Policy, Registry, Step, HTML, UNDEFINED};
use crate::resolver::ResolverMap;

/// Packet name carrying plain text
pub const TEXT: &str = "text";

/// Text leaves become `text` packets, which `tree` passes through untouched
struct TextLeaf;

impl Interpret for TextLeaf {
    fn interpret<'a>(&self, command: &Command<'a>, _cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let content = command.text_content.clone().unwrap_or_default();
        emit(Data::new(TEXT, None, content))?;
        Ok(None)
    }
}

/// Tag templates have no place in plain text
struct Discard;

impl Interpret for Discard {
    fn interpret<'a>(&self, _command: &Command<'a>, _cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        Ok(None)
    }
}

/// Renders generator output to plain text
#[derive(Debug)]
pub struct TextPrinter {
    engine: Engine,
}

impl TextPrinter {
    pub fn new(resolvers: ResolverMap) -> Self {
        let registry = Registry::builder()
            .public("tree", Tree)
            .public(TEXT, TextLeaf)
            .public(HTML, Discard)
            .public(UNDEFINED, Undefined)
            .build();
        Self {
            engine: Engine::new(registry, resolvers).with_target(TEXT),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.engine = self.engine.with_policy(policy);
        self
    }
}

impl Printer for TextPrinter {
    type Artifact = String;

    fn run(&self, commands: &[Command<'_>]) -> Result<String, EngineError> {
        let dispatches = commands
            .iter()
            .map(|command| self.engine.dispatch(command))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collect(dispatches, TEXT))
    }
}
