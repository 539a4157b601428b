//! Declarative resolver that renders a tag through one template

use serde_json::{json, Value};

use super::{CommandSequence, ResolveContext, Resolver};
use crate::engine::{Command, DisplayType};

/// Renders its tag with a template.
///
/// The template sees `data.params`, `data.attrs`, `data.blocks` (one
/// rendered string per block) and `data.content` (all blocks joined).
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateResolver {
    template: String,
    display: Option<DisplayType>,
}

impl TemplateResolver {
    pub fn new(template: impl Into<String>, display: Option<DisplayType>) -> Self {
        Self {
            template: template.into(),
            display,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn display(&self) -> Option<DisplayType> {
        self.display
    }
}

impl Resolver for TemplateResolver {
    fn resolve(&self, _cx: &ResolveContext<'_>) -> Command<'static> {
        Command::html(self.template.clone()).with_display(self.display)
    }

    fn sequence(&self, _cx: &ResolveContext<'_>) -> Box<dyn CommandSequence> {
        Box::new(TemplateSequence {
            template: self.template.clone(),
            display: self.display,
            state: State::Start,
            params: Value::Null,
            attrs: Value::Null,
            blocks: Vec::new(),
            count: 0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Start,
    AwaitParams,
    AwaitAttrs,
    AwaitCount,
    AwaitBlock(usize),
    Done,
}

/// `getParams → getAttrs → blockCount → getBlock(0..n) → html`
struct TemplateSequence {
    template: String,
    display: Option<DisplayType>,
    state: State,
    params: Value,
    attrs: Value,
    blocks: Vec<String>,
    count: usize,
}

impl TemplateSequence {
    fn next_block(&mut self, index: usize) -> Command<'static> {
        if index < self.count {
            self.state = State::AwaitBlock(index);
            Command::new("getBlock").with_index(index)
        } else {
            self.state = State::Done;
            let content = self.blocks.concat();
            Command::html(self.template.clone())
                .with_data(json!({
                    "params": self.params.take(),
                    "attrs": self.attrs.take(),
                    "blocks": std::mem::take(&mut self.blocks),
                    "content": content,
                }))
                .with_display(self.display)
        }
    }
}

impl CommandSequence for TemplateSequence {
    fn step(&mut self, previous: Option<Value>) -> Option<Command<'static>> {
        match self.state {
            State::Start => {
                self.state = State::AwaitParams;
                Some(Command::new("getParams"))
            }
            State::AwaitParams => {
                self.params = previous.unwrap_or_else(|| json!([]));
                self.state = State::AwaitAttrs;
                Some(Command::new("getAttrs"))
            }
            State::AwaitAttrs => {
                self.attrs = previous.unwrap_or_else(|| json!({}));
                self.state = State::AwaitCount;
                Some(Command::new("blockCount"))
            }
            State::AwaitCount => {
                self.count = previous.and_then(|v| v.as_u64()).unwrap_or(0) as usize;
                Some(self.next_block(0))
            }
            State::AwaitBlock(index) => {
                let rendered = previous
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                self.blocks.push(rendered);
                Some(self.next_block(index + 1))
            }
            State::Done => None,
        }
    }
}
