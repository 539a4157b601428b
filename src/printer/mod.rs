//! Printers: one interpreter set per output target
//!
//! A printer owns an [`Engine`] whose registry holds the interpreters its
//! target needs. Generator output is run through `tree`, which renders
//! child blocks first and then hands their content to the tag's own
//! command. Adding a target means registering a different set here; the
//! engine is untouched.

mod html;
mod text;

pub use html::HtmlPrinter;
pub use text::TextPrinter;

use serde_json::{json, Map, Value};

use crate::engine::{Command, Context, Data, Dispatch, Emit, EngineError, Interpret, Step};

/// Drives an engine over generator output
pub trait Printer {
    type Artifact;

    fn run(&self, commands: &[Command<'_>]) -> Result<Self::Artifact, EngineError>;
}

/// Renders every child block, then dispatches `current` with the results
/// bound as `blocks` and `content`.
///
/// Only `html` packets are gathered from children; anything else passes
/// straight through to the caller. The subtree of an unresolved tag is
/// never rendered, so every target drops it whole.
pub struct Tree;

impl Interpret for Tree {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        if command.current.as_deref().is_some_and(Command::is_undefined) {
            return Ok(None);
        }

        let mut blocks = Vec::with_capacity(command.children.len());
        for block in &command.children {
            let mut rendered = String::new();
            for child in block {
                let mut sink = |data: Data| -> Step<()> {
                    if data.is_html() {
                        rendered.push_str(&data.content);
                        Ok(())
                    } else {
                        emit(data)
                    }
                };
                cx.dispatch(child, &mut sink)?;
            }
            blocks.push(rendered);
        }

        let Some(current) = command.current.as_deref() else {
            return Ok(None);
        };

        let mut bindings = match &command.data {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        bindings.insert("content".into(), Value::String(blocks.concat()));
        bindings.insert("blocks".into(), json!(blocks));
        // the command's own bindings take precedence
        if let Value::Object(own) = &current.data {
            bindings.extend(own.clone());
        }

        let bound = Command {
            data: Value::Object(bindings),
            ..current.clone()
        };
        cx.dispatch(&bound, emit)
    }
}

/// Stand-in for tags nothing resolved: renders nothing
pub struct Undefined;

impl Interpret for Undefined {
    fn interpret<'a>(&self, _command: &Command<'a>, _cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        Ok(None)
    }
}

/// Concatenate the `name` packets of several dispatches, logging stray errors
fn collect(dispatches: impl IntoIterator<Item = Dispatch>, name: &str) -> String {
    let mut out = String::new();
    for dispatch in dispatches {
        for packet in &dispatch.packets {
            if packet.is_error() {
                log::warn!("render error: {}", packet.content);
            }
        }
        out.push_str(&dispatch.joined(name));
    }
    out
}
