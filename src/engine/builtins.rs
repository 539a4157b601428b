//! Built-in interpreters: the private render family and the public tag
//! accessors resolvers build on.

use serde_json::Value;

use super::command::{Command, Data, DisplayType, NodeRef};
use super::context::Context;
use super::error::{EngineError, Interrupt};
use super::interpreter::{Emit, Interpret, Step, Visibility};
use super::registry::RegistryBuilder;
use crate::parser::ast::{Block, Node, Tag, Text};
use crate::resolver::ResolveContext;

pub(crate) fn register(builder: &mut RegistryBuilder) {
    use Visibility::{Private, Public};

    builder
        .register("render", Private, Render)
        .register("renderDocument", Private, RenderDocument)
        .register("renderTag", Private, RenderTag)
        .register("renderText", Private, RenderText)
        .register("renderBlock", Private, RenderBlock)
        .register("getParams", Public, GetParams)
        .register("getAttrs", Public, GetAttrs)
        .register("blockCount", Public, BlockCount)
        .register("getBlock", Public, GetBlock)
        .register("getBlockChildNodes", Public, GetBlockChildNodes)
        .register("textContent", Public, TextContent)
        .register("html", Public, Html);
}

/// Routes by node kind
pub struct Render;

impl Interpret for Render {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let name = match command.node {
            Some(NodeRef::Document(_)) => "renderDocument",
            Some(NodeRef::Tag(_)) => "renderTag",
            Some(NodeRef::Text(_)) => "renderText",
            Some(NodeRef::Block(_)) => "renderBlock",
            None => return Ok(None),
        };
        let routed = Command {
            name: name.to_string(),
            ..command.clone()
        };
        cx.dispatch(&routed, emit)
    }
}

/// Renders each top-level node in order
pub struct RenderDocument;

impl Interpret for RenderDocument {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        if let Some(NodeRef::Document(document)) = command.node {
            render_nodes(cx, &document.body, emit)?;
        }
        Ok(None)
    }
}

/// Renders each child of a block in order
pub struct RenderBlock;

impl Interpret for RenderBlock {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        if let Some(NodeRef::Block(block)) = command.node {
            render_nodes(cx, &block.body, emit)?;
        }
        Ok(None)
    }
}

/// One inline `html` packet per text node.
///
/// The text is emitted as written, without escaping, so markup in the
/// source passes through to the output.
pub struct RenderText;

impl Interpret for RenderText {
    fn interpret<'a>(&self, command: &Command<'a>, _cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        if let Some(NodeRef::Text(text)) = command.node {
            emit(Data::html(Some(DisplayType::Inline), text.value.clone()))?;
        }
        Ok(None)
    }
}

/// Drives the tag's resolver sequence.
///
/// Each proposed command is bound to the tag and dispatched only if it
/// names a public interpreter. Its packets are forwarded; an `error`
/// packet ends this tag's render and nothing after it escapes. The
/// command's return value is fed into the next step.
pub struct RenderTag;

impl Interpret for RenderTag {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let Some(tag) = command.tag() else {
            return Ok(None);
        };
        let Some(resolver) = cx.resolvers().get(tag.name()) else {
            log::debug!("no resolver for tag '{}'", tag.name());
            return Ok(None);
        };

        let resolve_cx = ResolveContext {
            target: cx.target(),
            tag,
        };
        let mut sequence = resolver.sequence(&resolve_cx);
        let mut previous = None;

        while let Some(proposed) = sequence.step(previous.take()) {
            if !cx.registry().is_public(&proposed.name) {
                log::warn!(
                    "tag '{}' proposed '{}', which is not a public interpreter; stopping",
                    tag.name(),
                    proposed.name
                );
                break;
            }

            let mut bound: Command<'a> = proposed;
            bound.node = Some(NodeRef::Tag(tag));

            let mut aborted = false;
            let result = {
                let mut forward = |data: Data| -> Step<()> {
                    if data.is_error() {
                        log::debug!("tag '{}' aborted: {}", tag.name(), data.content);
                        aborted = true;
                        return Err(Interrupt::Halted);
                    }
                    emit(data)
                };
                cx.dispatch(&bound, &mut forward)
            };

            match result {
                Ok(value) => previous = value,
                Err(Interrupt::Halted) if aborted => return Ok(None),
                Err(interrupt) => return Err(interrupt),
            }
        }

        Ok(None)
    }
}

/// Ordered param values
pub struct GetParams;

impl Interpret for GetParams {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        match target_tag(command, cx)? {
            Some(tag) => Ok(Some(Value::Array(tag.param_values()))),
            None => Ok(None),
        }
    }
}

/// Attributes as an object
pub struct GetAttrs;

impl Interpret for GetAttrs {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        match target_tag(command, cx)? {
            Some(tag) => Ok(Some(Value::Object(tag.attr_map()))),
            None => Ok(None),
        }
    }
}

pub struct BlockCount;

impl Interpret for BlockCount {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        match target_tag(command, cx)? {
            Some(tag) => Ok(Some(Value::from(tag.blocks.len()))),
            None => Ok(None),
        }
    }
}

/// Renders `blocks[index]` and returns the joined `html` content.
/// Emits nothing itself.
pub struct GetBlock;

impl Interpret for GetBlock {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let Some(block) = target_block(command, cx)? else {
            return Ok(Some(Value::String(String::new())));
        };

        let mut rendered = String::new();
        for node in &block.body {
            render_html(cx, NodeRef::from(node), |data| rendered.push_str(&data.content))?;
        }
        Ok(Some(Value::String(rendered)))
    }
}

/// Renders `blocks[index]` into a list of strings.
///
/// Without display mode every child renders to its own entry. In display
/// mode runs of inline packets and runs of block packets are coalesced, so
/// a paragraph broken by a block-level tag comes back as three chunks.
pub struct GetBlockChildNodes;

impl Interpret for GetBlockChildNodes {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let Some(block) = target_block(command, cx)? else {
            return Ok(Some(Value::Array(Vec::new())));
        };
        if block.body.is_empty() {
            return Ok(Some(Value::Array(Vec::new())));
        }

        let chunks = if command.display_mode {
            coalesce(cx, block)?
        } else {
            let mut chunks = Vec::with_capacity(block.body.len());
            for node in &block.body {
                let mut rendered = String::new();
                render_html(cx, NodeRef::from(node), |data| rendered.push_str(&data.content))?;
                chunks.push(rendered);
            }
            chunks
        };

        Ok(Some(Value::Array(chunks.into_iter().map(Value::String).collect())))
    }
}

fn coalesce(cx: &Context<'_>, block: &Block) -> Step<Vec<String>> {
    // A leading empty text keeps the first chunk inline
    let leading = Text::new("");
    let mut nodes: Vec<NodeRef<'_>> = Vec::with_capacity(block.body.len() + 1);
    if !block.body[0].is_text() {
        nodes.push(NodeRef::Text(&leading));
    }
    nodes.extend(block.body.iter().map(NodeRef::from));

    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut inline = true;

    for node in nodes {
        render_html(cx, node, |data| {
            if data.is_inline() != inline {
                chunks.push(std::mem::take(&mut chunk));
                inline = !inline;
            }
            chunk.push_str(&data.content);
        })?;
    }
    chunks.push(chunk);

    Ok(chunks)
}

/// Concatenated value of the block's direct text children
pub struct TextContent;

impl Interpret for TextContent {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, _emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let Some(block) = target_block(command, cx)? else {
            return Ok(Some(Value::String(String::new())));
        };

        let text: String = block
            .body
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.value.as_str()),
                Node::Tag(_) => None,
            })
            .collect();
        Ok(Some(Value::String(text)))
    }
}

/// Renders `template` against `data` and emits one `html` packet.
/// A template failure is emitted as an `error` packet.
pub struct Html;

impl Interpret for Html {
    fn interpret<'a>(&self, command: &Command<'a>, cx: &Context<'_>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        let template = command.template.as_deref().unwrap_or("");
        let data = match &command.data {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };

        match cx.templates().render(template, &data) {
            Ok(rendered) => emit(Data::html(command.display, rendered))?,
            Err(err) => emit(Data::error(err.to_string()))?,
        }
        Ok(None)
    }
}

fn render_nodes(cx: &Context<'_>, nodes: &[Node], emit: &mut Emit<'_>) -> Step<()> {
    for node in nodes {
        cx.dispatch(&Command::render(NodeRef::from(node)), emit)?;
    }
    Ok(())
}

/// Render one node, handing every `html` packet to `each`; other packets are dropped
fn render_html(cx: &Context<'_>, node: NodeRef<'_>, mut each: impl FnMut(Data)) -> Step<()> {
    let mut sink = |data: Data| -> Step<()> {
        if data.is_html() {
            each(data);
        }
        Ok(())
    };
    cx.dispatch(&Command::render(node), &mut sink).map(|_| ())
}

fn target_tag<'a>(command: &Command<'a>, cx: &Context<'_>) -> Step<Option<&'a Tag>> {
    match command.tag() {
        Some(tag) => Ok(Some(tag)),
        None => cx.degrade(EngineError::MissingTarget {
            command: command.name.clone(),
        }),
    }
}

fn target_block<'a>(command: &Command<'a>, cx: &Context<'_>) -> Step<Option<&'a Block>> {
    let Some(tag) = target_tag(command, cx)? else {
        return Ok(None);
    };
    let index = command.index.unwrap_or(0);
    match tag.block(index) {
        Some(block) => Ok(Some(block)),
        None => cx.degrade(EngineError::BlockOutOfRange {
            tag: tag.name().to_string(),
            index,
            count: tag.blocks.len(),
        }),
    }
}
