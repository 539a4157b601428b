//! Commands and data packets: the vocabulary of the dispatch engine

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parser::ast::{Block, Document, Node, Tag, Text};

/// Name of the sentinel command standing in for an unresolved tag
pub const UNDEFINED: &str = "#undefined";

/// Packet name carrying rendered markup
pub const HTML: &str = "html";

/// Packet name that aborts the enclosing tag render
pub const ERROR: &str = "error";

/// Inline or block display of a rendered fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Inline,
    Block,
}

/// Borrowed reference to any AST node a command can target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Tag(&'a Tag),
    Text(&'a Text),
    Block(&'a Block),
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Tag(tag) => NodeRef::Tag(tag),
            Node::Text(text) => NodeRef::Text(text),
        }
    }
}

/// A named execution request.
///
/// `name` selects the interpreter; the remaining fields are read by the
/// interpreters that need them. Generator output nests commands through
/// `current` and `children`; engine-produced commands are flat and carry
/// a `node`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command<'a> {
    pub name: String,
    pub node: Option<NodeRef<'a>>,
    pub index: Option<usize>,
    pub display_mode: bool,
    pub template: Option<String>,
    pub data: Value,
    pub display: Option<DisplayType>,
    pub text_content: Option<String>,
    pub current: Option<Box<Command<'a>>>,
    pub children: Vec<Vec<Command<'a>>>,
}

impl<'a> Command<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `{name: "#undefined"}`
    pub fn undefined() -> Self {
        Self::new(UNDEFINED)
    }

    /// Route `node` through the `render` interpreter
    pub fn render(node: NodeRef<'a>) -> Self {
        Self::new("render").with_node(node)
    }

    /// Render `template` with `data` bound
    pub fn html(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::new(HTML)
        }
    }

    /// Static-path leaf for a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text_content: Some(content.into()),
            ..Self::new("text")
        }
    }

    /// Static-path composite: `current` runs after `children` are rendered
    pub fn tree(data: Value, current: Command<'a>, children: Vec<Vec<Command<'a>>>) -> Self {
        Self {
            data,
            current: Some(Box::new(current)),
            children,
            ..Self::new("tree")
        }
    }

    pub fn with_node(mut self, node: NodeRef<'a>) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_display_mode(mut self, display_mode: bool) -> Self {
        self.display_mode = display_mode;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_display(mut self, display: Option<DisplayType>) -> Self {
        self.display = display;
        self
    }

    pub fn is_undefined(&self) -> bool {
        self.name == UNDEFINED
    }

    /// Tag this command targets, if any
    pub fn tag(&self) -> Option<&'a Tag> {
        match self.node {
            Some(NodeRef::Tag(tag)) => Some(tag),
            _ => None,
        }
    }
}

/// Unit of output surfaced up the call chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayType>,
    pub content: String,
}

impl Data {
    pub fn new(name: impl Into<String>, display: Option<DisplayType>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display,
            content: content.into(),
        }
    }

    pub fn html(display: Option<DisplayType>, content: impl Into<String>) -> Self {
        Self::new(HTML, display, content)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ERROR, None, message)
    }

    pub fn is_html(&self) -> bool {
        self.name == HTML
    }

    pub fn is_error(&self) -> bool {
        self.name == ERROR
    }

    /// Packets without an explicit `inline` type count as block content
    pub fn is_inline(&self) -> bool {
        self.display == Some(DisplayType::Inline)
    }
}
