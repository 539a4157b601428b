//! Abstract Syntax Tree types for tagmark documents
//!
//! The AST is the only contract between parsing and everything downstream:
//! the generator and the dispatch engine both consume these types read-only.

use serde_json::Value;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Tag name (alphanumeric, underscore or dash; starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self { name: s.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Root AST node - a complete document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub body: Vec<Node>,
}

/// A child of a document or block body
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Tag(Tag),
    Text(Text),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text::new(value))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

/// `\name(params)[attrs]{block}…`
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: Identifier,
    pub attrs: Vec<Attr>,
    pub params: Vec<Param>,
    pub blocks: Vec<Block>,
    /// Source range from the backslash to the end of the last block
    pub span: Span,
}

impl Tag {
    /// A tag with no header and no blocks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Identifier::new(name),
            attrs: Vec::new(),
            params: Vec::new(),
            blocks: Vec::new(),
            span: 0..0,
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_param(mut self, value: Literal) -> Self {
        self.params.push(Param { value });
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: Literal) -> Self {
        self.attrs.push(Attr {
            id: Identifier::new(name),
            value,
        });
        self
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Ordered param values
    pub fn param_values(&self) -> Vec<Value> {
        self.params.iter().map(|p| p.value.to_value()).collect()
    }

    /// Attributes folded into an object; a repeated name overwrites the earlier value
    pub fn attr_map(&self) -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        for attr in &self.attrs {
            map.insert(attr.id.name.clone(), attr.value.to_value());
        }
        map
    }
}

/// Literal text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A `{…}` or `={…}=` block attached to a tag
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub verbatim: bool,
    pub body: Vec<Node>,
}

impl Block {
    pub fn new(body: Vec<Node>) -> Self {
        Self {
            verbatim: false,
            body,
        }
    }

    pub fn verbatim(body: Vec<Node>) -> Self {
        Self {
            verbatim: true,
            body,
        }
    }
}

/// `name=value` inside the attribute list
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub id: Identifier,
    pub value: Literal,
}

/// Positional value inside the parameter list
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub value: Literal,
}

/// Literal values allowed in tag headers
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Bool(bool),
    /// Bare identifier, kept as its spelling
    Ident(String),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::String(s) | Literal::Ident(s) => Value::String(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                }
            }
        }
    }
}
