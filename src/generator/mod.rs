//! Static compositor: AST → Command tree
//!
//! The generator performs no dispatch. Every tag becomes a `tree` command
//! whose `current` is what the tag's resolver describes (or the
//! `#undefined` sentinel) and whose `children` are the tag's blocks,
//! generated recursively. Printers execute the result.

use serde_json::{json, Value};

use crate::engine::Command;
use crate::parser::ast::{Document, Node, Tag};
use crate::resolver::{Module, ResolveContext, ResolverMap};

/// Template of the root command: every top-level fragment, concatenated
const ROOT_TEMPLATE: &str = "{{ data.content }}";

/// What to generate
#[derive(Debug, Clone, Copy)]
pub struct GeneratorInput<'a> {
    pub ast: &'a Document,
    pub target: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    resolvers: ResolverMap,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolvers(resolvers: ResolverMap) -> Self {
        Self { resolvers }
    }

    /// Replace the resolver map with the one `module` registers
    pub fn register_root_module(&mut self, module: &dyn Module) {
        self.resolvers = module.register_tag_resolvers();
    }

    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    /// Build the command tree for a whole document
    pub fn generate(&self, input: GeneratorInput<'_>) -> Command<'static> {
        let body = self.nodes(&input.ast.body, input.target);
        Command::tree(json!({}), Command::html(ROOT_TEMPLATE), vec![body])
    }

    fn nodes(&self, nodes: &[Node], target: &str) -> Vec<Command<'static>> {
        nodes.iter().map(|node| self.node(node, target)).collect()
    }

    fn node(&self, node: &Node, target: &str) -> Command<'static> {
        match node {
            Node::Text(text) => Command::text(text.value.clone()),
            Node::Tag(tag) => self.tag(tag, target),
        }
    }

    fn tag(&self, tag: &Tag, target: &str) -> Command<'static> {
        let current = match self.resolvers.get(tag.name()) {
            Some(resolver) => resolver.resolve(&ResolveContext { target, tag }),
            None => {
                log::debug!("no resolver for tag '{}'", tag.name());
                Command::undefined()
            }
        };

        let data = json!({
            "attrs": Value::Object(tag.attr_map()),
            "params": tag.param_values(),
        });
        let children = tag
            .blocks
            .iter()
            .map(|block| self.nodes(&block.body, target))
            .collect();

        Command::tree(data, current, children)
    }
}
