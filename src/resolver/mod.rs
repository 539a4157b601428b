//! Tag resolvers: pluggable per-tag behavior
//!
//! A resolver is bound to one tag name. The generator asks it for a single
//! command describing the tag; the dispatch engine instead drives a
//! [`CommandSequence`], feeding each dispatched command's return value back
//! into the next step.
//!
//! A sequence never touches packets. It only proposes commands, and the
//! engine refuses any that name a private or unregistered interpreter.

mod template;

pub use template::TemplateResolver;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde_json::Value;

use crate::engine::Command;
use crate::parser::ast::Tag;

/// What a resolver is told about the invocation
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Output target identifier, e.g. `"html"`
    pub target: &'a str,
    pub tag: &'a Tag,
}

/// Lazily stepped command producer
pub trait CommandSequence {
    /// Propose the next command, given the return value of the previous
    /// one (`None` on the first step). `None` ends the sequence.
    fn step(&mut self, previous: Option<Value>) -> Option<Command<'static>>;
}

/// Per-tag behavior
pub trait Resolver: Send + Sync {
    /// Static use: one command describing the tag
    fn resolve(&self, _cx: &ResolveContext<'_>) -> Command<'static> {
        Command::undefined()
    }

    /// Dynamic use: a fresh sequence for one tag render
    fn sequence(&self, _cx: &ResolveContext<'_>) -> Box<dyn CommandSequence> {
        Box::new(Script::default())
    }
}

/// Fixed list of commands; feedback is ignored
#[derive(Debug, Clone, Default)]
pub struct Script {
    commands: VecDeque<Command<'static>>,
}

impl Script {
    pub fn new(commands: impl IntoIterator<Item = Command<'static>>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }
}

impl CommandSequence for Script {
    fn step(&mut self, _previous: Option<Value>) -> Option<Command<'static>> {
        self.commands.pop_front()
    }
}

/// Tag name → resolver
#[derive(Clone, Default)]
pub struct ResolverMap {
    resolvers: HashMap<String, Arc<dyn Resolver>>,
}

impl ResolverMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, resolver: impl Resolver + 'static) {
        self.resolvers.insert(name.into(), Arc::new(resolver));
    }

    pub fn with(mut self, name: impl Into<String>, resolver: impl Resolver + 'static) -> Self {
        self.insert(name, resolver);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Resolver> {
        self.resolvers.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Swap in `replacement` for `name`, returning what was there.
    /// Intended for tests that stub one tag's behavior.
    pub fn mock(
        &mut self,
        name: impl Into<String>,
        replacement: impl Resolver + 'static,
    ) -> Option<Arc<dyn Resolver>> {
        self.resolvers.insert(name.into(), Arc::new(replacement))
    }

    /// Add every entry of `other`, replacing same-named resolvers
    pub fn extend(&mut self, other: ResolverMap) {
        self.resolvers.extend(other.resolvers);
    }
}

impl std::fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ResolverMap").field("tags", &names).finish()
    }
}

/// A bundle of resolvers registered together
pub trait Module {
    fn register_tag_resolvers(&self) -> ResolverMap;
}
