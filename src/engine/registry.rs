//! Immutable command-name → interpreter table

use std::collections::HashMap;

use super::builtins;
use super::interpreter::{Interpret, Interpreter, Visibility};

/// Interpreter table, fixed once built
#[derive(Debug, Default)]
pub struct Registry {
    interpreters: HashMap<String, Interpreter>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Interpreter> {
        self.interpreters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interpreters.contains_key(name)
    }

    /// True when `name` is registered and public
    pub fn is_public(&self, name: &str) -> bool {
        self.get(name).is_some_and(|i| !i.is_private())
    }

    /// All registered names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interpreters.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }
}

/// Collects interpreters before freezing them into a [`Registry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    interpreters: HashMap<String, Interpreter>,
}

impl RegistryBuilder {
    /// Start from the built-in render family and tag accessors
    pub fn with_builtins(mut self) -> Self {
        builtins::register(&mut self);
        self
    }

    /// Register an interpreter; a later registration under the same name wins
    pub fn register(
        &mut self,
        name: &str,
        visibility: Visibility,
        behavior: impl Interpret + 'static,
    ) -> &mut Self {
        if self.interpreters.contains_key(name) {
            log::debug!("interpreter '{}' replaced", name);
        }
        self.interpreters
            .insert(name.to_string(), Interpreter::new(name, visibility, behavior));
        self
    }

    pub fn public(mut self, name: &str, behavior: impl Interpret + 'static) -> Self {
        self.register(name, Visibility::Public, behavior);
        self
    }

    pub fn private(mut self, name: &str, behavior: impl Interpret + 'static) -> Self {
        self.register(name, Visibility::Private, behavior);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            interpreters: self.interpreters,
        }
    }
}
