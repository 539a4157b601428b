//! Dispatch context shared by every interpreter in one render

use serde_json::Value;

use super::command::Command;
use super::error::{EngineError, Interrupt};
use super::interpreter::{Emit, Step};
use super::registry::Registry;
use super::template::TemplateEngine;
use crate::resolver::ResolverMap;

/// How recoverable faults are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Unknown commands, out-of-range blocks and over-deep dispatch
    /// degrade to empty output
    #[default]
    Lenient,
    /// The same cases raise an [`EngineError`]
    Strict,
}

/// Read-only view of the engine handed to interpreters
#[derive(Clone, Copy)]
pub struct Context<'r> {
    registry: &'r Registry,
    resolvers: &'r ResolverMap,
    templates: &'r dyn TemplateEngine,
    policy: Policy,
    target: &'r str,
    depth: usize,
    max_depth: usize,
}

impl<'r> Context<'r> {
    pub fn new(
        registry: &'r Registry,
        resolvers: &'r ResolverMap,
        templates: &'r dyn TemplateEngine,
        policy: Policy,
        target: &'r str,
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            resolvers,
            templates,
            policy,
            target,
            depth: 0,
            max_depth,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn resolvers(&self) -> &'r ResolverMap {
        self.resolvers
    }

    pub fn templates(&self) -> &'r dyn TemplateEngine {
        self.templates
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn target(&self) -> &'r str {
        self.target
    }

    /// Run `command` through its interpreter, forwarding packets to `emit`
    /// in emission order.
    pub fn dispatch<'a>(&self, command: &Command<'a>, emit: &mut Emit<'_>) -> Step<Option<Value>> {
        if self.depth >= self.max_depth {
            return self.degrade(EngineError::DepthExceeded {
                command: command.name.clone(),
                limit: self.max_depth,
            });
        }

        match self.registry.get(&command.name) {
            Some(interpreter) => {
                log::trace!("dispatch {} at depth {}", command.name, self.depth);
                let inner = Context {
                    depth: self.depth + 1,
                    ..*self
                };
                interpreter.interpret(command, &inner, emit)
            }
            None => self.degrade(EngineError::UnknownCommand {
                name: command.name.clone(),
            }),
        }
    }

    /// Lenient: log and yield nothing. Strict: raise `err`.
    pub fn degrade<T: Default>(&self, err: EngineError) -> Step<T> {
        match self.policy {
            Policy::Lenient => {
                log::debug!("{}", err);
                Ok(T::default())
            }
            Policy::Strict => Err(Interrupt::Fault(err)),
        }
    }
}
