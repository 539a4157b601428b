//! Interpreter definitions
//!
//! An interpreter handles one command name. It may emit any number of
//! [`Data`] packets through the sink it is handed and returns at most one
//! value. Emitting is a suspension point: the sink may answer with
//! [`Interrupt::Halted`], and the interpreter must then stop and pass the
//! interrupt back with `?`.

use serde_json::Value;

use super::command::{Command, Data};
use super::context::Context;
use super::error::Interrupt;

/// Result of one interpreter step
pub type Step<T> = Result<T, Interrupt>;

/// Packet sink handed to interpreters; forwards to the caller
pub type Emit<'e> = dyn FnMut(Data) -> Step<()> + 'e;

/// Who may invoke an interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Reachable from tag resolvers
    #[default]
    Public,
    /// Only reachable from the engine's own routing chain
    Private,
}

/// Behavior of a named interpreter
pub trait Interpret: Send + Sync {
    fn interpret<'a>(
        &self,
        command: &Command<'a>,
        cx: &Context<'_>,
        emit: &mut Emit<'_>,
    ) -> Step<Option<Value>>;
}

/// A registered interpreter
pub struct Interpreter {
    name: String,
    visibility: Visibility,
    behavior: Box<dyn Interpret>,
}

impl Interpreter {
    pub fn new(name: impl Into<String>, visibility: Visibility, behavior: impl Interpret + 'static) -> Self {
        Self {
            name: name.into(),
            visibility,
            behavior: Box::new(behavior),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn interpret<'a>(
        &self,
        command: &Command<'a>,
        cx: &Context<'_>,
        emit: &mut Emit<'_>,
    ) -> Step<Option<Value>> {
        self.behavior.interpret(command, cx, emit)
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}
