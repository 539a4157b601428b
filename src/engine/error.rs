//! Error types for the dispatch engine

use thiserror::Error;

/// Faults raised while dispatching commands under [`super::Policy::Strict`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Dispatch target absent from the registry
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    /// Block index past the end of the tag's block list
    #[error("block {index} out of range for tag '{tag}' with {count} block(s)")]
    BlockOutOfRange {
        tag: String,
        index: usize,
        count: usize,
    },

    /// A tag-level command dispatched without a tag node
    #[error("command '{command}' requires a tag target")]
    MissingTarget { command: String },

    /// Dispatch nested deeper than the engine allows
    #[error("dispatch of '{command}' exceeds the nesting limit of {limit}")]
    DepthExceeded { command: String, limit: usize },
}

/// Why an interpreter stopped before returning a value
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    /// A consumer up the chain refused further packets
    Halted,
    /// Propagates to the top-level caller
    Fault(EngineError),
}

impl From<EngineError> for Interrupt {
    fn from(err: EngineError) -> Self {
        Interrupt::Fault(err)
    }
}
