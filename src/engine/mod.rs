//! Dispatch engine
//!
//! Commands are executed by named interpreters looked up in an immutable
//! [`Registry`]. Interpreters run synchronously and push [`Data`] packets
//! into a sink supplied by their caller, so packets surface in strict
//! depth-first document order. Tag resolvers only ever see the commands
//! they propose and the values those commands return.

mod builtins;
mod command;
mod context;
mod error;
mod interpreter;
mod registry;
mod template;

pub use builtins::Html;
pub use command::{Command, Data, DisplayType, NodeRef, ERROR, HTML, UNDEFINED};
pub use context::{Context, Policy};
pub use error::{EngineError, Interrupt};
pub use interpreter::{Emit, Interpret, Interpreter, Step, Visibility};
pub use registry::{Registry, RegistryBuilder};
pub use template::{TemplateEngine, TemplateError, TeraEngine};

use serde_json::Value;

use crate::parser::ast::Document;

/// Default limit on nested dispatches within one top-level dispatch
pub const DEFAULT_MAX_DEPTH: usize = 256;
use crate::resolver::ResolverMap;

/// Packets and return value of one top-level dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub packets: Vec<Data>,
    pub value: Option<Value>,
}

impl Dispatch {
    /// Content of every packet named `name`, in order
    pub fn contents(&self, name: &str) -> Vec<&str> {
        self.packets
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.content.as_str())
            .collect()
    }

    /// Concatenated content of every packet named `name`
    pub fn joined(&self, name: &str) -> String {
        self.contents(name).concat()
    }
}

/// Root dispatcher: registry, resolvers and templating for one target.
///
/// An engine holds no per-render state and may be shared across threads.
pub struct Engine {
    registry: Registry,
    resolvers: ResolverMap,
    templates: Box<dyn TemplateEngine>,
    policy: Policy,
    target: String,
    max_depth: usize,
}

impl Engine {
    pub fn new(registry: Registry, resolvers: ResolverMap) -> Self {
        Self {
            registry,
            resolvers,
            templates: Box::new(TeraEngine),
            policy: Policy::default(),
            target: HTML.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_templates(mut self, templates: impl TemplateEngine + 'static) -> Self {
        self.templates = Box::new(templates);
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Limit dispatch nesting; deeper dispatches degrade under the policy
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(
            &self.registry,
            &self.resolvers,
            self.templates.as_ref(),
            self.policy,
            &self.target,
            self.max_depth,
        )
    }

    /// Dispatch one command and collect everything it produced
    pub fn dispatch(&self, command: &Command<'_>) -> Result<Dispatch, EngineError> {
        let mut packets = Vec::new();
        let result = {
            let mut collect = |data: Data| -> Step<()> {
                packets.push(data);
                Ok(())
            };
            self.context().dispatch(command, &mut collect)
        };

        match result {
            Ok(value) => Ok(Dispatch { packets, value }),
            // nothing above the root can refuse packets
            Err(Interrupt::Halted) => Ok(Dispatch {
                packets,
                value: None,
            }),
            Err(Interrupt::Fault(err)) => Err(err),
        }
    }

    /// Render a whole document through the private `render` chain
    pub fn render(&self, document: &Document) -> Result<Dispatch, EngineError> {
        self.dispatch(&Command::render(NodeRef::Document(document)))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("resolvers", &self.resolvers)
            .field("policy", &self.policy)
            .field("target", &self.target)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
