//! Command descriptors, handlers, and the validated registry that pairs them.

use crate::error::{ShellError, ShellResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable descriptor of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name typed at the start of a command line. Unique per registry.
    pub name: String,
    /// Argument synopsis, e.g. `keymap key command`.
    pub usage: String,
    /// Help text.
    pub help: String,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, usage: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            help: help.into(),
        }
    }

    /// `name usage`, trimmed.
    pub fn synopsis(&self) -> String {
        if self.usage.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.usage)
        }
    }
}

/// One dispatch of a command: its descriptor and the argument string typed
/// after the name. Owned by that dispatch alone.
#[derive(Debug, Clone)]
pub struct Invocation {
    spec: Arc<CommandSpec>,
    args: String,
}

impl Invocation {
    pub fn new(spec: Arc<CommandSpec>, args: impl Into<String>) -> Self {
        Self {
            spec,
            args: args.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Raw argument string.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Arguments split on whitespace.
    pub fn tokens(&self) -> Vec<&str> {
        self.args.split_whitespace().collect()
    }
}

/// Executes exactly one command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Name of the command this handler executes.
    fn command(&self) -> &str;

    /// Execute one invocation. `Ok(false)` is a business failure, not an error.
    async fn execute(&self, invocation: Invocation) -> ShellResult<bool>;
}

/// A command paired with its handler.
#[derive(Clone)]
pub struct CommandEntry {
    pub spec: Arc<CommandSpec>,
    pub handler: Arc<dyn CommandHandler>,
}

/// Name → (descriptor, handler) map, validated at build time.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandEntry>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    /// Look up a command by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Command descriptors, sorted by name.
    pub fn specs(&self) -> Vec<Arc<CommandSpec>> {
        let mut specs: Vec<Arc<CommandSpec>> =
            self.entries.values().map(|e| Arc::clone(&e.spec)).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

/// Collects commands and handlers, then pairs them in [`build`](Self::build).
#[derive(Default)]
pub struct CommandRegistryBuilder {
    specs: Vec<CommandSpec>,
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl CommandRegistryBuilder {
    /// Add a command descriptor.
    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Add a handler.
    pub fn handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Add a descriptor and its handler together.
    pub fn register(self, spec: CommandSpec, handler: Arc<dyn CommandHandler>) -> Self {
        self.command(spec).handler(handler)
    }

    /// Pair every command with exactly one handler.
    ///
    /// Fails on a duplicate command name, a command with zero or several
    /// handlers, or a handler for a command that was never added.
    pub fn build(self) -> ShellResult<CommandRegistry> {
        let mut specs: HashMap<String, Arc<CommandSpec>> = HashMap::new();
        let mut order = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            if spec.name.is_empty() || spec.name.contains(char::is_whitespace) {
                return Err(ShellError::invalid_argument(
                    "name",
                    format!("command name `{}` must be a single non-empty word", spec.name),
                ));
            }
            if specs.contains_key(&spec.name) {
                return Err(ShellError::DuplicateCommand(spec.name));
            }
            order.push(spec.name.clone());
            specs.insert(spec.name.clone(), Arc::new(spec));
        }

        let mut handlers: HashMap<String, Arc<dyn CommandHandler>> = HashMap::new();
        for handler in self.handlers {
            let name = handler.command().to_string();
            if !specs.contains_key(&name) {
                return Err(ShellError::HandlerResolution {
                    command: name,
                    reason: "handler registered for an unknown command".into(),
                });
            }
            if handlers.insert(name.clone(), handler).is_some() {
                return Err(ShellError::HandlerResolution {
                    command: name,
                    reason: "more than one handler registered".into(),
                });
            }
        }

        let mut entries = HashMap::with_capacity(order.len());
        for name in order {
            let handler = handlers
                .remove(&name)
                .ok_or_else(|| ShellError::HandlerResolution {
                    command: name.clone(),
                    reason: "no handler registered".into(),
                })?;
            if let Some(spec) = specs.remove(&name) {
                entries.insert(name, CommandEntry { spec, handler });
            }
        }

        Ok(CommandRegistry { entries })
    }
}
