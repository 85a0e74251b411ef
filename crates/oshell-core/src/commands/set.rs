//! `set`: shell variables.

use crate::command::{CommandHandler, CommandSpec, Invocation};
use crate::error::ShellResult;
use crate::notification::Notifier;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Variable naming the keymap `delkmap` refuses to delete.
pub(crate) const TOP_KEYMAP_VARIABLE: &str = "topkmap";

const DEFAULTS: &[(&str, &str)] = &[("border", "1"), (TOP_KEYMAP_VARIABLE, "top")];

pub(super) fn spec() -> CommandSpec {
    CommandSpec::new(
        "set",
        "[variable [value]]",
        "Set variable to value. With only a variable, show its value. With no arguments, \
         list every variable.",
    )
}

/// Flat settings table with a built-in default overlay.
#[derive(Debug)]
pub struct Variables {
    values: RwLock<BTreeMap<String, String>>,
}

impl Variables {
    /// Built-in defaults.
    pub fn new() -> Self {
        Self::with_overrides(BTreeMap::new())
    }

    /// Built-in defaults, then `overrides` on top.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        let mut values: BTreeMap<String, String> = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        values.extend(overrides);
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    /// All variables, sorted by name.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.read().clone()
    }
}

impl Default for Variables {
    fn default() -> Self {
        Self::new()
    }
}

/// `set [variable [value...]]`
pub struct SetHandler {
    variables: Arc<Variables>,
    notifier: Arc<dyn Notifier>,
}

impl SetHandler {
    pub fn new(variables: Arc<Variables>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            variables,
            notifier,
        }
    }
}

fn describe(name: &str, value: Option<&str>) -> String {
    format!("{} = {}\r\n", name, value.unwrap_or("<undefined>"))
}

#[async_trait]
impl CommandHandler for SetHandler {
    fn command(&self) -> &str {
        "set"
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        let tokens = invocation.tokens();
        match tokens.as_slice() {
            [] => {
                let listing: String = self
                    .variables
                    .snapshot()
                    .iter()
                    .map(|(name, value)| describe(name, Some(value)))
                    .collect();
                self.notifier.info(&listing);
            }
            [name] => {
                let value = self.variables.get(name);
                self.notifier.info(&describe(name, value.as_deref()));
            }
            [name, value @ ..] => {
                self.variables.set(*name, value.join(" "));
                tracing::debug!(variable = %name, "variable set");
            }
        }
        Ok(true)
    }
}
