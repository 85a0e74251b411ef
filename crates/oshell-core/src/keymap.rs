//! Named sub-key tables.

use crate::error::{KeymapError, ShellResult};
use oshell_keybinds::KeyBinding;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Boxed future returned by a key action.
pub type ActionFuture = Pin<Box<dyn Future<Output = ShellResult<bool>> + Send>>;

/// An asynchronous action bound to a sub key. Receives the raw argument string.
pub type Action = Arc<dyn Fn(String) -> ActionFuture + Send + Sync>;

/// Wrap an async closure as an [`Action`].
pub fn action<F, Fut>(f: F) -> Action
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ShellResult<bool>> + Send + 'static,
{
    Arc::new(move |args| Box::pin(f(args)))
}

/// Id handed to the platform when a keymap's top key is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotKeyId(pub u32);

impl HotKeyId {
    /// Allocate the next process-unique id.
    pub fn next() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HotKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named table of sub key → action bindings, reachable through its top key.
pub struct KeyMap {
    name: String,
    id: HotKeyId,
    // Written only by KeyMapService, under its index lock.
    top_key: RwLock<Option<KeyBinding>>,
    actions: RwLock<HashMap<KeyBinding, Action>>,
}

impl KeyMap {
    /// Create an empty keymap with no top key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: HotKeyId::next(),
            top_key: RwLock::new(None),
            actions: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> HotKeyId {
        self.id
    }

    /// The key that triggers this keymap from the idle state, if bound.
    pub fn top_key(&self) -> Option<KeyBinding> {
        *self.top_key.read()
    }

    pub(crate) fn set_top_key(&self, key: Option<KeyBinding>) {
        *self.top_key.write() = key;
    }

    /// Bind `action` to `key`.
    ///
    /// Fails with [`KeymapError::DuplicateKeyBinding`] if `key` already has an
    /// action; the existing binding is kept.
    pub fn register_action(&self, key: KeyBinding, action: Action) -> Result<(), KeymapError> {
        if key.is_none() {
            return Err(KeymapError::InvalidArgument("key"));
        }

        let mut actions = self.actions.write();
        if actions.contains_key(&key) {
            return Err(KeymapError::DuplicateKeyBinding(key));
        }
        actions.insert(key, action);
        tracing::debug!(keymap = %self.name, key = %key, "action registered");
        Ok(())
    }

    /// Remove the binding for `key`. Unbound keys are ignored.
    pub fn unregister_action(&self, key: &KeyBinding) {
        if self.actions.write().remove(key).is_some() {
            tracing::debug!(keymap = %self.name, key = %key, "action unregistered");
        }
    }

    /// Check if `key` has an action.
    pub fn is_bound(&self, key: &KeyBinding) -> bool {
        self.actions.read().contains_key(key)
    }

    /// All bound sub keys.
    pub fn keys(&self) -> Vec<KeyBinding> {
        self.actions.read().keys().copied().collect()
    }

    /// Number of bound sub keys.
    pub fn len(&self) -> usize {
        self.actions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.read().is_empty()
    }

    /// Run the action bound to `key` with `args`.
    ///
    /// Fails with [`KeymapError::KeyNotBound`] if nothing is bound. The lock is
    /// released before the action is awaited.
    pub async fn execute(&self, key: KeyBinding, args: impl Into<String>) -> ShellResult<bool> {
        let action = self
            .actions
            .read()
            .get(&key)
            .cloned()
            .ok_or(KeymapError::KeyNotBound {
                top_key: self.top_key(),
                key,
            })?;

        action(args.into()).await
    }
}

impl fmt::Debug for KeyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMap")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("top_key", &self.top_key())
            .field("keys", &self.keys())
            .finish()
    }
}
