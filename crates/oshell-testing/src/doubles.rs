//! Recording doubles for the core's collaborator traits.

use async_trait::async_trait;
use oshell_core::{
    CommandHandler, CommandSpec, HotKeyId, Invocation, MainWindow, NotificationLevel, Notifier,
    PlatformFacade, ShellResult,
};
use oshell_keybinds::KeyBinding;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Platform facade that records calls and can be told to refuse them.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    active: Mutex<BTreeMap<HotKeyId, KeyBinding>>,
    registered: Mutex<Vec<(KeyBinding, HotKeyId)>>,
    unregistered: Mutex<Vec<HotKeyId>>,
    fail_register: AtomicBool,
    fail_unregister: AtomicBool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `register_hot_key` return `false`.
    pub fn fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::SeqCst);
    }

    /// Make `unregister_hot_key` return `false`.
    pub fn fail_unregister(&self, fail: bool) {
        self.fail_unregister.store(fail, Ordering::SeqCst);
    }

    /// Every successful registration, in order.
    pub fn registered(&self) -> Vec<(KeyBinding, HotKeyId)> {
        self.registered.lock().clone()
    }

    /// Every successful unregistration, in order.
    pub fn unregistered(&self) -> Vec<HotKeyId> {
        self.unregistered.lock().clone()
    }

    /// Hot keys currently held.
    pub fn active(&self) -> Vec<KeyBinding> {
        self.active.lock().values().copied().collect()
    }

    pub fn is_active(&self, key: &KeyBinding) -> bool {
        self.active.lock().values().any(|k| k == key)
    }
}

impl PlatformFacade for RecordingPlatform {
    fn register_hot_key(&self, key: KeyBinding, id: HotKeyId) -> bool {
        if self.fail_register.load(Ordering::SeqCst) {
            return false;
        }
        self.active.lock().insert(id, key);
        self.registered.lock().push((key, id));
        true
    }

    fn unregister_hot_key(&self, id: HotKeyId) -> bool {
        if self.fail_unregister.load(Ordering::SeqCst) {
            return false;
        }
        self.active.lock().remove(&id);
        self.unregistered.lock().push(id);
        true
    }
}

/// Notifier that keeps every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotificationLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.messages.lock().clone()
    }

    /// Messages at `level`, in order.
    pub fn at(&self, level: NotificationLevel) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(NotificationLevel::Error)
    }

    pub fn infos(&self) -> Vec<String> {
        self.at(NotificationLevel::Info)
    }

    pub fn last(&self) -> Option<(NotificationLevel, String)> {
        self.messages.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

/// Main window that records `wait_for_next_key` requests.
#[derive(Debug, Default)]
pub struct RecordingWindow {
    waits: Mutex<Vec<KeyBinding>>,
}

impl RecordingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<KeyBinding> {
        self.waits.lock().clone()
    }
}

impl MainWindow for RecordingWindow {
    fn wait_for_next_key(&self, top_key: KeyBinding) {
        self.waits.lock().push(top_key);
    }
}

/// Command handler with a scripted result that records its arguments.
#[derive(Debug)]
pub struct StubHandler {
    name: String,
    result: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl StubHandler {
    /// A handler for `name` that returns `result` immediately.
    pub fn new(name: impl Into<String>, result: bool) -> Self {
        Self {
            name: name.into(),
            result,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` before returning.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Descriptor to register alongside this handler.
    pub fn spec(&self) -> CommandSpec {
        CommandSpec::new(self.name.clone(), "args", format!("stub for {}", self.name))
    }

    /// Argument strings received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CommandHandler for StubHandler {
    fn command(&self) -> &str {
        &self.name
    }

    async fn execute(&self, invocation: Invocation) -> ShellResult<bool> {
        self.calls.lock().push(invocation.args().to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_platform_failure_toggles() {
        let platform = RecordingPlatform::new();
        let key = KeyBinding::ctrl('t');

        assert!(platform.register_hot_key(key, HotKeyId(1)));
        assert!(platform.is_active(&key));

        platform.fail_unregister(true);
        assert!(!platform.unregister_hot_key(HotKeyId(1)));
        assert!(platform.is_active(&key));

        platform.fail_unregister(false);
        assert!(platform.unregister_hot_key(HotKeyId(1)));
        assert!(platform.active().is_empty());
        assert_eq!(platform.unregistered(), vec![HotKeyId(1)]);
    }

    #[test]
    fn test_recording_notifier_levels() {
        let notifier = RecordingNotifier::new();
        notifier.info("one");
        notifier.error("two");
        notifier.debug("three");

        assert_eq!(notifier.infos(), vec!["one".to_string()]);
        assert_eq!(notifier.errors(), vec!["two".to_string()]);
        assert_eq!(notifier.last().map(|(l, _)| l), Some(NotificationLevel::Debug));
    }
}
