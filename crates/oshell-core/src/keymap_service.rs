//! Keymap ownership, name and top-key indices, and hot-key lifecycle.

use crate::error::KeymapError;
use crate::keymap::KeyMap;
use crate::platform::PlatformFacade;
use oshell_keybinds::KeyBinding;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceState {
    /// Created, not yet started.
    #[default]
    NotStarted,
    /// Accepting calls.
    Running,
    /// Torn down. Every call fails with a "stopped" error.
    Stopped,
}

#[derive(Default)]
struct Inner {
    state: ServiceState,
    by_name: HashMap<String, Arc<KeyMap>>,
    by_top_key: HashMap<KeyBinding, Arc<KeyMap>>,
}

impl Inner {
    fn ensure_running(&self) -> Result<(), KeymapError> {
        match self.state {
            ServiceState::Running => Ok(()),
            ServiceState::NotStarted => Err(KeymapError::ServiceNotStarted),
            ServiceState::Stopped => Err(KeymapError::ServiceStopped),
        }
    }

    fn by_name(&self, name: &str) -> Result<&Arc<KeyMap>, KeymapError> {
        self.by_name
            .get(name)
            .ok_or_else(|| KeymapError::KeyNotFound(name.to_string()))
    }
}

/// Owns every [`KeyMap`] and keeps the name and top-key indices consistent.
///
/// All index mutations, and the platform calls around them, happen under one
/// write lock, so a reader never sees the two indices disagree.
pub struct KeyMapService {
    platform: Arc<dyn PlatformFacade>,
    inner: RwLock<Inner>,
}

impl KeyMapService {
    /// Create a service in the `NotStarted` state.
    pub fn new(platform: Arc<dyn PlatformFacade>) -> Self {
        Self {
            platform,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Start accepting calls.
    pub fn start(&self) -> Result<(), KeymapError> {
        let mut inner = self.inner.write();
        match inner.state {
            ServiceState::NotStarted => {
                inner.state = ServiceState::Running;
                debug!("keymap service started");
                Ok(())
            }
            ServiceState::Running => Ok(()),
            ServiceState::Stopped => Err(KeymapError::ServiceStopped),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.inner.read().state
    }

    /// Create an empty keymap named `name`.
    pub fn add_key_map(&self, name: &str) -> Result<Arc<KeyMap>, KeymapError> {
        validate_name(name)?;

        let mut inner = self.inner.write();
        inner.ensure_running()?;
        if inner.by_name.contains_key(name) {
            return Err(KeymapError::DuplicateKeyMap(name.to_string()));
        }

        let keymap = Arc::new(KeyMap::new(name));
        inner.by_name.insert(name.to_string(), Arc::clone(&keymap));
        debug!(keymap = %name, hotkey_id = keymap.id().0, "keymap added");
        Ok(keymap)
    }

    /// Bind `top_key` as the global hot key of the keymap `name`.
    ///
    /// The platform is asked first; if it refuses, nothing changes. A keymap
    /// keeps its first top key, and a top key belongs to one keymap.
    pub fn set_top_key(&self, name: &str, top_key: KeyBinding) -> Result<(), KeymapError> {
        validate_name(name)?;
        validate_top_key(&top_key)?;

        let mut inner = self.inner.write();
        inner.ensure_running()?;
        let keymap = Arc::clone(inner.by_name(name)?);

        if keymap.top_key().is_some() || inner.by_top_key.contains_key(&top_key) {
            return Err(KeymapError::DuplicateTopKey(top_key));
        }

        if !self.platform.register_hot_key(top_key, keymap.id()) {
            warn!(keymap = %name, key = %top_key, hotkey_id = keymap.id().0, "hot key registration failed");
            return Err(KeymapError::PlatformBinding {
                operation: "register",
                key: top_key,
                id: keymap.id().0,
            });
        }

        inner.by_top_key.insert(top_key, Arc::clone(&keymap));
        keymap.set_top_key(Some(top_key));
        debug!(keymap = %name, key = %top_key, hotkey_id = keymap.id().0, "top key bound");
        Ok(())
    }

    /// Remove the keymap `name` from both indices and release its hot key.
    ///
    /// Removal is transactional: if the platform refuses to unregister the hot
    /// key, the keymap stays indexed and bound.
    pub fn remove_key_map(&self, name: &str) -> Result<Arc<KeyMap>, KeymapError> {
        validate_name(name)?;

        let mut inner = self.inner.write();
        inner.ensure_running()?;
        let keymap = Arc::clone(inner.by_name(name)?);

        if let Some(top_key) = keymap.top_key() {
            if !self.platform.unregister_hot_key(keymap.id()) {
                warn!(keymap = %name, key = %top_key, hotkey_id = keymap.id().0, "hot key unregistration failed");
                return Err(KeymapError::PlatformBinding {
                    operation: "unregister",
                    key: top_key,
                    id: keymap.id().0,
                });
            }
            inner.by_top_key.remove(&top_key);
            keymap.set_top_key(None);
        }

        inner.by_name.remove(name);
        debug!(keymap = %name, "keymap removed");
        Ok(keymap)
    }

    /// Look up a keymap by name.
    pub fn get_key_map_by_name(&self, name: &str) -> Result<Arc<KeyMap>, KeymapError> {
        validate_name(name)?;

        let inner = self.inner.read();
        inner.ensure_running()?;
        inner.by_name(name).cloned()
    }

    /// Look up the keymap whose top key is `top_key`.
    pub fn get_key_map_by_top_key(&self, top_key: &KeyBinding) -> Result<Arc<KeyMap>, KeymapError> {
        validate_top_key(top_key)?;

        let inner = self.inner.read();
        inner.ensure_running()?;
        inner
            .by_top_key
            .get(top_key)
            .cloned()
            .ok_or(KeymapError::TopKeyNotFound(*top_key))
    }

    /// Check if a keymap named `name` exists. False when not running.
    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.read();
        inner.state == ServiceState::Running && inner.by_name.contains_key(name)
    }

    /// Check if `key` is bound as some keymap's top key. False when not running.
    pub fn is_top_key(&self, key: &KeyBinding) -> bool {
        let inner = self.inner.read();
        inner.state == ServiceState::Running && inner.by_top_key.contains_key(key)
    }

    /// Names of all keymaps, sorted.
    pub fn key_maps(&self) -> Result<Vec<String>, KeymapError> {
        let inner = self.inner.read();
        inner.ensure_running()?;
        let mut names: Vec<String> = inner.by_name.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Release every hot key and clear both indices. Idempotent.
    ///
    /// Platform failures are logged and skipped so teardown always completes.
    pub fn stop(&self) {
        let mut inner = self.inner.write();
        if inner.state == ServiceState::Stopped {
            return;
        }

        for (top_key, keymap) in inner.by_top_key.drain() {
            if !self.platform.unregister_hot_key(keymap.id()) {
                warn!(keymap = %keymap.name(), key = %top_key, hotkey_id = keymap.id().0, "hot key unregistration failed during stop");
            }
            keymap.set_top_key(None);
        }
        inner.by_name.clear();
        inner.state = ServiceState::Stopped;
        debug!("keymap service stopped");
    }
}

impl Drop for KeyMapService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn validate_name(name: &str) -> Result<(), KeymapError> {
    if name.trim().is_empty() {
        return Err(KeymapError::InvalidArgument("name"));
    }
    Ok(())
}

fn validate_top_key(top_key: &KeyBinding) -> Result<(), KeymapError> {
    if top_key.is_none() {
        return Err(KeymapError::InvalidArgument("top_key"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::HotKeyId;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FlakyPlatform {
        refuse: Mutex<bool>,
        bound: Mutex<Vec<u32>>,
    }

    impl PlatformFacade for FlakyPlatform {
        fn register_hot_key(&self, _key: KeyBinding, id: HotKeyId) -> bool {
            if *self.refuse.lock() {
                return false;
            }
            self.bound.lock().push(id.0);
            true
        }

        fn unregister_hot_key(&self, id: HotKeyId) -> bool {
            if *self.refuse.lock() {
                return false;
            }
            self.bound.lock().retain(|bound| *bound != id.0);
            true
        }
    }

    fn running() -> (Arc<FlakyPlatform>, KeyMapService) {
        let platform = Arc::new(FlakyPlatform::default());
        let service = KeyMapService::new(platform.clone());
        service.start().unwrap();
        (platform, service)
    }

    #[test]
    fn test_lifecycle() {
        let service = KeyMapService::new(Arc::new(FlakyPlatform::default()));
        assert_eq!(service.state(), ServiceState::NotStarted);
        assert_eq!(service.add_key_map("top").unwrap_err(), KeymapError::ServiceNotStarted);

        service.start().unwrap();
        assert_eq!(service.state(), ServiceState::Running);

        service.stop();
        service.stop();
        assert_eq!(service.state(), ServiceState::Stopped);
        assert_eq!(service.start().unwrap_err(), KeymapError::ServiceStopped);
    }

    #[test]
    fn test_refused_registration_leaves_state_unchanged() {
        let (platform, service) = running();
        let keymap = service.add_key_map("top").unwrap();
        *platform.refuse.lock() = true;

        let err = service.set_top_key("top", KeyBinding::ctrl('t')).unwrap_err();
        assert!(matches!(err, KeymapError::PlatformBinding { operation: "register", .. }));
        assert_eq!(keymap.top_key(), None);
        assert!(!service.is_top_key(&KeyBinding::ctrl('t')));
    }

    #[test]
    fn test_refused_unregistration_keeps_keymap() {
        let (platform, service) = running();
        service.add_key_map("top").unwrap();
        service.set_top_key("top", KeyBinding::ctrl('t')).unwrap();
        *platform.refuse.lock() = true;

        let err = service.remove_key_map("top").unwrap_err();
        assert!(matches!(err, KeymapError::PlatformBinding { operation: "unregister", .. }));
        assert!(service.contains("top"));
        assert!(service.get_key_map_by_top_key(&KeyBinding::ctrl('t')).is_ok());
    }

    #[test]
    fn test_keymap_without_top_key_skips_platform() {
        let (platform, service) = running();
        service.add_key_map("root").unwrap();
        *platform.refuse.lock() = true;

        service.remove_key_map("root").unwrap();
        assert!(!service.contains("root"));
    }

    #[test]
    fn test_stop_releases_hot_keys() {
        let (platform, service) = running();
        service.add_key_map("top").unwrap();
        service.set_top_key("top", KeyBinding::ctrl('t')).unwrap();
        assert_eq!(platform.bound.lock().len(), 1);

        service.stop();
        assert!(platform.bound.lock().is_empty());
        assert_eq!(
            service.get_key_map_by_name("top").unwrap_err(),
            KeymapError::ServiceStopped
        );
    }
}
