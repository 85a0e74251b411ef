//! Collaborator boundaries: OS hot-key registration and the main window.

use crate::keymap::HotKeyId;
use oshell_keybinds::KeyBinding;
use tracing::info;

/// Boundary to OS-level global hot-key registration.
///
/// Implementations are called while the keymap service holds its index
/// lock, so they must not call back into the service.
pub trait PlatformFacade: Send + Sync {
    /// Register `key` as a global hot key under `id`. Returns `false` if the
    /// platform refused.
    fn register_hot_key(&self, key: KeyBinding, id: HotKeyId) -> bool;

    /// Release the hot key registered under `id`.
    fn unregister_hot_key(&self, id: HotKeyId) -> bool;
}

/// The UI side of the key flow.
pub trait MainWindow: Send + Sync {
    /// Enter "awaiting sub key" mode for the keymap bound to `top_key`.
    fn wait_for_next_key(&self, top_key: KeyBinding);
}

/// Platform facade for headless runs. Accepts every registration and logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPlatform;

impl PlatformFacade for HeadlessPlatform {
    fn register_hot_key(&self, key: KeyBinding, id: HotKeyId) -> bool {
        info!(key = %key, hotkey_id = id.0, "hot key registered");
        true
    }

    fn unregister_hot_key(&self, id: HotKeyId) -> bool {
        info!(hotkey_id = id.0, "hot key unregistered");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_platform_accepts_everything() {
        let platform = HeadlessPlatform;
        assert!(platform.register_hot_key(KeyBinding::ctrl('t'), HotKeyId(7)));
        assert!(platform.unregister_hot_key(HotKeyId(7)));
    }
}
