//! Index consistency and hot-key lifecycle of the keymap service.

use oshell_core::{KeyMapService, KeymapError, ServiceState};
use oshell_keybinds::KeyBinding;
use oshell_testing::{Fixtures, RecordingPlatform};
use std::sync::Arc;

fn setup() -> (Arc<RecordingPlatform>, Arc<KeyMapService>) {
    let platform = Arc::new(RecordingPlatform::new());
    let service = Fixtures::keymap_service(Arc::clone(&platform));
    (platform, service)
}

#[test]
fn lookups_by_name_and_top_key_agree() {
    let (platform, service) = setup();
    let top = KeyBinding::ctrl('t');

    service.add_key_map("k").unwrap();
    service.set_top_key("k", top).unwrap();

    let by_name = service.get_key_map_by_name("k").unwrap();
    let by_key = service.get_key_map_by_top_key(&top).unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_key));
    assert_eq!(by_name.top_key(), Some(top));
    assert_eq!(platform.registered(), vec![(top, by_name.id())]);
}

#[test]
fn remove_clears_both_indices_and_hot_key() {
    let (platform, service) = setup();
    let top = KeyBinding::ctrl('t');
    service.add_key_map("k").unwrap();
    service.set_top_key("k", top).unwrap();
    let id = service.get_key_map_by_name("k").unwrap().id();

    service.remove_key_map("k").unwrap();

    assert_eq!(
        service.get_key_map_by_name("k").unwrap_err(),
        KeymapError::KeyNotFound("k".into())
    );
    assert_eq!(
        service.get_key_map_by_top_key(&top).unwrap_err(),
        KeymapError::TopKeyNotFound(top)
    );
    assert!(service.get_key_map_by_top_key(&top).unwrap_err().is_not_found());
    assert_eq!(platform.unregistered(), vec![id]);
    assert!(!platform.is_active(&top));
}

#[test]
fn argument_validation() {
    let (_platform, service) = setup();

    assert_eq!(service.add_key_map("").unwrap_err(), KeymapError::InvalidArgument("name"));
    assert_eq!(service.add_key_map("  ").unwrap_err(), KeymapError::InvalidArgument("name"));
    assert_eq!(
        service.set_top_key("k", KeyBinding::NONE).unwrap_err(),
        KeymapError::InvalidArgument("top_key")
    );
    assert_eq!(
        service.get_key_map_by_top_key(&KeyBinding::NONE).unwrap_err(),
        KeymapError::InvalidArgument("top_key")
    );
}

#[test]
fn missing_keymap_is_not_found() {
    let (_platform, service) = setup();
    assert_eq!(
        service.set_top_key("ghost", KeyBinding::ctrl('g')).unwrap_err(),
        KeymapError::KeyNotFound("ghost".into())
    );
    assert_eq!(
        service.remove_key_map("ghost").unwrap_err(),
        KeymapError::KeyNotFound("ghost".into())
    );
}

#[test]
fn duplicate_names_and_top_keys_are_rejected() {
    let (platform, service) = setup();
    let top = KeyBinding::ctrl('t');
    service.add_key_map("a").unwrap();
    service.add_key_map("b").unwrap();

    assert!(service.add_key_map("a").unwrap_err().is_duplicate());

    service.set_top_key("a", top).unwrap();
    assert_eq!(
        service.set_top_key("a", top).unwrap_err(),
        KeymapError::DuplicateTopKey(top)
    );
    assert_eq!(
        service.set_top_key("a", KeyBinding::ctrl('u')).unwrap_err(),
        KeymapError::DuplicateTopKey(KeyBinding::ctrl('u'))
    );
    assert_eq!(
        service.set_top_key("b", top).unwrap_err(),
        KeymapError::DuplicateTopKey(top)
    );

    // Only the first registration reached the platform.
    assert_eq!(platform.registered().len(), 1);
    assert_eq!(service.get_key_map_by_name("b").unwrap().top_key(), None);
}

#[test]
fn refused_registration_changes_nothing() {
    let (platform, service) = setup();
    let top = KeyBinding::ctrl('t');
    service.add_key_map("k").unwrap();
    platform.fail_register(true);

    let err = service.set_top_key("k", top).unwrap_err();
    assert!(matches!(
        err,
        KeymapError::PlatformBinding { operation: "register", key, .. } if key == top
    ));
    assert_eq!(service.get_key_map_by_name("k").unwrap().top_key(), None);
    assert!(service.get_key_map_by_top_key(&top).unwrap_err().is_not_found());

    platform.fail_register(false);
    service.set_top_key("k", top).unwrap();
}

#[test]
fn refused_unregistration_keeps_keymap() {
    let (platform, service) = setup();
    let top = KeyBinding::ctrl('t');
    service.add_key_map("k").unwrap();
    service.set_top_key("k", top).unwrap();
    platform.fail_unregister(true);

    let err = service.remove_key_map("k").unwrap_err();
    assert!(matches!(err, KeymapError::PlatformBinding { operation: "unregister", .. }));
    assert!(service.contains("k"));
    assert!(service.get_key_map_by_top_key(&top).is_ok());
    assert!(platform.is_active(&top));
}

#[test]
fn stop_is_idempotent_and_distinct_from_not_found() {
    let (platform, service) = setup();
    service.add_key_map("a").unwrap();
    service.add_key_map("b").unwrap();
    service.set_top_key("a", KeyBinding::ctrl('a')).unwrap();
    service.set_top_key("b", KeyBinding::ctrl('b')).unwrap();

    service.stop();
    service.stop();

    assert_eq!(service.state(), ServiceState::Stopped);
    assert!(platform.active().is_empty());
    assert_eq!(platform.unregistered().len(), 2);

    let err = service.get_key_map_by_name("a").unwrap_err();
    assert_eq!(err, KeymapError::ServiceStopped);
    assert!(!err.is_not_found());
    assert_eq!(service.add_key_map("c").unwrap_err(), KeymapError::ServiceStopped);
    assert!(!service.contains("a"));
}

#[test]
fn stop_survives_platform_refusal() {
    let (platform, service) = setup();
    service.add_key_map("a").unwrap();
    service.set_top_key("a", KeyBinding::ctrl('a')).unwrap();
    platform.fail_unregister(true);

    service.stop();
    assert_eq!(service.state(), ServiceState::Stopped);
}

#[test]
fn key_maps_lists_sorted_names() {
    let (_platform, service) = setup();
    for name in ["top", "root", "help"] {
        service.add_key_map(name).unwrap();
    }
    assert_eq!(service.key_maps().unwrap(), vec!["help", "root", "top"]);
}
