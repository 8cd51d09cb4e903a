mod tests {
    use lamparray_director::device::{Brightness, DeviceId, DeviceInfo, DeviceName};
    use lamparray_director::events::{DiscoveryEvent, DiscoveryQueue};
    use lamparray_director::frame::BitmapBounds;
    use lamparray_director::registry::{DeviceRegistry, MAX_DEVICES};
    use lamparray_director::watcher::DiscoveryWatcher;

    fn device_id(s: &str) -> DeviceId {
        DeviceId::try_from(s).unwrap()
    }

    fn info(id: &str, name: &str, lamp_count: u16) -> DeviceInfo {
        DeviceInfo {
            id: device_id(id),
            name: DeviceName::try_from(name).unwrap(),
            lamp_count,
            suggested_bitmap: BitmapBounds::new(22, 6),
        }
    }

    #[test]
    fn test_count_tracks_adds_and_removes() {
        let registry = DeviceRegistry::new();
        registry.add(info("dev-1", "Keyboard", 96), Brightness::FULL).unwrap();
        registry.add(info("dev-2", "Mousepad", 20), Brightness::FULL).unwrap();
        assert_eq!(registry.len(), 2);

        registry.remove(&device_id("dev-1"));
        assert_eq!(registry.len(), 1);

        // Removing an absent id is a no-op, not an error.
        registry.remove(&device_id("dev-1"));
        registry.remove(&device_id("never-seen"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_add_keeps_single_record() {
        let registry = DeviceRegistry::new();
        registry.add(info("dev-1", "Keyboard", 96), Brightness::FULL).unwrap();
        registry.add(info("dev-1", "Keyboard", 96), Brightness::FULL).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_rejects_overflow() {
        let registry = DeviceRegistry::new();
        for i in 0..MAX_DEVICES {
            let id = format!("dev-{i}");
            registry.add(info(&id, "Strip", 30), Brightness::FULL).unwrap();
        }
        assert!(
            registry
                .add(info("one-too-many", "Strip", 30), Brightness::FULL)
                .is_err()
        );
        assert_eq!(registry.len(), MAX_DEVICES);
    }

    #[test]
    fn test_summary_reflects_latest_state() {
        let registry = DeviceRegistry::new();
        registry.add(info("dev-1", "Keyboard", 96), Brightness::FULL).unwrap();
        registry.add(info("dev-2", "Mousepad", 20), Brightness::FULL).unwrap();
        registry.remove(&device_id("dev-1"));

        // Delivery is lossy latest-wins; drain to the newest update.
        let mut latest = None;
        while let Some(update) = registry.try_take_summary() {
            latest = Some(update);
        }
        let update = latest.unwrap();
        assert_eq!(update.count, 1);
        assert_eq!(update.names.len(), 1);
        assert_eq!(update.names[0].as_str(), "Mousepad");
    }

    #[test]
    fn test_brightness_applies_to_all_devices() {
        let registry = DeviceRegistry::new();
        registry.add(info("dev-1", "Keyboard", 96), Brightness::FULL).unwrap();
        registry.add(info("dev-2", "Mousepad", 20), Brightness::FULL).unwrap();

        registry.set_brightness_all(Brightness::from_level(40));
        registry.for_each(|device| {
            assert_eq!(device.brightness.level(), 40);
            assert!((device.brightness.fraction() - 0.4).abs() < f32::EPSILON);
        });
    }

    #[test]
    fn test_brightness_level_clamps() {
        assert_eq!(Brightness::from_level(250).level(), 100);
        assert!((Brightness::from_level(250).fraction() - 1.0).abs() < f32::EPSILON);
        assert!((Brightness::from_level(0).fraction()).abs() < f32::EPSILON);
    }

    #[test]
    fn test_watcher_drains_discovery_events() {
        let registry = DeviceRegistry::new();
        let queue = DiscoveryQueue::new();
        let mut watcher = DiscoveryWatcher::new(&queue);

        queue.try_send(DiscoveryEvent::Added(info("dev-1", "Keyboard", 96))).unwrap();
        queue.try_send(DiscoveryEvent::Added(info("dev-2", "Mousepad", 20))).unwrap();
        queue.try_send(DiscoveryEvent::Removed(device_id("dev-1"))).unwrap();

        let processed = watcher.process_pending(&registry, Brightness::from_level(70));
        assert_eq!(processed, 3);
        assert_eq!(registry.len(), 1);
        assert!(queue.is_empty());

        // Devices added through the watcher pick up the current brightness.
        registry.for_each(|device| assert_eq!(device.brightness.level(), 70));
    }
}
