mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use lamparray_director::color::{self, Rgb};
    use lamparray_director::device::{Brightness, DeviceId, DeviceInfo, DeviceName};
    use lamparray_director::dispatch::{BitmapSink, CallbackDispatcher, LampColorSink};
    use lamparray_director::frame::{BitmapBounds, PixelFrame};
    use lamparray_director::image::NullPresenter;
    use lamparray_director::playlist::{EffectToken, PlaylistToken};
    use lamparray_director::registry::DeviceRegistry;
    use lamparray_director::session::{EffectScheduler, SessionController};
    use lamparray_director::snake::SNAKE_TRAIL_LENGTH;

    #[derive(Clone, Default)]
    struct NullScheduler;

    impl EffectScheduler for NullScheduler {
        fn start_all(&mut self, _playlists: &[PlaylistToken]) {}
        fn stop_all(&mut self, _playlists: &[PlaylistToken]) {}
    }

    #[derive(Default)]
    struct ColorSink {
        solid_fills: Vec<Rgb>,
        indexed_writes: Vec<(u16, Rgb)>,
    }

    impl LampColorSink for ColorSink {
        fn set_color(&mut self, color: Rgb) {
            self.solid_fills.push(color);
        }

        fn set_colors_for_indices(&mut self, colors: &[Rgb], indices: &[u16]) {
            for (color, index) in colors.iter().zip(indices) {
                self.indexed_writes.push((*index, *color));
            }
        }
    }

    #[derive(Clone, Default)]
    struct FrameSink {
        frames: Rc<RefCell<Vec<(u16, u16, Vec<u8>)>>>,
    }

    impl BitmapSink for FrameSink {
        fn update_bitmap(&mut self, frame: &PixelFrame) {
            self.frames
                .borrow_mut()
                .push((frame.width(), frame.height(), frame.as_bytes().to_vec()));
        }
    }

    fn add_device(registry: &DeviceRegistry, id: &str, lamp_count: u16, bitmap: BitmapBounds) {
        registry
            .add(
                DeviceInfo {
                    id: DeviceId::try_from(id).unwrap(),
                    name: DeviceName::try_from(id).unwrap(),
                    lamp_count,
                    suggested_bitmap: bitmap,
                },
                Brightness::FULL,
            )
            .unwrap();
    }

    /// The token of the device's first scheduled effect.
    fn first_token(registry: &DeviceRegistry, id: &str) -> EffectToken {
        registry
            .with_device_mut(&DeviceId::try_from(id).unwrap(), |device| {
                device.playlist.effects()[0].token
            })
            .unwrap()
    }

    #[test]
    fn test_update_callback_resolves_owning_device() {
        let registry = DeviceRegistry::new();
        add_device(&registry, "long", 30, BitmapBounds::new(22, 6));
        add_device(&registry, "short", 10, BitmapBounds::new(22, 6));

        let mut session = SessionController::new(&registry, NullScheduler, NullPresenter);
        session.start_snake();

        let dispatcher = CallbackDispatcher::new(&registry);

        // The 30-lamp device renders a trail after clearing to black.
        let mut sink = ColorSink::default();
        assert!(dispatcher.update_requested(first_token(&registry, "long"), &mut sink));
        assert_eq!(sink.solid_fills, vec![color::BLACK]);
        assert_eq!(sink.indexed_writes.len(), SNAKE_TRAIL_LENGTH);

        // The 10-lamp device takes the solid fallback.
        let mut sink = ColorSink::default();
        assert!(dispatcher.update_requested(first_token(&registry, "short"), &mut sink));
        assert_eq!(sink.solid_fills, vec![color::HOT_PINK]);
        assert!(sink.indexed_writes.is_empty());
    }

    #[test]
    fn test_each_device_animates_independently() {
        let registry = DeviceRegistry::new();
        add_device(&registry, "a", 20, BitmapBounds::new(22, 6));
        add_device(&registry, "b", 20, BitmapBounds::new(22, 6));

        let mut session = SessionController::new(&registry, NullScheduler, NullPresenter);
        session.start_snake();

        let dispatcher = CallbackDispatcher::new(&registry);
        let token_a = first_token(&registry, "a");

        // Three callbacks for device a, none for device b.
        for _ in 0..3 {
            let mut sink = ColorSink::default();
            dispatcher.update_requested(token_a, &mut sink);
        }

        let head = |id: &str| {
            registry
                .with_device_mut(&DeviceId::try_from(id).unwrap(), |device| {
                    match &device.active {
                        lamparray_director::ActiveEffect::Snake(state) => state.head(),
                        _ => panic!("expected snake state"),
                    }
                })
                .unwrap()
        };
        assert_eq!(head("a"), 3);
        assert_eq!(head("b"), 0);
    }

    #[test]
    fn test_bitmap_callback_advances_canvas() {
        let registry = DeviceRegistry::new();
        add_device(&registry, "panel", 30, BitmapBounds::new(64, 64));

        let mut session = SessionController::new(&registry, NullScheduler, NullPresenter);
        session.start_generated_bitmap();

        let dispatcher = CallbackDispatcher::new(&registry);
        let token = first_token(&registry, "panel");
        let sink = FrameSink::default();

        assert!(dispatcher.bitmap_requested(token, &mut sink.clone()));
        assert!(dispatcher.bitmap_requested(token, &mut sink.clone()));

        let frames = sink.frames.borrow();
        assert_eq!(frames.len(), 2);
        assert_eq!((frames[0].0, frames[0].1), (64, 64));
        // The square moved between frames.
        assert_ne!(frames[0].2, frames[1].2);
    }

    #[test]
    fn test_stale_token_after_cleanup_is_harmless() {
        let registry = DeviceRegistry::new();
        add_device(&registry, "panel", 30, BitmapBounds::new(64, 64));

        let mut session = SessionController::new(&registry, NullScheduler, NullPresenter);
        session.start_generated_bitmap();
        let token = first_token(&registry, "panel");

        session.cleanup();

        let dispatcher = CallbackDispatcher::new(&registry);
        let sink = FrameSink::default();
        assert!(!dispatcher.bitmap_requested(token, &mut sink.clone()));
        assert!(sink.frames.borrow().is_empty());
    }

    #[test]
    fn test_removed_device_stops_resolving_mid_session() {
        let registry = DeviceRegistry::new();
        add_device(&registry, "gone", 30, BitmapBounds::new(22, 6));
        add_device(&registry, "stays", 30, BitmapBounds::new(22, 6));

        let mut session = SessionController::new(&registry, NullScheduler, NullPresenter);
        session.start_snake();
        let gone_token = first_token(&registry, "gone");
        let stays_token = first_token(&registry, "stays");

        registry.remove(&DeviceId::try_from("gone").unwrap());

        let dispatcher = CallbackDispatcher::new(&registry);
        let mut sink = ColorSink::default();
        assert!(!dispatcher.update_requested(gone_token, &mut sink));
        assert!(dispatcher.update_requested(stays_token, &mut sink));
    }

    #[test]
    fn test_image_effect_serves_same_frame_every_callback() {
        let registry = DeviceRegistry::new();
        add_device(&registry, "panel", 30, BitmapBounds::new(16, 8));

        let mut session = SessionController::new(&registry, NullScheduler, NullPresenter);
        struct Teal;
        impl lamparray_director::ImageSource for Teal {
            fn decode(
                &mut self,
                _uri: &str,
                frame: &mut PixelFrame,
            ) -> Result<(), lamparray_director::ImageError> {
                frame.clear(Rgb::new(0, 128, 128));
                Ok(())
            }
        }
        session.show_image("assets/lighting-2.jpg", &mut Teal);

        let dispatcher = CallbackDispatcher::new(&registry);
        let token = first_token(&registry, "panel");
        let sink = FrameSink::default();
        assert!(dispatcher.bitmap_requested(token, &mut sink.clone()));
        assert!(dispatcher.bitmap_requested(token, &mut sink.clone()));

        let frames = sink.frames.borrow();
        assert_eq!(frames[0].2, frames[1].2);
        assert_eq!(&frames[0].2[0..4], [128, 128, 0, 255]);
    }
}
