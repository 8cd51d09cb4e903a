mod tests {
    use lamparray_director::color::{self, Rgb};
    use lamparray_director::dispatch::LampColorSink;
    use lamparray_director::snake::{
        SNAKE_TRAIL_LENGTH, SnakeState, positions_behind_head, scaled_trail_colors,
    };

    #[derive(Default)]
    struct RecordingSink {
        solid_fills: Vec<Rgb>,
        indexed_writes: Vec<(u16, Rgb)>,
    }

    impl LampColorSink for RecordingSink {
        fn set_color(&mut self, color: Rgb) {
            self.solid_fills.push(color);
        }

        fn set_colors_for_indices(&mut self, colors: &[Rgb], indices: &[u16]) {
            for (color, index) in colors.iter().zip(indices) {
                self.indexed_writes.push((*index, *color));
            }
        }
    }

    #[test]
    fn test_positions_wrap_backward_from_head() {
        let mut positions = [0u16; SNAKE_TRAIL_LENGTH];
        positions_behind_head(3, 20, &mut positions);
        assert_eq!(
            positions,
            [2, 1, 0, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8]
        );
    }

    #[test]
    fn test_positions_at_head_zero() {
        let mut positions = [0u16; SNAKE_TRAIL_LENGTH];
        positions_behind_head(0, 20, &mut positions);
        assert_eq!(positions[0], 19);
        assert_eq!(positions[SNAKE_TRAIL_LENGTH - 1], 5);
    }

    #[test]
    fn test_positions_at_maximum_lamp_count() {
        // head + lamp_count approaches the u16 limit; the index math must
        // not overflow.
        let mut positions = [0u16; SNAKE_TRAIL_LENGTH];
        positions_behind_head(0, u16::MAX, &mut positions);
        assert_eq!(positions[0], u16::MAX - 1);
        assert_eq!(positions[SNAKE_TRAIL_LENGTH - 1], u16::MAX - 15);

        positions_behind_head(u16::MAX - 1, u16::MAX, &mut positions);
        assert_eq!(positions[0], u16::MAX - 2);
    }

    #[test]
    fn test_trail_colors_fade_monotonically() {
        let mut colors = [color::BLACK; SNAKE_TRAIL_LENGTH];
        scaled_trail_colors(Rgb::new(255, 105, 180), &mut colors);

        // Position 0 carries the unscaled base color.
        assert_eq!(colors[0], Rgb::new(255, 105, 180));
        // Tail factor is 1/N.
        assert_eq!(colors[SNAKE_TRAIL_LENGTH - 1].r, 255 / 15);

        for pair in colors.windows(2) {
            assert!(pair[1].r <= pair[0].r);
            assert!(pair[1].g <= pair[0].g);
            assert!(pair[1].b <= pair[0].b);
        }
    }

    #[test]
    fn test_render_clears_before_trail() {
        let mut state = SnakeState::new(color::HOT_PINK);
        let mut sink = RecordingSink::default();
        state.render_frame(20, &mut sink);

        // One full clear to black, then exactly one trail's worth of writes.
        assert_eq!(sink.solid_fills, vec![color::BLACK]);
        assert_eq!(sink.indexed_writes.len(), SNAKE_TRAIL_LENGTH);
        assert_eq!(sink.indexed_writes[0], (19, color::HOT_PINK));
    }

    #[test]
    fn test_head_advances_and_wraps() {
        let mut state = SnakeState::new(color::HOT_PINK);
        let mut sink = RecordingSink::default();
        for _ in 0..20 {
            state.render_frame(20, &mut sink);
            assert!(state.head() < 20);
        }
        // 20 frames on 20 lamps brings the head back to the start.
        assert_eq!(state.head(), 0);
    }

    #[test]
    fn test_short_device_takes_solid_fallback() {
        // 10 lamps cannot hold a 15-lamp trail: uniform color, no index math.
        let mut state = SnakeState::new(color::HOT_PINK);
        let mut sink = RecordingSink::default();
        state.render_frame(10, &mut sink);

        assert_eq!(sink.solid_fills, vec![color::HOT_PINK]);
        assert!(sink.indexed_writes.is_empty());
        assert_eq!(state.head(), 0);
    }
}
