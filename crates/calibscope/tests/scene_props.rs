//! Property tests for camera pairing and pair coloring.

use calibscope::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn ring_pairs_cover_every_camera(n in 3usize..40) {
        let pairs = ring_pairs(n);
        prop_assert_eq!(pairs.len(), n);
        for (i, pair) in pairs.iter().enumerate() {
            prop_assert!(pair.first < pair.second);
            prop_assert!(pair.second < n);
            prop_assert!(!pairs[i + 1..].contains(pair));
        }
        for camera in 0..n {
            let degree = pairs
                .iter()
                .filter(|p| p.first == camera || p.second == camera)
                .count();
            prop_assert_eq!(degree, 2);
        }
    }

    #[test]
    fn pair_colors_cycle(index in 0usize..1000) {
        let options = Options::default();
        prop_assert_eq!(options.pair_color(index), options.pair_color(index % 6));
    }
}
