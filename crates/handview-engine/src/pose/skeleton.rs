/// Number of keypoints in the hand model.
pub const HAND_KEYPOINTS: usize = 21;

/// Bone list of the 21-point hand model.
///
/// Index 0 is the wrist; each finger is four consecutive indices starting at the
/// thumb (1..=4) and ending at the pinky (17..=20).
pub const HAND_CONNECTIONS: [(usize, usize); 20] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (0, 9), (9, 10), (10, 11), (11, 12),
    (0, 13), (13, 14), (14, 15), (15, 16),
    (0, 17), (17, 18), (18, 19), (19, 20),
];

/// Yields the endpoints of every bone whose indices exist in `points`.
///
/// Partial keypoint sets are tolerated: bones referencing a missing index are skipped.
pub fn segments<P: Copy>(points: &[P]) -> impl Iterator<Item = (P, P)> + '_ {
    HAND_CONNECTIONS
        .iter()
        .filter_map(move |&(a, b)| Some((*points.get(a)?, *points.get(b)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint2;

    #[test]
    fn connections_cover_every_keypoint() {
        let mut seen = [false; HAND_KEYPOINTS];
        for &(a, b) in &HAND_CONNECTIONS {
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn every_finger_starts_at_wrist() {
        let roots: Vec<usize> = HAND_CONNECTIONS
            .iter()
            .filter(|(a, _)| *a == 0)
            .map(|(_, b)| *b)
            .collect();
        assert_eq!(roots, vec![1, 5, 9, 13, 17]);
    }

    #[test]
    fn full_hand_yields_all_segments() {
        let pts: Vec<Keypoint2> = (0..HAND_KEYPOINTS)
            .map(|i| Keypoint2::new(i as f32, 0.0))
            .collect();
        let segs: Vec<_> = segments(&pts).collect();
        assert_eq!(segs.len(), HAND_CONNECTIONS.len());
        assert_eq!(segs[0], (Keypoint2::new(0.0, 0.0), Keypoint2::new(1.0, 0.0)));
        assert_eq!(segs[19], (Keypoint2::new(19.0, 0.0), Keypoint2::new(20.0, 0.0)));
    }

    #[test]
    fn partial_hand_skips_missing_bones() {
        // Wrist + thumb only.
        let pts = [0u8, 1, 2, 3, 4];
        let segs: Vec<_> = segments(&pts).collect();
        assert_eq!(segs, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn empty_hand_yields_nothing() {
        let pts: [Keypoint2; 0] = [];
        assert_eq!(segments(&pts).count(), 0);
    }
}
