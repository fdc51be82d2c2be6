//! Unit tests for ht-core.

// ── IDs ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ids {
    use crate::{NodeId, RequestId};

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(RequestId::default(), RequestId::INVALID);
    }

    #[test]
    fn index_roundtrip() {
        let n = NodeId(7);
        assert_eq!(n.index(), 7);
        assert_eq!(usize::from(n), 7);
    }

    #[test]
    fn ordering_follows_inner_value() {
        assert!(NodeId(1) < NodeId(2));
        assert!(RequestId(10) > RequestId(9));
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock {
    use std::time::Duration;

    use crate::SimClock;

    #[test]
    fn real_duration_scales_by_speed_factor() {
        let clock = SimClock::new(10.0);
        // 5 simulated seconds at 10× speed = 0.5 wall seconds.
        assert_eq!(clock.real_duration(5.0), Duration::from_millis(500));
    }

    #[test]
    fn real_duration_clamps_negative() {
        let clock = SimClock::new(10.0);
        assert_eq!(clock.real_duration(-3.0), Duration::ZERO);
    }

    #[test]
    fn invalid_speed_factor_falls_back_to_default() {
        assert_eq!(SimClock::new(0.0).speed_factor(), SimClock::DEFAULT_SPEED_FACTOR);
        assert_eq!(SimClock::new(-1.0).speed_factor(), SimClock::DEFAULT_SPEED_FACTOR);
        assert_eq!(SimClock::new(f64::NAN).speed_factor(), SimClock::DEFAULT_SPEED_FACTOR);
    }

    #[test]
    fn now_is_nondecreasing() {
        let clock = SimClock::new(100.0);
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

// ── RNG ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000), b.gen_range(0..1000));
        }
    }

    #[test]
    fn children_with_different_offsets_diverge() {
        let mut root_a = SimRng::new(7);
        let mut root_b = SimRng::new(7);
        let mut child_a = root_a.child(1);
        let mut child_b = root_b.child(2);
        let seq_a: Vec<u32> = (0..8).map(|_| child_a.gen_range(0..u32::MAX)).collect();
        let seq_b: Vec<u32> = (0..8).map(|_| child_b.gen_range(0..u32::MAX)).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn pick_two_distinct_bounds() {
        let mut rng = SimRng::new(1);
        assert!(rng.pick_two_distinct(0).is_none());
        assert!(rng.pick_two_distinct(1).is_none());
        for _ in 0..32 {
            let (a, b) = rng.pick_two_distinct(5).unwrap();
            assert_ne!(a, b);
            assert!(a < 5 && b < 5);
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}

// ── Transport kinds ───────────────────────────────────────────────────────────

#[cfg(test)]
mod transport {
    use crate::TransportKind;

    #[test]
    fn parse_roundtrip() {
        for kind in TransportKind::ALL {
            assert_eq!(kind.as_str().parse::<TransportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("gurney".parse::<TransportKind>().is_err());
    }
}
