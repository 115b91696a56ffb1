// tests/property_test.rs

//! Property-based tests for the sorted-set engine: invariants that must
//! hold for arbitrary member/score workloads, on both encodings.

use bytes::Bytes;
use proptest::prelude::*;
use zircondb::core::storage::zset::{AddParams, SortedSet, ZsetLimits};

fn tiny_limits() -> ZsetLimits {
    ZsetLimits {
        max_packed_entries: 4,
        max_packed_value: 64,
    }
}

fn arb_ops() -> impl Strategy<Value = Vec<(bool, u8, f64)>> {
    // (insert-or-remove, member id, score); a small id space forces
    // collisions so updates and removals actually hit.
    prop::collection::vec(
        (any::<bool>(), 0u8..32, prop_oneof![-1000.0..1000.0f64, Just(0.0)]),
        1..120,
    )
}

fn apply_ops(set: &mut SortedSet, ops: &[(bool, u8, f64)]) -> std::collections::HashMap<u8, f64> {
    let mut model = std::collections::HashMap::new();
    for (insert, id, score) in ops {
        let member = Bytes::from(format!("member-{id}"));
        if *insert {
            set.add(*score, &member, &AddParams::default());
            model.insert(*id, *score);
        } else {
            set.remove(&member);
            model.remove(id);
        }
    }
    model
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn uniqueness_and_length(ops in arb_ops()) {
        for limits in [ZsetLimits::default(), tiny_limits()] {
            let mut set = SortedSet::new(limits);
            let model = apply_ops(&mut set, &ops);
            prop_assert_eq!(set.len(), model.len());
            for (id, score) in &model {
                let member = format!("member-{id}");
                prop_assert_eq!(set.score(member.as_bytes()), Some(*score));
            }
        }
    }

    #[test]
    fn iteration_is_totally_ordered(ops in arb_ops()) {
        for limits in [ZsetLimits::default(), tiny_limits()] {
            let mut set = SortedSet::new(limits);
            apply_ops(&mut set, &ops);
            let entries = set.entries();
            for pair in entries.windows(2) {
                let (ref m1, s1) = pair[0];
                let (ref m2, s2) = pair[1];
                prop_assert!(
                    s1 < s2 || (s1 == s2 && m1 < m2),
                    "entries out of order: ({m1:?},{s1}) then ({m2:?},{s2})"
                );
            }
        }
    }

    #[test]
    fn rank_is_a_bijection(ops in arb_ops()) {
        for limits in [ZsetLimits::default(), tiny_limits()] {
            let mut set = SortedSet::new(limits);
            apply_ops(&mut set, &ops);
            let entries = set.entries();
            for (expected_rank, (member, _)) in entries.iter().enumerate() {
                prop_assert_eq!(set.rank(member, false), Some(expected_rank));
                prop_assert_eq!(
                    set.rank(member, true),
                    Some(entries.len() - 1 - expected_rank)
                );
            }
        }
    }

    #[test]
    fn both_encodings_agree(ops in arb_ops()) {
        let mut packed = SortedSet::new(ZsetLimits::default());
        let mut indexed = SortedSet::new(ZsetLimits {
            max_packed_entries: 0,
            max_packed_value: 64,
        });
        apply_ops(&mut packed, &ops);
        apply_ops(&mut indexed, &ops);
        prop_assert_eq!(packed.entries(), indexed.entries());
    }

    #[test]
    fn codec_round_trips(ops in arb_ops()) {
        let mut set = SortedSet::new(tiny_limits());
        apply_ops(&mut set, &ops);
        let mut buf = Vec::new();
        set.encode(&mut buf);
        let decoded = SortedSet::decode(&buf, tiny_limits()).expect("valid payload");
        prop_assert_eq!(decoded.entries(), set.entries());
    }
}
