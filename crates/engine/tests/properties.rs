//! Property-based tests for the equivalence laws of the comparison core.

use proptest::prelude::*;
use verity_engine::{deep_equal, inspect, same_elements, strict_equal, Options};

proptest! {
    #[test]
    fn strict_equality_is_reflexive_for_integers(x in any::<i64>()) {
        prop_assert!(strict_equal(&inspect(&x), &inspect(&x)).unwrap().is_equal());
    }

    #[test]
    fn deep_equality_is_reflexive(xs in prop::collection::vec(any::<(i32, String)>(), 0..8)) {
        let v = inspect(&xs);
        prop_assert!(deep_equal(&v, &v, &Options::default()).is_equal());
    }

    #[test]
    fn deep_equality_is_symmetric(
        xs in prop::collection::vec(0u8..4, 0..6),
        ys in prop::collection::vec(0u8..4, 0..6),
    ) {
        let (a, b) = (inspect(&xs), inspect(&ys));
        let ab = deep_equal(&a, &b, &Options::default());
        let ba = deep_equal(&b, &a, &Options::default());
        prop_assert_eq!(ab.is_equal(), ba.is_equal());
        prop_assert_eq!(ab.is_equal(), xs == ys);
    }

    #[test]
    fn judgment_has_diff_iff_not_equal(
        xs in prop::collection::vec(any::<i16>(), 0..6),
        ys in prop::collection::vec(any::<i16>(), 0..6),
    ) {
        let j = deep_equal(&inspect(&xs), &inspect(&ys), &Options::default());
        prop_assert_eq!(j.is_equal(), j.diff().is_none());
        if let Some(diff) = j.diff() {
            prop_assert!(!diff.differences().is_empty());
        }
    }

    #[test]
    fn same_elements_matches_sorted_equality(
        xs in prop::collection::vec(0u8..5, 0..8),
        ys in prop::collection::vec(0u8..5, 0..8),
    ) {
        let (mut sx, mut sy) = (xs.clone(), ys.clone());
        sx.sort_unstable();
        sy.sort_unstable();
        let j = same_elements(&inspect(&xs), &inspect(&ys)).unwrap();
        prop_assert_eq!(j.is_equal(), sx == sy);
    }

    #[test]
    fn same_elements_ignores_permutation(xs in prop::collection::vec(any::<u32>(), 0..8)) {
        let mut rev = xs.clone();
        rev.reverse();
        prop_assert!(same_elements(&inspect(&xs), &inspect(&rev)).unwrap().is_equal());
    }
}
