// Property-based tests for GDVN round trips, layout and value ordering.
//
// Trees are kept small so the suite stays fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cmp::Ordering;

use proptest::prelude::*;

use gdvalue::{gdv_compare, GdvMap, GdvOrderedMap, Symbol, Value, WriteOptions};

fn arb_symbol_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Za-z_][A-Za-z0-9_]{0,6}",
        1 => any::<String>(),
    ]
}

fn arb_tag() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        2 => Just(Symbol::NULL),
        1 => arb_symbol_name().prop_map(Symbol::intern),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::from),
        arb_symbol_name().prop_map(Value::symbol),
        any::<i64>().prop_map(Value::from),
        any::<i128>().prop_map(Value::from),
        any::<String>().prop_map(Value::from),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        let elems = proptest::collection::vec(inner.clone(), 0..6);
        let pairs = proptest::collection::vec((inner.clone(), inner), 0..6);
        prop_oneof![
            (arb_tag(), elems.clone()).prop_map(|(t, e)| Value::tagged_sequence(t, e)),
            (arb_tag(), elems.clone()).prop_map(|(t, e)| Value::tagged_tuple(t, e)),
            (arb_tag(), elems).prop_map(|(t, e)| Value::tagged_set(t, e)),
            (arb_tag(), pairs.clone()).prop_map(|(t, kvs)| {
                Value::tagged_map(t, kvs.into_iter().collect::<GdvMap>())
            }),
            (arb_tag(), pairs).prop_map(|(t, kvs)| {
                Value::tagged_ordered_map(t, kvs.into_iter().collect::<GdvOrderedMap>())
            }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn compact_output_reads_back(v in arb_value()) {
        let bytes = v.to_gdvn_bytes(&WriteOptions::default());
        prop_assert!(!bytes.contains(&b'\n'));
        let back = Value::read_from_bytes(&bytes).unwrap();
        back.self_check().unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn indented_output_reads_back(v in arb_value(), width in 0usize..=80) {
        let opts = WriteOptions::indented().with_target_line_width(width);
        let bytes = v.to_gdvn_bytes(&opts);
        let back = Value::read_from_bytes(&bytes).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn line_count_is_monotone_in_width(v in arb_value(), a in 0usize..=80, b in 0usize..=80) {
        let (narrow, wide) = if a <= b { (a, b) } else { (b, a) };
        let lines = |width: usize| {
            v.as_string_with(&WriteOptions::indented().with_target_line_width(width))
                .lines()
                .count()
        };
        prop_assert!(lines(wide) <= lines(narrow), "widths {} and {}", narrow, wide);
    }

    #[test]
    fn wide_indented_output_is_compact(v in arb_value()) {
        let wide = WriteOptions::indented().with_target_line_width(1_000_000);
        prop_assert_eq!(
            v.to_gdvn_bytes(&wide),
            v.to_gdvn_bytes(&WriteOptions::default())
        );
    }

    #[test]
    fn compact_output_is_a_fixed_point(v in arb_value()) {
        let once = v.to_gdvn_bytes(&WriteOptions::default());
        let twice = Value::read_from_bytes(&once)
            .unwrap()
            .to_gdvn_bytes(&WriteOptions::default());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn compare_is_antisymmetric(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(gdv_compare(&a, &b), gdv_compare(&b, &a).reverse());
        prop_assert_eq!(gdv_compare(&a, &a), Ordering::Equal);
        prop_assert_eq!(gdv_compare(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn sorting_is_consistent(mut values in proptest::collection::vec(arb_value(), 0..12)) {
        values.sort();
        for pair in values.windows(2) {
            prop_assert_ne!(gdv_compare(&pair[0], &pair[1]), Ordering::Greater);
        }
        for (i, a) in values.iter().enumerate() {
            for b in &values[i..] {
                prop_assert_ne!(gdv_compare(a, b), Ordering::Greater);
            }
        }
    }

    #[test]
    fn clone_is_equal_and_independent(v in arb_value()) {
        let mut copy = v.clone();
        prop_assert_eq!(&copy, &v);
        if copy.is_container() {
            copy.container_set_tag(Symbol::intern("__changed__")).unwrap();
            prop_assert_eq!(
                v.container_tag().unwrap() == Symbol::intern("__changed__"),
                copy == v
            );
        }
    }
}
