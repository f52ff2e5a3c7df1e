#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cmp::Ordering;

use gdvalue::{
    gdv_compare, ErrorCode, ErrorDetail, GdvInteger, GdvMap, GdvOrderedMap, Kind, Symbol, Value,
};

fn int(n: i64) -> Value {
    Value::from(n)
}

#[test]
fn default_value_is_null() {
    let v = Value::default();
    assert!(v.is_null());
    assert!(v.is_symbol());
    assert_eq!(v.kind(), Kind::Symbol);
    assert_eq!(v, Value::null());
}

#[test]
fn well_known_symbols_are_preinterned() {
    assert_eq!(Symbol::intern("null"), Symbol::NULL);
    assert_eq!(Symbol::intern("false"), Symbol::FALSE);
    assert_eq!(Symbol::intern("true"), Symbol::TRUE);
    assert_eq!(Value::symbol("true"), Value::from(true));
    assert!(Value::from(false).is_bool());
    assert!(!Value::symbol("maybe").is_bool());
}

#[test]
fn interning_is_idempotent() {
    let a = Symbol::intern("interning_is_idempotent");
    let b = Symbol::intern(String::from("interning_is_idempotent"));
    assert_eq!(a, b);
    assert_eq!(a.index(), b.index());
    assert_eq!(Symbol::lookup("interning_is_idempotent"), Some(a));
    assert_eq!(Symbol::from_index(a.index()), Some(a));
    assert_eq!(a.as_str(), Some("interning_is_idempotent"));
}

#[test]
fn kinds_distinguish_tags_and_integer_size() {
    assert_eq!(int(5).kind(), Kind::SmallInteger);
    assert_eq!(int(5).super_kind(), Kind::Integer);
    let big = Value::from(u64::MAX);
    assert_eq!(big.kind(), Kind::Integer);
    assert!(!big.is_small_integer());

    let t = Symbol::intern("t");
    assert_eq!(Value::sequence(vec![]).kind(), Kind::Sequence);
    assert_eq!(Value::tagged_sequence(t, vec![]).kind(), Kind::TaggedSequence);
    assert_eq!(Value::tagged_tuple(t, vec![]).kind(), Kind::TaggedTuple);
    assert_eq!(Value::tagged_set(t, []).kind(), Kind::TaggedSet);
    assert_eq!(Value::tagged_map(t, GdvMap::new()).kind(), Kind::TaggedMap);
    assert_eq!(
        Value::tagged_ordered_map(t, GdvOrderedMap::new()).kind(),
        Kind::TaggedOrderedMap
    );
    // An explicit null tag is the same as no tag.
    assert_eq!(Value::tagged_tuple(Symbol::NULL, vec![]).kind(), Kind::Tuple);
}

#[test]
fn kind_names() {
    assert_eq!(Kind::TaggedOrderedMap.name(), "TAGGED_ORDERED_MAP");
    assert_eq!(Kind::TaggedOrderedMap.common_name(), "tagged ordered map");
    assert_eq!(Kind::SmallInteger.super_kind(), Kind::Integer);
    assert_eq!(Kind::TaggedSet.untagged(), Kind::Set);
    assert_eq!(Kind::Map.tagged(), Kind::TaggedMap);
    assert!(Kind::Tuple.is_container());
    assert!(!Kind::String.is_container());
    assert!(Kind::TaggedSequence.is_tagged());
}

#[test]
fn new_of_kind_is_empty() {
    for kind in Kind::ALL {
        let v = Value::new_of_kind(kind);
        if kind.is_container() {
            assert!(v.is_empty(), "{kind:?}");
            assert_eq!(v.kind().untagged(), kind.untagged());
        }
    }
}

#[test]
fn accessors_reject_wrong_kind() {
    let v = Value::from("text");
    let err = v.small_integer_get().unwrap_err();
    assert_eq!(err.code, ErrorCode::WrongKind);
    assert_eq!(
        err.detail,
        ErrorDetail::WrongKind {
            expected: Kind::SmallInteger,
            actual: Kind::String,
        }
    );
    assert_eq!(
        Value::from(3).sequence_get().unwrap_err().to_string(),
        "expected sequence, not small integer"
    );
    assert_eq!(v.container_tag().unwrap_err().code, ErrorCode::WrongKind);
}

#[test]
fn scalar_setters_change_kind() {
    let mut v = Value::null();
    v.integer_set(7);
    assert_eq!(v.small_integer_get().unwrap(), 7);
    v.string_set("x");
    assert_eq!(v.string_get().unwrap(), "x");
    v.bool_set(true);
    assert!(v.bool_get().unwrap());
    v.symbol_set(Symbol::intern("s"));
    assert_eq!(v.symbol_name().unwrap(), b"s");
}

#[test]
fn sequence_operations() {
    let mut v = Value::sequence(vec![int(1)]);
    v.sequence_append(2).unwrap();
    v.sequence_append("three").unwrap();
    assert_eq!(v.size(), 3);
    assert_eq!(v.sequence_get_value_at(2).unwrap(), &Value::from("three"));

    v.sequence_set_value_at(0, 10).unwrap();
    assert_eq!(v.sequence_get_value_at(0).unwrap(), &int(10));

    let err = v.sequence_get_value_at(3).unwrap_err();
    assert_eq!(err.code, ErrorCode::IndexOutOfRange);

    v.sequence_resize(5).unwrap();
    assert_eq!(v.size(), 5);
    assert!(v.sequence_get_value_at(4).unwrap().is_null());

    v.sequence_clear().unwrap();
    assert!(v.is_empty());
}

#[test]
fn set_value_at_grows_with_nulls_and_rejects_overflow() {
    let mut v = Value::tuple(vec![]);
    v.tuple_set_value_at(2, 7).unwrap();
    assert_eq!(v.as_string(), "(null null 7)");

    let err = v.tuple_set_value_at(usize::MAX, 1).unwrap_err();
    assert_eq!(err.code, ErrorCode::IndexOutOfRange);
    assert_eq!(v.size(), 3);
    let err = Value::sequence(vec![]).sequence_set_value_at(usize::MAX, 1).unwrap_err();
    assert_eq!(err.code, ErrorCode::IndexOutOfRange);
}

#[test]
fn tagged_containers_share_accessors() {
    let mut v = Value::tagged_tuple(Symbol::intern("pair"), vec![int(1), int(2)]);
    assert_eq!(v.tuple_get().unwrap().len(), 2);
    assert_eq!(v.container_tag().unwrap(), Symbol::intern("pair"));
    v.container_set_tag(Symbol::NULL).unwrap();
    assert_eq!(v.kind(), Kind::Tuple);
    assert!(!v.is_tagged_container());
}

#[test]
fn set_operations_deduplicate() {
    let mut v = Value::set([int(3), int(1), int(3)]);
    assert_eq!(v.size(), 2);
    assert!(v.set_insert(2).unwrap());
    assert!(!v.set_insert(2).unwrap());
    assert!(v.set_contains(&int(1)).unwrap());
    assert!(v.set_remove(&int(1)).unwrap());
    assert!(!v.set_contains(&int(1)).unwrap());
    let elems: Vec<_> = v.set_get().unwrap().iter().cloned().collect();
    assert_eq!(elems, vec![int(2), int(3)]);
}

#[test]
fn map_operations() {
    let mut v = Value::map(GdvMap::new());
    v.map_set_value_at(Value::from("b"), 2).unwrap();
    v.map_set_value_at_sym("a", 1).unwrap();
    assert_eq!(v.map_get_value_at_sym("a").unwrap(), &int(1));
    assert_eq!(v.map_get_value_at(&Value::from("b")).unwrap(), &int(2));
    assert!(v.map_get_value_at_opt(&Value::from("zz")).unwrap().is_none());
    assert_eq!(
        v.map_get_value_at_sym("zz").unwrap_err().code,
        ErrorCode::KeyNotFound
    );
    assert!(v.map_contains_sym("a").unwrap());
    assert!(v.map_remove_key_sym("a").unwrap());
    assert!(!v.map_remove_key_sym("a").unwrap());
    assert_eq!(v.size(), 1);
}

#[test]
fn ordered_map_keeps_insertion_order() {
    let v = Value::ordered_map_from_entries([
        (Value::symbol("z"), int(1)),
        (Value::symbol("a"), int(2)),
    ])
    .unwrap();
    let keys: Vec<_> = v.ordered_map_get().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec![Value::symbol("z"), Value::symbol("a")]);
    assert_eq!(v.as_string(), "[z:1 a:2]");
}

#[test]
fn duplicate_entries_are_rejected() {
    let err = Value::map_from_entries([(int(1), int(1)), (int(1), int(2))]).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateMapKey);
    assert_eq!(err.to_string(), "Duplicate map key: 1");

    let err = Value::ordered_map_from_entries([
        (Value::symbol("k"), int(1)),
        (Value::symbol("k"), int(2)),
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "Duplicate ordered map key: k");
}

#[test]
fn clone_is_deep() {
    let original = Value::sequence(vec![Value::sequence(vec![int(1)])]);
    let mut copy = original.clone();
    copy.sequence_get_value_at_mut(0)
        .unwrap()
        .sequence_append(2)
        .unwrap();
    assert_eq!(original.as_string(), "[[1]]");
    assert_eq!(copy.as_string(), "[[1 2]]");
}

#[test]
fn cross_kind_order() {
    let ordered = [
        Value::null(),
        Value::from(false),
        Value::from(true),
        Value::symbol("a"),
        Value::from(i128::MIN),
        int(-1),
        int(0),
        Value::from(u128::MAX),
        Value::from(""),
        Value::from("a"),
        Value::sequence(vec![]),
        Value::tuple(vec![]),
        Value::set([]),
        Value::map(GdvMap::new()),
        Value::ordered_map(GdvOrderedMap::new()),
    ];
    for pair in ordered.windows(2) {
        assert_eq!(
            gdv_compare(&pair[0], &pair[1]),
            Ordering::Less,
            "{} < {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn tags_compare_before_contents() {
    let untagged = Value::sequence(vec![int(9)]);
    let tagged = Value::tagged_sequence(Symbol::intern("a"), vec![int(1)]);
    assert!(untagged < tagged);
    let a = Value::tagged_sequence(Symbol::intern("a"), vec![int(2)]);
    assert!(tagged < a);
}

#[test]
fn sequences_compare_lexicographically() {
    let short = Value::sequence(vec![int(1)]);
    let long = Value::sequence(vec![int(1), int(0)]);
    let bigger = Value::sequence(vec![int(2)]);
    assert!(short < long);
    assert!(long < bigger);
}

#[test]
fn equal_values_hash_equal() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    let a = Value::from(GdvInteger::from_digits("0x10").unwrap());
    let b = Value::from(16);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn self_check_accepts_constructed_values() {
    let v = Value::read_from_str("m{a:[1 {2 3}] b:(x y) c:[k:0x10000000000000000]}").unwrap();
    v.self_check().unwrap();
}

#[test]
fn from_conversions() {
    assert_eq!(Value::from(vec![int(1)]).as_string(), "[1]");
    assert_eq!(Value::from(b"\xFF".as_slice()).kind(), Kind::String);
    assert!(Value::from(b"\xFF".to_vec()).string_get().unwrap().as_str().is_none());
    assert_eq!(Value::from(Symbol::intern("s")).as_string(), "s");
    assert_eq!(Value::from(String::from("s")).as_string(), "\"s\"");
}
