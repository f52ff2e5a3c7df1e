#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use gdvalue::{gdv, ErrorCode, GdvMap, GdvOrderedMap, GdvSet, Kind, ToGdv, Value};

#[test]
fn scalars() {
    assert!(gdv!(null).unwrap().is_null());
    assert_eq!(gdv!(true).unwrap(), Value::from(true));
    assert_eq!(gdv!(false).unwrap(), Value::from(false));
    assert_eq!(gdv!(42).unwrap(), Value::from(42));
    assert_eq!(gdv!("text").unwrap(), Value::from("text"));
}

#[test]
fn containers() {
    assert_eq!(gdv!([1, 2, 3]).unwrap().as_string(), "[1 2 3]");
    assert_eq!(gdv!([]).unwrap().as_string(), "[]");
    assert_eq!(gdv!((1, "a")).unwrap().as_string(), "(1 \"a\")");
    assert_eq!(gdv!((1,)).unwrap().as_string(), "(1)");
    assert_eq!(gdv!(()).unwrap().as_string(), "()");
    assert_eq!(gdv!({3, 1, 3}).unwrap().as_string(), "{1 3}");
    assert_eq!(gdv!({}).unwrap().kind(), Kind::Set);
    assert_eq!(gdv!({:}).unwrap().kind(), Kind::Map);
    assert_eq!(gdv!([:]).unwrap().kind(), Kind::OrderedMap);
}

#[test]
fn parentheses_group_without_a_comma() {
    assert_eq!(gdv!((7)).unwrap(), Value::from(7));
    assert_eq!(gdv!([(1 + 2), 4]).unwrap().as_string(), "[3 4]");
}

#[test]
fn maps() {
    let v = gdv!({ b: 2, a: 1, "s": true }).unwrap();
    assert_eq!(v.as_string(), "{a:1 b:2 \"s\":true}");

    let k = 10;
    let v = gdv!({ (k): "ten", (k + 1): "eleven" }).unwrap();
    assert_eq!(v.as_string(), "{10:\"ten\" 11:\"eleven\"}");

    let v = gdv!([z: 1, a: 2]).unwrap();
    assert_eq!(v.as_string(), "[z:1 a:2]");
}

#[test]
fn duplicate_key_is_an_error() {
    let err = gdv!({ a: 1, a: 2 }).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateMapKey);
    let err = gdv!([a: 1, a: 2]).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateMapKey);
}

#[test]
fn tagged_containers() {
    assert_eq!(
        gdv!(point{ x: 1, y: 2 }).unwrap().as_string(),
        "point{x:1 y:2}"
    );
    assert_eq!(gdv!(node[1, 2]).unwrap().as_string(), "node[1 2]");
    assert_eq!(gdv!(pair(1, 2)).unwrap().as_string(), "pair(1 2)");
    assert_eq!(gdv!(one(1)).unwrap().as_string(), "one(1)");
    assert_eq!(gdv!(s{1, 2}).unwrap().as_string(), "s{1 2}");
    assert_eq!(gdv!(om[k: 1]).unwrap().as_string(), "om[k:1]");
}

#[test]
fn nested_with_expressions() {
    let n = 3;
    let name = String::from("demo");
    let v = gdv!(cfg{
        name: name,
        sizes: [n, n + 1, { n * 2 }],
        inner: { on: true, off: null },
        pair: (n, "x"),
    })
    .unwrap();
    assert_eq!(
        v.as_string(),
        "cfg{inner:{off:null on:true} name:\"demo\" pair:(3 \"x\") sizes:[3 4 {6}]}"
    );
}

#[test]
fn host_values_convert() {
    let list = vec![1u8, 2];
    let mut table = BTreeMap::new();
    table.insert("k".to_owned(), Some(5i64));
    table.insert("n".to_owned(), None);
    let v = gdv!([list, table, 'c']).unwrap();
    assert_eq!(v.as_string(), "[[1 2] {\"k\":5 \"n\":null} \"c\"]");
}

#[test]
fn value_collections_convert_as_themselves() {
    let map = Value::read_from_str("{b:[1] a:{x}}").unwrap();
    let set = Value::read_from_str("{3 1}").unwrap();
    let ordered = Value::read_from_str("[z:1 a:2]").unwrap();

    let map_entries: GdvMap = map.map_get().unwrap().clone();
    let set_elements: GdvSet = set.set_get().unwrap().clone();
    let ordered_entries: GdvOrderedMap = ordered.ordered_map_get().unwrap().clone();

    assert_eq!(map_entries.to_gdv(), map);
    assert_eq!(set_elements.to_gdv(), set);
    assert_eq!(ordered_entries.to_gdv(), ordered);
    assert_eq!(
        gdv!([map_entries, set_elements, ordered_entries]).unwrap().as_string(),
        "[{a:{x} b:[1]} {1 3} [z:1 a:2]]"
    );
}
