#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};

use gdvalue::{gdv_to, ErrorCode, GdvParser, Kind, NavStep, Symbol, Value};

fn doc() -> Value {
    Value::read_from_str(
        r#"config{
            name:"demo"
            items:[1 "two" 3]
            limits:[low:1 high:0x10000000000000000]
            pair:(7 x)
            flags:{a b}
            1:one
        }"#,
    )
    .unwrap()
}

#[test]
fn path_strings() {
    let v = doc();
    let p = GdvParser::new(&v);
    assert_eq!(p.path_string(), "<top>");
    let item = p
        .map_get_value_at_sym("items")
        .unwrap()
        .sequence_get_value_at(1)
        .unwrap();
    assert_eq!(item.path_string(), "<top>.items[1]");
    assert_eq!(item.value(), &Value::from("two"));
    assert_eq!(item.top_level(), &v);
    assert_eq!(item.path().len(), 2);
    assert!(matches!(item.path()[1], NavStep::Index(1)));

    let one = p.map_get_value_at(&Value::from(1)).unwrap();
    assert_eq!(one.path_string(), "<top>.1");
    let key = p.map_get_key_at(&Value::symbol("name")).unwrap();
    assert_eq!(key.path_string(), "<top>@name");
}

#[test]
fn large_integer_keys_print_in_decimal() {
    let v = Value::read_from_str("{0x10000000000000000:x}").unwrap();
    let p = GdvParser::new(&v);
    let x = p
        .map_get_value_at(&Value::from(u128::from(u64::MAX) + 1))
        .unwrap();
    assert_eq!(x.path_string(), "<top>.18446744073709551616");
}

#[test]
fn wrong_kind_names_the_path() {
    let v = doc();
    let p = GdvParser::new(&v);
    let err = p
        .map_get_value_at_sym("items")
        .unwrap()
        .sequence_get_value_at(1)
        .unwrap()
        .integer_get()
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::WrongKind);
    assert_eq!(
        err.to_string(),
        "At GDV path <top>.items[1]: expected integer, not string"
    );
}

#[test]
fn missing_key() {
    let v = doc();
    let err = GdvParser::new(&v).map_get_value_at_sym("nope").unwrap_err();
    assert_eq!(err.code, ErrorCode::KeyNotFound);
    assert_eq!(
        err.to_string(),
        "At GDV path <top>: expected map to have key nope, but it does not"
    );
    assert!(GdvParser::new(&v)
        .map_get_value_at_sym_opt("nope")
        .unwrap()
        .is_none());
}

#[test]
fn index_out_of_range() {
    let v = doc();
    let err = GdvParser::new(&v)
        .map_get_value_at_sym("items")
        .unwrap()
        .sequence_get_value_at(5)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::IndexOutOfRange);
    assert_eq!(
        err.to_string(),
        "At GDV path <top>.items: expected sequence to have element at index 5, but it only has 3 elements"
    );
}

#[test]
fn ordered_maps_and_sets() {
    let v = doc();
    let p = GdvParser::new(&v);
    let limits = p.map_get_value_at_sym("limits").unwrap();
    assert_eq!(
        limits.ordered_map_get_value_at_sym("low").unwrap().small_integer_get().unwrap(),
        1
    );
    let high = limits.ordered_map_get_value_at_sym("high").unwrap();
    assert_eq!(high.kind(), Kind::Integer);
    assert_eq!(high.small_integer_get().unwrap_err().code, ErrorCode::WrongKind);
    let keys: Vec<String> = limits
        .entries()
        .unwrap()
        .iter()
        .map(|(k, _)| k.value_gdvn())
        .collect();
    assert_eq!(keys, ["low", "high"]);

    let flags = p.map_get_value_at_sym("flags").unwrap();
    assert!(flags.set_contains(&Value::symbol("a")).unwrap());
    assert_eq!(
        flags.set_get_value(&Value::symbol("b")).unwrap().path_string(),
        "<top>.flags@b"
    );
    assert_eq!(
        flags.set_get_value(&Value::symbol("c")).unwrap_err().code,
        ErrorCode::KeyNotFound
    );
}

#[test]
fn tags() {
    let v = doc();
    let p = GdvParser::new(&v);
    assert_eq!(p.tagged_container_get_tag().unwrap(), Symbol::intern("config"));
    p.check_tagged_map_tag("config").unwrap();
    let err = p.check_container_tag("other").unwrap_err();
    assert_eq!(
        err.to_string(),
        "At GDV path <top>: expected container to have tag other, but it instead has tag config"
    );
    let items = p.map_get_value_at_sym("items").unwrap();
    assert_eq!(
        items.check_tagged_map_tag("x").unwrap_err().to_string(),
        "At GDV path <top>.items: expected tagged map, not sequence"
    );
}

#[test]
fn from_gdv_scalars() {
    assert_eq!(gdv_to::<i32>(&Value::from(-5)).unwrap(), -5);
    assert!(gdv_to::<bool>(&Value::from(true)).unwrap());
    assert_eq!(
        gdv_to::<String>(&Value::from("s")).unwrap(),
        "s".to_owned()
    );
    assert_eq!(
        gdv_to::<Symbol>(&Value::symbol("s")).unwrap(),
        Symbol::intern("s")
    );
    assert_eq!(gdv_to::<Option<u8>>(&Value::null()).unwrap(), None);
    assert_eq!(gdv_to::<Option<u8>>(&Value::from(3)).unwrap(), Some(3));
}

#[test]
fn from_gdv_errors() {
    let err = gdv_to::<u8>(&Value::from(300)).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conversion);
    assert_eq!(
        err.to_string(),
        "At GDV path <top>: number too large to represent as `u8`: 300"
    );

    let err = gdv_to::<bool>(&Value::symbol("maybe")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "At GDV path <top>: expected symbol `true` or `false`, not maybe"
    );

    let err = gdv_to::<String>(&Value::from(b"\xFF".as_slice())).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conversion);
}

#[test]
fn from_gdv_collections() {
    let v = Value::read_from_str("[1 2 3]").unwrap();
    assert_eq!(gdv_to::<Vec<u8>>(&v).unwrap(), vec![1, 2, 3]);

    let s = Value::read_from_str("{3 1}").unwrap();
    assert_eq!(
        gdv_to::<BTreeSet<i64>>(&s).unwrap(),
        BTreeSet::from([1, 3])
    );

    let m = Value::read_from_str(r#"{"a":1 "b":2}"#).unwrap();
    let map = gdv_to::<BTreeMap<String, u32>>(&m).unwrap();
    assert_eq!(map["b"], 2);

    let t = Value::read_from_str("(1 \"x\")").unwrap();
    assert_eq!(
        gdv_to::<(i64, String)>(&t).unwrap(),
        (1, "x".to_owned())
    );
    let err = gdv_to::<(i64,)>(&t).unwrap_err();
    assert_eq!(
        err.to_string(),
        "At GDV path <top>: expected tuple of 1 elements, not 2"
    );
}

#[test]
fn nested_conversion_error_has_full_path() {
    let v = Value::read_from_str("[[1 2] [3 x]]").unwrap();
    let err = gdv_to::<Vec<Vec<i32>>>(&v).unwrap_err();
    assert_eq!(
        err.to_string(),
        "At GDV path <top>[1][1]: expected integer, not symbol"
    );
}
