#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gdvalue::{from_gdvn_str, from_value, to_gdvn_string, to_value, ErrorCode, Value};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
    age: u32,
    tags: Vec<String>,
    nick: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Event {
    Start,
    Code(u8),
    Move(i32, i32),
    Named { id: u64 },
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Meters(u32);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Span(u32, u32);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Nothing;

#[test]
fn struct_becomes_tagged_map() {
    let p = Person {
        name: "Ann".to_owned(),
        age: 30,
        tags: vec!["a".to_owned()],
        nick: None,
    };
    let text = to_gdvn_string(&p).unwrap();
    assert_eq!(text, r#"Person{age:30 name:"Ann" nick:null tags:["a"]}"#);
    assert_eq!(from_gdvn_str::<Person>(&text).unwrap(), p);
}

#[test]
fn missing_option_field_is_none() {
    let p: Person = from_gdvn_str(r#"Person{name:"B" age:1 tags:[]}"#).unwrap();
    assert_eq!(p.nick, None);
}

#[test]
fn type_mismatch_is_a_conversion_error() {
    let err = from_gdvn_str::<Person>("Person{name:1 age:1 tags:[]}").unwrap_err();
    assert_eq!(err.code, ErrorCode::Conversion);
}

#[test]
fn syntax_errors_pass_through() {
    let err = from_gdvn_str::<Person>("Person{").unwrap_err();
    assert_eq!(err.code, ErrorCode::Syntax);
}

#[test]
fn enum_variants() {
    let cases = [
        (Event::Start, "Start"),
        (Event::Code(7), "Code(7)"),
        (Event::Move(-1, 2), "Move(-1 2)"),
        (Event::Named { id: 9 }, "Named{id:9}"),
    ];
    for (event, text) in cases {
        assert_eq!(to_gdvn_string(&event).unwrap(), text);
        assert_eq!(from_gdvn_str::<Event>(text).unwrap(), event);
    }
}

#[test]
fn struct_shapes() {
    assert_eq!(to_gdvn_string(&Meters(5)).unwrap(), "5");
    assert_eq!(to_gdvn_string(&Span(1, 2)).unwrap(), "Span(1 2)");
    assert_eq!(to_gdvn_string(&Nothing).unwrap(), "null");
    assert_eq!(to_gdvn_string(&(1u8, "x")).unwrap(), "(1 \"x\")");

    assert_eq!(from_gdvn_str::<Meters>("5").unwrap(), Meters(5));
    assert_eq!(from_gdvn_str::<Span>("Span(1 2)").unwrap(), Span(1, 2));
    assert_eq!(from_gdvn_str::<Nothing>("null").unwrap(), Nothing);
}

#[test]
fn maps_and_wide_integers() {
    let mut m = BTreeMap::new();
    m.insert("b".to_owned(), u128::MAX);
    m.insert("a".to_owned(), 0);
    let v = to_value(&m).unwrap();
    assert_eq!(
        v.as_string(),
        r#"{"a":0 "b":0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF}"#
    );
    let back: BTreeMap<String, u128> = from_value(&v).unwrap();
    assert_eq!(back, m);
}

#[test]
fn floats_are_rejected() {
    let err = to_value(&1.5f64).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conversion);
    assert_eq!(err.to_string(), "floating-point numbers are not supported");
}

#[test]
fn value_serializes_through_serde() {
    let v = Value::read_from_str("[1 true null x \"s\"]").unwrap();
    // Symbols other than null and the booleans become strings.
    assert_eq!(to_value(&v).unwrap().as_string(), r#"[1 true null "x" "s"]"#);

    let plain = Value::read_from_str(r#"{"k":[1 null]}"#).unwrap();
    let back: Value = from_value(&plain).unwrap();
    assert_eq!(back, plain);
}

#[test]
fn bytes_round_trip() {
    let v = Value::from(b"\xFF\x00".as_slice());
    let bytes: raw::Bytes = from_value(&v).unwrap();
    assert_eq!(bytes.0, vec![0xFF, 0x00]);
}

mod raw {
    use serde::de::{Deserialize, Deserializer, Error, Visitor};
    use std::fmt;

    pub struct Bytes(pub Vec<u8>);

    impl<'de> Deserialize<'de> for Bytes {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct V;
            impl<'de> Visitor<'de> for V {
                type Value = Bytes;
                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("bytes")
                }
                fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<Bytes, E> {
                    Ok(Bytes(v.to_vec()))
                }
            }
            d.deserialize_bytes(V)
        }
    }
}
