#![cfg(feature = "json")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use gdvalue::{gdv_to_json, gdv_to_json_pretty, json_to_gdv, ErrorCode, Value};

fn parse(text: &str) -> Value {
    Value::read_from_str(text).unwrap()
}

#[test]
fn plain_json_shapes() {
    assert_eq!(
        gdv_to_json(&parse(r#"{"a":[1 true null] "b":"x"}"#)).unwrap(),
        r#"{"a":[1,true,null],"b":"x"}"#
    );
    assert_eq!(gdv_to_json(&parse("-5")).unwrap(), "-5");
}

#[test]
fn gdv_only_shapes_are_encoded() {
    assert_eq!(
        gdv_to_json(&parse("s")).unwrap(),
        r#"{"_type":"symbol","value":"s"}"#
    );
    assert_eq!(
        gdv_to_json(&parse("t(1)")).unwrap(),
        r#"{"_type":"tuple","elements":[1],"tag":"t"}"#
    );
    assert_eq!(
        gdv_to_json(&parse("{1:2}")).unwrap(),
        r#"{"_type":"map","elements":[[1,2]]}"#
    );
    assert_eq!(
        gdv_to_json(&parse("0x10000000000000000")).unwrap(),
        r#"{"_type":"integer","value":"18446744073709551616"}"#
    );
    // Past 2^53 a double can no longer hold every integer.
    assert_eq!(
        gdv_to_json(&Value::from(1i64 << 53)).unwrap(),
        r#"{"_type":"integer","value":"9007199254740992"}"#
    );
}

#[test]
fn encoded_shapes_read_back() {
    for text in [
        "null",
        "[1 \"two\" three]",
        "t{a:[1 (2) {3}] b:\"s\"}",
        "(x y)",
        "{3 1 2}",
        "[z:1 a:2]",
        "om[k:{v}]",
        "node[1 2]",
        "-0x10000000000000000",
        r#"{"k":v}"#,
    ] {
        let v = parse(text);
        let json = gdv_to_json(&v).unwrap();
        assert_eq!(json_to_gdv(&json).unwrap(), v, "{text} -> {json}");
        let pretty = gdv_to_json_pretty(&v).unwrap();
        assert_eq!(json_to_gdv(&pretty).unwrap(), v, "{text}");
    }
}

#[test]
fn unrecognized_objects_are_plain_maps() {
    let v = json_to_gdv(r#"{"_type":"weird","n":1}"#).unwrap();
    assert_eq!(v.as_string(), r#"{"_type":"weird" "n":1}"#);
}

#[test]
fn non_integer_numbers_are_rejected() {
    let err = json_to_gdv("[1.5]").unwrap_err();
    assert_eq!(err.code, ErrorCode::Conversion);
}

#[test]
fn malformed_json_is_a_syntax_error() {
    let err = json_to_gdv("[1,\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::Syntax);
    assert_eq!(err.location.unwrap().line(), 2);
}

#[test]
fn non_utf8_strings_cannot_be_json() {
    let err = gdv_to_json(&Value::from(b"\xFF".as_slice())).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conversion);
}
