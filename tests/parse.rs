#![allow(clippy::unwrap_used, clippy::expect_used)]

use gdvalue::{read_all, ErrorCode, Kind, ParseLimits, Parser, Symbol, Value};

fn parse(text: &str) -> Value {
    Value::read_from_str(text).unwrap_or_else(|e| panic!("{text:?}: {e}"))
}

fn parse_err(text: &str) -> gdvalue::GdvError {
    match Value::read_from_str(text) {
        Ok(v) => panic!("{text:?} parsed as {v}"),
        Err(e) => e,
    }
}

#[test]
fn scalars() {
    assert!(parse("null").is_null());
    assert_eq!(parse("true"), Value::from(true));
    assert_eq!(parse("someSymbol"), Value::symbol("someSymbol"));
    assert_eq!(parse("`with space`"), Value::symbol("with space"));
    assert_eq!(parse("``"), Value::symbol(""));
    assert_eq!(parse("\"text\""), Value::from("text"));
    assert_eq!(parse("-42"), Value::from(-42));
}

#[test]
fn integer_radixes() {
    assert_eq!(parse("0x10"), Value::from(16));
    assert_eq!(parse("0X1f"), Value::from(31));
    assert_eq!(parse("-0b101"), Value::from(-5));
    assert_eq!(parse("0o17"), Value::from(15));
    assert_eq!(
        parse("0x10000000000000000"),
        Value::from(u128::from(u64::MAX) + 1)
    );
    assert_eq!(
        parse("-170141183460469231731687303715884105728"),
        Value::from(i128::MIN)
    );
}

#[test]
fn integers_do_not_allow_underscores() {
    assert_eq!(parse_err("1_000").code, ErrorCode::Syntax);
}

#[test]
fn value_must_be_followed_by_a_separator() {
    let err = parse_err("12a");
    assert_eq!(err.code, ErrorCode::Syntax);
    let loc = err.location.unwrap();
    assert_eq!((loc.line(), loc.column()), (1, 3));
}

#[test]
fn string_escapes() {
    assert_eq!(
        parse(r#""a\"b\\c\/d\n\t\r\b\f""#),
        Value::from("a\"b\\c/d\n\t\r\u{8}\u{c}")
    );
    assert_eq!(parse(r#""A\u{42}""#), Value::from("AB"));
    assert_eq!(parse(r#""\u{1F600}""#), Value::from("\u{1F600}"));
    assert_eq!(parse(r#""😀""#), Value::from("\u{1F600}"));
    assert_eq!(parse(r"`a\`b`"), Value::symbol("a`b"));
}

#[test]
fn unpaired_low_surrogate_is_an_error() {
    let err = parse_err(r#""\uDE00""#);
    assert_eq!(err.code, ErrorCode::Syntax);
    assert!(err.message().contains("0xDE00"), "{err}");
}

#[test]
fn containers() {
    assert_eq!(parse("[]").kind(), Kind::Sequence);
    assert_eq!(parse("()").kind(), Kind::Tuple);
    assert_eq!(parse("{}").kind(), Kind::Set);
    assert_eq!(parse("{:}").kind(), Kind::Map);
    assert_eq!(parse("[:]").kind(), Kind::OrderedMap);

    assert_eq!(parse("[1 2 3]").size(), 3);
    assert_eq!(parse("(1, 2)").kind(), Kind::Tuple);
    assert_eq!(parse("{1 2}").kind(), Kind::Set);
    assert_eq!(parse("{a:1 b:2}").kind(), Kind::Map);
    assert_eq!(parse("[a:1 b:2]").kind(), Kind::OrderedMap);
}

#[test]
fn tagged_containers() {
    let v = parse("point{x:1 y:2}");
    assert_eq!(v.kind(), Kind::TaggedMap);
    assert_eq!(v.container_tag().unwrap(), Symbol::intern("point"));
    assert_eq!(v.map_get_value_at_sym("y").unwrap(), &Value::from(2));

    assert_eq!(parse("node[1 2]").kind(), Kind::TaggedSequence);
    assert_eq!(parse("pair(1 2)").kind(), Kind::TaggedTuple);
    assert_eq!(parse("s{1}").kind(), Kind::TaggedSet);
    assert_eq!(parse("om[a:1]").kind(), Kind::TaggedOrderedMap);
    assert_eq!(parse("`odd tag`()").kind(), Kind::TaggedTuple);
}

#[test]
fn commas_and_comments_are_whitespace() {
    let expect = parse("[1 2 3]");
    assert_eq!(parse("[1,2,,3,]"), expect);
    assert_eq!(parse("[1 // one\n 2 /* a /* nested */ b */ 3]"), expect);
    assert_eq!(parse("// leading\n[1 2 3] // trailing"), expect);
}

#[test]
fn sets_deduplicate() {
    assert_eq!(parse("{3 1 3 2}").as_string(), "{1 2 3}");
}

#[test]
fn nested_values() {
    let v = parse("{a:[1 (2 \"x\")] b:{c:d}}");
    let inner = v.map_get_value_at_sym("a").unwrap();
    assert_eq!(inner.sequence_get_value_at(1).unwrap().kind(), Kind::Tuple);
    assert_eq!(
        v.map_get_value_at_sym("b")
            .unwrap()
            .map_get_value_at_sym("c")
            .unwrap(),
        &Value::symbol("d")
    );
}

#[test]
fn unterminated_sequence_reports_location() {
    let err = parse_err("[1 2");
    assert_eq!(err.code, ErrorCode::Syntax);
    assert_eq!(
        err.to_string(),
        "1:5: Unexpected end of file while looking for ']' at end of sequence."
    );
}

#[test]
fn unterminated_comment() {
    let err = parse_err("/* x");
    assert_eq!(
        err.to_string(),
        "1:5: Unexpected end of file while inside \"/*\" comment, looking for corresponding \"*/\"."
    );
}

#[test]
fn only_one_value_allowed() {
    let err = parse_err("abc]");
    assert_eq!(err.code, ErrorCode::Syntax);
    let loc = err.location.unwrap();
    assert_eq!((loc.line(), loc.column()), (1, 4));
}

#[test]
fn empty_input_is_an_error() {
    assert_eq!(parse_err("").code, ErrorCode::Syntax);
    assert_eq!(parse_err("  // nothing\n").code, ErrorCode::Syntax);
}

#[test]
fn duplicate_map_key_is_located_at_the_key() {
    let err = parse_err("{a:1 a:2}");
    assert_eq!(err.code, ErrorCode::DuplicateMapKey);
    assert_eq!(err.to_string(), "1:6: Duplicate map key: a");

    let err = parse_err("{\n  a:1\n  a:2\n}");
    let loc = err.location.unwrap();
    assert_eq!((loc.line(), loc.column()), (3, 3));

    let err = parse_err("[k:1 k:2]");
    assert_eq!(err.code, ErrorCode::DuplicateMapKey);
    assert!(err.message().starts_with("Duplicate ordered map key"), "{err}");
}

#[test]
fn depth_limit() {
    let mut ok = Parser::new("[[1]]".as_bytes(), None).with_limits(ParseLimits::with_max_depth(2));
    assert_eq!(ok.read_exactly_one_value().unwrap().as_string(), "[[1]]");

    let mut deep =
        Parser::new("[[[1]]]".as_bytes(), None).with_limits(ParseLimits::with_max_depth(2));
    let err = deep.read_exactly_one_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
    assert!(err.is_syntax());
}

#[test]
fn zero_depth_limit_is_rejected_by_every_entry_point() {
    let zero = ParseLimits::with_max_depth(0);
    let mut p = Parser::new("1".as_bytes(), None).with_limits(zero);
    assert_eq!(p.read_exactly_one_value().unwrap_err().code, ErrorCode::InvalidOptions);

    let mut p = Parser::new("[1]".as_bytes(), None).with_limits(zero);
    assert_eq!(p.read_next_value().unwrap_err().code, ErrorCode::InvalidOptions);

    let first = Parser::new("1 2".as_bytes(), None)
        .with_limits(zero)
        .read_all()
        .next()
        .unwrap();
    assert_eq!(first.unwrap_err().code, ErrorCode::InvalidOptions);
}

#[test]
fn file_name_appears_in_errors() {
    let err = Value::read_from_reader("[".as_bytes(), Some("in.gdvn")).unwrap_err();
    assert!(err.to_string().starts_with("in.gdvn:1:2: "), "{err}");
}

#[test]
fn read_next_value_streams() {
    let mut p = Parser::new("1 [2] three".as_bytes(), None);
    assert_eq!(p.read_next_value().unwrap(), Some(Value::from(1)));
    assert_eq!(p.read_next_value().unwrap().unwrap().as_string(), "[2]");
    assert_eq!(p.read_next_value().unwrap(), Some(Value::symbol("three")));
    assert_eq!(p.read_next_value().unwrap(), None);
}

#[test]
fn read_all_collects_values() {
    let values: Vec<Value> = read_all("1 \"two\" (3)".as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[2].kind(), Kind::Tuple);
}

#[test]
fn read_all_rejects_stray_close_delimiter() {
    let mut it = read_all("1 ]".as_bytes());
    assert_eq!(it.next().unwrap().unwrap(), Value::from(1));
    assert_eq!(it.next().unwrap().unwrap_err().code, ErrorCode::Syntax);
}

#[test]
fn invalid_utf8_is_kept_in_strings() {
    let v = Value::read_from_bytes(b"\"\xFF\"").unwrap();
    assert_eq!(v.string_get().unwrap().as_bytes(), b"\xFF");
}
