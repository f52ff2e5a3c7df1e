#![allow(clippy::unwrap_used, clippy::expect_used)]

use gdvalue::{GdvMap, GdvOrderedMap, Symbol, Value, WriteOptions};

fn parse(text: &str) -> Value {
    Value::read_from_str(text).unwrap()
}

fn indented(v: &Value, width: usize) -> String {
    v.as_string_with(&WriteOptions::indented().with_target_line_width(width))
}

#[test]
fn compact_output() {
    for text in [
        "null",
        "-7",
        "[1 2 3]",
        "(1 \"a\")",
        "{a:1 b:2}",
        "[b:2 a:1]",
        "point{x:1 y:2}",
        "node[1 [2 3]]",
        "pair(x y)",
        "s{1 2}",
        "om[z:1]",
    ] {
        assert_eq!(parse(text).as_string(), text);
    }
}

#[test]
fn empty_containers() {
    assert_eq!(Value::sequence(vec![]).as_string(), "[]");
    assert_eq!(Value::tuple(vec![]).as_string(), "()");
    assert_eq!(Value::set(Vec::new()).as_string(), "{}");
    assert_eq!(Value::map(GdvMap::new()).as_string(), "{:}");
    assert_eq!(Value::ordered_map(GdvOrderedMap::new()).as_string(), "[:]");
    assert_eq!(
        Value::tagged_map(Symbol::intern("t"), GdvMap::new()).as_string(),
        "t{:}"
    );
}

#[test]
fn maps_and_sets_print_sorted() {
    assert_eq!(parse("{b:2 a:1}").as_string(), "{a:1 b:2}");
    assert_eq!(parse("{\"b\" a 2}").as_string(), "{a 2 \"b\"}");
}

#[test]
fn string_escapes() {
    let v = Value::from("a\"b\\c\nd\u{1}\u{7f}é");
    assert_eq!(v.as_string(), "\"a\\\"b\\\\c\\nd\\u0001\\u007Fé\"");
    let delimited = WriteOptions::default().with_undelimited_hex_escapes(false);
    assert_eq!(
        Value::from("\u{1}").as_string_with(&delimited),
        "\"\\u{1}\""
    );
}

#[test]
fn symbols_that_are_not_identifiers_are_quoted() {
    assert_eq!(Value::symbol("plain_name1").as_string(), "plain_name1");
    assert_eq!(Value::symbol("with space").as_string(), "`with space`");
    assert_eq!(Value::symbol("").as_string(), "``");
    assert_eq!(Value::symbol("1abc").as_string(), "`1abc`");
    assert_eq!(Value::symbol("a`b").as_string(), "`a\\`b`");
    assert_eq!(
        Value::tagged_tuple(Symbol::intern("odd tag"), vec![]).as_string(),
        "`odd tag`()"
    );
}

#[test]
fn large_integers_print_as_hex() {
    let two_64 = Value::from(u128::from(u64::MAX) + 1);
    assert_eq!(two_64.as_string(), "0x10000000000000000");
    let neg = Value::from(-(i128::from(u64::MAX) + 1));
    assert_eq!(neg.as_string(), "-0x10000000000000000");

    let decimal = WriteOptions::default().with_large_integers_as_decimal(true);
    assert_eq!(two_64.as_string_with(&decimal), "18446744073709551616");

    assert_eq!(
        Value::from(i64::MIN).as_string(),
        "-9223372036854775808"
    );
}

#[test]
fn indented_fits_on_one_line() {
    assert_eq!(indented(&parse("[1 2 3]"), 72), "[1 2 3]");
}

#[test]
fn indented_breaks_every_element() {
    assert_eq!(indented(&parse("[1 2 3]"), 5), "[\n  1\n  2\n  3\n]");
}

#[test]
fn indented_nested_map() {
    assert_eq!(
        indented(&parse("{a:[1 2 3] b:2}"), 10),
        "{\n  a:[\n    1\n    2\n    3\n  ]\n  b:2\n}"
    );
}

#[test]
fn container_value_moves_below_its_key() {
    assert_eq!(
        indented(&parse("{longkeyname:[1 2]}"), 12),
        "{\n  longkeyname:\n    [1 2]\n}"
    );
    // Scalars stay on the key's line.
    assert_eq!(
        indented(&parse("{longkeyname:12345678}"), 12),
        "{\n  longkeyname:12345678\n}"
    );
}

#[test]
fn narrow_map_with_string_key() {
    assert_eq!(indented(&parse("{\"a\":1}"), 4), "{\n  \"a\":1\n}");
}

#[test]
fn retagging_changes_output() {
    let mut v = parse("x{1:2}");
    assert_eq!(v.container_tag().unwrap(), Symbol::intern("x"));
    v.container_set_tag(Symbol::intern("y")).unwrap();
    assert_eq!(v.as_string(), "y{1:2}");
}

#[test]
fn indent_options() {
    let opts = WriteOptions::indented()
        .with_target_line_width(4)
        .with_spaces_per_indent_level(4);
    assert_eq!(parse("[1 2]").as_string_with(&opts), "[\n    1\n    2\n]");
}

#[test]
fn lines_string_ends_with_newline() {
    assert_eq!(parse("[1 2]").as_lines_string(), "[1 2]\n");
    let mut out = Vec::new();
    parse("(a)").write_lines(&mut out, &WriteOptions::default()).unwrap();
    assert_eq!(out, b"(a)\n");
}

#[test]
fn display_is_compact() {
    let v = parse("{a:[1 2]}");
    assert_eq!(format!("{v}"), "{a:[1 2]}");
    assert_eq!(format!("{v:?}"), "{a:[1 2]}");
}

#[test]
fn truncated_string() {
    let v = parse("[1 2 3 4 5]");
    assert_eq!(v.as_truncated_string(100), "[1 2 3 4 5]");
    assert_eq!(v.as_truncated_string(8), "[1 2 ...");
}

#[test]
fn write_to_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("value.gdvn");
    let v = parse("config{name:\"demo\" sizes:[1 2 3] flags:{a b}}");
    v.write_to_file(&path, &WriteOptions::default()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(Value::read_from_file(&path).unwrap(), v);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.gdvn");
    let err = Value::read_from_file(&path).unwrap_err();
    assert_eq!(err.code, gdvalue::ErrorCode::Io);
    assert!(err.to_string().contains("absent.gdvn"), "{err}");
}

#[test]
fn syntax_errors_in_files_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.gdvn");
    std::fs::write(&path, "[1\n2").unwrap();
    let err = Value::read_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("bad.gdvn:2:"), "{err}");
}

#[test]
fn output_reparses_for_awkward_values() {
    let v = Value::sequence(vec![
        Value::symbol(""),
        Value::symbol("tab\there"),
        Value::from("\u{0}\u{1f}\"\\"),
        Value::from(b"\xFF\xFE".as_slice()),
        Value::from(i128::MIN),
        Value::tagged_set(Symbol::intern("`"), [Value::from(1)]),
    ]);
    for opts in [
        WriteOptions::default(),
        WriteOptions::indented().with_target_line_width(4),
        WriteOptions::default().with_undelimited_hex_escapes(false),
        WriteOptions::default().with_large_integers_as_decimal(true),
    ] {
        let bytes = v.to_gdvn_bytes(&opts);
        let back = Value::read_from_bytes(&bytes).unwrap();
        assert_eq!(back, v, "{}", String::from_utf8_lossy(&bytes));
    }
}

#[test]
fn every_byte_round_trips_in_both_escape_modes() {
    for undelimited in [true, false] {
        let opts = WriteOptions::default().with_undelimited_hex_escapes(undelimited);
        for b in 0..=u8::MAX {
            let pair = [b, b'x'];
            let v = Value::sequence(vec![Value::from(pair.as_slice()), Value::symbol(pair)]);
            let bytes = v.to_gdvn_bytes(&opts);
            assert_eq!(Value::read_from_bytes(&bytes).unwrap(), v, "byte {b:#04X}");
        }
    }
}

#[test]
fn line_count_never_grows_with_width() {
    let corpus = [
        "[1 2 3]",
        "{a:[1 2 3] b:2}",
        "{longkeyname:[1 2]}",
        "cfg{name:\"demo\" sizes:[3 4 {6}] flags:{on off}}",
        "[[1 2] [3 [4 5 6]] (a b) {k:v}]",
    ];
    for text in corpus {
        let v = parse(text);
        let mut previous = usize::MAX;
        for width in 0..80 {
            let lines = indented(&v, width).lines().count();
            assert!(lines <= previous, "{text} at width {width}");
            previous = lines;
        }
        assert_eq!(previous, 1, "{text}");
    }
}

#[cfg(feature = "sha2")]
#[test]
fn sha256_of_compact_form() {
    let a = parse("{b:2 a:1}");
    let b = parse("{a:1, b:2} // same value");
    assert_eq!(a.sha256(), b.sha256());
    assert_ne!(a.sha256(), parse("{a:1 b:3}").sha256());
    let hex = a.sha256_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.bytes().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}
