#![no_main]

use libfuzzer_sys::fuzz_target;

use gdvalue::{ParseLimits, Parser, Value, WriteOptions};

fn reparse(bytes: &[u8]) -> Value {
    Parser::new(bytes, None)
        .read_exactly_one_value()
        .expect("writer output must parse")
}

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new(data, None).with_limits(ParseLimits::with_max_depth(64));
    if let Ok(v) = parser.read_exactly_one_value() {
        // Both styles must read back as the same value.
        let compact = v.to_gdvn_bytes(&WriteOptions::default());
        assert_eq!(reparse(&compact), v);

        let indented = v.to_gdvn_bytes(&WriteOptions::indented().with_target_line_width(20));
        assert_eq!(reparse(&indented), v);

        // Compact output is a fixed point.
        assert_eq!(reparse(&compact).to_gdvn_bytes(&WriteOptions::default()), compact);
    }
});
