#![no_main]

use libfuzzer_sys::fuzz_target;

use gdvalue::{ParseLimits, Parser};

fuzz_target!(|data: &[u8]| {
    // Keep nesting shallow enough that deep inputs fail fast instead of exhausting the stack.
    let mut parser = Parser::new(data, None).with_limits(ParseLimits::with_max_depth(64));
    let _ = parser.read_exactly_one_value();
});
