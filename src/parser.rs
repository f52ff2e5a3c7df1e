use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::location::LineCol;
use crate::reader::Reader;
use crate::utf8::push_code_point;
use crate::value::{GdvMap, GdvOrderedMap, GdvSet};
use crate::{ErrorCode, GdvError, GdvInteger, GdvString, ParseLimits, Symbol, Value};

/// Recursive-descent parser for GDVN text.
pub struct Parser<R> {
    reader: Reader<R>,
    limits: ParseLimits,
    depth: usize,
}

/// Destination for map entries while parsing either map flavor.
trait EntrySink {
    fn contains(&self, key: &Value) -> bool;
    fn insert(&mut self, key: Value, value: Value);
}

impl EntrySink for GdvMap {
    fn contains(&self, key: &Value) -> bool {
        self.contains_key(key)
    }

    fn insert(&mut self, key: Value, value: Value) {
        Self::insert(self, key, value);
    }
}

impl EntrySink for GdvOrderedMap {
    fn contains(&self, key: &Value) -> bool {
        self.contains_key(key)
    }

    fn insert(&mut self, key: Value, value: Value) {
        Self::insert(self, key, value);
    }
}

const AFTER_VALUE_CTX: &str = "after a value; every value must be followed by EOF, whitespace, \
                               ',', ':', ']', ')', or '}'";

impl<R: Read> Parser<R> {
    /// Parse from `input`. `file` names the source in error locations.
    pub fn new(input: R, file: Option<&str>) -> Self {
        Self {
            reader: Reader::new(input, file),
            limits: ParseLimits::default(),
            depth: 0,
        }
    }

    /// Replace the default limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The underlying reader, for its location.
    #[must_use]
    pub const fn reader(&self) -> &Reader<R> {
        &self.reader
    }

    /// Read a single value and require that only whitespace and comments
    /// follow it.
    ///
    /// # Errors
    ///
    /// Returns a syntax error (with location) for malformed text, and `Io`
    /// if reading fails.
    pub fn read_exactly_one_value(&mut self) -> Result<Value, GdvError> {
        let Some(value) = self.read_next_value()? else {
            let c = self.reader.read_char()?;
            return Err(self
                .reader
                .err_unexpected_char(c, "looking for the start of a value"));
        };
        let c = self.skip_whitespace_and_comments()?;
        if c.is_some() {
            return Err(self.reader.err_unexpected_char(
                c,
                "looking for the end of a file that should only have one value",
            ));
        }
        trace!(kind = %value.kind(), "read one value");
        Ok(value)
    }

    /// Read the next value, or `None` at end of file or at a closing
    /// delimiter. The terminator is left unread.
    ///
    /// # Errors
    ///
    /// Returns a syntax error (with location) for malformed text, `Io` if
    /// reading fails, and `InvalidOptions` for a zero depth limit.
    pub fn read_next_value(&mut self) -> Result<Option<Value>, GdvError> {
        self.limits.validate()?;
        let c = self.skip_whitespace_and_comments()?;
        match c {
            None | Some(b']' | b')' | b'}') => {
                self.reader.putback(c);
                Ok(None)
            }
            Some(c) => self.read_value_starting_with(c).map(Some),
        }
    }

    /// Iterate over every value until end of file.
    #[must_use]
    pub const fn read_all(self) -> ReadAll<R> {
        ReadAll {
            parser: self,
            done: false,
            count: 0,
        }
    }

    // ----------------------------- lexical -------------------------------

    fn skip_whitespace_and_comments(&mut self) -> Result<Option<u8>, GdvError> {
        loop {
            let c = self.reader.read_char()?;
            match c {
                Some(b' ' | b'\t' | b'\n' | b'\r' | b',') => {}
                Some(b'/') => {
                    let next = self.reader.read_char()?;
                    match next {
                        Some(b'/') => loop {
                            match self.reader.read_char()? {
                                None => return Ok(None),
                                Some(b'\n') => break,
                                Some(_) => {}
                            }
                        },
                        Some(b'*') => self.skip_c_style_comment(0)?,
                        _ => {
                            return Err(self
                                .reader
                                .err_unexpected_char(next, "looking for character after '/'"))
                        }
                    }
                }
                _ => return Ok(c),
            }
        }
    }

    /// Skip to the `*/` matching an already-consumed `/*`.
    fn skip_c_style_comment(&mut self, nesting_depth: usize) -> Result<(), GdvError> {
        let mut child_comments = 0_usize;
        loop {
            let mut c = self.read_comment_char(nesting_depth, child_comments)?;
            match c {
                b'/' => {
                    c = self.read_comment_char(nesting_depth, child_comments)?;
                    if c == b'*' {
                        child_comments += 1;
                        self.skip_c_style_comment(nesting_depth + 1)?;
                    }
                }
                b'*' => loop {
                    c = self.read_comment_char(nesting_depth, child_comments)?;
                    match c {
                        b'/' => return Ok(()),
                        b'*' => {}
                        _ => break,
                    }
                },
                _ => {}
            }
        }
    }

    fn read_comment_char(
        &mut self,
        nesting_depth: usize,
        child_comments: usize,
    ) -> Result<u8, GdvError> {
        if let Some(c) = self.reader.read_char()? {
            return Ok(c);
        }
        let mut ctx = String::from("inside \"/*\" comment, ");
        if nesting_depth > 0 {
            ctx.push_str(&format!(
                "nested inside {nesting_depth} other comments of the same kind, "
            ));
        }
        if child_comments > 0 {
            ctx.push_str(&format!("which contains {child_comments} child comments, "));
        }
        ctx.push_str("looking for corresponding \"*/\"");
        Err(self.reader.err_unexpected_char(None, &ctx))
    }

    fn expect_char(&mut self, expected: u8, looking_for: &str) -> Result<(), GdvError> {
        let c = self.reader.read_char()?;
        if c == Some(expected) {
            Ok(())
        } else {
            Err(self.reader.err_unexpected_char(c, looking_for))
        }
    }

    fn check_allowed_after_value(&self, c: Option<u8>) -> Result<(), GdvError> {
        match c {
            None | Some(b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' | b']' | b')' | b'}') => {
                Ok(())
            }
            _ => Err(self.reader.err_unexpected_char_in_ctx(c, AFTER_VALUE_CTX)),
        }
    }

    /// Validate and put back the character following a complete value.
    fn finish_value(&mut self, value: Value) -> Result<Value, GdvError> {
        let c = self.reader.read_char()?;
        self.check_allowed_after_value(c)?;
        self.reader.putback(c);
        Ok(value)
    }

    // ------------------------------ values -------------------------------

    fn read_value_starting_with(&mut self, c: u8) -> Result<Value, GdvError> {
        match c {
            b'[' => self.read_bracket_container(Symbol::NULL),
            b'(' => self.read_tuple(Symbol::NULL),
            b'{' => self.read_brace_container(Symbol::NULL),
            b'"' => {
                let bytes = self.read_quoted(b'"', "double-quoted string")?;
                self.finish_value(Value::String(GdvString::from(bytes)))
            }
            b'`' => {
                let bytes = self.read_quoted(b'`', "backtick-quoted symbol")?;
                let next = self.reader.read_char()?;
                self.read_after_symbol(Symbol::intern(bytes), next)
            }
            b'0'..=b'9' | b'-' => self.read_integer(c),
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let mut name = vec![c];
                loop {
                    let next = self.reader.read_char()?;
                    match next {
                        Some(b) if b.is_ascii_alphanumeric() || b == b'_' => name.push(b),
                        _ => return self.read_after_symbol(Symbol::intern(name), next),
                    }
                }
            }
            _ => Err(self
                .reader
                .err_unexpected_char(Some(c), "looking for the start of a value")),
        }
    }

    /// `next` is the character right after the symbol; an opening
    /// delimiter there makes the symbol a container tag.
    fn read_after_symbol(&mut self, sym: Symbol, next: Option<u8>) -> Result<Value, GdvError> {
        match next {
            Some(b'[') => self.read_bracket_container(sym),
            Some(b'(') => self.read_tuple(sym),
            Some(b'{') => self.read_brace_container(sym),
            _ => {
                self.check_allowed_after_value(next)?;
                self.reader.putback(next);
                Ok(Value::Symbol(sym))
            }
        }
    }

    fn read_integer(&mut self, first: u8) -> Result<Value, GdvError> {
        let mut text = String::new();
        let mut c = Some(first);
        if first == b'-' {
            text.push('-');
            c = self.reader.read_char()?;
        }
        let Some(lead @ b'0'..=b'9') = c else {
            return Err(self.reader.err_unexpected_char(
                c,
                "looking for digit after minus sign that starts an integer",
            ));
        };
        text.push(char::from(lead));

        let mut radix = 10;
        if lead == b'0' {
            let next = self.reader.read_char()?;
            radix = match next {
                Some(b'b' | b'B') => 2,
                Some(b'o' | b'O') => 8,
                Some(b'x' | b'X') => 16,
                _ => 10,
            };
            if radix == 10 {
                self.reader.putback(next);
            } else {
                text.push('x');
                let d = self.reader.read_char()?;
                match d {
                    Some(d) if char::from(d).is_digit(radix) => text.push(char::from(d)),
                    _ => {
                        return Err(self
                            .reader
                            .err_unexpected_char(d, "looking for digits after radix indicator"))
                    }
                }
            }
        }

        loop {
            let d = self.reader.read_char()?;
            match d {
                Some(d) if char::from(d).is_digit(radix) => text.push(char::from(d)),
                _ => {
                    self.check_allowed_after_value(d)?;
                    self.reader.putback(d);
                    break;
                }
            }
        }

        // The prefix was normalized to "0x" above; fix it for other radixes.
        let digits = match radix {
            2 => text.replacen("0x", "0b", 1),
            8 => text.replacen("0x", "0o", 1),
            _ => text,
        };
        GdvInteger::from_digits(&digits)
            .map(Value::Integer)
            .map_err(|e| self.reader.err(e.message().to_owned()))
    }

    fn read_quoted(&mut self, delim: u8, what: &str) -> Result<Vec<u8>, GdvError> {
        let mut out = Vec::new();
        loop {
            let c = self.reader.read_char()?;
            match c {
                None => {
                    return Err(self.reader.err_unexpected_char(
                        c,
                        &format!("looking for closing '{}' in {what}", char::from(delim)),
                    ))
                }
                Some(c) if c == delim => return Ok(out),
                Some(b'\\') => self.read_escape(delim, what, &mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn read_escape(&mut self, delim: u8, what: &str, out: &mut Vec<u8>) -> Result<(), GdvError> {
        let c = self.reader.read_char()?;
        match c {
            Some(b @ (b'\\' | b'"' | b'/')) => out.push(b),
            Some(b'`') if delim == b'`' => out.push(b'`'),
            Some(b'b') => out.push(0x08),
            Some(b'f') => out.push(0x0C),
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(b'u') => self.read_unicode_escape(out)?,
            _ => {
                return Err(self.reader.err_unexpected_char(
                    c,
                    &format!("looking for the character after a '\\' in a {what}"),
                ))
            }
        }
        Ok(())
    }

    /// The `\u` has been consumed.
    fn read_unicode_escape(&mut self, out: &mut Vec<u8>) -> Result<(), GdvError> {
        let c = self.reader.read_char()?;
        if c == Some(b'{') {
            let mut code_point: u32 = 0;
            let mut digits = 0;
            loop {
                let d = self.reader.read_char()?;
                match d {
                    Some(b'}') if digits > 0 => break,
                    Some(h) if h.is_ascii_hexdigit() => {
                        digits += 1;
                        if digits > 6 {
                            return Err(self.reader.err(
                                "Too many hex digits in \"\\u{...}\" escape; at most 6 are allowed.",
                            ));
                        }
                        code_point = code_point * 16 + hex_value(h);
                    }
                    _ => {
                        return Err(self.reader.err_unexpected_char(
                            d,
                            "looking for hex digit or '}' in \"\\u{...}\" escape",
                        ))
                    }
                }
            }
            if code_point > 0x10_FFFF {
                return Err(self.reader.err(format!(
                    "Code point 0x{code_point:X} in \"\\u{{...}}\" escape is larger than 0x10FFFF."
                )));
            }
            return push_code_point(out, code_point).map_err(|()| {
                self.reader.err(format!(
                    "Code point 0x{code_point:X} in \"\\u{{...}}\" escape is a surrogate."
                ))
            });
        }

        self.reader.putback(c);
        let mut code_point = self.read_hex4()?;
        if (0xD800..=0xDBFF).contains(&code_point) {
            self.expect_char(b'\\', "looking for '\\' of the low surrogate after a high surrogate")?;
            self.expect_char(b'u', "looking for 'u' of the low surrogate after a high surrogate")?;
            let low = self.read_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.reader.err(format!(
                    "Expected a low surrogate (0xDC00 to 0xDFFF) after high surrogate \
                     0x{code_point:04X}, but got 0x{low:04X}."
                )));
            }
            code_point = 0x1_0000 + ((code_point - 0xD800) << 10) + (low - 0xDC00);
        } else if (0xDC00..=0xDFFF).contains(&code_point) {
            return Err(self
                .reader
                .err(format!("Unpaired low surrogate 0x{code_point:04X}.")));
        }
        push_code_point(out, code_point)
            .map_err(|()| self.reader.err(format!("Invalid code point 0x{code_point:X}.")))
    }

    fn read_hex4(&mut self) -> Result<u32, GdvError> {
        let mut value = 0;
        for _ in 0..4 {
            let c = self.reader.read_char()?;
            match c {
                Some(h) if h.is_ascii_hexdigit() => value = value * 16 + hex_value(h),
                _ => {
                    return Err(self
                        .reader
                        .err_unexpected_char(c, "looking for hex digit in \"\\uXXXX\" escape"))
                }
            }
        }
        Ok(value)
    }

    // ---------------------------- containers -----------------------------

    /// Called just after reading an opening delimiter.
    fn enter_container(&mut self) -> Result<(), GdvError> {
        let next_depth = self.depth + 1;
        if next_depth > self.limits.max_depth {
            let mut err = self.reader.err(format!(
                "Nesting depth limit of {} exceeded.",
                self.limits.max_depth
            ));
            err.code = ErrorCode::DepthLimitExceeded;
            return Err(err);
        }
        self.depth = next_depth;
        Ok(())
    }

    fn exit_container(&mut self, value: Value) -> Result<Value, GdvError> {
        self.depth = self.depth.saturating_sub(1);
        self.finish_value(value)
    }

    /// Skip to the next token and return its location, leaving it unread.
    fn peek_token_location(&mut self) -> Result<LineCol, GdvError> {
        let c = self.skip_whitespace_and_comments()?;
        self.reader.putback(c);
        Ok(self.reader.line_col())
    }

    /// True if the next token is `:`, which is consumed.
    fn consume_colon(&mut self) -> Result<bool, GdvError> {
        let c = self.skip_whitespace_and_comments()?;
        if c == Some(b':') {
            return Ok(true);
        }
        self.reader.putback(c);
        Ok(false)
    }

    /// `[...]` is a sequence unless `:` follows the first element, in which
    /// case it is an ordered map. `[:]` is the empty ordered map.
    fn read_bracket_container(&mut self, tag: Symbol) -> Result<Value, GdvError> {
        self.enter_container()?;
        if self.consume_colon()? {
            self.expect_char(b']', "looking for ']' after ':' in empty ordered map")?;
            return self.exit_container(Value::tagged_ordered_map(tag, GdvOrderedMap::new()));
        }

        let key_lc = self.peek_token_location()?;
        let Some(first) = self.read_next_value()? else {
            self.expect_char(b']', "looking for ']' at end of sequence")?;
            return self.exit_container(Value::tagged_sequence(tag, Vec::new()));
        };

        if self.consume_colon()? {
            let mut entries = GdvOrderedMap::new();
            self.read_entry_value(first, key_lc, &mut entries, "ordered map")?;
            self.read_map_entries(b']', "looking for ']' at end of ordered map", &mut entries, "ordered map")?;
            return self.exit_container(Value::tagged_ordered_map(tag, entries));
        }

        let mut elements = vec![first];
        while let Some(v) = self.read_next_value()? {
            elements.push(v);
        }
        self.expect_char(b']', "looking for ']' at end of sequence")?;
        self.exit_container(Value::tagged_sequence(tag, elements))
    }

    fn read_tuple(&mut self, tag: Symbol) -> Result<Value, GdvError> {
        self.enter_container()?;
        let mut elements = Vec::new();
        while let Some(v) = self.read_next_value()? {
            elements.push(v);
        }
        self.expect_char(b')', "looking for ')' at end of tuple")?;
        self.exit_container(Value::tagged_tuple(tag, elements))
    }

    /// `{...}` is a set unless `:` follows the first element, in which case
    /// it is a map. `{:}` is the empty map.
    fn read_brace_container(&mut self, tag: Symbol) -> Result<Value, GdvError> {
        self.enter_container()?;
        if self.consume_colon()? {
            self.expect_char(b'}', "looking for '}' after ':' in empty map")?;
            return self.exit_container(Value::tagged_map(tag, GdvMap::new()));
        }

        let key_lc = self.peek_token_location()?;
        let Some(first) = self.read_next_value()? else {
            self.expect_char(b'}', "looking for '}' at end of set")?;
            return self.exit_container(Value::tagged_set(tag, GdvSet::new()));
        };

        if self.consume_colon()? {
            let mut entries = GdvMap::new();
            self.read_entry_value(first, key_lc, &mut entries, "map")?;
            self.read_map_entries(b'}', "looking for '}' at end of map", &mut entries, "map")?;
            return self.exit_container(Value::tagged_map(tag, entries));
        }

        let mut elements = GdvSet::new();
        elements.insert(first);
        while let Some(v) = self.read_next_value()? {
            elements.insert(v);
        }
        self.expect_char(b'}', "looking for '}' at end of set")?;
        self.exit_container(Value::tagged_set(tag, elements))
    }

    /// Read `key:value` entries until the closing delimiter.
    fn read_map_entries(
        &mut self,
        close: u8,
        close_ctx: &str,
        entries: &mut dyn EntrySink,
        what: &str,
    ) -> Result<(), GdvError> {
        loop {
            let key_lc = self.peek_token_location()?;
            let Some(key) = self.read_next_value()? else {
                return self.expect_char(close, close_ctx);
            };
            let c = self.skip_whitespace_and_comments()?;
            if c != Some(b':') {
                return Err(self
                    .reader
                    .err_unexpected_char(c, "looking for ':' in map entry"));
            }
            self.read_entry_value(key, key_lc, entries, what)?;
        }
    }

    /// The `:` after `key` has been consumed.
    fn read_entry_value(
        &mut self,
        key: Value,
        key_lc: LineCol,
        entries: &mut dyn EntrySink,
        what: &str,
    ) -> Result<(), GdvError> {
        let Some(value) = self.read_next_value()? else {
            let c = self.reader.read_char()?;
            return Err(self
                .reader
                .err_unexpected_char(c, "looking for value after ':' in map entry"));
        };
        if entries.contains(&key) {
            let mut err = self.reader.err_at(
                key_lc,
                format!("Duplicate {what} key: {}", key.as_truncated_string(60)),
            );
            err.code = ErrorCode::DuplicateMapKey;
            return Err(err);
        }
        entries.insert(key, value);
        Ok(())
    }
}

fn hex_value(h: u8) -> u32 {
    char::from(h).to_digit(16).unwrap_or(0)
}

/// Iterator over the values of a GDVN stream, from [`Parser::read_all`].
///
/// Stops after the first error.
pub struct ReadAll<R> {
    parser: Parser<R>,
    done: bool,
    count: usize,
}

impl<R: Read> Iterator for ReadAll<R> {
    type Item = Result<Value, GdvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.parser.read_next_value() {
            Ok(Some(v)) => {
                self.count += 1;
                return Some(Ok(v));
            }
            Ok(None) => match self.parser.reader.read_char() {
                Ok(None) => {
                    debug!(values = self.count, "read all values");
                    None
                }
                Ok(c) => Some(Err(self
                    .parser
                    .reader
                    .err_unexpected_char(c, "looking for the start of a value"))),
                Err(e) => Some(Err(e)),
            },
            Err(e) => Some(Err(e)),
        };
        self.done = true;
        result
    }
}

/// Iterate over every value in `input`.
pub fn read_all<R: Read>(input: R) -> ReadAll<R> {
    Parser::new(input, None).read_all()
}

impl Value {
    /// Parse exactly one value from GDVN text.
    ///
    /// # Errors
    ///
    /// Returns a syntax error with location for malformed text.
    pub fn read_from_str(text: &str) -> Result<Self, GdvError> {
        Self::read_from_bytes(text.as_bytes())
    }

    /// Parse exactly one value from GDVN bytes.
    ///
    /// # Errors
    ///
    /// Returns a syntax error with location for malformed text.
    pub fn read_from_bytes(bytes: &[u8]) -> Result<Self, GdvError> {
        Parser::new(bytes, None).read_exactly_one_value()
    }

    /// Parse exactly one value from a stream. `file` names the source in
    /// error locations.
    ///
    /// # Errors
    ///
    /// Returns a syntax error with location for malformed text, and `Io` if
    /// reading fails.
    pub fn read_from_reader<R: Read>(input: R, file: Option<&str>) -> Result<Self, GdvError> {
        Parser::new(input, file).read_exactly_one_value()
    }

    /// Parse exactly one value from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened or read, and a syntax error
    /// naming the file for malformed text.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, GdvError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading GDVN file");
        let file = File::open(path).map_err(|e| {
            let err = GdvError::from(e);
            let msg = format!("{}: {}", path.display(), err.message());
            err.with_message(msg)
        })?;
        let name = path.to_string_lossy();
        Self::read_from_reader(file, Some(&name))
    }
}
