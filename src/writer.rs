use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::pretty::{self, BreakKind, Group, GroupStyle, Node};
use crate::{GdvError, GdvInteger, Symbol, Value};

/// Options controlling GDVN output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// If false, output is always a single compact line.
    pub enable_indentation: bool,
    /// Starting indentation level; the first line is assumed to already be
    /// at this level.
    pub indent_level: usize,
    /// Spaces per indentation level.
    pub spaces_per_indent_level: usize,
    /// Width to stay within where possible. 0 takes every line break.
    pub target_line_width: usize,
    /// Write integers outside the `i64` range in decimal rather than hex.
    pub write_large_integers_as_decimal: bool,
    /// Escape control characters as `\u0001` rather than `\u{1}`.
    pub use_undelimited_hex_escapes: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            enable_indentation: false,
            indent_level: 0,
            spaces_per_indent_level: 2,
            target_line_width: 72,
            write_large_integers_as_decimal: false,
            use_undelimited_hex_escapes: true,
        }
    }
}

impl WriteOptions {
    /// Default options with indentation enabled.
    #[must_use]
    pub fn indented() -> Self {
        Self::default().with_indentation(true)
    }

    /// Set `enable_indentation`.
    #[must_use]
    pub const fn with_indentation(mut self, enable: bool) -> Self {
        self.enable_indentation = enable;
        self
    }

    /// Set `indent_level`.
    #[must_use]
    pub const fn with_indent_level(mut self, level: usize) -> Self {
        self.indent_level = level;
        self
    }

    /// Set `spaces_per_indent_level`.
    #[must_use]
    pub const fn with_spaces_per_indent_level(mut self, spaces: usize) -> Self {
        self.spaces_per_indent_level = spaces;
        self
    }

    /// Set `target_line_width`.
    #[must_use]
    pub const fn with_target_line_width(mut self, width: usize) -> Self {
        self.target_line_width = width;
        self
    }

    /// Set `write_large_integers_as_decimal`.
    #[must_use]
    pub const fn with_large_integers_as_decimal(mut self, decimal: bool) -> Self {
        self.write_large_integers_as_decimal = decimal;
        self
    }

    /// Set `use_undelimited_hex_escapes`.
    #[must_use]
    pub const fn with_undelimited_hex_escapes(mut self, undelimited: bool) -> Self {
        self.use_undelimited_hex_escapes = undelimited;
        self
    }

    fn indent_step(&self) -> usize {
        self.spaces_per_indent_level
    }
}

// ------------------------------- scalars ---------------------------------

/// Append `bytes` quoted with `delim`, escaping as GDVN requires.
fn push_quoted(out: &mut Vec<u8>, bytes: &[u8], delim: u8, undelimited_hex: bool) {
    out.push(delim);
    for &b in bytes {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b if b == delim => {
                out.push(b'\\');
                out.push(b);
            }
            0x08 => out.extend_from_slice(b"\\b"),
            0x0C => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x00..=0x1F | 0x7F => {
                let escape = if undelimited_hex {
                    format!("\\u{b:04X}")
                } else {
                    format!("\\u{{{b:X}}}")
                };
                out.extend_from_slice(escape.as_bytes());
            }
            _ => out.push(b),
        }
    }
    out.push(delim);
}

fn push_symbol(out: &mut Vec<u8>, sym: Symbol, opts: &WriteOptions) {
    if sym.is_identifier() {
        out.extend_from_slice(sym.name());
    } else {
        push_quoted(out, sym.name(), b'`', opts.use_undelimited_hex_escapes);
    }
}

fn push_integer(out: &mut Vec<u8>, i: &GdvInteger, opts: &WriteOptions) {
    let text = if i.is_small() || opts.write_large_integers_as_decimal {
        i.to_string()
    } else {
        i.to_radix_digits(16, true).unwrap_or_else(|_| i.to_string())
    };
    out.extend_from_slice(text.as_bytes());
}

// ------------------------------- layout ----------------------------------

fn layout(v: &Value, opts: &WriteOptions) -> Node {
    match v {
        Value::Symbol(s) => {
            let mut out = Vec::new();
            push_symbol(&mut out, *s, opts);
            Node::Text(out)
        }
        Value::Integer(i) => {
            let mut out = Vec::new();
            push_integer(&mut out, i, opts);
            Node::Text(out)
        }
        Value::String(s) => {
            let mut out = Vec::new();
            push_quoted(&mut out, s.as_bytes(), b'"', opts.use_undelimited_hex_escapes);
            Node::Text(out)
        }
        Value::Sequence { tag, elements } => layout_container(
            *tag,
            ("[", "]", "[]"),
            elements.iter().map(|e| layout(e, opts)),
            opts,
        ),
        Value::Tuple { tag, elements } => layout_container(
            *tag,
            ("(", ")", "()"),
            elements.iter().map(|e| layout(e, opts)),
            opts,
        ),
        Value::Set { tag, elements } => layout_container(
            *tag,
            ("{", "}", "{}"),
            elements.iter().map(|e| layout(e, opts)),
            opts,
        ),
        Value::Map { tag, entries } => layout_container(
            *tag,
            ("{", "}", "{:}"),
            entries.iter().map(|(k, v)| layout_entry(k, v, opts)),
            opts,
        ),
        Value::OrderedMap { tag, entries } => layout_container(
            *tag,
            ("[", "]", "[:]"),
            entries.iter().map(|(k, v)| layout_entry(k, v, opts)),
            opts,
        ),
    }
}

/// `tag{ e1 e2 ... }`: one line if it fits, otherwise one element per line
/// with the closing delimiter back at the opening line's level.
fn layout_container(
    tag: Symbol,
    (open, close, empty): (&str, &str, &str),
    items: impl Iterator<Item = Node>,
    opts: &WriteOptions,
) -> Node {
    let mut head = Vec::new();
    if !tag.is_null() {
        push_symbol(&mut head, tag, opts);
    }

    let mut items = items.peekable();
    if items.peek().is_none() {
        head.extend_from_slice(empty.as_bytes());
        return Node::Text(head);
    }

    let step = opts.indent_step();
    let mut group = Group::new(GroupStyle::Correlated, step);
    head.extend_from_slice(open.as_bytes());
    group.text(head);
    group.brk(BreakKind::NothingOrNewline);
    let mut first = true;
    for item in items {
        if !first {
            group.brk(BreakKind::SpaceOrNewline);
        }
        first = false;
        group.push(item);
    }
    group.brk_indent(
        BreakKind::NothingOrNewline,
        -isize::try_from(step).unwrap_or(0),
    );
    group.text(close);
    group.into_node()
}

/// `key:value`. A non-empty container value may move to the next line,
/// indented, if it fits there but not after the key.
fn layout_entry(key: &Value, value: &Value, opts: &WriteOptions) -> Node {
    let mut group = Group::new(GroupStyle::Fill, 0);
    group.push(layout(key, opts));
    group.text(":");
    if value.is_container() && !value.is_empty() {
        group.brk_indent(
            BreakKind::NewlineIfFitsBelow,
            isize::try_from(opts.indent_step()).unwrap_or(0),
        );
    }
    group.push(layout(value, opts));
    group.into_node()
}

// ------------------------------ entry points -----------------------------

impl Value {
    /// GDVN bytes for this value under `opts`, without a trailing newline.
    #[must_use]
    pub fn to_gdvn_bytes(&self, opts: &WriteOptions) -> Vec<u8> {
        let node = layout(self, opts);
        if opts.enable_indentation {
            let start = opts.indent_level * opts.spaces_per_indent_level;
            pretty::render(&node, opts.target_line_width, start)
        } else {
            pretty::render(&node, usize::MAX, 0)
        }
    }

    /// Compact GDVN text.
    ///
    /// Strings holding bytes that are not UTF-8 are written raw by
    /// [`Value::write`]; this conversion replaces them with U+FFFD.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.as_string_with(&WriteOptions::default())
    }

    /// GDVN text under `opts`.
    #[must_use]
    pub fn as_string_with(&self, opts: &WriteOptions) -> String {
        String::from_utf8_lossy(&self.to_gdvn_bytes(opts)).into_owned()
    }

    /// Indented GDVN text with a final newline, using default options.
    #[must_use]
    pub fn as_lines_string(&self) -> String {
        self.as_lines_string_with(&WriteOptions::default())
    }

    /// Indented GDVN text with a final newline; indentation is enabled
    /// regardless of `opts`.
    #[must_use]
    pub fn as_lines_string_with(&self, opts: &WriteOptions) -> String {
        let mut bytes = self.to_gdvn_bytes(&opts.with_indentation(true));
        bytes.push(b'\n');
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Compact text cut to at most `max_len` bytes, ending in `...` when cut.
    #[must_use]
    pub fn as_truncated_string(&self, max_len: usize) -> String {
        let s = self.as_string();
        if s.len() <= max_len {
            return s;
        }
        if max_len <= 3 {
            return ".".repeat(max_len);
        }
        let mut cut = max_len - 3;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &s[..cut])
    }

    /// Write GDVN to `w` under `opts`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if writing fails.
    pub fn write<W: Write>(&self, w: &mut W, opts: &WriteOptions) -> Result<(), GdvError> {
        w.write_all(&self.to_gdvn_bytes(opts))?;
        Ok(())
    }

    /// Write indented GDVN and a final newline to `w`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if writing fails.
    pub fn write_lines<W: Write>(&self, w: &mut W, opts: &WriteOptions) -> Result<(), GdvError> {
        let mut bytes = self.to_gdvn_bytes(&opts.with_indentation(true));
        bytes.push(b'\n');
        w.write_all(&bytes)?;
        Ok(())
    }

    /// Write indented GDVN and a final newline to the file at `path`,
    /// replacing it.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be created or written.
    pub fn write_to_file(&self, path: impl AsRef<Path>, opts: &WriteOptions) -> Result<(), GdvError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "writing GDVN file");
        let with_path = |e: io::Error| {
            let err = GdvError::from(e);
            let msg = format!("{}: {}", path.display(), err.message());
            err.with_message(msg)
        };
        let mut file = File::create(path).map_err(with_path)?;
        let mut bytes = self.to_gdvn_bytes(&opts.with_indentation(true));
        bytes.push(b'\n');
        file.write_all(&bytes).map_err(with_path)?;
        file.flush().map_err(with_path)?;
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
