use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

use crate::location::{FileLineCol, LineCol};
use crate::GdvError;

/// A byte cursor over an input stream that tracks the line and column of
/// the next character and supports one character of pushback.
///
/// End of file is an ordinary "character" here (`None`): reading it
/// advances the location and putting it back rewinds it, which lets the
/// parser treat EOF like any other terminator.
pub struct Reader<R> {
    input: BufReader<R>,
    file: Option<Arc<str>>,
    loc: LineCol,
    prev_loc: LineCol,
    pending: Option<Option<u8>>,
}

impl<R: Read> Reader<R> {
    /// Wrap `input`. `file` names the source in error locations.
    pub fn new(input: R, file: Option<&str>) -> Self {
        Self {
            input: BufReader::new(input),
            file: file.map(Arc::from),
            loc: LineCol::START,
            prev_loc: LineCol::START,
            pending: None,
        }
    }

    /// Read the next byte, or `None` at end of file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the underlying stream fails.
    pub fn read_char(&mut self) -> Result<Option<u8>, GdvError> {
        let c = match self.pending.take() {
            Some(c) => c,
            None => self.next_byte()?,
        };
        self.prev_loc = self.loc;
        self.loc.increment_for_char(c);
        Ok(c)
    }

    fn next_byte(&mut self) -> Result<Option<u8>, GdvError> {
        loop {
            let buf = match self.input.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(GdvError::from(e)),
            };
            let Some(&b) = buf.first() else {
                return Ok(None);
            };
            self.input.consume(1);
            return Ok(Some(b));
        }
    }

    /// Un-read `c`, which must be the character most recently returned by
    /// [`Reader::read_char`]. Only one character may be pending at a time.
    pub fn putback(&mut self, c: Option<u8>) {
        debug_assert!(self.pending.is_none(), "only one character of putback");
        self.pending = Some(c);
        self.loc = self.prev_loc;
    }

    /// Location of the next character to be read.
    #[must_use]
    pub const fn line_col(&self) -> LineCol {
        self.loc
    }

    /// [`Reader::line_col`] with the file name.
    #[must_use]
    pub fn location(&self) -> FileLineCol {
        FileLineCol::new(self.file.clone(), self.loc)
    }

    /// The file name given at construction.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// A syntax error at the character most recently read.
    #[must_use]
    pub fn err(&self, msg: impl Into<String>) -> GdvError {
        let mut lc = self.loc;
        lc.decrement_column();
        GdvError::syntax(FileLineCol::new(self.file.clone(), lc), msg)
    }

    /// A syntax error at exactly `lc`.
    #[must_use]
    pub fn err_at(&self, lc: LineCol, msg: impl Into<String>) -> GdvError {
        GdvError::syntax(FileLineCol::new(self.file.clone(), lc), msg)
    }

    /// A syntax error reporting that `c` was not expected while
    /// `looking_for` something.
    #[must_use]
    pub fn err_unexpected_char(&self, c: Option<u8>, looking_for: &str) -> GdvError {
        self.err_unexpected_char_in_ctx(c, &format!("while {looking_for}"))
    }

    /// Like [`Reader::err_unexpected_char`] with a free-form context.
    #[must_use]
    pub fn err_unexpected_char_in_ctx(&self, c: Option<u8>, context: &str) -> GdvError {
        self.err(describe_unexpected(c, context))
    }
}

fn describe_unexpected(c: Option<u8>, context: &str) -> String {
    match c {
        None => format!("Unexpected end of file {context}."),
        Some(c) if c == b' ' || c.is_ascii_graphic() => {
            format!("Unexpected '{}' {context}.", char::from(c))
        }
        Some(c) => format!("Unexpected unprintable character code {c} (0x{c:02X}) {context}."),
    }
}

