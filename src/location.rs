use std::fmt;
use std::sync::Arc;

/// A 1-based line and column position in some text.
///
/// Column 0 is used for "just before the first character of the line", which
/// is where the position lands after stepping back over a newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

impl Default for LineCol {
    fn default() -> Self {
        Self::START
    }
}

impl LineCol {
    /// The position of the first character of a file.
    pub const START: Self = Self { line: 1, column: 1 };

    /// Construct a position.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Advance past `c`. `None` (end of file) advances the column.
    pub fn increment_for_char(&mut self, c: Option<u8>) {
        if c == Some(b'\n') {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
    }

    /// Step back one column, never below 0.
    pub fn decrement_column(&mut self) {
        self.column = self.column.saturating_sub(1);
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A [`LineCol`] together with the name of the file it refers to, if known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FileLineCol {
    /// The file name. `None` for in-memory text and stdin.
    pub file: Option<Arc<str>>,
    /// The position within the file.
    pub lc: LineCol,
}

impl FileLineCol {
    /// Construct a location.
    #[must_use]
    pub const fn new(file: Option<Arc<str>>, lc: LineCol) -> Self {
        Self { file, lc }
    }

    /// Line number.
    #[inline]
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.lc.line
    }

    /// Column number.
    #[inline]
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.lc.column
    }
}

impl fmt::Display for FileLineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}", self.lc),
            None => write!(f, "{}", self.lc),
        }
    }
}
