//! Box-model pretty printing for code-like text.
//!
//! A [`BoxPrint`] builder assembles a tree of text, breaks and boxes;
//! [`BpRender`] lays it out against a right margin. Boxes decide their
//! breaks in one of three ways (see [`BoxKind`]), and each taken break
//! starts a line at the box's starting column plus the accumulated indent
//! of the breaks taken so far in that box.

use std::fmt::{self, Write as _};

use crate::{ErrorCode, GdvError};

/// How a break behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BreakType {
    /// Never taken; always renders as a space.
    Disabled,
    /// Taken if the box decides so; otherwise a space.
    Enabled,
    /// Always taken.
    Forced,
    /// Like [`BreakType::Forced`], except no newline is added when the
    /// cursor is already at the target column. Renders as nothing.
    LineStart,
}

/// A break and the indentation it adds when taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpBreak {
    /// Behavior.
    pub break_type: BreakType,
    /// Columns added to the box's line-start column, from this break on.
    pub indent: isize,
}

impl BpBreak {
    const fn is_break(self) -> bool {
        !matches!(self.break_type, BreakType::Disabled)
    }

    const fn is_forced(self) -> bool {
        matches!(self.break_type, BreakType::Forced)
    }

    /// Width if not taken, and whether it forces its box to break.
    const fn one_line_width(self) -> (usize, bool) {
        match self.break_type {
            BreakType::Forced | BreakType::LineStart => (0, true),
            BreakType::Disabled | BreakType::Enabled => (1, false),
        }
    }

    fn render_untaken(self, mgr: &mut BpRender) {
        if self.break_type != BreakType::LineStart {
            mgr.add(" ");
        }
    }
}

/// How a box decides its breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// Every break is taken.
    Vertical,
    /// Each break is taken only if the text up to the next break would not
    /// fit otherwise.
    Sequence,
    /// All breaks are taken, or none.
    Correlated,
}

/// An element of a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BpElement {
    /// Literal text.
    Text(String),
    /// A potential line break.
    Break(BpBreak),
    /// A nested box.
    Box(BpBox),
}

impl BpElement {
    fn one_line_width(&self) -> (usize, bool) {
        match self {
            Self::Text(t) => (t.chars().count(), false),
            Self::Break(b) => b.one_line_width(),
            Self::Box(b) => b.one_line_width(),
        }
    }

    fn as_break(&self) -> Option<BpBreak> {
        match self {
            Self::Break(b) if b.is_break() => Some(*b),
            _ => None,
        }
    }

    fn render(&self, mgr: &mut BpRender) {
        match self {
            Self::Text(t) => mgr.add(t),
            Self::Break(b) => b.render_untaken(mgr),
            Self::Box(b) => b.render(mgr),
        }
    }
}

/// A box of elements sharing one break discipline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BpBox {
    /// Break discipline.
    pub kind: BoxKind,
    /// Contents, in order.
    pub elements: Vec<BpElement>,
}

impl BpBox {
    /// An empty box.
    #[must_use]
    pub const fn new(kind: BoxKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
        }
    }

    /// Width on one line, stopping early at a forcing break.
    fn one_line_width(&self) -> (usize, bool) {
        let mut sum = 0;
        for e in &self.elements {
            let (w, forced) = e.one_line_width();
            sum += w;
            if forced {
                return (sum, true);
            }
        }
        (sum, false)
    }

    fn take_break(mgr: &mut BpRender, start_col: &mut isize, brk: BpBreak) {
        *start_col += brk.indent;
        if brk.break_type == BreakType::LineStart && mgr.cur_col == *start_col {
            return;
        }
        mgr.break_line(*start_col);
    }

    fn render(&self, mgr: &mut BpRender) {
        let mut start_col = mgr.cur_col;

        let take_all = match self.kind {
            BoxKind::Vertical => true,
            BoxKind::Correlated => {
                let (width, forced) = self.one_line_width();
                forced || to_isize(width) > mgr.remainder()
            }
            BoxKind::Sequence => false,
        };

        if take_all {
            for e in &self.elements {
                match e.as_break() {
                    Some(brk) => Self::take_break(mgr, &mut start_col, brk),
                    None => e.render(mgr),
                }
            }
            return;
        }
        if self.kind == BoxKind::Correlated {
            for e in &self.elements {
                e.render(mgr);
            }
            return;
        }

        // Sequence: decide each break by whether the following segment fits.
        let mut cursor = 0;
        let mut pending: Option<BpBreak> = None;
        while cursor < self.elements.len() {
            let mut segment = usize::from(pending.is_some());
            segment += self.elements[cursor..]
                .iter()
                .take_while(|e| e.as_break().is_none())
                .map(|e| e.one_line_width().0)
                .sum::<usize>();

            if let Some(brk) = pending.take() {
                if to_isize(segment) > mgr.remainder() {
                    Self::take_break(mgr, &mut start_col, brk);
                } else {
                    start_col += brk.indent;
                    brk.render_untaken(mgr);
                }
            }

            while cursor < self.elements.len() && self.elements[cursor].as_break().is_none() {
                self.elements[cursor].render(mgr);
                cursor += 1;
            }

            if let Some(brk) = self.elements.get(cursor).and_then(BpElement::as_break) {
                if brk.is_forced() {
                    Self::take_break(mgr, &mut start_col, brk);
                } else {
                    pending = Some(brk);
                }
                cursor += 1;
            }
        }

        if let Some(brk) = pending {
            brk.render_untaken(mgr);
        }
    }

    fn debug_print(&self, out: &mut String, ind: usize) {
        let name = match self.kind {
            BoxKind::Vertical => "vert",
            BoxKind::Sequence => "seq",
            BoxKind::Correlated => "corr",
        };
        let _ = writeln!(out, "box(kind={name}) {{");
        for e in &self.elements {
            out.push_str(&" ".repeat(ind + 2));
            match e {
                BpElement::Text(t) => {
                    let _ = write!(out, "text({t:?})");
                }
                BpElement::Break(b) => {
                    let _ = write!(out, "break(en={}, ind={})", b.break_type as u8, b.indent);
                }
                BpElement::Box(b) => b.debug_print(out, ind + 2),
            }
            out.push('\n');
        }
        out.push_str(&" ".repeat(ind));
        out.push('}');
    }
}

impl fmt::Display for BpBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.debug_print(&mut out, 0);
        f.write_str(&out)
    }
}

fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

/// Renders box trees to a string.
#[derive(Debug, Clone)]
pub struct BpRender {
    out: String,
    /// Right margin: boxes break when text would pass this column.
    pub margin: usize,
    cur_col: isize,
    /// Emitted at the start of every line after the first.
    pub line_start_text: String,
}

impl Default for BpRender {
    fn default() -> Self {
        Self {
            out: String::new(),
            margin: 72,
            cur_col: 0,
            line_start_text: String::new(),
        }
    }
}

impl BpRender {
    /// A renderer with the default margin of 72.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer with the given margin.
    #[must_use]
    pub fn with_margin(margin: usize) -> Self {
        Self {
            margin,
            ..Self::default()
        }
    }

    /// Current output column.
    #[must_use]
    pub const fn cur_col(&self) -> isize {
        self.cur_col
    }

    /// Columns left before the margin; negative once past it.
    #[must_use]
    pub fn remainder(&self) -> isize {
        to_isize(self.margin) - self.cur_col
    }

    fn add(&mut self, text: &str) {
        self.out.push_str(text);
        self.cur_col += to_isize(text.chars().count());
    }

    fn break_line(&mut self, ind: isize) {
        self.out.push('\n');
        self.out.push_str(&self.line_start_text);
        let ind = ind.max(0);
        self.out.extend(std::iter::repeat(' ').take(ind.unsigned_abs()));
        self.cur_col = ind;
    }

    /// Render `tree`, appending to the pending output.
    pub fn render(&mut self, tree: &BpBox) {
        tree.render(self);
    }

    /// Take the output rendered so far and reset the column.
    pub fn take_string(&mut self) -> String {
        self.cur_col = 0;
        std::mem::take(&mut self.out)
    }

    /// Take the tree out of `builder`, render it, and return the text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` if the builder was misused (see
    /// [`BoxPrint::take_tree`]).
    pub fn take_and_render(&mut self, builder: &mut BoxPrint) -> Result<String, GdvError> {
        let tree = builder.take_tree()?;
        self.render(&tree);
        Ok(self.take_string())
    }
}

/// Builder for box trees.
///
/// The builder starts inside a vertical box; [`BoxPrint::begin`] opens
/// nested boxes and [`BoxPrint::end`] closes them.
#[derive(Debug, Clone)]
pub struct BoxPrint {
    stack: Vec<BpBox>,
    /// Indentation step for [`BoxPrint::ind`] and [`BoxPrint::und`].
    pub level_indent: isize,
    misuse: Option<String>,
}

impl Default for BoxPrint {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxPrint {
    /// A builder with an indentation step of 2.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![BpBox::new(BoxKind::Vertical)],
            level_indent: 2,
            misuse: None,
        }
    }

    fn current(&mut self) -> &mut BpBox {
        if self.stack.is_empty() {
            self.stack.push(BpBox::new(BoxKind::Vertical));
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn append(&mut self, e: BpElement) -> &mut Self {
        self.current().elements.push(e);
        self
    }

    fn append_break(&mut self, break_type: BreakType, indent: isize) -> &mut Self {
        self.append(BpElement::Break(BpBreak { break_type, indent }))
    }

    /// Append text.
    pub fn text(&mut self, t: impl fmt::Display) -> &mut Self {
        self.append(BpElement::Text(t.to_string()))
    }

    /// A space that is never a break.
    pub fn sp(&mut self) -> &mut Self {
        self.append_break(BreakType::Disabled, 0)
    }

    /// An optional break.
    pub fn br(&mut self) -> &mut Self {
        self.append_break(BreakType::Enabled, 0)
    }

    /// A forced break.
    pub fn fbr(&mut self) -> &mut Self {
        self.append_break(BreakType::Forced, 0)
    }

    /// Start a new line unless already at the start of one.
    pub fn line_start(&mut self) -> &mut Self {
        self.append_break(BreakType::LineStart, 0)
    }

    /// An optional break that indents by one level.
    pub fn ind(&mut self) -> &mut Self {
        let step = self.level_indent;
        self.append_break(BreakType::Enabled, step)
    }

    /// An optional break with an explicit indent.
    pub fn ibr(&mut self, indent: isize) -> &mut Self {
        self.append_break(BreakType::Enabled, indent)
    }

    /// Outdent one level, by adjusting the break just appended.
    pub fn und(&mut self) -> &mut Self {
        self.adjust_indent(-1)
    }

    /// Adjust the indentation of the break just appended by `steps` levels.
    pub fn adjust_indent(&mut self, steps: isize) -> &mut Self {
        let delta = steps * self.level_indent;
        match self.current().elements.last_mut() {
            Some(BpElement::Break(b)) => b.indent += delta,
            Some(_) => {
                self.misuse = Some("indent adjusted when previous element is not a break".into());
            }
            None => self.misuse = Some("indent adjusted in an empty box".into()),
        }
        self
    }

    /// A binary operator: space, `t`, then an optional break.
    pub fn op(&mut self, t: &str) -> &mut Self {
        self.sp().text(t).br()
    }

    /// Open a nested box.
    pub fn begin(&mut self, kind: BoxKind) -> &mut Self {
        self.stack.push(BpBox::new(kind));
        self
    }

    /// Close the innermost open box.
    pub fn end(&mut self) -> &mut Self {
        if self.stack.len() <= 1 {
            self.misuse = Some("end() without a matching begin()".into());
            return self;
        }
        if let Some(done) = self.stack.pop() {
            self.append(BpElement::Box(done));
        }
        self
    }

    /// Remove and return the tree built so far, leaving the builder ready
    /// for a new one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` if boxes are still open, `end` was called
    /// too often, or an indent adjustment did not follow a break.
    pub fn take_tree(&mut self) -> Result<BpBox, GdvError> {
        let misuse = self.misuse.take();
        let open = self.stack.len();
        let tree = std::mem::replace(&mut self.stack, vec![BpBox::new(BoxKind::Vertical)]);
        if let Some(msg) = misuse {
            return Err(GdvError::new(ErrorCode::InvalidOptions, msg));
        }
        if open != 1 {
            return Err(GdvError::new(
                ErrorCode::InvalidOptions,
                format!("{} boxes still open", open - 1),
            ));
        }
        tree.into_iter()
            .next()
            .ok_or_else(|| GdvError::new(ErrorCode::InvalidOptions, "no box"))
    }
}
