//! Width-aware line breaking over a tree of text, breaks and groups.
//!
//! Rendering is two passes per group: a scan that measures how much flat
//! text follows each break (up to the next break), then a print that
//! decides each break against the space left on the current line.

use tracing::trace;

/// How a break behaves when it is not taken, and when it is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Always a newline.
    Always,
    /// A space, or a newline if what follows does not fit.
    SpaceOrNewline,
    /// Nothing, or a newline if what follows does not fit.
    NothingOrNewline,
    /// Nothing, unless what follows does not fit on this line but does fit
    /// on the next one.
    NewlineIfFitsBelow,
}

impl BreakKind {
    const fn flat_len(self) -> usize {
        match self {
            Self::Always => INFINITE,
            Self::SpaceOrNewline => 1,
            Self::NothingOrNewline | Self::NewlineIfFitsBelow => 0,
        }
    }
}

/// How the breaks directly inside a group are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStyle {
    /// Each break is decided on its own.
    Fill,
    /// All breaks are taken, or none: none if the whole group fits on the
    /// rest of the line.
    Correlated,
    /// Every break is taken.
    Vertical,
}

/// A layout node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal bytes. Must not contain newlines.
    Text(Vec<u8>),
    /// A potential line break.
    Break {
        /// Behavior.
        kind: BreakKind,
        /// Added to the enclosing group's indentation when the break is
        /// taken. Negative values outdent, e.g. for a closing delimiter.
        indent: isize,
    },
    /// A nested group.
    Group(Group),
}

impl Node {
    /// A text node.
    #[must_use]
    pub fn text(t: impl Into<Vec<u8>>) -> Self {
        Self::Text(t.into())
    }

    /// A break with no extra indentation.
    #[must_use]
    pub const fn brk(kind: BreakKind) -> Self {
        Self::Break { kind, indent: 0 }
    }

    /// A break with extra indentation.
    #[must_use]
    pub const fn brk_indent(kind: BreakKind, indent: isize) -> Self {
        Self::Break { kind, indent }
    }

    /// Flat length: the columns this node occupies if no break is taken.
    #[must_use]
    pub fn flat_len(&self) -> usize {
        match self {
            Self::Text(t) => display_width(t),
            Self::Break { kind, .. } => kind.flat_len(),
            Self::Group(g) => g.len,
        }
    }
}

/// Large enough that nothing "fits", small enough not to overflow sums.
const INFINITE: usize = usize::MAX / 4;

/// Column count of `bytes`: UTF-8 continuation bytes take no column.
fn display_width(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| (**b & 0xC0) != 0x80).count()
}

/// A sequence of nodes sharing an indentation level and break style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Indentation added, relative to the enclosing group, to lines begun
    /// by breaks in this group.
    pub indent: usize,
    /// Break decision style.
    pub style: GroupStyle,
    children: Vec<Node>,
    len: usize,
}

impl Group {
    /// An empty group.
    #[must_use]
    pub const fn new(style: GroupStyle, indent: usize) -> Self {
        Self {
            indent,
            style,
            children: Vec::new(),
            len: 0,
        }
    }

    /// Append a child.
    pub fn push(&mut self, node: Node) {
        self.len = self.len.saturating_add(node.flat_len()).min(INFINITE);
        self.children.push(node);
    }

    /// Append text.
    pub fn text(&mut self, t: impl Into<Vec<u8>>) {
        self.push(Node::text(t));
    }

    /// Append a break.
    pub fn brk(&mut self, kind: BreakKind) {
        self.push(Node::brk(kind));
    }

    /// Append a break with extra indentation.
    pub fn brk_indent(&mut self, kind: BreakKind, indent: isize) {
        self.push(Node::brk_indent(kind, indent));
    }

    /// The children.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Flat length of the whole group.
    #[must_use]
    pub const fn flat_len(&self) -> usize {
        self.len
    }

    /// Convert into a node.
    #[must_use]
    pub fn into_node(self) -> Node {
        Node::Group(self)
    }
}

impl From<Group> for Node {
    fn from(g: Group) -> Self {
        Self::Group(g)
    }
}

/// Render `node` so lines stay within `width` columns where possible.
///
/// `start_level` is both the column the first line is assumed to start at
/// and the base indentation of later lines.
#[must_use]
pub fn render(node: &Node, width: usize, start_level: usize) -> Vec<u8> {
    let mut printer = Printer {
        out: Vec::new(),
        width,
        col: start_level,
    };
    printer.print_node(node, start_level, 0);
    printer.out
}

/// [`render`] to a `String`, replacing invalid UTF-8.
#[must_use]
pub fn render_to_string(node: &Node, width: usize, start_level: usize) -> String {
    String::from_utf8_lossy(&render(node, width, start_level)).into_owned()
}

struct Printer {
    out: Vec<u8>,
    width: usize,
    col: usize,
}

impl Printer {
    fn fits(&self, len: usize) -> bool {
        self.col.saturating_add(len) <= self.width
    }

    fn newline(&mut self, level: usize) {
        self.out.push(b'\n');
        self.out.resize(self.out.len() + level, b' ');
        self.col = level;
    }

    /// `trailing` is the flat length that must follow this node on the same
    /// line unless a later break intervenes.
    fn print_node(&mut self, node: &Node, level: usize, trailing: usize) {
        match node {
            Node::Text(t) => {
                self.out.extend_from_slice(t);
                self.col += display_width(t);
            }
            // A bare break at top level has no group to decide it.
            Node::Break { kind, indent } => {
                if *kind == BreakKind::Always {
                    self.newline(offset(level, *indent));
                } else if *kind == BreakKind::SpaceOrNewline {
                    self.out.push(b' ');
                    self.col += 1;
                }
            }
            Node::Group(g) => self.print_group(g, level, trailing),
        }
    }

    fn print_group(&mut self, g: &Group, level: usize, trailing: usize) {
        let inner = level + g.indent;
        let segments = scan(&g.children, trailing);
        let break_all = match g.style {
            GroupStyle::Vertical => true,
            GroupStyle::Correlated => !self.fits(g.len.saturating_add(trailing)),
            GroupStyle::Fill => false,
        };
        if break_all && g.style == GroupStyle::Correlated {
            trace!(len = g.len, col = self.col, width = self.width, "breaking group");
        }

        for (child, &seg) in g.children.iter().zip(&segments) {
            match child {
                Node::Break { kind, indent } => {
                    let target = offset(inner, *indent);
                    let take = match kind {
                        BreakKind::Always => true,
                        BreakKind::NewlineIfFitsBelow => {
                            !self.fits(seg) && target.saturating_add(seg) <= self.width
                        }
                        BreakKind::SpaceOrNewline | BreakKind::NothingOrNewline => {
                            break_all || !self.fits(kind.flat_len().saturating_add(seg))
                        }
                    };
                    if take {
                        self.newline(target);
                    } else if *kind == BreakKind::SpaceOrNewline {
                        self.out.push(b' ');
                        self.col += 1;
                    }
                }
                other => self.print_node(other, inner, seg),
            }
        }
    }
}

fn offset(level: usize, indent: isize) -> usize {
    level.saturating_add_signed(indent)
}

/// For each child, the flat length of the siblings after it up to the next
/// break, plus `trailing` if no break follows.
fn scan(children: &[Node], trailing: usize) -> Vec<usize> {
    let mut out = vec![0; children.len()];
    let mut acc = trailing;
    for (i, child) in children.iter().enumerate().rev() {
        out[i] = acc;
        acc = match child {
            Node::Break { .. } => 0,
            other => acc.saturating_add(other.flat_len()).min(INFINITE),
        };
    }
    out
}
