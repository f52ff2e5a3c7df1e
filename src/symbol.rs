use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::trace;

/// An interned name.
///
/// Symbols are cheap to copy and compare: equality and hashing use the
/// dense index assigned by the process-wide table, and the name bytes are
/// stored with `'static` lifetime so reading them never takes a lock.
///
/// Ordering puts `null` first, then `false`, then `true`, then every other
/// symbol by name bytes.
#[derive(Clone, Copy)]
pub struct Symbol {
    index: u32,
    name: &'static [u8],
}

const NULL_INDEX: u32 = 0;
const FALSE_INDEX: u32 = 1;
const TRUE_INDEX: u32 = 2;
const WELL_KNOWN: [&[u8]; 3] = [b"null", b"false", b"true"];

impl Symbol {
    /// The `null` symbol.
    pub const NULL: Self = Self {
        index: NULL_INDEX,
        name: b"null",
    };
    /// The `false` symbol.
    pub const FALSE: Self = Self {
        index: FALSE_INDEX,
        name: b"false",
    };
    /// The `true` symbol.
    pub const TRUE: Self = Self {
        index: TRUE_INDEX,
        name: b"true",
    };

    /// Intern `name` in the process-wide table, returning its symbol.
    ///
    /// Interning the same bytes always yields the same symbol.
    pub fn intern(name: impl AsRef<[u8]>) -> Self {
        with_global(|table| table.intern(name.as_ref()))
    }

    /// Look up an already-interned name without adding it.
    #[must_use]
    pub fn lookup(name: impl AsRef<[u8]>) -> Option<Self> {
        with_global(|table| table.by_name.get(name.as_ref()).copied())
    }

    /// The symbol with dense index `index`, if one has been interned.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        with_global(|table| table.by_index.get(index as usize).copied())
    }

    /// Number of symbols interned so far in the process-wide table.
    #[must_use]
    pub fn table_len() -> usize {
        with_global(|table| table.by_index.len())
    }

    /// Dense index of this symbol.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// The name bytes.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static [u8] {
        self.name
    }

    /// The name as text, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        crate::utf8::validate(self.name).ok()
    }

    /// True for `null`.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index == NULL_INDEX
    }

    /// True for `true` and `false`.
    #[inline]
    #[must_use]
    pub const fn is_bool(self) -> bool {
        self.index == FALSE_INDEX || self.index == TRUE_INDEX
    }

    /// True if the name can be written without backquotes:
    /// `[A-Za-z_][A-Za-z0-9_]*`.
    #[must_use]
    pub fn is_identifier(self) -> bool {
        is_identifier(self.name)
    }

    const fn rank(self) -> u32 {
        if self.index <= TRUE_INDEX {
            self.index
        } else {
            TRUE_INDEX + 1
        }
    }
}

pub(crate) fn is_identifier(name: &[u8]) -> bool {
    match name.split_first() {
        Some((first, rest)) => {
            (first.is_ascii_alphabetic() || *first == b'_')
                && rest.iter().all(|c| c.is_ascii_alphanumeric() || *c == b'_')
        }
        None => false,
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::NULL
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.index == other.index {
            return Ordering::Equal;
        }
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.name.cmp(other.name))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", String::from_utf8_lossy(self.name))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.name))
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::intern(name)
    }
}

struct GlobalTable {
    by_name: HashMap<&'static [u8], Symbol>,
    by_index: Vec<Symbol>,
}

impl GlobalTable {
    fn new() -> Self {
        let mut table = Self {
            by_name: HashMap::new(),
            by_index: Vec::new(),
        };
        for name in WELL_KNOWN {
            table.insert_static(name);
        }
        table
    }

    fn insert_static(&mut self, name: &'static [u8]) -> Symbol {
        let index = u32::try_from(self.by_index.len()).unwrap_or(u32::MAX);
        let sym = Symbol { index, name };
        self.by_name.insert(name, sym);
        self.by_index.push(sym);
        sym
    }

    fn intern(&mut self, name: &[u8]) -> Symbol {
        if let Some(sym) = self.by_name.get(name) {
            return *sym;
        }
        // Names live for the rest of the process.
        let leaked: &'static [u8] = Box::leak(name.to_vec().into_boxed_slice());
        let sym = self.insert_static(leaked);
        trace!(index = sym.index, "interned symbol");
        sym
    }
}

static GLOBAL: OnceLock<Mutex<GlobalTable>> = OnceLock::new();

fn with_global<R>(f: impl FnOnce(&mut GlobalTable) -> R) -> R {
    let mutex = GLOBAL.get_or_init(|| Mutex::new(GlobalTable::new()));
    // Interning never panics mid-update, so a poisoned table is still consistent.
    let mut guard = mutex.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// A standalone, append-only symbol table.
///
/// The process-wide table behind [`Symbol`] is the one values use; this type
/// is for callers that need an isolated name/index mapping with the same
/// semantics (dense indices, `null`/`false`/`true` pre-interned at 0, 1, 2).
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Vec<Box<[u8]>>,
    by_name: HashMap<Box<[u8]>, u32>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the well-known symbols.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::new(),
            by_name: HashMap::new(),
        };
        for name in WELL_KNOWN {
            table.intern(name);
        }
        table
    }

    /// Intern `name`, returning its index.
    pub fn intern(&mut self, name: impl AsRef<[u8]>) -> u32 {
        let name = name.as_ref();
        if let Some(index) = self.by_name.get(name) {
            return *index;
        }
        let index = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        let owned: Box<[u8]> = name.into();
        self.names.push(owned.clone());
        self.by_name.insert(owned, index);
        index
    }

    /// The index of `name`, if interned.
    #[must_use]
    pub fn lookup(&self, name: impl AsRef<[u8]>) -> Option<u32> {
        self.by_name.get(name.as_ref()).copied()
    }

    /// The name at `index`, if any.
    #[must_use]
    pub fn name(&self, index: u32) -> Option<&[u8]> {
        self.names.get(index as usize).map(AsRef::as_ref)
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Never true: the well-known names are always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
