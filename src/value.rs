use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::{ErrorCode, GdvError, GdvInteger, GdvString, Kind, Symbol};

/// Elements of a set, in value order.
pub type GdvSet = BTreeSet<Value>;
/// Entries of a map, in key order.
pub type GdvMap = BTreeMap<Value, Value>;
/// Entries of an ordered map, in insertion order.
pub type GdvOrderedMap = IndexMap<Value, Value>;

/// A generic data value.
///
/// Every container carries a tag symbol; [`Symbol::NULL`] means untagged.
/// Children are owned exclusively, so `clone` is a deep copy.
#[derive(Clone)]
pub enum Value {
    /// A symbol, including `null`, `false` and `true`.
    Symbol(Symbol),
    /// An integer of any magnitude.
    Integer(GdvInteger),
    /// A byte string.
    String(GdvString),
    /// `[...]` or `tag[...]`.
    Sequence {
        /// Container tag.
        tag: Symbol,
        /// Elements in order.
        elements: Vec<Value>,
    },
    /// `(...)` or `tag(...)`.
    Tuple {
        /// Container tag.
        tag: Symbol,
        /// Elements in order.
        elements: Vec<Value>,
    },
    /// `{...}` or `tag{...}` with no `:`.
    Set {
        /// Container tag.
        tag: Symbol,
        /// Unique elements.
        elements: GdvSet,
    },
    /// `{k:v ...}` or `tag{k:v ...}`.
    Map {
        /// Container tag.
        tag: Symbol,
        /// Unique keys with values.
        entries: GdvMap,
    },
    /// `[k:v ...]` or `tag[k:v ...]`.
    OrderedMap {
        /// Container tag.
        tag: Symbol,
        /// Unique keys with values, in insertion order.
        entries: GdvOrderedMap,
    },
}

impl Default for Value {
    fn default() -> Self {
        Self::Symbol(Symbol::NULL)
    }
}

// ----------------------------- construction ------------------------------

impl Value {
    /// `null`.
    #[must_use]
    pub const fn null() -> Self {
        Self::Symbol(Symbol::NULL)
    }

    /// A symbol with `name`, interning it.
    #[must_use]
    pub fn symbol(name: impl AsRef<[u8]>) -> Self {
        Self::Symbol(Symbol::intern(name))
    }

    /// An untagged sequence.
    #[must_use]
    pub const fn sequence(elements: Vec<Self>) -> Self {
        Self::Sequence {
            tag: Symbol::NULL,
            elements,
        }
    }

    /// A tagged sequence.
    #[must_use]
    pub const fn tagged_sequence(tag: Symbol, elements: Vec<Self>) -> Self {
        Self::Sequence { tag, elements }
    }

    /// An untagged tuple.
    #[must_use]
    pub const fn tuple(elements: Vec<Self>) -> Self {
        Self::Tuple {
            tag: Symbol::NULL,
            elements,
        }
    }

    /// A tagged tuple.
    #[must_use]
    pub const fn tagged_tuple(tag: Symbol, elements: Vec<Self>) -> Self {
        Self::Tuple { tag, elements }
    }

    /// An untagged set. Duplicate elements collapse.
    #[must_use]
    pub fn set(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Set {
            tag: Symbol::NULL,
            elements: elements.into_iter().collect(),
        }
    }

    /// A tagged set. Duplicate elements collapse.
    #[must_use]
    pub fn tagged_set(tag: Symbol, elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Set {
            tag,
            elements: elements.into_iter().collect(),
        }
    }

    /// An untagged map.
    #[must_use]
    pub const fn map(entries: GdvMap) -> Self {
        Self::Map {
            tag: Symbol::NULL,
            entries,
        }
    }

    /// A tagged map.
    #[must_use]
    pub const fn tagged_map(tag: Symbol, entries: GdvMap) -> Self {
        Self::Map { tag, entries }
    }

    /// An untagged ordered map.
    #[must_use]
    pub const fn ordered_map(entries: GdvOrderedMap) -> Self {
        Self::OrderedMap {
            tag: Symbol::NULL,
            entries,
        }
    }

    /// A tagged ordered map.
    #[must_use]
    pub const fn tagged_ordered_map(tag: Symbol, entries: GdvOrderedMap) -> Self {
        Self::OrderedMap { tag, entries }
    }

    /// An empty (or zero, or `null`) value of `kind`.
    ///
    /// Tagged kinds get the `null` tag, which reads back as untagged; set
    /// a real tag with [`Value::container_set_tag`].
    #[must_use]
    pub fn new_of_kind(kind: Kind) -> Self {
        match kind.untagged() {
            Kind::Symbol => Self::null(),
            Kind::Integer | Kind::SmallInteger => Self::Integer(GdvInteger::ZERO),
            Kind::String => Self::String(GdvString::new()),
            Kind::Sequence => Self::sequence(Vec::new()),
            Kind::Tuple => Self::tuple(Vec::new()),
            Kind::Set => Self::set([]),
            Kind::Map => Self::map(GdvMap::new()),
            _ => Self::ordered_map(GdvOrderedMap::new()),
        }
    }

    /// A map built from `entries`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMapKey` if a key repeats.
    pub fn map_from_entries(
        entries: impl IntoIterator<Item = (Self, Self)>,
    ) -> Result<Self, GdvError> {
        let mut map = GdvMap::new();
        for (k, v) in entries {
            if map.contains_key(&k) {
                return Err(duplicate_key_error("map", &k));
            }
            map.insert(k, v);
        }
        Ok(Self::map(map))
    }

    /// An ordered map built from `entries`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMapKey` if a key repeats.
    pub fn ordered_map_from_entries(
        entries: impl IntoIterator<Item = (Self, Self)>,
    ) -> Result<Self, GdvError> {
        let mut map = GdvOrderedMap::new();
        for (k, v) in entries {
            if map.contains_key(&k) {
                return Err(duplicate_key_error("ordered map", &k));
            }
            map.insert(k, v);
        }
        Ok(Self::ordered_map(map))
    }
}

pub(crate) fn duplicate_key_error(what: &str, key: &Value) -> GdvError {
    GdvError::new(
        ErrorCode::DuplicateMapKey,
        format!("Duplicate {what} key: {}", key.as_truncated_string(60)),
    )
}

// ----------------------------- kind queries ------------------------------

impl Value {
    /// The kind, distinguishing small from large integers and tagged from
    /// untagged containers.
    #[must_use]
    pub fn kind(&self) -> Kind {
        let (base, tag) = match self {
            Self::Symbol(_) => return Kind::Symbol,
            Self::Integer(i) => {
                return if i.is_small() {
                    Kind::SmallInteger
                } else {
                    Kind::Integer
                }
            }
            Self::String(_) => return Kind::String,
            Self::Sequence { tag, .. } => (Kind::Sequence, tag),
            Self::Tuple { tag, .. } => (Kind::Tuple, tag),
            Self::Set { tag, .. } => (Kind::Set, tag),
            Self::Map { tag, .. } => (Kind::Map, tag),
            Self::OrderedMap { tag, .. } => (Kind::OrderedMap, tag),
        };
        if tag.is_null() {
            base
        } else {
            base.tagged()
        }
    }

    /// [`Value::kind`] with small integers reported as [`Kind::Integer`].
    #[must_use]
    pub fn super_kind(&self) -> Kind {
        self.kind().super_kind()
    }

    /// True for `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Symbol(s) if s.is_null())
    }

    /// True for `true` and `false`.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Symbol(s) if s.is_bool())
    }

    /// True for any symbol, including `null` and the booleans.
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// True for any integer.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// True for an integer that fits `i64`.
    #[must_use]
    pub const fn is_small_integer(&self) -> bool {
        matches!(self, Self::Integer(i) if i.is_small())
    }

    /// True for a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// True for a sequence, tagged or not.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence { .. })
    }

    /// True for a tagged sequence.
    #[must_use]
    pub fn is_tagged_sequence(&self) -> bool {
        self.kind() == Kind::TaggedSequence
    }

    /// True for a tuple, tagged or not.
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple { .. })
    }

    /// True for a tagged tuple.
    #[must_use]
    pub fn is_tagged_tuple(&self) -> bool {
        self.kind() == Kind::TaggedTuple
    }

    /// True for a set, tagged or not.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }

    /// True for a tagged set.
    #[must_use]
    pub fn is_tagged_set(&self) -> bool {
        self.kind() == Kind::TaggedSet
    }

    /// True for a map, tagged or not.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map { .. })
    }

    /// True for a tagged map.
    #[must_use]
    pub fn is_tagged_map(&self) -> bool {
        self.kind() == Kind::TaggedMap
    }

    /// True for an ordered map, tagged or not.
    #[must_use]
    pub const fn is_ordered_map(&self) -> bool {
        matches!(self, Self::OrderedMap { .. })
    }

    /// True for a tagged ordered map.
    #[must_use]
    pub fn is_tagged_ordered_map(&self) -> bool {
        self.kind() == Kind::TaggedOrderedMap
    }

    /// True for a map or an ordered map, tagged or not.
    #[must_use]
    pub const fn is_po_map(&self) -> bool {
        matches!(self, Self::Map { .. } | Self::OrderedMap { .. })
    }

    /// True for any container.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        !matches!(self, Self::Symbol(_) | Self::Integer(_) | Self::String(_))
    }

    /// True for a container with a non-null tag.
    #[must_use]
    pub fn is_tagged_container(&self) -> bool {
        self.kind().is_tagged()
    }

    /// True for sequences, tuples and ordered maps.
    #[must_use]
    pub const fn is_ordered_container(&self) -> bool {
        matches!(
            self,
            Self::Sequence { .. } | Self::Tuple { .. } | Self::OrderedMap { .. }
        )
    }

    /// True for sets and maps.
    #[must_use]
    pub const fn is_unordered_container(&self) -> bool {
        matches!(self, Self::Set { .. } | Self::Map { .. })
    }

    /// Number of elements for containers, 0 for `null`, and 1 for any other
    /// scalar.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Symbol(s) if s.is_null() => 0,
            Self::Symbol(_) | Self::Integer(_) | Self::String(_) => 1,
            Self::Sequence { elements, .. } | Self::Tuple { elements, .. } => elements.len(),
            Self::Set { elements, .. } => elements.len(),
            Self::Map { entries, .. } => entries.len(),
            Self::OrderedMap { entries, .. } => entries.len(),
        }
    }

    /// True if [`Value::size`] is 0.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Reset to `null`.
    pub fn clear(&mut self) {
        *self = Self::null();
    }
}

// ------------------------------- scalars ---------------------------------

impl Value {
    /// The boolean value.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is `true` or `false`.
    pub fn bool_get(&self) -> Result<bool, GdvError> {
        match self {
            Self::Symbol(s) if *s == Symbol::TRUE => Ok(true),
            Self::Symbol(s) if *s == Symbol::FALSE => Ok(false),
            Self::Symbol(s) => Err(GdvError::wrong_kind(Kind::Symbol, Kind::Symbol)
                .with_message(format!("expected symbol `true` or `false`, not `{s}`"))),
            other => Err(GdvError::wrong_kind(Kind::Symbol, other.kind())),
        }
    }

    /// Become `true` or `false`.
    pub fn bool_set(&mut self, b: bool) {
        *self = Self::from(b);
    }

    /// The symbol.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a symbol.
    pub fn symbol_get(&self) -> Result<Symbol, GdvError> {
        match self {
            Self::Symbol(s) => Ok(*s),
            other => Err(GdvError::wrong_kind(Kind::Symbol, other.kind())),
        }
    }

    /// The symbol's name bytes.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a symbol.
    pub fn symbol_name(&self) -> Result<&'static [u8], GdvError> {
        self.symbol_get().map(Symbol::name)
    }

    /// Become a symbol.
    pub fn symbol_set(&mut self, sym: Symbol) {
        *self = Self::Symbol(sym);
    }

    /// The integer.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is an integer.
    pub fn integer_get(&self) -> Result<&GdvInteger, GdvError> {
        match self {
            Self::Integer(i) => Ok(i),
            other => Err(GdvError::wrong_kind(Kind::Integer, other.kind())),
        }
    }

    /// The integer as `i64`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is an integer that fits `i64`.
    pub fn small_integer_get(&self) -> Result<i64, GdvError> {
        match self {
            Self::Integer(i) => i
                .get_as_small()
                .ok_or_else(|| GdvError::wrong_kind(Kind::SmallInteger, Kind::Integer)),
            other => Err(GdvError::wrong_kind(Kind::SmallInteger, other.kind())),
        }
    }

    /// Become an integer.
    pub fn integer_set(&mut self, i: impl Into<GdvInteger>) {
        *self = Self::Integer(i.into());
    }

    /// The string.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a string.
    pub fn string_get(&self) -> Result<&GdvString, GdvError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(GdvError::wrong_kind(Kind::String, other.kind())),
        }
    }

    /// Mutable access to the string.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a string.
    pub fn string_get_mut(&mut self) -> Result<&mut GdvString, GdvError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(GdvError::wrong_kind(Kind::String, other.kind())),
        }
    }

    /// Become a string.
    pub fn string_set(&mut self, s: impl Into<GdvString>) {
        *self = Self::String(s.into());
    }
}

// ------------------------- sequences and tuples --------------------------

macro_rules! vec_container_ops {
    (
        $variant:ident, $kind:expr,
        $get:ident, $get_mut:ident, $set:ident, $append:ident, $resize:ident,
        $clear:ident, $get_at:ident, $get_at_mut:ident, $set_at:ident
    ) => {
        impl Value {
            #[doc = concat!("The elements of a ", stringify!($variant), ", tagged or not.")]
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $get(&self) -> Result<&Vec<Self>, GdvError> {
                match self {
                    Self::$variant { elements, .. } => Ok(elements),
                    other => Err(GdvError::wrong_kind($kind, other.kind())),
                }
            }

            #[doc = concat!("Mutable elements of a ", stringify!($variant), ".")]
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $get_mut(&mut self) -> Result<&mut Vec<Self>, GdvError> {
                match self {
                    Self::$variant { elements, .. } => Ok(elements),
                    other => Err(GdvError::wrong_kind($kind, other.kind())),
                }
            }

            #[doc = concat!("Become an untagged ", stringify!($variant), " of `elements`.")]
            pub fn $set(&mut self, elements: Vec<Self>) {
                *self = Self::$variant {
                    tag: Symbol::NULL,
                    elements,
                };
            }

            /// Append one element.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $append(&mut self, value: impl Into<Self>) -> Result<(), GdvError> {
                self.$get_mut()?.push(value.into());
                Ok(())
            }

            /// Truncate, or extend with `null`, to `len` elements.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $resize(&mut self, len: usize) -> Result<(), GdvError> {
                self.$get_mut()?.resize(len, Self::null());
                Ok(())
            }

            /// Remove every element, keeping the tag.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $clear(&mut self) -> Result<(), GdvError> {
                self.$get_mut()?.clear();
                Ok(())
            }

            /// The element at `index`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind, and `IndexOutOfRange`
            /// past the end.
            pub fn $get_at(&self, index: usize) -> Result<&Self, GdvError> {
                let elements = self.$get()?;
                elements
                    .get(index)
                    .ok_or_else(|| index_error(index, elements.len()))
            }

            /// Mutable access to the element at `index`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind, and `IndexOutOfRange`
            /// past the end.
            pub fn $get_at_mut(&mut self, index: usize) -> Result<&mut Self, GdvError> {
                let elements = self.$get_mut()?;
                let len = elements.len();
                elements.get_mut(index).ok_or_else(|| index_error(index, len))
            }

            /// Store `value` at `index`, first growing with `null` if needed.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind, and `IndexOutOfRange`
            /// when `index + 1` overflows.
            pub fn $set_at(&mut self, index: usize, value: impl Into<Self>) -> Result<(), GdvError> {
                let elements = self.$get_mut()?;
                if index >= elements.len() {
                    let len = index
                        .checked_add(1)
                        .ok_or_else(|| index_error(index, elements.len()))?;
                    elements.resize(len, Self::null());
                }
                elements[index] = value.into();
                Ok(())
            }
        }
    };
}

vec_container_ops!(
    Sequence,
    Kind::Sequence,
    sequence_get,
    sequence_get_mut,
    sequence_set,
    sequence_append,
    sequence_resize,
    sequence_clear,
    sequence_get_value_at,
    sequence_get_value_at_mut,
    sequence_set_value_at
);

vec_container_ops!(
    Tuple,
    Kind::Tuple,
    tuple_get,
    tuple_get_mut,
    tuple_set,
    tuple_append,
    tuple_resize,
    tuple_clear,
    tuple_get_value_at,
    tuple_get_value_at_mut,
    tuple_set_value_at
);

fn index_error(index: usize, len: usize) -> GdvError {
    GdvError::new(
        ErrorCode::IndexOutOfRange,
        format!("index {index} out of range for container of size {len}"),
    )
}

// --------------------------------- sets ----------------------------------

impl Value {
    /// The elements of a set, tagged or not.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for any other kind.
    pub fn set_get(&self) -> Result<&GdvSet, GdvError> {
        match self {
            Self::Set { elements, .. } => Ok(elements),
            other => Err(GdvError::wrong_kind(Kind::Set, other.kind())),
        }
    }

    /// Mutable elements of a set.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for any other kind.
    pub fn set_get_mut(&mut self) -> Result<&mut GdvSet, GdvError> {
        match self {
            Self::Set { elements, .. } => Ok(elements),
            other => Err(GdvError::wrong_kind(Kind::Set, other.kind())),
        }
    }

    /// Become an untagged set of `elements`.
    pub fn set_set(&mut self, elements: GdvSet) {
        *self = Self::Set {
            tag: Symbol::NULL,
            elements,
        };
    }

    /// Insert `value`; returns false if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for any other kind.
    pub fn set_insert(&mut self, value: impl Into<Self>) -> Result<bool, GdvError> {
        Ok(self.set_get_mut()?.insert(value.into()))
    }

    /// Remove `value`; returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for any other kind.
    pub fn set_remove(&mut self, value: &Self) -> Result<bool, GdvError> {
        Ok(self.set_get_mut()?.remove(value))
    }

    /// Whether `value` is an element.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for any other kind.
    pub fn set_contains(&self, value: &Self) -> Result<bool, GdvError> {
        Ok(self.set_get()?.contains(value))
    }

    /// Remove every element, keeping the tag.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for any other kind.
    pub fn set_clear(&mut self) -> Result<(), GdvError> {
        self.set_get_mut()?.clear();
        Ok(())
    }
}

// --------------------------------- maps ----------------------------------

fn key_not_found(key: &Value) -> GdvError {
    GdvError::new(
        ErrorCode::KeyNotFound,
        format!("key not found: {}", key.as_truncated_string(60)),
    )
}

/// A symbol key that is not interned cannot be present in any map.
fn existing_symbol_key(name: &str) -> Option<Value> {
    Symbol::lookup(name).map(Value::Symbol)
}

macro_rules! map_container_ops {
    (
        $variant:ident, $kind:expr, $map:ty, $remove:ident,
        $get:ident, $get_mut:ident, $set:ident,
        $get_at:ident, $get_at_opt:ident, $get_at_mut:ident, $set_at:ident,
        $remove_key:ident, $contains:ident, $clear:ident,
        $get_at_sym:ident, $set_at_sym:ident, $contains_sym:ident, $remove_key_sym:ident
    ) => {
        impl Value {
            #[doc = concat!("The entries of a ", stringify!($variant), ", tagged or not.")]
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $get(&self) -> Result<&$map, GdvError> {
                match self {
                    Self::$variant { entries, .. } => Ok(entries),
                    other => Err(GdvError::wrong_kind($kind, other.kind())),
                }
            }

            #[doc = concat!("Mutable entries of a ", stringify!($variant), ".")]
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $get_mut(&mut self) -> Result<&mut $map, GdvError> {
                match self {
                    Self::$variant { entries, .. } => Ok(entries),
                    other => Err(GdvError::wrong_kind($kind, other.kind())),
                }
            }

            #[doc = concat!("Become an untagged ", stringify!($variant), " of `entries`.")]
            pub fn $set(&mut self, entries: $map) {
                *self = Self::$variant {
                    tag: Symbol::NULL,
                    entries,
                };
            }

            /// The value stored under `key`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind, and `KeyNotFound` if
            /// the key is absent.
            pub fn $get_at(&self, key: &Self) -> Result<&Self, GdvError> {
                self.$get()?.get(key).ok_or_else(|| key_not_found(key))
            }

            /// The value stored under `key`, or `None`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $get_at_opt(&self, key: &Self) -> Result<Option<&Self>, GdvError> {
                Ok(self.$get()?.get(key))
            }

            /// Mutable access to the value stored under `key`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind, and `KeyNotFound` if
            /// the key is absent.
            pub fn $get_at_mut(&mut self, key: &Self) -> Result<&mut Self, GdvError> {
                self.$get_mut()?.get_mut(key).ok_or_else(|| key_not_found(key))
            }

            /// Store `value` under `key`, overwriting any previous value.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $set_at(
                &mut self,
                key: impl Into<Self>,
                value: impl Into<Self>,
            ) -> Result<(), GdvError> {
                self.$get_mut()?.insert(key.into(), value.into());
                Ok(())
            }

            /// Remove `key`; returns whether it was present.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $remove_key(&mut self, key: &Self) -> Result<bool, GdvError> {
                Ok(self.$get_mut()?.$remove(key).is_some())
            }

            /// Whether `key` is present.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $contains(&self, key: &Self) -> Result<bool, GdvError> {
                Ok(self.$get()?.contains_key(key))
            }

            /// Remove every entry, keeping the tag.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $clear(&mut self) -> Result<(), GdvError> {
                self.$get_mut()?.clear();
                Ok(())
            }

            /// The value under the symbol key `name`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind, and `KeyNotFound` if
            /// the key is absent.
            pub fn $get_at_sym(&self, name: &str) -> Result<&Self, GdvError> {
                let entries = self.$get()?;
                existing_symbol_key(name)
                    .and_then(|key| entries.get(&key))
                    .ok_or_else(|| key_not_found(&Self::symbol(name)))
            }

            /// Store `value` under the symbol key `name`.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $set_at_sym(&mut self, name: &str, value: impl Into<Self>) -> Result<(), GdvError> {
                self.$set_at(Self::symbol(name), value)
            }

            /// Whether the symbol key `name` is present.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $contains_sym(&self, name: &str) -> Result<bool, GdvError> {
                let entries = self.$get()?;
                Ok(existing_symbol_key(name).is_some_and(|key| entries.contains_key(&key)))
            }

            /// Remove the symbol key `name`; returns whether it was present.
            ///
            /// # Errors
            ///
            /// Returns `WrongKind` for any other kind.
            pub fn $remove_key_sym(&mut self, name: &str) -> Result<bool, GdvError> {
                let entries = self.$get_mut()?;
                Ok(existing_symbol_key(name).is_some_and(|key| entries.$remove(&key).is_some()))
            }
        }
    };
}

map_container_ops!(
    Map,
    Kind::Map,
    GdvMap,
    remove,
    map_get,
    map_get_mut,
    map_set,
    map_get_value_at,
    map_get_value_at_opt,
    map_get_value_at_mut,
    map_set_value_at,
    map_remove_key,
    map_contains,
    map_clear,
    map_get_value_at_sym,
    map_set_value_at_sym,
    map_contains_sym,
    map_remove_key_sym
);

map_container_ops!(
    OrderedMap,
    Kind::OrderedMap,
    GdvOrderedMap,
    shift_remove,
    ordered_map_get,
    ordered_map_get_mut,
    ordered_map_set,
    ordered_map_get_value_at,
    ordered_map_get_value_at_opt,
    ordered_map_get_value_at_mut,
    ordered_map_set_value_at,
    ordered_map_remove_key,
    ordered_map_contains,
    ordered_map_clear,
    ordered_map_get_value_at_sym,
    ordered_map_set_value_at_sym,
    ordered_map_contains_sym,
    ordered_map_remove_key_sym
);

// ------------------------------ containers -------------------------------

impl Value {
    fn tag_slot(&mut self) -> Option<&mut Symbol> {
        match self {
            Self::Symbol(_) | Self::Integer(_) | Self::String(_) => None,
            Self::Sequence { tag, .. }
            | Self::Tuple { tag, .. }
            | Self::Set { tag, .. }
            | Self::Map { tag, .. }
            | Self::OrderedMap { tag, .. } => Some(tag),
        }
    }

    /// The container's tag; `null` when untagged.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for scalars.
    pub fn container_tag(&self) -> Result<Symbol, GdvError> {
        match self {
            Self::Sequence { tag, .. }
            | Self::Tuple { tag, .. }
            | Self::Set { tag, .. }
            | Self::Map { tag, .. }
            | Self::OrderedMap { tag, .. } => Ok(*tag),
            other => Err(GdvError::wrong_kind(Kind::Sequence, other.kind())
                .with_message(format!("expected container, not {}", other.kind()))),
        }
    }

    /// Replace the container's tag. Setting `null` makes it untagged.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for scalars.
    pub fn container_set_tag(&mut self, new_tag: Symbol) -> Result<(), GdvError> {
        let kind = self.kind();
        match self.tag_slot() {
            Some(tag) => {
                *tag = new_tag;
                Ok(())
            }
            None => Err(GdvError::wrong_kind(Kind::Sequence, kind)
                .with_message(format!("expected container, not {kind}"))),
        }
    }

    /// Number of elements in a container.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for scalars.
    pub fn container_size(&self) -> Result<usize, GdvError> {
        self.container_tag()?;
        Ok(self.size())
    }

    /// Whether a container has no elements.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` for scalars.
    pub fn container_is_empty(&self) -> Result<bool, GdvError> {
        self.container_size().map(|n| n == 0)
    }

    /// Recursively verify internal invariants.
    ///
    /// # Errors
    ///
    /// Returns `Invariant` describing the first violation found.
    pub fn self_check(&self) -> Result<(), GdvError> {
        let violation = |what: &str| GdvError::new(ErrorCode::Invariant, what.to_owned());
        match self {
            Self::Symbol(_) | Self::String(_) => Ok(()),
            Self::Integer(i) => {
                if i.is_normalized() {
                    Ok(())
                } else {
                    Err(violation("integer is large but fits i64"))
                }
            }
            Self::Sequence { elements, .. } | Self::Tuple { elements, .. } => {
                elements.iter().try_for_each(Self::self_check)
            }
            Self::Set { elements, .. } => {
                let mut prev: Option<&Self> = None;
                for e in elements {
                    if prev.is_some_and(|p| p >= e) {
                        return Err(violation("set elements are not strictly increasing"));
                    }
                    e.self_check()?;
                    prev = Some(e);
                }
                Ok(())
            }
            Self::Map { entries, .. } => {
                let mut prev: Option<&Self> = None;
                for (k, v) in entries {
                    if prev.is_some_and(|p| p >= k) {
                        return Err(violation("map keys are not strictly increasing"));
                    }
                    k.self_check()?;
                    v.self_check()?;
                    prev = Some(k);
                }
                Ok(())
            }
            Self::OrderedMap { entries, .. } => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    if entries.get_index_of(k) != Some(i) {
                        return Err(violation("ordered map index is inconsistent"));
                    }
                    k.self_check()?;
                    v.self_check()?;
                }
                Ok(())
            }
        }
    }
}

// --------------------------------- From ----------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Symbol(if b { Symbol::TRUE } else { Symbol::FALSE })
    }
}

macro_rules! impl_from_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Integer(GdvInteger::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::Integer(GdvInteger::from_big(value))
    }
}

impl From<GdvInteger> for Value {
    fn from(value: GdvInteger) -> Self {
        Self::Integer(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(GdvString::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(GdvString::from(value))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::String(GdvString::from(value))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::String(GdvString::from(value))
    }
}

impl From<GdvString> for Value {
    fn from(value: GdvString) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(elements: Vec<Self>) -> Self {
        Self::sequence(elements)
    }
}

impl From<GdvSet> for Value {
    fn from(elements: GdvSet) -> Self {
        Self::Set {
            tag: Symbol::NULL,
            elements,
        }
    }
}

impl From<GdvMap> for Value {
    fn from(entries: GdvMap) -> Self {
        Self::map(entries)
    }
}

impl From<GdvOrderedMap> for Value {
    fn from(entries: GdvOrderedMap) -> Self {
        Self::ordered_map(entries)
    }
}
