//! Checked navigation through a value tree, with path-aware errors.
//!
//! A [`GdvParser`] points at one value inside a top-level value and
//! remembers how it got there. Every failed check produces an error whose
//! message begins with the path, e.g.
//! `At GDV path <top>.items[2]: expected string, not integer`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::{ErrorCode, ErrorDetail, GdvError, GdvInteger, GdvString, Kind, Symbol, Value, WriteOptions};

/// One step from a container to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep<'a> {
    /// Element of a sequence or tuple.
    Index(usize),
    /// A set element, or a map key itself.
    Key(&'a Value),
    /// The value mapped from this key.
    Value(&'a Value),
}

impl NavStep<'_> {
    fn push_to(&self, out: &mut String) {
        // Integers in paths read better in decimal.
        let opts = WriteOptions::default().with_large_integers_as_decimal(true);
        match self {
            Self::Index(i) => {
                let _ = write!(out, "[{i}]");
            }
            Self::Key(k) => {
                out.push('@');
                out.push_str(&k.as_string_with(&opts));
            }
            Self::Value(k) => {
                out.push('.');
                out.push_str(&k.as_string_with(&opts));
            }
        }
    }
}

/// A position inside a value tree.
#[derive(Debug, Clone)]
pub struct GdvParser<'a> {
    top: &'a Value,
    value: &'a Value,
    path: Vec<NavStep<'a>>,
}

macro_rules! check_is {
    ($(#[$doc:meta])* $name:ident, $pred:ident, $desc:literal, $kind:expr) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns `WrongKind` with the path otherwise.
        pub fn $name(&self) -> Result<(), GdvError> {
            if self.value.$pred() {
                Ok(())
            } else {
                Err(self.wrong_kind($desc, $kind))
            }
        }
    };
}

impl<'a> GdvParser<'a> {
    /// A parser positioned at `top`.
    #[must_use]
    pub const fn new(top: &'a Value) -> Self {
        Self {
            top,
            value: top,
            path: Vec::new(),
        }
    }

    fn child(&self, step: NavStep<'a>, value: &'a Value) -> Self {
        let mut path = self.path.clone();
        path.push(step);
        Self {
            top: self.top,
            value,
            path,
        }
    }

    /// The value at this position.
    #[must_use]
    pub const fn value(&self) -> &'a Value {
        self.value
    }

    /// The value navigation started from.
    #[must_use]
    pub const fn top_level(&self) -> &'a Value {
        self.top
    }

    /// Steps from the top-level value to here.
    #[must_use]
    pub fn path(&self) -> &[NavStep<'a>] {
        &self.path
    }

    /// `<top>` followed by each step, e.g. `<top>[1].name@3`.
    #[must_use]
    pub fn path_string(&self) -> String {
        let mut out = String::from("<top>");
        for step in &self.path {
            step.push_to(&mut out);
        }
        out
    }

    /// Compact GDVN of the current value.
    #[must_use]
    pub fn value_gdvn(&self) -> String {
        self.value.as_string()
    }

    /// An error at this position.
    #[must_use]
    pub fn error(&self, code: ErrorCode, message: impl AsRef<str>) -> GdvError {
        GdvError::new(
            code,
            format!("At GDV path {}: {}", self.path_string(), message.as_ref()),
        )
    }

    fn wrong_kind(&self, desc: &str, expected: Kind) -> GdvError {
        let mut err = self.error(
            ErrorCode::WrongKind,
            format!("expected {desc}, not {}", self.kind().common_name()),
        );
        err.detail = ErrorDetail::WrongKind {
            expected,
            actual: self.kind(),
        };
        err
    }

    /// Kind of the current value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Require exactly `kind`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path otherwise.
    pub fn check_kind(&self, kind: Kind) -> Result<(), GdvError> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(self.wrong_kind(kind.common_name(), kind))
        }
    }

    check_is!(
        /// Require a symbol.
        check_is_symbol, is_symbol, "symbol", Kind::Symbol
    );
    check_is!(
        /// Require an integer.
        check_is_integer, is_integer, "integer", Kind::Integer
    );
    check_is!(
        /// Require an integer that fits `i64`.
        check_is_small_integer, is_small_integer, "small integer", Kind::SmallInteger
    );
    check_is!(
        /// Require a string.
        check_is_string, is_string, "string", Kind::String
    );
    check_is!(
        /// Require a container.
        check_is_container, is_container, "container", Kind::Sequence
    );
    check_is!(
        /// Require a sequence, tagged or not.
        check_is_sequence, is_sequence, "sequence", Kind::Sequence
    );
    check_is!(
        /// Require a tuple, tagged or not.
        check_is_tuple, is_tuple, "tuple", Kind::Tuple
    );
    check_is!(
        /// Require a set, tagged or not.
        check_is_set, is_set, "set", Kind::Set
    );
    check_is!(
        /// Require a map, tagged or not.
        check_is_map, is_map, "map", Kind::Map
    );
    check_is!(
        /// Require an ordered map, tagged or not.
        check_is_ordered_map, is_ordered_map, "ordered map", Kind::OrderedMap
    );
    check_is!(
        /// Require a map or an ordered map.
        check_is_po_map, is_po_map, "(possibly ordered) map", Kind::Map
    );
    check_is!(
        /// Require a tagged container.
        check_is_tagged_container, is_tagged_container, "tagged container", Kind::TaggedSequence
    );
    check_is!(
        /// Require a tagged map.
        check_is_tagged_map, is_tagged_map, "tagged map", Kind::TaggedMap
    );
    check_is!(
        /// Require a tagged ordered map.
        check_is_tagged_ordered_map, is_tagged_ordered_map, "tagged ordered map",
        Kind::TaggedOrderedMap
    );

    /// The symbol.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path unless this is a symbol.
    pub fn symbol_get(&self) -> Result<Symbol, GdvError> {
        self.check_is_symbol()?;
        self.value.symbol_get()
    }

    /// The integer.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path unless this is an integer.
    pub fn integer_get(&self) -> Result<&'a GdvInteger, GdvError> {
        self.check_is_integer()?;
        self.value.integer_get()
    }

    /// The integer as `i64`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path unless this is a small integer.
    pub fn small_integer_get(&self) -> Result<i64, GdvError> {
        self.check_is_small_integer()?;
        self.value.small_integer_get()
    }

    /// The string.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path unless this is a string.
    pub fn string_get(&self) -> Result<&'a GdvString, GdvError> {
        self.check_is_string()?;
        self.value.string_get()
    }

    /// Number of elements.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path unless this is a container.
    pub fn container_size(&self) -> Result<usize, GdvError> {
        self.check_is_container()?;
        Ok(self.value.size())
    }

    fn element_at(&self, what: &str, elements: &'a [Value], index: usize) -> Result<Self, GdvError> {
        elements.get(index).map_or_else(
            || {
                Err(self.error(
                    ErrorCode::IndexOutOfRange,
                    format!(
                        "expected {what} to have element at index {index}, but it only has {} elements",
                        elements.len()
                    ),
                ))
            },
            |v| Ok(self.child(NavStep::Index(index), v)),
        )
    }

    /// Navigate to a sequence element.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a sequence, and `IndexOutOfRange`
    /// if `index` is past the end.
    pub fn sequence_get_value_at(&self, index: usize) -> Result<Self, GdvError> {
        self.check_is_sequence()?;
        self.element_at("sequence", self.value.sequence_get()?, index)
    }

    /// Navigate to a tuple element.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a tuple, and `IndexOutOfRange`
    /// if `index` is past the end.
    pub fn tuple_get_value_at(&self, index: usize) -> Result<Self, GdvError> {
        self.check_is_tuple()?;
        self.element_at("tuple", self.value.tuple_get()?, index)
    }

    /// Parsers for each element of a sequence or tuple, in order.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a sequence or tuple.
    pub fn elements(&self) -> Result<Vec<Self>, GdvError> {
        let elements = match self.value {
            Value::Sequence { elements, .. } | Value::Tuple { elements, .. } => elements,
            _ => return Err(self.wrong_kind("sequence or tuple", Kind::Sequence)),
        };
        Ok(elements
            .iter()
            .enumerate()
            .map(|(i, v)| self.child(NavStep::Index(i), v))
            .collect())
    }

    /// Whether a set contains `elt`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a set.
    pub fn set_contains(&self, elt: &Value) -> Result<bool, GdvError> {
        self.check_is_set()?;
        self.value.set_contains(elt)
    }

    /// Navigate to a set element.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a set, and `KeyNotFound` if `elt`
    /// is absent.
    pub fn set_get_value(&self, elt: &Value) -> Result<Self, GdvError> {
        self.check_is_set()?;
        match self.value.set_get()?.get(elt) {
            Some(v) => Ok(self.child(NavStep::Key(v), v)),
            None => Err(self.error(
                ErrorCode::KeyNotFound,
                format!("expected set to have element {elt}, but it does not"),
            )),
        }
    }

    /// Parsers for each set element, in order.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a set.
    pub fn set_elements(&self) -> Result<Vec<Self>, GdvError> {
        self.check_is_set()?;
        Ok(self
            .value
            .set_get()?
            .iter()
            .map(|v| self.child(NavStep::Key(v), v))
            .collect())
    }

    /// The stored key equal to `key` and its value, in either map flavor.
    fn lookup(&self, key: &Value) -> Option<(&'a Value, &'a Value)> {
        match self.value {
            Value::Map { entries, .. } => entries.get_key_value(key),
            Value::OrderedMap { entries, .. } => entries.get_key_value(key),
            _ => None,
        }
    }

    fn missing_key(&self, what: &str, key: &Value) -> GdvError {
        self.error(
            ErrorCode::KeyNotFound,
            format!("expected {what} to have key {key}, but it does not"),
        )
    }

    /// Whether a map contains `key`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a map.
    pub fn map_contains(&self, key: &Value) -> Result<bool, GdvError> {
        self.check_is_map()?;
        Ok(self.lookup(key).is_some())
    }

    /// Navigate to the stored key equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a map, and `KeyNotFound` if the
    /// key is absent.
    pub fn map_get_key_at(&self, key: &Value) -> Result<Self, GdvError> {
        self.check_is_map()?;
        let (k, _) = self.lookup(key).ok_or_else(|| self.missing_key("map", key))?;
        Ok(self.child(NavStep::Key(k), k))
    }

    /// Navigate to the value mapped from `key`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a map, and `KeyNotFound` if the
    /// key is absent.
    pub fn map_get_value_at(&self, key: &Value) -> Result<Self, GdvError> {
        self.map_get_value_at_opt(key)?
            .ok_or_else(|| self.missing_key("map", key))
    }

    /// Like [`GdvParser::map_get_value_at`], but `None` if the key is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a map.
    pub fn map_get_value_at_opt(&self, key: &Value) -> Result<Option<Self>, GdvError> {
        self.check_is_map()?;
        Ok(self
            .lookup(key)
            .map(|(k, v)| self.child(NavStep::Value(k), v)))
    }

    /// [`GdvParser::map_get_value_at`] with a symbol key.
    ///
    /// # Errors
    ///
    /// As [`GdvParser::map_get_value_at`].
    pub fn map_get_value_at_sym(&self, name: &str) -> Result<Self, GdvError> {
        self.map_get_value_at(&Value::symbol(name))
    }

    /// [`GdvParser::map_get_value_at_opt`] with a symbol key.
    ///
    /// # Errors
    ///
    /// As [`GdvParser::map_get_value_at_opt`].
    pub fn map_get_value_at_sym_opt(&self, name: &str) -> Result<Option<Self>, GdvError> {
        self.map_get_value_at_opt(&Value::symbol(name))
    }

    /// [`GdvParser::map_get_value_at`] with a string key.
    ///
    /// # Errors
    ///
    /// As [`GdvParser::map_get_value_at`].
    pub fn map_get_value_at_str(&self, s: &str) -> Result<Self, GdvError> {
        self.map_get_value_at(&Value::from(s))
    }

    /// [`GdvParser::map_get_value_at_opt`] with a string key.
    ///
    /// # Errors
    ///
    /// As [`GdvParser::map_get_value_at_opt`].
    pub fn map_get_value_at_str_opt(&self, s: &str) -> Result<Option<Self>, GdvError> {
        self.map_get_value_at_opt(&Value::from(s))
    }

    /// Whether an ordered map contains `key`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is an ordered map.
    pub fn ordered_map_contains(&self, key: &Value) -> Result<bool, GdvError> {
        self.check_is_ordered_map()?;
        Ok(self.lookup(key).is_some())
    }

    /// Navigate to the value an ordered map maps from `key`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is an ordered map, and `KeyNotFound`
    /// if the key is absent.
    pub fn ordered_map_get_value_at(&self, key: &Value) -> Result<Self, GdvError> {
        self.check_is_ordered_map()?;
        let (k, v) = self
            .lookup(key)
            .ok_or_else(|| self.missing_key("ordered map", key))?;
        Ok(self.child(NavStep::Value(k), v))
    }

    /// [`GdvParser::ordered_map_get_value_at`] with a symbol key.
    ///
    /// # Errors
    ///
    /// As [`GdvParser::ordered_map_get_value_at`].
    pub fn ordered_map_get_value_at_sym(&self, name: &str) -> Result<Self, GdvError> {
        self.ordered_map_get_value_at(&Value::symbol(name))
    }

    /// (key, value) parsers for each entry of either map flavor, in
    /// iteration order.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a map or ordered map.
    pub fn entries(&self) -> Result<Vec<(Self, Self)>, GdvError> {
        let pair = |(k, v): (&'a Value, &'a Value)| {
            (self.child(NavStep::Key(k), k), self.child(NavStep::Value(k), v))
        };
        match self.value {
            Value::Map { entries, .. } => Ok(entries.iter().map(pair).collect()),
            Value::OrderedMap { entries, .. } => Ok(entries.iter().map(pair).collect()),
            _ => Err(self.wrong_kind("(possibly ordered) map", Kind::Map)),
        }
    }

    /// The tag of a tagged container.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` unless this is a tagged container.
    pub fn tagged_container_get_tag(&self) -> Result<Symbol, GdvError> {
        self.check_is_tagged_container()?;
        self.value.container_tag()
    }

    /// Require a tagged container whose tag is `name`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path otherwise.
    pub fn check_container_tag(&self, name: &str) -> Result<(), GdvError> {
        let tag = self.tagged_container_get_tag()?;
        if tag.name() == name.as_bytes() {
            return Ok(());
        }
        Err(self.error(
            ErrorCode::WrongKind,
            format!(
                "expected container to have tag {}, but it instead has tag {}",
                Value::symbol(name),
                Value::Symbol(tag)
            ),
        ))
    }

    /// Require a tagged map whose tag is `name`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path otherwise.
    pub fn check_tagged_map_tag(&self, name: &str) -> Result<(), GdvError> {
        self.check_is_tagged_map()?;
        self.check_container_tag(name)
    }

    /// Require a tagged ordered map whose tag is `name`.
    ///
    /// # Errors
    ///
    /// Returns `WrongKind` with the path otherwise.
    pub fn check_tagged_ordered_map_tag(&self, name: &str) -> Result<(), GdvError> {
        self.check_is_tagged_ordered_map()?;
        self.check_container_tag(name)
    }

    /// Convert the current value.
    ///
    /// # Errors
    ///
    /// Whatever `T::from_gdv` returns.
    pub fn to<T: FromGdv>(&self) -> Result<T, GdvError> {
        T::from_gdv(self)
    }
}

/// Types that can be extracted from a [`GdvParser`] position.
pub trait FromGdv: Sized {
    /// Extract `Self` from the value at `p`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the path of the first mismatch.
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError>;
}

/// Convert a whole value into `T`.
///
/// # Errors
///
/// Returns an error naming the path of the first mismatch.
pub fn gdv_to<T: FromGdv>(value: &Value) -> Result<T, GdvError> {
    T::from_gdv(&GdvParser::new(value))
}

impl FromGdv for Value {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        Ok(p.value().clone())
    }
}

impl FromGdv for bool {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        let sym = p.symbol_get()?;
        if sym == Symbol::TRUE {
            Ok(true)
        } else if sym == Symbol::FALSE {
            Ok(false)
        } else {
            Err(p.error(
                ErrorCode::WrongKind,
                format!("expected symbol `true` or `false`, not {}", p.value_gdvn()),
            ))
        }
    }
}

macro_rules! from_gdv_int {
    ($($t:ty),* $(,)?) => {$(
        impl FromGdv for $t {
            fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
                p.integer_get()?.get_as_opt::<$t>().ok_or_else(|| {
                    p.error(
                        ErrorCode::Conversion,
                        format!(
                            concat!("number too large to represent as `", stringify!($t), "`: {}"),
                            p.value_gdvn()
                        ),
                    )
                })
            }
        }
    )*};
}

from_gdv_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromGdv for GdvInteger {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.integer_get().cloned()
    }
}

impl FromGdv for GdvString {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.string_get().cloned()
    }
}

impl FromGdv for String {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.string_get()?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| p.error(ErrorCode::Conversion, "expected UTF-8 string"))
    }
}

impl FromGdv for Symbol {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.symbol_get()
    }
}

impl<T: FromGdv> FromGdv for Option<T> {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        if p.value().is_null() {
            Ok(None)
        } else {
            T::from_gdv(p).map(Some)
        }
    }
}

impl<T: FromGdv> FromGdv for Box<T> {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        T::from_gdv(p).map(Box::new)
    }
}

impl<T: FromGdv> FromGdv for Vec<T> {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.elements()?.iter().map(T::from_gdv).collect()
    }
}

impl<T: FromGdv + Ord> FromGdv for BTreeSet<T> {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.set_elements()?.iter().map(T::from_gdv).collect()
    }
}

impl<K: FromGdv + Ord, V: FromGdv> FromGdv for BTreeMap<K, V> {
    fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
        p.entries()?
            .iter()
            .map(|(k, v)| Ok((K::from_gdv(k)?, V::from_gdv(v)?)))
            .collect()
    }
}

macro_rules! from_gdv_tuple {
    ($len:literal; $($name:ident $idx:tt),+) => {
        impl<$($name: FromGdv),+> FromGdv for ($($name,)+) {
            fn from_gdv(p: &GdvParser<'_>) -> Result<Self, GdvError> {
                p.check_is_tuple()?;
                let size = p.value().size();
                if size != $len {
                    return Err(p.error(
                        ErrorCode::Conversion,
                        format!(concat!("expected tuple of ", $len, " elements, not {}"), size),
                    ));
                }
                Ok(($($name::from_gdv(&p.tuple_get_value_at($idx)?)?,)+))
            }
        }
    };
}

from_gdv_tuple!(1; A 0);
from_gdv_tuple!(2; A 0, B 1);
from_gdv_tuple!(3; A 0, B 1, C 2);
from_gdv_tuple!(4; A 0, B 1, C 2, D 3);
