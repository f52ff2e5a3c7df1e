use std::fmt;

/// The kind of a [`Value`](crate::Value).
///
/// `null`, `false` and `true` are symbols; use the value predicates to tell
/// them apart. Declaration order is the cross-kind sort order, except that
/// [`Kind::Integer`] and [`Kind::SmallInteger`] sort together numerically and
/// each tagged kind sorts with its untagged counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Interned name, including `null`, `false` and `true`.
    Symbol,
    /// Integer outside the `i64` range.
    Integer,
    /// Integer within the `i64` range.
    SmallInteger,
    /// Byte string.
    String,
    /// `[...]`
    Sequence,
    /// `tag[...]`
    TaggedSequence,
    /// `(...)`
    Tuple,
    /// `tag(...)`
    TaggedTuple,
    /// `{...}` with no `:`.
    Set,
    /// `tag{...}` with no `:`.
    TaggedSet,
    /// `{k:v ...}`
    Map,
    /// `tag{k:v ...}`
    TaggedMap,
    /// `[k:v ...]`
    OrderedMap,
    /// `tag[k:v ...]`
    TaggedOrderedMap,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Symbol,
        Self::Integer,
        Self::SmallInteger,
        Self::String,
        Self::Sequence,
        Self::TaggedSequence,
        Self::Tuple,
        Self::TaggedTuple,
        Self::Set,
        Self::TaggedSet,
        Self::Map,
        Self::TaggedMap,
        Self::OrderedMap,
        Self::TaggedOrderedMap,
    ];

    /// Upper-case identifier, e.g. `TAGGED_ORDERED_MAP`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Symbol => "SYMBOL",
            Self::Integer => "INTEGER",
            Self::SmallInteger => "SMALL_INTEGER",
            Self::String => "STRING",
            Self::Sequence => "SEQUENCE",
            Self::TaggedSequence => "TAGGED_SEQUENCE",
            Self::Tuple => "TUPLE",
            Self::TaggedTuple => "TAGGED_TUPLE",
            Self::Set => "SET",
            Self::TaggedSet => "TAGGED_SET",
            Self::Map => "MAP",
            Self::TaggedMap => "TAGGED_MAP",
            Self::OrderedMap => "ORDERED_MAP",
            Self::TaggedOrderedMap => "TAGGED_ORDERED_MAP",
        }
    }

    /// Lower-case prose name used in error messages, e.g. `tagged ordered map`.
    #[must_use]
    pub const fn common_name(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Integer => "integer",
            Self::SmallInteger => "small integer",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::TaggedSequence => "tagged sequence",
            Self::Tuple => "tuple",
            Self::TaggedTuple => "tagged tuple",
            Self::Set => "set",
            Self::TaggedSet => "tagged set",
            Self::Map => "map",
            Self::TaggedMap => "tagged map",
            Self::OrderedMap => "ordered map",
            Self::TaggedOrderedMap => "tagged ordered map",
        }
    }

    /// Collapse [`Kind::SmallInteger`] into [`Kind::Integer`]; identity otherwise.
    #[must_use]
    pub const fn super_kind(self) -> Self {
        match self {
            Self::SmallInteger => Self::Integer,
            other => other,
        }
    }

    /// True for the five container families, tagged or not.
    #[must_use]
    pub const fn is_container(self) -> bool {
        !matches!(
            self,
            Self::Symbol | Self::Integer | Self::SmallInteger | Self::String
        )
    }

    /// True for the tagged container kinds.
    #[must_use]
    pub const fn is_tagged(self) -> bool {
        matches!(
            self,
            Self::TaggedSequence
                | Self::TaggedTuple
                | Self::TaggedSet
                | Self::TaggedMap
                | Self::TaggedOrderedMap
        )
    }

    /// The untagged form of a tagged kind; identity otherwise.
    #[must_use]
    pub const fn untagged(self) -> Self {
        match self {
            Self::TaggedSequence => Self::Sequence,
            Self::TaggedTuple => Self::Tuple,
            Self::TaggedSet => Self::Set,
            Self::TaggedMap => Self::Map,
            Self::TaggedOrderedMap => Self::OrderedMap,
            other => other,
        }
    }

    /// The tagged form of a container kind; identity for scalars.
    #[must_use]
    pub const fn tagged(self) -> Self {
        match self {
            Self::Sequence => Self::TaggedSequence,
            Self::Tuple => Self::TaggedTuple,
            Self::Set => Self::TaggedSet,
            Self::Map => Self::TaggedMap,
            Self::OrderedMap => Self::TaggedOrderedMap,
            other => other,
        }
    }

    /// Position in the cross-kind order.
    pub(crate) const fn order_rank(self) -> u8 {
        match self.untagged().super_kind() {
            Self::Symbol => 0,
            Self::Integer => 1,
            Self::String => 2,
            Self::Sequence => 3,
            Self::Tuple => 4,
            Self::Set => 5,
            Self::Map => 6,
            _ => 7,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.common_name())
    }
}
