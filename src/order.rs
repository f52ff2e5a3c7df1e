use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::Value;

/// Compare two values under the total GDV ordering.
///
/// Kinds order as symbol, integer, string, sequence, tuple, set, map, then
/// ordered map. Within a container family, the tag decides first (untagged
/// containers have the `null` tag and so sort first), then the contents
/// lexicographically. Ordered maps compare in insertion order.
#[inline]
#[must_use]
pub fn gdv_compare(a: &Value, b: &Value) -> Ordering {
    a.cmp(b)
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.kind().order_rank().cmp(&other.kind().order_rank());
        if rank != Ordering::Equal {
            return rank;
        }
        match (self, other) {
            (Self::Symbol(a), Self::Symbol(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (
                Self::Sequence {
                    tag: ta,
                    elements: a,
                },
                Self::Sequence {
                    tag: tb,
                    elements: b,
                },
            )
            | (
                Self::Tuple {
                    tag: ta,
                    elements: a,
                },
                Self::Tuple {
                    tag: tb,
                    elements: b,
                },
            ) => ta.cmp(tb).then_with(|| a.cmp(b)),
            (
                Self::Set {
                    tag: ta,
                    elements: a,
                },
                Self::Set {
                    tag: tb,
                    elements: b,
                },
            ) => ta.cmp(tb).then_with(|| a.iter().cmp(b.iter())),
            (
                Self::Map {
                    tag: ta,
                    entries: a,
                },
                Self::Map {
                    tag: tb,
                    entries: b,
                },
            ) => ta.cmp(tb).then_with(|| a.iter().cmp(b.iter())),
            (
                Self::OrderedMap {
                    tag: ta,
                    entries: a,
                },
                Self::OrderedMap {
                    tag: tb,
                    entries: b,
                },
            ) => ta.cmp(tb).then_with(|| a.iter().cmp(b.iter())),
            // Equal ranks imply the same variant.
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().order_rank().hash(state);
        match self {
            Self::Symbol(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::String(s) => s.hash(state),
            Self::Sequence { tag, elements } | Self::Tuple { tag, elements } => {
                tag.hash(state);
                elements.hash(state);
            }
            Self::Set { tag, elements } => {
                tag.hash(state);
                elements.hash(state);
            }
            Self::Map { tag, entries } => {
                tag.hash(state);
                entries.hash(state);
            }
            Self::OrderedMap { tag, entries } => {
                tag.hash(state);
                state.write_usize(entries.len());
                for (k, v) in entries {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}
