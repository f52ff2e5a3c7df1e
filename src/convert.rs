//! Conversion of host values into [`Value`] trees.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::{GdvInteger, GdvString, Symbol, Value};

/// Types that can be written as a [`Value`].
///
/// Unlike `From`, this borrows, so containers of convertible elements can
/// be converted without giving them up.
pub trait ToGdv {
    /// Build the value.
    fn to_gdv(&self) -> Value;
}

impl ToGdv for Value {
    fn to_gdv(&self) -> Value {
        self.clone()
    }
}

impl ToGdv for bool {
    fn to_gdv(&self) -> Value {
        Value::from(*self)
    }
}

macro_rules! to_gdv_copy {
    ($($t:ty),* $(,)?) => {$(
        impl ToGdv for $t {
            fn to_gdv(&self) -> Value {
                Value::from(*self)
            }
        }
    )*};
}

to_gdv_copy!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, Symbol);

macro_rules! to_gdv_clone {
    ($($t:ty),* $(,)?) => {$(
        impl ToGdv for $t {
            fn to_gdv(&self) -> Value {
                Value::from(self.clone())
            }
        }
    )*};
}

to_gdv_clone!(GdvInteger, GdvString, BigInt, String);

impl ToGdv for str {
    fn to_gdv(&self) -> Value {
        Value::from(self)
    }
}

impl ToGdv for char {
    fn to_gdv(&self) -> Value {
        Value::from(self.to_string())
    }
}

impl<T: ToGdv + ?Sized> ToGdv for &T {
    fn to_gdv(&self) -> Value {
        (**self).to_gdv()
    }
}

impl<T: ToGdv + ?Sized> ToGdv for Box<T> {
    fn to_gdv(&self) -> Value {
        (**self).to_gdv()
    }
}

impl<T: ToGdv + ?Sized> ToGdv for Rc<T> {
    fn to_gdv(&self) -> Value {
        (**self).to_gdv()
    }
}

impl<T: ToGdv + ?Sized> ToGdv for Arc<T> {
    fn to_gdv(&self) -> Value {
        (**self).to_gdv()
    }
}

impl<T: ToGdv> ToGdv for Option<T> {
    fn to_gdv(&self) -> Value {
        self.as_ref().map_or_else(Value::null, ToGdv::to_gdv)
    }
}

impl<T: ToGdv> ToGdv for [T] {
    fn to_gdv(&self) -> Value {
        Value::sequence(self.iter().map(ToGdv::to_gdv).collect())
    }
}

impl<T: ToGdv> ToGdv for Vec<T> {
    fn to_gdv(&self) -> Value {
        self.as_slice().to_gdv()
    }
}

impl<T: ToGdv, const N: usize> ToGdv for [T; N] {
    fn to_gdv(&self) -> Value {
        self.as_slice().to_gdv()
    }
}

impl<T: ToGdv> ToGdv for BTreeSet<T> {
    fn to_gdv(&self) -> Value {
        Value::set(self.iter().map(ToGdv::to_gdv))
    }
}

impl<K: ToGdv, V: ToGdv> ToGdv for BTreeMap<K, V> {
    fn to_gdv(&self) -> Value {
        Value::map(self.iter().map(|(k, v)| (k.to_gdv(), v.to_gdv())).collect())
    }
}

impl<K: ToGdv, V: ToGdv, S> ToGdv for HashMap<K, V, S> {
    fn to_gdv(&self) -> Value {
        Value::map(self.iter().map(|(k, v)| (k.to_gdv(), v.to_gdv())).collect())
    }
}

impl<K: ToGdv, V: ToGdv, S> ToGdv for IndexMap<K, V, S> {
    fn to_gdv(&self) -> Value {
        Value::ordered_map(self.iter().map(|(k, v)| (k.to_gdv(), v.to_gdv())).collect())
    }
}

macro_rules! to_gdv_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: ToGdv),+> ToGdv for ($($name,)+) {
            fn to_gdv(&self) -> Value {
                Value::tuple(vec![$(self.$idx.to_gdv()),+])
            }
        }
    };
}

to_gdv_tuple!(A 0);
to_gdv_tuple!(A 0, B 1);
to_gdv_tuple!(A 0, B 1, C 2);
to_gdv_tuple!(A 0, B 1, C 2, D 3);
