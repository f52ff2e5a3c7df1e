//! Value construction macro.
//!
//! This module provides [`gdv!`], which builds [`crate::Value`] trees with
//! a syntax close to GDVN itself.
//!
//! Design notes:
//! - The macro is **fallible** and returns `Result<Value, GdvError>`,
//!   because a map literal may repeat a key.
//! - Elements are separated by commas. Any Rust expression whose type
//!   implements [`crate::ToGdv`] can appear as an element.
//! - Parentheses group unless they contain a comma: `(x)` is `x`, while
//!   `(x,)` and `(x, y)` are tuples.
//!
//! Map key rules:
//! - `{ a: 1 }` uses the symbol `a`
//! - `{ "a": 1 }` uses the string `"a"`
//! - `{ (k): 1 }` uses the expression `k` as the key
//!
//! ```ignore
//! # use gdvalue::gdv;
//! # fn demo() -> Result<(), gdvalue::GdvError> {
//! let n = 3;
//! let v = gdv!(point{ x: 1, y: n, tags: [true, "text", (n + 1, n + 2)] })?;
//! # Ok(()) }
//! ```

/// Construct a [`crate::Value`] using GDVN-like literal syntax.
///
/// This macro returns `Result<crate::Value, crate::GdvError>`.
///
/// Supported forms:
/// - `gdv!(null)`, `gdv!(true)`, `gdv!(false)`
/// - `gdv!([a, b])` sequence, `gdv!((a, b))` tuple, `gdv!({a, b})` set
/// - `gdv!({k: v, ...})` map, `gdv!({:})` empty map
/// - `gdv!([k: v, ...])` ordered map, `gdv!([:])` empty ordered map
/// - `gdv!(tag[...])`, `gdv!(tag(...))`, `gdv!(tag{...})` tagged containers
/// - `gdv!(expr)` where `expr` implements [`crate::ToGdv`]
///
/// `name(...)`, `name[...]` and `name{...}` are always read as tagged
/// containers, so a plain function call or index expression must be bound
/// to a variable first.
#[macro_export]
macro_rules! gdv {
    (null) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok($crate::Value::null())
    };
    (true) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok($crate::Value::from(true))
    };
    (false) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok($crate::Value::from(false))
    };

    // Element lists: munch tokens up to each top-level comma.
    (@seq [$($elems:expr,)*] ()) => {
        ::std::vec![$($elems,)*]
    };
    (@seq [$($elems:expr,)*] ($($cur:tt)+)) => {
        ::std::vec![$($elems,)* $crate::gdv!($($cur)+)?]
    };
    (@seq [$($elems:expr,)*] ($($cur:tt)*) , $($rest:tt)*) => {
        $crate::gdv!(@seq [$($elems,)* $crate::gdv!($($cur)*)?,] () $($rest)*)
    };
    (@seq [$($elems:expr,)*] ($($cur:tt)*) $next:tt $($rest:tt)*) => {
        $crate::gdv!(@seq [$($elems,)*] ($($cur)* $next) $($rest)*)
    };

    // Parentheses: a tuple if a top-level comma appears, else grouping.
    (@paren [] ($($cur:tt)+)) => {
        $crate::gdv!($($cur)+)?
    };
    (@paren [$($elems:expr,)+] ()) => {
        $crate::Value::tuple(::std::vec![$($elems,)+])
    };
    (@paren [$($elems:expr,)+] ($($cur:tt)+)) => {
        $crate::Value::tuple(::std::vec![$($elems,)+ $crate::gdv!($($cur)+)?])
    };
    (@paren [$($elems:expr,)*] ($($cur:tt)*) , $($rest:tt)*) => {
        $crate::gdv!(@paren [$($elems,)* $crate::gdv!($($cur)*)?,] () $($rest)*)
    };
    (@paren [$($elems:expr,)*] ($($cur:tt)*) $next:tt $($rest:tt)*) => {
        $crate::gdv!(@paren [$($elems,)*] ($($cur)* $next) $($rest)*)
    };

    // Map entries: `key: value`, with the value munched up to a comma.
    (@entries $out:ident) => {};
    (@entries $out:ident $key:tt : $($rest:tt)*) => {
        $crate::gdv!(@entry $out ($crate::__gdv_key!($key)?) () $($rest)*);
    };
    (@entry $out:ident ($key:expr) ($($cur:tt)+)) => {
        $out.push(($key, $crate::gdv!($($cur)+)?));
    };
    (@entry $out:ident ($key:expr) ($($cur:tt)+) , $($rest:tt)*) => {
        $out.push(($key, $crate::gdv!($($cur)+)?));
        $crate::gdv!(@entries $out $($rest)*);
    };
    (@entry $out:ident ($key:expr) ($($cur:tt)*) $next:tt $($rest:tt)*) => {
        $crate::gdv!(@entry $out ($key) ($($cur)* $next) $($rest)*);
    };

    // Maps and ordered maps.
    ({:}) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok(
            $crate::Value::map($crate::GdvMap::new()),
        )
    };
    ([:]) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok(
            $crate::Value::ordered_map($crate::GdvOrderedMap::new()),
        )
    };
    ({ $key:tt : $($rest:tt)* }) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::GdvError> {
            let mut entries = ::std::vec::Vec::new();
            $crate::gdv!(@entries entries $key : $($rest)*);
            $crate::Value::map_from_entries(entries)
        })()
    }};
    ([ $key:tt : $($rest:tt)* ]) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::GdvError> {
            let mut entries = ::std::vec::Vec::new();
            $crate::gdv!(@entries entries $key : $($rest)*);
            $crate::Value::ordered_map_from_entries(entries)
        })()
    }};

    // Sequences, sets and tuples.
    ([ $($elems:tt)* ]) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::GdvError> {
            ::core::result::Result::Ok($crate::Value::sequence($crate::gdv!(@seq [] () $($elems)*)))
        })()
    }};
    ({ $($elems:tt)* }) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::GdvError> {
            ::core::result::Result::Ok($crate::Value::set($crate::gdv!(@seq [] () $($elems)*)))
        })()
    }};
    (()) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok(
            $crate::Value::tuple(::std::vec::Vec::new()),
        )
    };
    (( $($elems:tt)+ )) => {{
        (|| -> ::core::result::Result<$crate::Value, $crate::GdvError> {
            ::core::result::Result::Ok($crate::gdv!(@paren [] () $($elems)+))
        })()
    }};

    // Tagged containers.
    ($tag:ident [ $($body:tt)* ]) => {
        $crate::__gdv_macro::tagged(::core::stringify!($tag), $crate::gdv!([ $($body)* ]))
    };
    ($tag:ident { $($body:tt)* }) => {
        $crate::__gdv_macro::tagged(::core::stringify!($tag), $crate::gdv!({ $($body)* }))
    };
    ($tag:ident ( $($body:tt)* )) => {
        $crate::__gdv_macro::tagged(
            ::core::stringify!($tag),
            (|| -> ::core::result::Result<$crate::Value, $crate::GdvError> {
                ::core::result::Result::Ok($crate::Value::tuple($crate::gdv!(@seq [] () $($body)*)))
            })(),
        )
    };

    // Fallback: convert an expression.
    ($other:expr) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok(
            $crate::ToGdv::to_gdv(&$other),
        )
    };
}

/// Internal helper for map keys: identifiers are symbols, anything else
/// is a value.
#[doc(hidden)]
#[macro_export]
macro_rules! __gdv_key {
    ($key:ident) => {
        ::core::result::Result::<$crate::Value, $crate::GdvError>::Ok($crate::Value::symbol(
            ::core::stringify!($key),
        ))
    };
    ($key:tt) => {
        $crate::gdv!($key)
    };
}

/// Hidden support module used by `gdv!` expansions.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __gdv_macro {
    use crate::{GdvError, Symbol, Value};

    pub fn tagged(tag: &str, value: Result<Value, GdvError>) -> Result<Value, GdvError> {
        let mut value = value?;
        value.container_set_tag(Symbol::intern(tag))?;
        Ok(value)
    }
}
