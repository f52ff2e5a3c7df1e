//! # gdvalue
//!
//! A generic data value model (**GDValue**) together with its text format (**GDVN**) and a
//! width-aware pretty printer.
//!
//! ## Design principles
//!
//! - **Values are plain trees.**
//!   A [`Value`] is a symbol, an integer, a string, or a container (sequence, tuple, set, map,
//!   ordered map). Containers other than plain sequences may carry a symbol tag.
//! - **Text round-trips exactly.**
//!   Everything [`Value::write`] produces reads back through [`Parser`] as an equal value, in both
//!   compact and indented styles.
//! - **There is one total order.**
//!   [`gdv_compare`] orders any two values; sets and maps are sorted by it, so equal values print
//!   identically.
//! - **Layout is a separate concern.**
//!   The writer builds a document tree that [`pretty`] breaks against a target width. [`BoxPrint`]
//!   exposes a box-oriented layout engine for laying out other text, such as source code.
//!
//! ## GDVN at a glance
//!
//! ```text
//! null  true  someSymbol  `symbol with spaces`
//! 123  -0x7B  0b1111011  0o173
//! "text\n"  "\u{1F600}"
//! [1 2 3]  (1 2)  {1 2}  {1:2 3:4}  [a:1 b:2]
//! point{x:1 y:2}  node[1 2]  pair(1 2)
//! // comment  /* block /* nested */ comment */
//! ```
//!
//! ## Feature flags
//!
//! - `sha2` *(default)*: enables [`Value::sha256`], a digest of the compact GDVN form.
//! - `serde`: enables `Serialize`/`Deserialize` for [`Value`] and conversions between Rust types
//!   and values.
//! - `json`: enables conversion between values and JSON.
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation where supported.
//! - `cli`: builds the `gdvn` command-line tool.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod boxprint;
mod convert;
mod error;
#[cfg(feature = "sha2")]
mod fingerprint;
mod integer;
#[cfg(feature = "json")]
mod json;
mod kind;
mod limits;
mod location;
mod macros;
mod navigate;
mod order;
mod parser;
pub mod pretty;
mod reader;
#[cfg(feature = "serde")]
mod serde_impl;
mod string;
mod symbol;
pub(crate) mod utf8;
mod value;
mod writer;

pub use crate::boxprint::{BoxKind, BoxPrint, BpBox, BpBreak, BpElement, BpRender, BreakType};
pub use crate::convert::ToGdv;
pub use crate::error::{ErrorCode, ErrorDetail, GdvError};
pub use crate::integer::GdvInteger;
pub use crate::kind::Kind;
pub use crate::limits::{ParseLimits, DEFAULT_MAX_DEPTH};
pub use crate::location::{FileLineCol, LineCol};
#[doc(hidden)]
pub use crate::macros::__gdv_macro;
pub use crate::navigate::{gdv_to, FromGdv, GdvParser, NavStep};
pub use crate::order::gdv_compare;
pub use crate::parser::{read_all, Parser, ReadAll};
pub use crate::reader::Reader;
pub use crate::string::GdvString;
pub use crate::symbol::{Symbol, SymbolTable};
pub use crate::value::{GdvMap, GdvOrderedMap, GdvSet, Value};
pub use crate::writer::WriteOptions;

#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
pub use crate::json::{
    gdv_to_json, gdv_to_json_pretty, gdv_to_json_value, json_to_gdv, json_value_to_gdv,
};

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use crate::serde_impl::{from_gdvn_str, from_value, to_gdvn_string, to_value};

pub use gdvalue_derive::{FromGdv, ToGdv};
