//! JSON encoding of values.
//!
//! JSON has no symbols, tags, tuples, sets or ordered maps, so those are
//! written as objects with a `"_type"` member:
//!
//! | value                     | JSON                                                  |
//! |---------------------------|-------------------------------------------------------|
//! | `null`, `true`, `false`   | the same                                              |
//! | other symbol `s`          | `{"_type":"symbol","value":"s"}`                      |
//! | integer beyond ±(2^53-1)  | `{"_type":"integer","value":"<decimal>"}`             |
//! | `t[...]`                  | `{"_type":"sequence","tag":"t","elements":[...]}`     |
//! | `(...)`, `t(...)`         | `{"_type":"tuple",["tag":"t",]"elements":[...]}`      |
//! | `{...}` (set)             | `{"_type":"set",["tag":"t",]"elements":[...]}`        |
//! | map with non-string keys, or tagged | `{"_type":"map",["tag":"t",]"elements":[[k,v],...]}` |
//! | ordered map               | `{"_type":"ordered map",["tag":"t",]"elements":[[k,v],...]}` |
//!
//! Reading inverts these forms. Objects that do not match one are plain
//! string-keyed maps.

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::value::{GdvMap, GdvOrderedMap};
use crate::{GdvError, GdvInteger, GdvString, Symbol, Value};

/// Largest magnitude JSON consumers can hold exactly as a double.
const MAX_JSON_INT: i64 = (1 << 53) - 1;

fn json_string(s: &GdvString) -> Result<Json, GdvError> {
    s.as_str()
        .map(|s| Json::String(s.to_owned()))
        .ok_or_else(|| GdvError::conversion(format!("string is not valid UTF-8: {s:?}")))
}

fn symbol_name(sym: Symbol) -> Result<String, GdvError> {
    sym.as_str()
        .map(str::to_owned)
        .ok_or_else(|| GdvError::conversion(format!("symbol name is not valid UTF-8: {sym:?}")))
}

fn encoded(type_name: &str, tag: Symbol, elements: Vec<Json>) -> Result<Json, GdvError> {
    let mut obj = JsonMap::new();
    obj.insert("_type".into(), Json::String(type_name.into()));
    if !tag.is_null() {
        obj.insert("tag".into(), Json::String(symbol_name(tag)?));
    }
    obj.insert("elements".into(), Json::Array(elements));
    Ok(Json::Object(obj))
}

fn elements<'a>(values: impl IntoIterator<Item = &'a Value>) -> Result<Vec<Json>, GdvError> {
    values.into_iter().map(gdv_to_json_value).collect()
}

fn pairs<'a>(
    entries: impl IntoIterator<Item = (&'a Value, &'a Value)>,
) -> Result<Vec<Json>, GdvError> {
    entries
        .into_iter()
        .map(|(k, v)| Ok(Json::Array(vec![gdv_to_json_value(k)?, gdv_to_json_value(v)?])))
        .collect()
}

/// Convert `value` to a JSON value.
///
/// # Errors
///
/// Returns `Conversion` if a string or symbol name is not valid UTF-8.
pub fn gdv_to_json_value(value: &Value) -> Result<Json, GdvError> {
    match value {
        Value::Symbol(s) if s.is_null() => Ok(Json::Null),
        Value::Symbol(s) if *s == Symbol::TRUE => Ok(Json::Bool(true)),
        Value::Symbol(s) if *s == Symbol::FALSE => Ok(Json::Bool(false)),
        Value::Symbol(s) => {
            let mut obj = JsonMap::new();
            obj.insert("_type".into(), Json::String("symbol".into()));
            obj.insert("value".into(), Json::String(symbol_name(*s)?));
            Ok(Json::Object(obj))
        }
        Value::Integer(i) => match i.get_as_small() {
            Some(n) if (-MAX_JSON_INT..=MAX_JSON_INT).contains(&n) => {
                Ok(Json::Number(Number::from(n)))
            }
            _ => {
                let mut obj = JsonMap::new();
                obj.insert("_type".into(), Json::String("integer".into()));
                obj.insert("value".into(), Json::String(i.to_string()));
                Ok(Json::Object(obj))
            }
        },
        Value::String(s) => json_string(s),
        Value::Sequence { tag, elements: e } if tag.is_null() => Ok(Json::Array(elements(e)?)),
        Value::Sequence { tag, elements: e } => encoded("sequence", *tag, elements(e)?),
        Value::Tuple { tag, elements: e } => encoded("tuple", *tag, elements(e)?),
        Value::Set { tag, elements: e } => encoded("set", *tag, elements(e)?),
        Value::Map { tag, entries } => {
            let string_keys = entries
                .keys()
                .all(|k| matches!(k, Value::String(s) if s.as_str().is_some()));
            if tag.is_null() && string_keys {
                let mut obj = JsonMap::new();
                for (k, v) in entries {
                    if let Value::String(s) = k {
                        obj.insert(s.to_string_lossy().into_owned(), gdv_to_json_value(v)?);
                    }
                }
                Ok(Json::Object(obj))
            } else {
                encoded("map", *tag, pairs(entries)?)
            }
        }
        Value::OrderedMap { tag, entries } => encoded("ordered map", *tag, pairs(entries)?),
    }
}

/// The tag named by an encoded container's `"tag"` member, if it has one.
fn json_tag(obj: &JsonMap<String, Json>) -> Symbol {
    match obj.get("tag") {
        Some(Json::String(s)) => Symbol::intern(s),
        _ => Symbol::NULL,
    }
}

fn json_elements(obj: &JsonMap<String, Json>) -> Option<&Vec<Json>> {
    match obj.get("elements") {
        Some(Json::Array(a)) => Some(a),
        _ => None,
    }
}

/// Elements of an encoded map, if every one is a `[key, value]` pair.
fn json_pairs(obj: &JsonMap<String, Json>) -> Option<Vec<(&Json, &Json)>> {
    json_elements(obj)?
        .iter()
        .map(|e| match e {
            Json::Array(kv) if kv.len() == 2 => Some((&kv[0], &kv[1])),
            _ => None,
        })
        .collect()
}

fn convert_all(items: &[Json]) -> Result<Vec<Value>, GdvError> {
    items.iter().map(json_value_to_gdv).collect()
}

fn decode_object(obj: &JsonMap<String, Json>) -> Result<Value, GdvError> {
    let type_name = match obj.get("_type") {
        Some(Json::String(t)) => t.as_str(),
        _ => "",
    };
    let tag = json_tag(obj);
    match type_name {
        "symbol" => {
            if let Some(Json::String(name)) = obj.get("value") {
                return Ok(Value::symbol(name));
            }
        }
        "integer" => {
            if let Some(Json::String(digits)) = obj.get("value") {
                return GdvInteger::from_digits(digits).map(Value::Integer);
            }
        }
        "sequence" => {
            if let Some(items) = json_elements(obj) {
                return Ok(Value::tagged_sequence(tag, convert_all(items)?));
            }
        }
        "tuple" => {
            if let Some(items) = json_elements(obj) {
                return Ok(Value::tagged_tuple(tag, convert_all(items)?));
            }
        }
        "set" => {
            if let Some(items) = json_elements(obj) {
                return Ok(Value::tagged_set(tag, convert_all(items)?));
            }
        }
        "map" => {
            if let Some(kvs) = json_pairs(obj) {
                let mut map = GdvMap::new();
                for (k, v) in kvs {
                    let key = json_value_to_gdv(k)?;
                    if !map.contains_key(&key) {
                        map.insert(key, json_value_to_gdv(v)?);
                    }
                }
                return Ok(Value::tagged_map(tag, map));
            }
        }
        "ordered map" => {
            if let Some(kvs) = json_pairs(obj) {
                let mut map = GdvOrderedMap::new();
                for (k, v) in kvs {
                    let key = json_value_to_gdv(k)?;
                    if !map.contains_key(&key) {
                        map.insert(key, json_value_to_gdv(v)?);
                    }
                }
                return Ok(Value::tagged_ordered_map(tag, map));
            }
        }
        _ => {}
    }

    let mut map = GdvMap::new();
    for (k, v) in obj {
        map.insert(Value::from(k.as_str()), json_value_to_gdv(v)?);
    }
    Ok(Value::map(map))
}

/// Convert a JSON value to a value, decoding the `"_type"` forms.
///
/// # Errors
///
/// Returns `Conversion` for non-integer numbers, and `InvalidDigits` for
/// an encoded integer whose digits are malformed.
pub fn json_value_to_gdv(json: &Json) -> Result<Value, GdvError> {
    match json {
        Json::Null => Ok(Value::null()),
        Json::Bool(b) => Ok(Value::from(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                Err(GdvError::conversion(format!(
                    "non-integer numbers are not supported: {n}"
                )))
            }
        }
        Json::String(s) => Ok(Value::from(s.as_str())),
        Json::Array(items) => Ok(Value::sequence(convert_all(items)?)),
        Json::Object(obj) => decode_object(obj),
    }
}

/// Compact JSON text for `value`.
///
/// # Errors
///
/// As [`gdv_to_json_value`].
pub fn gdv_to_json(value: &Value) -> Result<String, GdvError> {
    let json = gdv_to_json_value(value)?;
    serde_json::to_string(&json).map_err(|e| GdvError::conversion(e.to_string()))
}

/// Indented JSON text for `value`.
///
/// # Errors
///
/// As [`gdv_to_json_value`].
pub fn gdv_to_json_pretty(value: &Value) -> Result<String, GdvError> {
    let json = gdv_to_json_value(value)?;
    serde_json::to_string_pretty(&json).map_err(|e| GdvError::conversion(e.to_string()))
}

/// Parse JSON text and convert it.
///
/// # Errors
///
/// Returns `Syntax` for malformed JSON, with the line and column reported
/// by the JSON parser, and otherwise as [`json_value_to_gdv`].
pub fn json_to_gdv(text: &str) -> Result<Value, GdvError> {
    let json: Json = serde_json::from_str(text).map_err(|e| {
        let loc = crate::FileLineCol::new(
            None,
            crate::LineCol::new(
                u32::try_from(e.line()).unwrap_or(u32::MAX),
                u32::try_from(e.column()).unwrap_or(u32::MAX),
            ),
        );
        GdvError::syntax(loc, e.to_string())
    })?;
    json_value_to_gdv(&json)
}
