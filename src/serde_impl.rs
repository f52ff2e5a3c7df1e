use std::fmt;

use serde::de::{DeserializeOwned, IntoDeserializer, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{forward_to_deserialize_any, Deserialize, Serialize, Serializer};

use crate::value::GdvMap;
use crate::{ErrorCode, GdvError, GdvInteger, Symbol, Value, WriteOptions};

// Through a foreign format, symbols other than null/true/false become
// strings, tags are dropped, and sets become sequences.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Symbol(s) if s.is_null() => serializer.serialize_unit(),
            Self::Symbol(s) if *s == Symbol::TRUE => serializer.serialize_bool(true),
            Self::Symbol(s) if *s == Symbol::FALSE => serializer.serialize_bool(false),
            Self::Symbol(s) => serializer.serialize_str(&s.to_string()),
            Self::Integer(i) => {
                if let Some(v) = i.get_as_small() {
                    serializer.serialize_i64(v)
                } else if let Some(v) = i.get_as_opt::<i128>() {
                    serializer.serialize_i128(v)
                } else if let Some(v) = i.get_as_opt::<u128>() {
                    serializer.serialize_u128(v)
                } else {
                    Err(serde::ser::Error::custom("integer out of range"))
                }
            }
            Self::String(s) => match s.as_str() {
                Some(text) => serializer.serialize_str(text),
                None => serializer.serialize_bytes(s.as_bytes()),
            },
            Self::Sequence { elements, .. } | Self::Tuple { elements, .. } => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for item in elements {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Set { elements, .. } => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for item in elements {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map { entries, .. } => {
                let mut m = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            Self::OrderedMap { entries, .. } => {
                let mut m = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a GDV-compatible value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i128<E>(self, v: i128) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Err(E::custom("floating-point numbers are not supported"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::null())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::null())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(v) = seq.next_element::<Value>()? {
            items.push(v);
        }
        Ok(Value::sequence(items))
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: serde::de::MapAccess<'de>,
    {
        let mut entries = GdvMap::new();
        while let Some((k, v)) = map.next_entry::<Value, Value>()? {
            if entries.contains_key(&k) {
                return Err(<M::Error as serde::de::Error>::custom(format!(
                    "duplicate map key: {}",
                    k.as_truncated_string(60)
                )));
            }
            entries.insert(k, v);
        }
        Ok(Value::map(entries))
    }
}

/// Convert a Rust value into a [`Value`].
///
/// Structs become maps tagged with the struct name, tuple structs become
/// tagged tuples, unit variants become symbols, and other variants become
/// containers tagged with the variant name.
///
/// # Errors
///
/// Returns `Conversion` for floating-point numbers and for maps whose keys
/// repeat.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, GdvError> {
    value.serialize(ValueSerializer).map_err(SerdeError::into_gdv)
}

/// Deserialize a Rust value from a [`Value`].
///
/// # Errors
///
/// Returns `Conversion` if the value doesn't match the target type.
pub fn from_value<'de, T: Deserialize<'de>>(value: &'de Value) -> Result<T, GdvError> {
    T::deserialize(ValueDeserializer::new(value)).map_err(SerdeError::into_gdv)
}

/// Serialize a Rust value to compact GDVN text.
///
/// # Errors
///
/// As [`to_value`].
pub fn to_gdvn_string<T: Serialize + ?Sized>(value: &T) -> Result<String, GdvError> {
    Ok(to_value(value)?.as_string_with(&WriteOptions::default()))
}

/// Parse GDVN text and deserialize a Rust value from it.
///
/// # Errors
///
/// Returns a syntax error for malformed text, or `Conversion` if the value
/// doesn't match the target type.
pub fn from_gdvn_str<T: DeserializeOwned>(text: &str) -> Result<T, GdvError> {
    let value = Value::read_from_str(text)?;
    from_value(&value)
}

#[derive(Debug, Clone)]
struct SerdeError {
    message: String,
}

impl SerdeError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn into_gdv(self) -> GdvError {
        GdvError::new(ErrorCode::Conversion, self.message)
    }
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SerdeError {}

impl serde::ser::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}

impl From<GdvError> for SerdeError {
    fn from(err: GdvError) -> Self {
        Self::new(err.message())
    }
}

fn tagged(name: &str, mut value: Value) -> Result<Value, SerdeError> {
    value.container_set_tag(Symbol::intern(name))?;
    Ok(value)
}

struct ValueSerializer;

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = SerdeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = SeqSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = MapSerializer;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        Err(SerdeError::new("floating-point numbers are not supported"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        Err(SerdeError::new("floating-point numbers are not supported"))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(Value::from(v))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::null())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(Value::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(Value::symbol(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        let inner = value.serialize(Self)?;
        Ok(Value::tagged_tuple(Symbol::intern(variant), vec![inner]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SeqSerializer::new(SeqShape::Sequence, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(SeqSerializer::new(SeqShape::Tuple(None), Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(SeqSerializer::new(SeqShape::Tuple(Some(name)), Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(SeqSerializer::new(SeqShape::Tuple(Some(variant)), Some(len)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(MapSerializer::new(None))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(MapSerializer::new(Some(name)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(MapSerializer::new(Some(variant)))
    }
}

enum SeqShape {
    Sequence,
    Tuple(Option<&'static str>),
}

struct SeqSerializer {
    shape: SeqShape,
    items: Vec<Value>,
}

impl SeqSerializer {
    fn new(shape: SeqShape, len: Option<usize>) -> Self {
        let items = len.map_or_else(Vec::new, Vec::with_capacity);
        Self { shape, items }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<Value, SerdeError> {
        match self.shape {
            SeqShape::Sequence => Ok(Value::sequence(self.items)),
            SeqShape::Tuple(None) => Ok(Value::tuple(self.items)),
            SeqShape::Tuple(Some(name)) => tagged(name, Value::tuple(self.items)),
        }
    }
}

impl SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl serde::ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl serde::ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl serde::ser::SerializeTupleVariant for SeqSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

struct MapSerializer {
    tag: Option<&'static str>,
    entries: GdvMap,
    pending_key: Option<Value>,
}

impl MapSerializer {
    const fn new(tag: Option<&'static str>) -> Self {
        Self {
            tag,
            entries: GdvMap::new(),
            pending_key: None,
        }
    }

    fn insert(&mut self, key: Value, value: Value) -> Result<(), SerdeError> {
        if self.entries.contains_key(&key) {
            return Err(SerdeError::new(format!(
                "duplicate map key: {}",
                key.as_truncated_string(60)
            )));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    fn finish(self) -> Result<Value, SerdeError> {
        let map = Value::map(self.entries);
        match self.tag {
            Some(name) => tagged(name, map),
            None => Ok(map),
        }
    }
}

impl SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.pending_key = Some(key.serialize(ValueSerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| SerdeError::new("map value without a key"))?;
        let value = value.serialize(ValueSerializer)?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl serde::ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let value = value.serialize(ValueSerializer)?;
        self.insert(Value::symbol(key), value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl serde::ser::SerializeStructVariant for MapSerializer {
    type Ok = Value;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let value = value.serialize(ValueSerializer)?;
        self.insert(Value::symbol(key), value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> ValueDeserializer<'de> {
    const fn new(value: &'de Value) -> Self {
        Self { value }
    }

    fn unexpected(&self, expected: &str) -> SerdeError {
        SerdeError::new(format!(
            "expected {expected}, not {}",
            self.value.kind().common_name()
        ))
    }
}

fn visit_integer<'de, V: Visitor<'de>>(i: &GdvInteger, visitor: V) -> Result<V::Value, SerdeError> {
    if let Some(v) = i.get_as_small() {
        visitor.visit_i64(v)
    } else if let Some(v) = i.get_as_opt::<i128>() {
        visitor.visit_i128(v)
    } else if let Some(v) = i.get_as_opt::<u128>() {
        visitor.visit_u128(v)
    } else {
        Err(SerdeError::new(format!("integer out of range: {i}")))
    }
}

impl<'de> serde::de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = SerdeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Symbol(s) if s.is_null() => visitor.visit_unit(),
            Value::Symbol(s) if *s == Symbol::TRUE => visitor.visit_bool(true),
            Value::Symbol(s) if *s == Symbol::FALSE => visitor.visit_bool(false),
            Value::Symbol(s) => match s.as_str() {
                Some(name) => visitor.visit_borrowed_str(name),
                None => visitor.visit_borrowed_bytes(s.name()),
            },
            Value::Integer(i) => visit_integer(i, visitor),
            Value::String(s) => match s.as_str() {
                Some(text) => visitor.visit_borrowed_str(text),
                None => visitor.visit_borrowed_bytes(s.as_bytes()),
            },
            Value::Sequence { elements, .. } | Value::Tuple { elements, .. } => {
                visitor.visit_seq(SeqAccess {
                    iter: elements.iter(),
                })
            }
            Value::Set { elements, .. } => visitor.visit_seq(SeqAccess {
                iter: elements.iter(),
            }),
            Value::Map { entries, .. } => visitor.visit_map(MapAccess::new(entries.iter())),
            Value::OrderedMap { entries, .. } => visitor.visit_map(MapAccess::new(entries.iter())),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_borrowed_bytes(s.as_bytes()),
            _ => Err(self.unexpected("string")),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_null() {
            visitor.visit_unit()
        } else {
            Err(self.unexpected("null"))
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Symbol(s) => visitor.visit_enum(EnumAccess {
                variant: *s,
                value: None,
            }),
            v if v.is_tagged_container() => visitor.visit_enum(EnumAccess {
                variant: v.container_tag()?,
                value: Some(v),
            }),
            _ => Err(self.unexpected("symbol or tagged container")),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        seq tuple tuple_struct map struct identifier
    }
}

struct SeqAccess<I> {
    iter: I,
}

impl<'de, I> serde::de::SeqAccess<'de> for SeqAccess<I>
where
    I: Iterator<Item = &'de Value>,
{
    type Error = SerdeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }
}

struct MapAccess<'de, I>
where
    I: Iterator<Item = (&'de Value, &'de Value)>,
{
    iter: I,
    pending: Option<&'de Value>,
}

impl<'de, I> MapAccess<'de, I>
where
    I: Iterator<Item = (&'de Value, &'de Value)>,
{
    const fn new(iter: I) -> Self {
        Self {
            iter,
            pending: None,
        }
    }
}

impl<'de, I> serde::de::MapAccess<'de> for MapAccess<'de, I>
where
    I: Iterator<Item = (&'de Value, &'de Value)>,
{
    type Error = SerdeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: serde::de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            None => Ok(None),
            Some((key, value)) => {
                self.pending = Some(value);
                seed.deserialize(ValueDeserializer::new(key)).map(Some)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let value = self
            .pending
            .take()
            .ok_or_else(|| SerdeError::new("map value requested before its key"))?;
        seed.deserialize(ValueDeserializer::new(value))
    }
}

struct EnumAccess<'de> {
    variant: Symbol,
    value: Option<&'de Value>,
}

impl<'de> serde::de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = SerdeError;
    type Variant = VariantAccess<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let name = self
            .variant
            .as_str()
            .ok_or_else(|| SerdeError::new("variant name is not valid UTF-8"))?;
        let val = seed.deserialize(IntoDeserializer::<SerdeError>::into_deserializer(name))?;
        Ok((val, VariantAccess { value: self.value }))
    }
}

struct VariantAccess<'de> {
    value: Option<&'de Value>,
}

impl<'de> serde::de::VariantAccess<'de> for VariantAccess<'de> {
    type Error = SerdeError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(SerdeError::new("expected a unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(Value::Tuple { elements, .. }) if elements.len() == 1 => {
                seed.deserialize(ValueDeserializer::new(&elements[0]))
            }
            _ => Err(SerdeError::new("expected a one-element tagged tuple")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Tuple { elements, .. } | Value::Sequence { elements, .. }) => {
                visitor.visit_seq(SeqAccess {
                    iter: elements.iter(),
                })
            }
            _ => Err(SerdeError::new("expected a tagged tuple")),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Map { entries, .. }) => visitor.visit_map(MapAccess::new(entries.iter())),
            Some(Value::OrderedMap { entries, .. }) => {
                visitor.visit_map(MapAccess::new(entries.iter()))
            }
            _ => Err(SerdeError::new("expected a tagged map")),
        }
    }
}

