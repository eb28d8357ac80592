// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns an expected value into a JSON tree comparable with a parsed document.
//!
//! Works like `serde_json::to_value` with two differences: unsigned, 8-bit, 128-bit,
//! `char` and byte values are rejected, and map keys must be strings. Numbers carry
//! decimal text in the form the document parser keeps, so the two sides compare by
//! text and never through a float.

use serde::ser::{self, Impossible, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::NormalizeError;

const DECIMAL_TOKEN: &str = "$json_conform::private::Decimal";

// name under which an arbitrary precision `serde_json::Number` serializes its text
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Converts `value` into a [`Value`].
///
/// # Examples
///
/// ```
/// use json_conform::normalize;
/// use serde::Serialize;
/// use serde_json::json;
///
/// #[derive(Serialize)]
/// struct Hero {
///     name: &'static str,
///     level: i32,
/// }
///
/// let tree = normalize(&Hero { name: "Jenny", level: 2 }).unwrap();
/// assert_eq!(tree, json!({ "name": "Jenny", "level": 2 }));
///
/// assert!(normalize(&7u32).is_err());
/// ```
pub fn normalize<T>(value: &T) -> Result<Value, NormalizeError>
where
    T: ?Sized + Serialize,
{
    value.serialize(Normalizer)
}

/// A number kept as decimal text, for values that don't fit `i64` or `f64` losslessly.
///
/// The text must be a valid JSON number and is compared digit for digit with the
/// document, so `Decimal::new("12.4500")` matches `12.4500` but not `12.45`.
///
/// ```
/// use json_conform::{matches, Config, Decimal};
/// use serde::Serialize;
/// use serde_json::json;
///
/// #[derive(Serialize)]
/// struct Invoice {
///     total: Decimal,
/// }
///
/// let expected = Invoice { total: Decimal::new("2541.8913") };
/// let report = matches(&json!({ "total": 2541.8913 }), &expected, &Config::default()).unwrap();
/// assert!(report.is_match());
///
/// let expected = Invoice { total: Decimal::new("0.10000000000000000001") };
/// let report = matches(&json!({ "total": 0.1 }), &expected, &Config::default()).unwrap();
/// assert!(!report.is_match());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    pub fn new(text: impl Into<String>) -> Self {
        Decimal(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Decimal {
    fn from(text: &str) -> Self {
        Decimal::new(text)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_newtype_struct(DECIMAL_TOKEN, self.0.as_str())
    }
}

fn float(value: f64) -> Value {
    // JSON has no NaN or infinity
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn decimal(text: &str) -> Result<Value, NormalizeError> {
    match serde_json::from_str::<Number>(text) {
        // the parser keeps the digits it read; surrounding whitespace is not part of them
        Ok(number) if number.to_string() == text => Ok(Value::Number(number)),
        _ => Err(NormalizeError::InvalidDecimal(text.to_string())),
    }
}

struct Normalizer;

impl ser::Serializer for Normalizer {
    type Ok = Value;
    type Error = NormalizeError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, NormalizeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, _v: i8) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("i8"))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, NormalizeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, NormalizeError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, NormalizeError> {
        Ok(Value::Number(v.into()))
    }

    fn serialize_i128(self, _v: i128) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("i128"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("u64"))
    }

    fn serialize_u128(self, _v: u128) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, NormalizeError> {
        // widening 12.45f32 directly gives 12.449999809265137; go through its shortest text
        let widened: f64 = v
            .to_string()
            .parse()
            .map_err(|err: std::num::ParseFloatError| NormalizeError::Custom(err.to_string()))?;
        Ok(float(widened))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, NormalizeError> {
        Ok(float(v))
    }

    fn serialize_char(self, _v: char) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("char"))
    }

    fn serialize_str(self, v: &str) -> Result<Value, NormalizeError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value, NormalizeError> {
        Err(NormalizeError::UnsupportedType("bytes"))
    }

    fn serialize_none(self) -> Result<Value, NormalizeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, NormalizeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, NormalizeError> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, NormalizeError> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        if name != DECIMAL_TOKEN {
            return value.serialize(self);
        }

        match value.serialize(self)? {
            Value::String(text) => decimal(&text),
            other => Err(NormalizeError::InvalidDecimal(other.to_string())),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Map::new();
        map.insert(variant.to_owned(), value.serialize(self)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, NormalizeError> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, NormalizeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, NormalizeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, NormalizeError> {
        Ok(SerializeTupleVariant {
            name: variant.to_owned(),
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap, NormalizeError> {
        Ok(SerializeMap {
            map: Map::new(),
            next_key: None,
            number: false,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeMap, NormalizeError> {
        let mut map = self.serialize_map(Some(len))?;
        map.number = name == NUMBER_TOKEN;
        Ok(map)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant, NormalizeError> {
        Ok(SerializeStructVariant {
            name: variant.to_owned(),
            map: Map::new(),
        })
    }
}

struct SerializeVec {
    vec: Vec<Value>,
}

struct SerializeTupleVariant {
    name: String,
    vec: Vec<Value>,
}

struct SerializeMap {
    map: Map<String, Value>,
    next_key: Option<String>,
    // a `serde_json::Number` in disguise, holding its text under `NUMBER_TOKEN`
    number: bool,
}

struct SerializeStructVariant {
    name: String,
    map: Map<String, Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(normalize(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, NormalizeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, NormalizeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(normalize(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        let mut object = Map::new();
        object.insert(self.name, Value::Array(self.vec));
        Ok(Value::Object(object))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or_else(|| {
            NormalizeError::Custom("serialize_value called before serialize_key".to_string())
        })?;
        self.map.insert(key, normalize(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_owned(), normalize(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        if !self.number {
            return ser::SerializeMap::end(self);
        }

        let mut map = self.map;
        match map.remove(NUMBER_TOKEN) {
            Some(Value::String(text)) => decimal(&text),
            _ => Err(NormalizeError::Custom("malformed serde_json number".to_string())),
        }
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_owned(), normalize(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        let mut object = Map::new();
        object.insert(self.name, Value::Object(self.map));
        Ok(Value::Object(object))
    }
}

/// Accepts only keys that serialize as strings.
struct MapKeySerializer;

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = NormalizeError;

    type SerializeSeq = Impossible<String, NormalizeError>;
    type SerializeTuple = Impossible<String, NormalizeError>;
    type SerializeTupleStruct = Impossible<String, NormalizeError>;
    type SerializeTupleVariant = Impossible<String, NormalizeError>;
    type SerializeMap = Impossible<String, NormalizeError>;
    type SerializeStruct = Impossible<String, NormalizeError>;
    type SerializeStructVariant = Impossible<String, NormalizeError>;

    fn serialize_str(self, v: &str) -> Result<String, NormalizeError> {
        Ok(v.to_owned())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, NormalizeError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("f64"))
    }

    fn serialize_char(self, _v: char) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("char"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("bytes"))
    }

    fn serialize_none(self) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("Option"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        Err(NormalizeError::NonStringKey("Option"))
    }

    fn serialize_unit(self) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String, NormalizeError> {
        Err(NormalizeError::NonStringKey(name))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, NormalizeError>
    where
        T: ?Sized + Serialize,
    {
        Err(NormalizeError::NonStringKey(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, NormalizeError> {
        Err(NormalizeError::NonStringKey("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, NormalizeError> {
        Err(NormalizeError::NonStringKey("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, NormalizeError> {
        Err(NormalizeError::NonStringKey(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, NormalizeError> {
        Err(NormalizeError::NonStringKey(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, NormalizeError> {
        Err(NormalizeError::NonStringKey("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, NormalizeError> {
        Err(NormalizeError::NonStringKey(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, NormalizeError> {
        Err(NormalizeError::NonStringKey(name))
    }
}
