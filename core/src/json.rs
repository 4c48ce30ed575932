//! The [`serde_json::Value`] backend.
//!
//! Numbers representable as an `i64` are `Kind::Int`, all others are `Kind::Float`. Object order
//! follows `serde_json::Map`, which is only insertion order when `serde_json`'s `preserve_order`
//! feature is enabled. `serde_json` resolves duplicate keys itself while parsing.

use alloc::{
  string::{String, ToString},
  vec::Vec,
};

use serde_json::{Map, Value};

use crate::{DecodeNode, EncodeNode, Kind};

impl DecodeNode for Value {
  type ParseError = serde_json::Error;

  fn parse(text: &str) -> Result<Self, Self::ParseError> {
    serde_json::from_str(text)
  }

  fn kind(&self) -> Kind {
    match self {
      Value::Null => Kind::Null,
      Value::Bool(_) => Kind::Bool,
      Value::Number(number) if number.is_i64() => Kind::Int,
      Value::Number(_) => Kind::Float,
      Value::String(_) => Kind::String,
      Value::Array(_) => Kind::Array,
      Value::Object(_) => Kind::Object,
    }
  }

  #[inline(always)]
  fn as_bool(&self) -> Option<bool> {
    Value::as_bool(self)
  }

  #[inline(always)]
  fn as_int(&self) -> Option<i64> {
    Value::as_i64(self)
  }

  #[inline(always)]
  fn as_float(&self) -> Option<f64> {
    Value::as_f64(self)
  }

  #[inline(always)]
  fn as_str(&self) -> Option<&str> {
    Value::as_str(self)
  }

  fn items(&self) -> Option<impl Iterator<Item = &Self>> {
    self.as_array().map(|items| items.iter())
  }

  fn entries(&self) -> Option<impl Iterator<Item = (&str, &Self)>> {
    self.as_object().map(|map| map.iter().map(|(name, value)| (name.as_str(), value)))
  }
}

impl EncodeNode for Value {
  fn null() -> Self {
    Value::Null
  }

  fn bool(value: bool) -> Self {
    Value::Bool(value)
  }

  fn int(value: i64) -> Self {
    Value::from(value)
  }

  /// Non-finite values, which JSON can't represent, are encoded as `null`.
  fn float(value: f64) -> Self {
    Value::from(value)
  }

  fn string(value: String) -> Self {
    Value::String(value)
  }

  fn array(items: Vec<Self>) -> Self {
    Value::Array(items)
  }

  /// If a name is present multiple times, the last value is kept.
  fn object(entries: Vec<(String, Self)>) -> Self {
    Value::Object(entries.into_iter().collect::<Map<_, _>>())
  }

  fn print(&self) -> String {
    self.to_string()
  }
}

#[test]
fn kinds() {
  use serde_json::json;

  assert_eq!(json!(null).kind(), Kind::Null);
  assert_eq!(json!(false).kind(), Kind::Bool);
  assert_eq!(json!(-3).kind(), Kind::Int);
  assert_eq!(json!(1.5).kind(), Kind::Float);
  assert_eq!(json!(u64::MAX).kind(), Kind::Float);
  assert_eq!(json!("x").kind(), Kind::String);
  assert_eq!(json!([]).kind(), Kind::Array);
  assert_eq!(json!({}).kind(), Kind::Object);
}
