//! Decoders, from a node into a typed value.
//!
//! Every structural decoder is fail-fast: the first failing child is wrapped with its location
//! (field name or index) and returned, without visiting its siblings.

use core::{fmt, marker::PhantomData};

use alloc::{
  boxed::Box,
  format,
  string::{String, ToString},
  vec::Vec,
};

use crate::{DecodeError, DecodeNode, Kind};

/// An item which can decode a value from a node.
pub trait Decoder {
  /// The backend's node type.
  type Node: DecodeNode;
  /// The value decoded.
  type Output;

  /// Decode a value from this node.
  fn decode(&self, node: &Self::Node) -> Result<Self::Output, DecodeError>;
}

impl<D: ?Sized + Decoder> Decoder for &D {
  type Node = D::Node;
  type Output = D::Output;
  #[inline(always)]
  fn decode(&self, node: &Self::Node) -> Result<Self::Output, DecodeError> {
    (**self).decode(node)
  }
}

impl<D: ?Sized + Decoder> Decoder for Box<D> {
  type Node = D::Node;
  type Output = D::Output;
  #[inline(always)]
  fn decode(&self, node: &Self::Node) -> Result<Self::Output, DecodeError> {
    (**self).decode(node)
  }
}

// Decoders which don't wrap another decoder only know their node type from how they're used, so
// they carry it as a phantom parameter. `fn() -> N` keeps them `Send + Sync` regardless of `N`.
macro_rules! leaf_decoder {
  ($(#[$meta:meta])* $name: ident) => {
    $(#[$meta])*
    pub struct $name<N>(PhantomData<fn() -> N>);
    impl<N> Clone for $name<N> {
      fn clone(&self) -> Self {
        *self
      }
    }
    impl<N> Copy for $name<N> {}
    impl<N> Default for $name<N> {
      fn default() -> Self {
        Self(PhantomData)
      }
    }
    impl<N> fmt::Debug for $name<N> {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(stringify!($name))
      }
    }
  };
}

mod ext;
pub use ext::*;

leaf_decoder!(
  /// Decodes `null` into `()`.
  Null
);
leaf_decoder!(
  /// Decodes a boolean.
  Bool
);
leaf_decoder!(
  /// Decodes a number representable as an `i64`.
  Int
);
leaf_decoder!(
  /// Decodes any number as an `f64`.
  Float
);
leaf_decoder!(
  /// Decodes a string.
  Str
);
leaf_decoder!(
  /// Decodes any node into a copy of itself.
  Json
);
leaf_decoder!(
  /// Decodes an object into its fields, each left undecoded.
  Obj
);

impl<N: DecodeNode> Decoder for Null<N> {
  type Node = N;
  type Output = ();
  fn decode(&self, node: &N) -> Result<(), DecodeError> {
    if node.kind() != Kind::Null {
      Err(DecodeError::expected(Kind::Null))?;
    }
    Ok(())
  }
}

impl<N: DecodeNode> Decoder for Bool<N> {
  type Node = N;
  type Output = bool;
  fn decode(&self, node: &N) -> Result<bool, DecodeError> {
    node.as_bool().ok_or(DecodeError::expected(Kind::Bool))
  }
}

impl<N: DecodeNode> Decoder for Int<N> {
  type Node = N;
  type Output = i64;
  fn decode(&self, node: &N) -> Result<i64, DecodeError> {
    node.as_int().ok_or(DecodeError::expected(Kind::Int))
  }
}

impl<N: DecodeNode> Decoder for Float<N> {
  type Node = N;
  type Output = f64;
  fn decode(&self, node: &N) -> Result<f64, DecodeError> {
    node.as_float().ok_or(DecodeError::expected(Kind::Float))
  }
}

impl<N: DecodeNode> Decoder for Str<N> {
  type Node = N;
  type Output = String;
  fn decode(&self, node: &N) -> Result<String, DecodeError> {
    node.as_str().map(ToString::to_string).ok_or(DecodeError::expected(Kind::String))
  }
}

impl<N: DecodeNode> Decoder for Json<N> {
  type Node = N;
  type Output = N;
  fn decode(&self, node: &N) -> Result<N, DecodeError> {
    Ok(node.clone())
  }
}

impl<N: DecodeNode> Decoder for Obj<N> {
  type Node = N;
  type Output = Vec<(String, N)>;
  fn decode(&self, node: &N) -> Result<Self::Output, DecodeError> {
    Ok(
      node
        .entries()
        .ok_or(DecodeError::expected(Kind::Object))?
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect(),
    )
  }
}

/// Decode `null` into `()`.
pub fn null<N: DecodeNode>() -> Null<N> {
  Null::default()
}

/// Decode a boolean.
pub fn bool<N: DecodeNode>() -> Bool<N> {
  Bool::default()
}

/// Decode a number representable as an `i64`.
pub fn int<N: DecodeNode>() -> Int<N> {
  Int::default()
}

/// Decode any number as an `f64`.
pub fn float<N: DecodeNode>() -> Float<N> {
  Float::default()
}

/// Decode a string.
pub fn string<N: DecodeNode>() -> Str<N> {
  Str::default()
}

/// Decode any node into a copy of itself.
pub fn json<N: DecodeNode>() -> Json<N> {
  Json::default()
}

/// Decode an object into its fields, in order, with each value left undecoded.
pub fn obj<N: DecodeNode>() -> Obj<N> {
  Obj::default()
}

fn elements<N: DecodeNode>(node: &N) -> Result<impl Iterator<Item = &N>, DecodeError> {
  node.items().ok_or(DecodeError::expected(Kind::Array))
}

/// Decodes every element of an array into a `Vec`.
#[derive(Clone, Copy, Debug)]
pub struct List<D>(D);

impl<D: Decoder> Decoder for List<D> {
  type Node = D::Node;
  type Output = Vec<D::Output>;
  fn decode(&self, node: &D::Node) -> Result<Self::Output, DecodeError> {
    elements(node)?
      .enumerate()
      .map(|(i, item)| self.0.decode(item).map_err(|e| e.at_index(i)))
      .collect()
  }
}

/// Decode every element of an array, in order.
pub fn list<D: Decoder>(decoder: D) -> List<D> {
  List(decoder)
}

/// Decodes every element of an array into a boxed slice.
#[derive(Clone, Copy, Debug)]
pub struct Array<D>(List<D>);

impl<D: Decoder> Decoder for Array<D> {
  type Node = D::Node;
  type Output = Box<[D::Output]>;
  fn decode(&self, node: &D::Node) -> Result<Self::Output, DecodeError> {
    self.0.decode(node).map(Vec::into_boxed_slice)
  }
}

/// Decode every element of an array, in order, into a boxed slice.
pub fn array<D: Decoder>(decoder: D) -> Array<D> {
  Array(List(decoder))
}

/// Decodes an array of exactly two elements.
#[derive(Clone, Copy, Debug)]
pub struct Pair<A, B>(A, B);

impl<A: Decoder, B: Decoder<Node = A::Node>> Decoder for Pair<A, B> {
  type Node = A::Node;
  type Output = (A::Output, B::Output);
  fn decode(&self, node: &A::Node) -> Result<Self::Output, DecodeError> {
    let mut items = elements(node)?;
    let (Some(a), Some(b), None) = (items.next(), items.next(), items.next()) else {
      let len = elements(node)?.count();
      return Err(DecodeError::shape("pair", format!("found {len} elements")));
    };
    let a = self.0.decode(a).map_err(|e| e.at_index(0))?;
    let b = self.1.decode(b).map_err(|e| e.at_index(1))?;
    Ok((a, b))
  }
}

/// Decode an array of exactly two elements, each with its own decoder.
pub fn pair<A: Decoder, B: Decoder<Node = A::Node>>(a: A, b: B) -> Pair<A, B> {
  Pair(a, b)
}

/// Decodes the only element of an array.
#[derive(Clone, Copy, Debug)]
pub struct Singleton<D>(D);

impl<D: Decoder> Decoder for Singleton<D> {
  type Node = D::Node;
  type Output = D::Output;
  fn decode(&self, node: &D::Node) -> Result<D::Output, DecodeError> {
    let mut items = elements(node)?;
    let (Some(item), None) = (items.next(), items.next()) else {
      let len = elements(node)?.count();
      return Err(DecodeError::shape("singleton", format!("found {len} elements")));
    };
    self.0.decode(item).map_err(|e| e.at_index(0))
  }
}

/// Decode the only element of an array of exactly one element.
pub fn singleton<D: Decoder>(decoder: D) -> Singleton<D> {
  Singleton(decoder)
}

/// Find a field by name.
///
/// The first field with this name is used. A field whose value is `null` is considered absent.
fn lookup<'node, N: DecodeNode>(
  node: &'node N,
  name: &str,
) -> Result<Option<&'node N>, DecodeError> {
  let mut entries = node.entries().ok_or(DecodeError::expected(Kind::Object))?;
  Ok(
    entries
      .find(|(key, _)| *key == name)
      .map(|(_, value)| value)
      .filter(|value| value.kind() != Kind::Null),
  )
}

/// Decodes a required field of an object.
#[derive(Clone, Debug)]
pub struct Field<D> {
  name: String,
  decoder: D,
}

impl<D: Decoder> Decoder for Field<D> {
  type Node = D::Node;
  type Output = D::Output;
  fn decode(&self, node: &D::Node) -> Result<D::Output, DecodeError> {
    let value =
      lookup(node, &self.name)?.ok_or_else(|| DecodeError::NotFound.in_field(&*self.name))?;
    self.decoder.decode(value).map_err(|e| e.in_field(&*self.name))
  }
}

/// Decode the named field of an object.
///
/// If the field is absent, or `null`, this fails with `NotFound`.
pub fn field<D: Decoder>(name: impl Into<String>, decoder: D) -> Field<D> {
  Field { name: name.into(), decoder }
}

/// Decodes a field of an object, falling back to a default.
#[derive(Clone, Debug)]
pub struct FieldOr<D, T> {
  name: String,
  default: T,
  decoder: D,
}

impl<D: Decoder<Output = T>, T: Clone> Decoder for FieldOr<D, T> {
  type Node = D::Node;
  type Output = T;
  fn decode(&self, node: &D::Node) -> Result<T, DecodeError> {
    match lookup(node, &self.name)? {
      Some(value) => self.decoder.decode(value).map_err(|e| e.in_field(&*self.name)),
      None => Ok(self.default.clone()),
    }
  }
}

/// Decode the named field of an object, yielding `default` if it's absent or `null`.
///
/// The decoder is not invoked when the default is used.
pub fn field_or<D: Decoder<Output = T>, T: Clone>(
  name: impl Into<String>,
  default: T,
  decoder: D,
) -> FieldOr<D, T> {
  FieldOr { name: name.into(), default, decoder }
}

/// Decodes an optional field of an object.
#[derive(Clone, Debug)]
pub struct FieldOpt<D> {
  name: String,
  decoder: D,
}

impl<D: Decoder> Decoder for FieldOpt<D> {
  type Node = D::Node;
  type Output = Option<D::Output>;
  fn decode(&self, node: &D::Node) -> Result<Self::Output, DecodeError> {
    lookup(node, &self.name)?
      .map(|value| self.decoder.decode(value).map_err(|e| e.in_field(&*self.name)))
      .transpose()
  }
}

/// Decode the named field of an object, yielding `None` if it's absent or `null`.
pub fn field_opt<D: Decoder>(name: impl Into<String>, decoder: D) -> FieldOpt<D> {
  FieldOpt { name: name.into(), decoder }
}

/// Decodes a value nested within objects.
#[derive(Clone, Debug)]
pub struct At<D> {
  path: Vec<String>,
  decoder: D,
}

impl<D: Decoder> Decoder for At<D> {
  type Node = D::Node;
  type Output = D::Output;
  fn decode(&self, node: &D::Node) -> Result<D::Output, DecodeError> {
    // Walk down, remembering each name so the error can be wrapped on the way back out
    let mut node = node;
    let mut depth = 0;
    let result = loop {
      let Some(name) = self.path.get(depth) else { break self.decoder.decode(node) };
      match lookup(node, name) {
        Ok(Some(child)) => node = child,
        Ok(None) => break Err(DecodeError::NotFound.in_field(&**name)),
        Err(e) => break Err(e),
      }
      depth += 1;
    };
    result.map_err(|e| self.path[.. depth].iter().rev().fold(e, |e, name| e.in_field(&**name)))
  }
}

/// Decode the value found by following this path of field names.
///
/// Each level has the same semantics as [`field`]. An empty path decodes the node itself.
pub fn at<D: Decoder>(path: impl IntoIterator<Item = impl Into<String>>, decoder: D) -> At<D> {
  At { path: path.into_iter().map(Into::into).collect(), decoder }
}

/// Decodes every field of an object with the same decoder.
#[derive(Clone, Copy, Debug)]
pub struct Dict<D>(D);

impl<D: Decoder> Decoder for Dict<D> {
  type Node = D::Node;
  type Output = Vec<(String, D::Output)>;
  fn decode(&self, node: &D::Node) -> Result<Self::Output, DecodeError> {
    node
      .entries()
      .ok_or(DecodeError::expected(Kind::Object))?
      .map(|(name, value)| match self.0.decode(value) {
        Ok(value) => Ok((name.to_string(), value)),
        Err(e) => Err(e.in_field(name)),
      })
      .collect()
  }
}

/// Decode every field of an object, in order, with this decoder.
pub fn dict<D: Decoder>(decoder: D) -> Dict<D> {
  Dict(decoder)
}

/// Decodes `null` as `None`, and anything else as `Some`.
#[derive(Clone, Copy, Debug)]
pub struct Nullable<D>(D);

impl<D: Decoder> Decoder for Nullable<D> {
  type Node = D::Node;
  type Output = Option<D::Output>;
  fn decode(&self, node: &D::Node) -> Result<Self::Output, DecodeError> {
    if node.kind() == Kind::Null {
      return Ok(None);
    }
    self.0.decode(node).map(Some)
  }
}

/// Decode `null` as `None`, and anything else with this decoder as `Some`.
pub fn nullable<D: Decoder>(decoder: D) -> Nullable<D> {
  Nullable(decoder)
}
