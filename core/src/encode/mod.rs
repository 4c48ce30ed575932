//! Encoders, from a typed value into a node.
//!
//! Encoders are total. Every value of their input type produces a node.

use core::{fmt, marker::PhantomData};

use alloc::{boxed::Box, string::String, vec::Vec};

use crate::EncodeNode;

/// An item which can encode a value into a node.
pub trait Encoder {
  /// The backend's node type.
  type Node: EncodeNode;
  /// The value encoded.
  type Input;

  /// Encode this value into a node.
  fn encode(&self, value: &Self::Input) -> Self::Node;
}

impl<E: ?Sized + Encoder> Encoder for &E {
  type Node = E::Node;
  type Input = E::Input;
  #[inline(always)]
  fn encode(&self, value: &Self::Input) -> Self::Node {
    (**self).encode(value)
  }
}

impl<E: ?Sized + Encoder> Encoder for Box<E> {
  type Node = E::Node;
  type Input = E::Input;
  #[inline(always)]
  fn encode(&self, value: &Self::Input) -> Self::Node {
    (**self).encode(value)
  }
}

macro_rules! leaf_encoder {
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

leaf_encoder!(
  /// Encodes `()` as `null`.
  Null
);
leaf_encoder!(
  /// Encodes a boolean.
  Bool
);
leaf_encoder!(
  /// Encodes an `i64`.
  Int
);
leaf_encoder!(
  /// Encodes an `f64`.
  Float
);
leaf_encoder!(
  /// Encodes a string.
  Str
);
leaf_encoder!(
  /// Encodes a node as a copy of itself.
  Json
);
leaf_encoder!(
  /// Encodes fields, already encoded, as an object.
  Obj
);

impl<N: EncodeNode> Encoder for Null<N> {
  type Node = N;
  type Input = ();
  fn encode(&self, (): &()) -> N {
    N::null()
  }
}

impl<N: EncodeNode> Encoder for Bool<N> {
  type Node = N;
  type Input = bool;
  fn encode(&self, value: &bool) -> N {
    N::bool(*value)
  }
}

impl<N: EncodeNode> Encoder for Int<N> {
  type Node = N;
  type Input = i64;
  fn encode(&self, value: &i64) -> N {
    N::int(*value)
  }
}

impl<N: EncodeNode> Encoder for Float<N> {
  type Node = N;
  type Input = f64;
  fn encode(&self, value: &f64) -> N {
    N::float(*value)
  }
}

impl<N: EncodeNode> Encoder for Str<N> {
  type Node = N;
  type Input = String;
  fn encode(&self, value: &String) -> N {
    N::string(value.clone())
  }
}

impl<N: EncodeNode + Clone> Encoder for Json<N> {
  type Node = N;
  type Input = N;
  fn encode(&self, value: &N) -> N {
    value.clone()
  }
}

impl<N: EncodeNode + Clone> Encoder for Obj<N> {
  type Node = N;
  type Input = Vec<(String, N)>;
  fn encode(&self, entries: &Self::Input) -> N {
    N::object(entries.clone())
  }
}

/// Encode `()` as `null`.
pub fn null<N: EncodeNode>() -> Null<N> {
  Null::default()
}

/// Encode a boolean.
pub fn bool<N: EncodeNode>() -> Bool<N> {
  Bool::default()
}

/// Encode an `i64`.
pub fn int<N: EncodeNode>() -> Int<N> {
  Int::default()
}

/// Encode an `f64`.
pub fn float<N: EncodeNode>() -> Float<N> {
  Float::default()
}

/// Encode a string.
pub fn string<N: EncodeNode>() -> Str<N> {
  Str::default()
}

/// Encode a node as a copy of itself.
pub fn json<N: EncodeNode + Clone>() -> Json<N> {
  Json::default()
}

/// Encode already-encoded fields, in order, as an object.
pub fn obj<N: EncodeNode + Clone>() -> Obj<N> {
  Obj::default()
}

/// Encodes a sequence of values as an array.
#[derive(Clone, Copy, Debug)]
pub struct List<E>(E);

impl<E: Encoder> Encoder for List<E> {
  type Node = E::Node;
  type Input = Vec<E::Input>;
  fn encode(&self, values: &Self::Input) -> E::Node {
    E::Node::array(values.iter().map(|value| self.0.encode(value)).collect())
  }
}

/// Encode a `Vec` of values as an array, preserving their order.
pub fn list<E: Encoder>(encoder: E) -> List<E> {
  List(encoder)
}

/// Encodes a boxed slice of values as an array.
#[derive(Clone, Copy, Debug)]
pub struct Array<E>(E);

impl<E: Encoder> Encoder for Array<E> {
  type Node = E::Node;
  type Input = Box<[E::Input]>;
  fn encode(&self, values: &Self::Input) -> E::Node {
    E::Node::array(values.iter().map(|value| self.0.encode(value)).collect())
  }
}

/// Encode a boxed slice of values as an array, preserving their order.
pub fn array<E: Encoder>(encoder: E) -> Array<E> {
  Array(encoder)
}

/// Encodes a pair as an array of two elements.
#[derive(Clone, Copy, Debug)]
pub struct Pair<A, B>(A, B);

impl<A: Encoder, B: Encoder<Node = A::Node>> Encoder for Pair<A, B> {
  type Node = A::Node;
  type Input = (A::Input, B::Input);
  fn encode(&self, (a, b): &Self::Input) -> A::Node {
    A::Node::array(Vec::from([self.0.encode(a), self.1.encode(b)]))
  }
}

/// Encode a pair as an array of two elements.
pub fn pair<A: Encoder, B: Encoder<Node = A::Node>>(a: A, b: B) -> Pair<A, B> {
  Pair(a, b)
}

/// Encodes a value as an array of one element.
#[derive(Clone, Copy, Debug)]
pub struct Singleton<E>(E);

impl<E: Encoder> Encoder for Singleton<E> {
  type Node = E::Node;
  type Input = E::Input;
  fn encode(&self, value: &E::Input) -> E::Node {
    E::Node::array(Vec::from([self.0.encode(value)]))
  }
}

/// Encode a value as an array of one element.
pub fn singleton<E: Encoder>(encoder: E) -> Singleton<E> {
  Singleton(encoder)
}

/// Encodes named values as an object.
#[derive(Clone, Copy, Debug)]
pub struct Dict<E>(E);

impl<E: Encoder> Encoder for Dict<E> {
  type Node = E::Node;
  type Input = Vec<(String, E::Input)>;
  fn encode(&self, entries: &Self::Input) -> E::Node {
    E::Node::object(
      entries.iter().map(|(name, value)| (name.clone(), self.0.encode(value))).collect(),
    )
  }
}

/// Encode named values, in order, as an object, each with this encoder.
pub fn dict<E: Encoder>(encoder: E) -> Dict<E> {
  Dict(encoder)
}

/// Encodes `None` as `null`, and `Some` with the wrapped encoder.
#[derive(Clone, Copy, Debug)]
pub struct Nullable<E>(E);

impl<E: Encoder> Encoder for Nullable<E> {
  type Node = E::Node;
  type Input = Option<E::Input>;
  fn encode(&self, value: &Self::Input) -> E::Node {
    match value {
      Some(value) => self.0.encode(value),
      None => E::Node::null(),
    }
  }
}

/// Encode `None` as `null`, and `Some` with this encoder.
pub fn nullable<E: Encoder>(encoder: E) -> Nullable<E> {
  Nullable(encoder)
}

/// Encode a value into a named field, for building the input of [`obj`].
pub fn entry<E: Encoder>(
  name: impl Into<String>,
  encoder: &E,
  value: &E::Input,
) -> (String, E::Node) {
  (name.into(), encoder.encode(value))
}
