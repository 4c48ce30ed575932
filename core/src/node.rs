//! The interfaces a backend implements for its tree-node type.

use core::fmt::{self, Debug, Display};

use alloc::{string::String, vec::Vec};

/// The runtime kind of a node.
///
/// https://datatracker.ietf.org/doc/html/rfc8259#section-3 defines the possible values. Numbers
/// are split by whether the backend can represent them as an `i64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
  /// The `null` unit value.
  Null,
  /// A boolean.
  Bool,
  /// A number representable as an `i64`.
  Int,
  /// Any other number.
  Float,
  /// A string.
  String,
  /// An array.
  Array,
  /// An object.
  Object,
}

impl Kind {
  /// The name used for this kind within error messages.
  pub const fn name(self) -> &'static str {
    match self {
      Kind::Null => "null",
      Kind::Bool => "bool",
      Kind::Int => "int",
      Kind::Float => "float",
      Kind::String => "string",
      Kind::Array => "array",
      Kind::Object => "object",
    }
  }
}

impl Display for Kind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A node which can be inspected by decoders.
///
/// This is the entire contract between a backend and the decoding combinators. The combinators
/// never look at a node except through these methods.
pub trait DecodeNode: Sized + Clone {
  /// The error the backend's parser yields.
  type ParseError: Display + Debug;

  /// Parse text into a root node.
  fn parse(text: &str) -> Result<Self, Self::ParseError>;

  /// The kind of this node.
  fn kind(&self) -> Kind;

  /// This node as a `bool`, if it is one.
  fn as_bool(&self) -> Option<bool>;

  /// This node as an `i64`, if it is a number representable as one.
  fn as_int(&self) -> Option<i64>;

  /// This node as an `f64`, if it is a number.
  ///
  /// Integers MUST be accepted here, as JSON does not distinguish them from other numbers.
  fn as_float(&self) -> Option<f64>;

  /// This node as a string, if it is one.
  fn as_str(&self) -> Option<&str>;

  /// The elements of this node, in order, if it is an array.
  fn items(&self) -> Option<impl Iterator<Item = &Self>>;

  /// The fields of this node, in order, if it is an object.
  ///
  /// If a name is present multiple times, each instance SHOULD be yielded.
  fn entries(&self) -> Option<impl Iterator<Item = (&str, &Self)>>;
}

/// A node which can be built by encoders.
pub trait EncodeNode: Sized {
  /// The `null` node.
  fn null() -> Self;
  /// A boolean node.
  fn bool(value: bool) -> Self;
  /// An integer node.
  fn int(value: i64) -> Self;
  /// A floating-point node.
  ///
  /// If the backend is unable to represent the value (such as `NaN`), it MUST still return a
  /// node. The encoders are total.
  fn float(value: f64) -> Self;
  /// A string node.
  fn string(value: String) -> Self;
  /// An array node with these elements, in order.
  fn array(items: Vec<Self>) -> Self;
  /// An object node with these fields, in order.
  fn object(entries: Vec<(String, Self)>) -> Self;

  /// Print this node as text.
  fn print(&self) -> String;
}

/// If this node is `null`.
#[inline(always)]
pub fn is_null<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::Null
}

/// If this node is a boolean.
#[inline(always)]
pub fn is_bool<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::Bool
}

/// If this node is a number representable as an `i64`.
#[inline(always)]
pub fn is_int<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::Int
}

/// If this node is a number not representable as an `i64`.
#[inline(always)]
pub fn is_float<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::Float
}

/// If this node is a string.
#[inline(always)]
pub fn is_string<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::String
}

/// If this node is an array.
#[inline(always)]
pub fn is_array<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::Array
}

/// If this node is an object.
#[inline(always)]
pub fn is_obj<N: DecodeNode>(node: &N) -> bool {
  node.kind() == Kind::Object
}
