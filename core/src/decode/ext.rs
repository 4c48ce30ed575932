//! Combinators derived purely from the [`Decoder`] interface.

use core::{
  fmt::{self, Display},
  marker::PhantomData,
};

use alloc::{
  boxed::Box,
  string::{String, ToString},
};

use crate::{DecodeError, DecodeNode};
use super::Decoder;

/// A type-erased decoder.
pub type BoxDecoder<'a, N, T> = Box<dyn 'a + Decoder<Node = N, Output = T>>;

/// Methods available on every [`Decoder`].
pub trait DecoderExt: Decoder + Sized {
  /// Transform the decoded value.
  ///
  /// Failures are passed through unchanged.
  fn map<U, F: Fn(Self::Output) -> U>(self, f: F) -> Map<Self, F> {
    Map { decoder: self, f }
  }

  /// Transform the decoded value, failing if `f` rejects it.
  ///
  /// A rejection is a `ValidationError`, distinct from the decoder failing.
  fn map_option<U, F: Fn(Self::Output) -> Option<U>>(self, f: F) -> MapOption<Self, F> {
    MapOption { decoder: self, f }
  }

  /// Transform the decoded value, failing with `f`'s error if it rejects it.
  fn try_map<U, E: Display, F: Fn(Self::Output) -> Result<U, E>>(self, f: F) -> TryMap<Self, F> {
    TryMap { decoder: self, f }
  }

  /// Try this decoder, and if it fails, try `other`.
  ///
  /// `other` is only invoked after this decoder fails. If both fail, both errors are retained.
  fn or<D: Decoder<Node = Self::Node, Output = Self::Output>>(self, other: D) -> Or<Self, D> {
    Or(self, other)
  }

  /// Erase the type of this decoder.
  fn boxed<'a>(self) -> BoxDecoder<'a, Self::Node, Self::Output>
  where
    Self: 'a,
  {
    Box::new(self)
  }
}
impl<D: Decoder> DecoderExt for D {}

/// Decoder for [`DecoderExt::map`].
#[derive(Clone, Copy, Debug)]
pub struct Map<D, F> {
  decoder: D,
  f: F,
}

impl<D: Decoder, U, F: Fn(D::Output) -> U> Decoder for Map<D, F> {
  type Node = D::Node;
  type Output = U;
  fn decode(&self, node: &D::Node) -> Result<U, DecodeError> {
    self.decoder.decode(node).map(&self.f)
  }
}

/// Decoder for [`DecoderExt::map_option`].
#[derive(Clone, Copy, Debug)]
pub struct MapOption<D, F> {
  decoder: D,
  f: F,
}

impl<D: Decoder, U, F: Fn(D::Output) -> Option<U>> Decoder for MapOption<D, F> {
  type Node = D::Node;
  type Output = U;
  fn decode(&self, node: &D::Node) -> Result<U, DecodeError> {
    (self.f)(self.decoder.decode(node)?).ok_or(DecodeError::ValidationError(None))
  }
}

/// Decoder for [`DecoderExt::try_map`].
#[derive(Clone, Copy, Debug)]
pub struct TryMap<D, F> {
  decoder: D,
  f: F,
}

impl<D: Decoder, U, E: Display, F: Fn(D::Output) -> Result<U, E>> Decoder for TryMap<D, F> {
  type Node = D::Node;
  type Output = U;
  fn decode(&self, node: &D::Node) -> Result<U, DecodeError> {
    (self.f)(self.decoder.decode(node)?)
      .map_err(|e| DecodeError::ValidationError(Some(e.to_string())))
  }
}

/// Decoder for [`DecoderExt::or`].
#[derive(Clone, Copy, Debug)]
pub struct Or<A, B>(A, B);

impl<A: Decoder, B: Decoder<Node = A::Node, Output = A::Output>> Decoder for Or<A, B> {
  type Node = A::Node;
  type Output = A::Output;
  fn decode(&self, node: &A::Node) -> Result<A::Output, DecodeError> {
    match self.0.decode(node) {
      Ok(value) => Ok(value),
      Err(a) => self.1.decode(node).map_err(|b| a.or(b)),
    }
  }
}

leaf_decoder!(
  /// Decodes any node into `()`.
  Ignore
);

impl<N: DecodeNode> Decoder for Ignore<N> {
  type Node = N;
  type Output = ();
  #[inline(always)]
  fn decode(&self, _: &N) -> Result<(), DecodeError> {
    Ok(())
  }
}

/// Decode any node into `()`, without inspecting it.
pub fn ignore<N: DecodeNode>() -> Ignore<N> {
  Ignore::default()
}

/// Decodes any node into a fixed value.
pub struct Succeed<N, T> {
  value: T,
  _node: PhantomData<fn() -> N>,
}

impl<N, T: Clone> Clone for Succeed<N, T> {
  fn clone(&self) -> Self {
    Succeed { value: self.value.clone(), _node: PhantomData }
  }
}

impl<N, T: fmt::Debug> fmt::Debug for Succeed<N, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Succeed").field("value", &self.value).finish_non_exhaustive()
  }
}

impl<N: DecodeNode, T: Clone> Decoder for Succeed<N, T> {
  type Node = N;
  type Output = T;
  fn decode(&self, _: &N) -> Result<T, DecodeError> {
    Ok(self.value.clone())
  }
}

/// Decode any node into `value`.
pub fn succeed<N: DecodeNode, T: Clone>(value: T) -> Succeed<N, T> {
  Succeed { value, _node: PhantomData }
}

/// Fails on any node with a fixed message.
pub struct Fail<N, T> {
  message: String,
  _marker: PhantomData<fn() -> (N, T)>,
}

impl<N, T> Clone for Fail<N, T> {
  fn clone(&self) -> Self {
    Fail { message: self.message.clone(), _marker: PhantomData }
  }
}

impl<N, T> fmt::Debug for Fail<N, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Fail").field("message", &self.message).finish_non_exhaustive()
  }
}

impl<N: DecodeNode, T> Decoder for Fail<N, T> {
  type Node = N;
  type Output = T;
  fn decode(&self, _: &N) -> Result<T, DecodeError> {
    Err(DecodeError::ValidationError(Some(self.message.clone())))
  }
}

/// Fail on any node with a `ValidationError` carrying `message`.
pub fn fail<N: DecodeNode, T>(message: impl Into<String>) -> Fail<N, T> {
  Fail { message: message.into(), _marker: PhantomData }
}

/// A decoder defined by a function.
pub struct FromFn<F, N, T> {
  f: F,
  _marker: PhantomData<fn(&N) -> T>,
}

impl<F: Clone, N, T> Clone for FromFn<F, N, T> {
  fn clone(&self) -> Self {
    FromFn { f: self.f.clone(), _marker: PhantomData }
  }
}

impl<F, N, T> fmt::Debug for FromFn<F, N, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FromFn").finish_non_exhaustive()
  }
}

impl<F: Fn(&N) -> Result<T, DecodeError>, N: DecodeNode, T> Decoder for FromFn<F, N, T> {
  type Node = N;
  type Output = T;
  #[inline(always)]
  fn decode(&self, node: &N) -> Result<T, DecodeError> {
    (self.f)(node)
  }
}

/// Lift a function into a decoder.
///
/// This is how records, and recursive structures, are usually decoded:
///
/// ```ignore
/// let point = decode::from_fn(|node: &Value| {
///   let x = decode::field("x", decode::int()).decode(node)?;
///   let y = decode::field("y", decode::int()).decode(node)?;
///   Ok(Point { x, y })
/// });
/// ```
pub fn from_fn<F: Fn(&N) -> Result<T, DecodeError>, N: DecodeNode, T>(f: F) -> FromFn<F, N, T> {
  FromFn { f, _marker: PhantomData }
}
