//! Combinators derived purely from the [`Encoder`] interface.

use core::{fmt, marker::PhantomData};

use alloc::boxed::Box;

use crate::EncodeNode;
use super::Encoder;

/// A type-erased encoder.
pub type BoxEncoder<'a, N, T> = Box<dyn 'a + Encoder<Node = N, Input = T>>;

/// Methods available on every [`Encoder`].
pub trait EncoderExt: Encoder + Sized {
  /// Encode a `T` by first transforming it into this encoder's input.
  ///
  /// This allows reusing an existing encoder for a derived type.
  fn map<T, F: Fn(&T) -> Self::Input>(self, f: F) -> Map<Self, F, T> {
    Map { encoder: self, f, _input: PhantomData }
  }

  /// Erase the type of this encoder.
  fn boxed<'a>(self) -> BoxEncoder<'a, Self::Node, Self::Input>
  where
    Self: 'a,
  {
    Box::new(self)
  }
}
impl<E: Encoder> EncoderExt for E {}

/// Encoder for [`EncoderExt::map`].
pub struct Map<E, F, T> {
  encoder: E,
  f: F,
  _input: PhantomData<fn(&T)>,
}

impl<E: Clone, F: Clone, T> Clone for Map<E, F, T> {
  fn clone(&self) -> Self {
    Map { encoder: self.encoder.clone(), f: self.f.clone(), _input: PhantomData }
  }
}

impl<E: fmt::Debug, F, T> fmt::Debug for Map<E, F, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Map").field("encoder", &self.encoder).finish_non_exhaustive()
  }
}

impl<E: Encoder, F: Fn(&T) -> E::Input, T> Encoder for Map<E, F, T> {
  type Node = E::Node;
  type Input = T;
  fn encode(&self, value: &T) -> E::Node {
    self.encoder.encode(&(self.f)(value))
  }
}

/// An encoder defined by a function.
pub struct FromFn<F, N, T> {
  f: F,
  _marker: PhantomData<fn(&T) -> N>,
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

impl<F: Fn(&T) -> N, N: EncodeNode, T> Encoder for FromFn<F, N, T> {
  type Node = N;
  type Input = T;
  #[inline(always)]
  fn encode(&self, value: &T) -> N {
    (self.f)(value)
  }
}

/// Lift a function into an encoder.
pub fn from_fn<F: Fn(&T) -> N, N: EncodeNode, T>(f: F) -> FromFn<F, N, T> {
  FromFn { f, _marker: PhantomData }
}
