#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::string::String;

mod node;
mod error;
pub mod decode;
pub mod encode;

#[cfg(feature = "serde_json")]
pub mod json;


pub use node::*;
pub use error::{DecodeError, PathElement, error_to_string};
pub use decode::{Decoder, DecoderExt};
pub use encode::{Encoder, EncoderExt};

/// Decode a value from an already-obtained node.
#[inline(always)]
pub fn decode<D: Decoder>(decoder: &D, node: &D::Node) -> Result<D::Output, DecodeError> {
  decoder.decode(node)
}

/// Parse text with the decoder's backend, then decode a value from the root node.
///
/// A failure to parse is returned as a `BackendError` carrying the backend's message.
pub fn parse<D: Decoder>(decoder: &D, text: &str) -> Result<D::Output, DecodeError> {
  let node = D::Node::parse(text).map_err(|e| {
    log::debug!("backend failed to parse {} bytes: {e}", text.len());
    DecodeError::BackendError(alloc::string::ToString::to_string(&e))
  })?;
  decoder.decode(&node)
}

/// Encode a value, then print the resulting node with the encoder's backend.
pub fn encode<E: Encoder>(encoder: &E, value: &E::Input) -> String {
  encoder.encode(value).print()
}

#[cold]
#[track_caller]
fn abort(error: &DecodeError) -> ! {
  log::error!("decoding failed: {error}");
  panic!("{error}")
}

/// Decode a value from a node, panicking with the rendered error on failure.
///
/// This is intended for the edges of a program, never within a decoder.
#[track_caller]
pub fn decode_or_fail<D: Decoder>(decoder: &D, node: &D::Node) -> D::Output {
  match decoder.decode(node) {
    Ok(value) => value,
    Err(e) => abort(&e),
  }
}

/// Parse and decode a value, panicking with the rendered error on failure.
///
/// This is intended for the edges of a program, never within a decoder.
#[track_caller]
pub fn parse_or_fail<D: Decoder>(decoder: &D, text: &str) -> D::Output {
  match parse(decoder, text) {
    Ok(value) => value,
    Err(e) => abort(&e),
  }
}
