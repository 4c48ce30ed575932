use core::fmt::{self, Display, Write};

use alloc::{
  borrow::Cow,
  boxed::Box,
  string::{String, ToString},
  vec::Vec,
};

use crate::Kind;

/// An error incurred when decoding.
///
/// Errors nest as decoding unwinds through the combinators, so a structural failure carries the
/// full path from the root node to where it occurred. The `Display` implementation renders this
/// path outermost-first, as in `field "items": element at index 1: expected int`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DecodeError {
  /// A failure while decoding the named field of an object.
  FieldError(String, Box<DecodeError>),
  /// A failure while decoding the element at this index of an array.
  ArrayError(usize, Box<DecodeError>),
  /// The node did not have the expected kind or shape.
  TypeError {
    /// What was expected, such as `int` or `pair`.
    expected: Cow<'static, str>,
    /// Optional context on what was found instead.
    context: Option<String>,
  },
  /// Both branches of an alternation failed.
  OrError(Box<DecodeError>, Box<DecodeError>),
  /// A required field was not present.
  NotFound,
  /// The decoded value was rejected by a validating map.
  ValidationError(Option<String>),
  /// The backend failed to parse the text.
  BackendError(String),
}

/// An element of the path to a failure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PathElement {
  /// A field within an object.
  Field(String),
  /// An index within an array.
  Index(usize),
}

impl DecodeError {
  /// A `TypeError` for a node which wasn't of the expected kind.
  pub fn expected(kind: Kind) -> Self {
    DecodeError::TypeError { expected: Cow::Borrowed(kind.name()), context: None }
  }

  /// A `TypeError` for a node which didn't have the expected shape.
  pub fn shape(expected: &'static str, context: impl Into<String>) -> Self {
    DecodeError::TypeError { expected: Cow::Borrowed(expected), context: Some(context.into()) }
  }

  /// Wrap this error as having occurred within the named field.
  pub fn in_field(self, name: impl Into<String>) -> Self {
    DecodeError::FieldError(name.into(), Box::new(self))
  }

  /// Wrap this error as having occurred at this index.
  pub fn at_index(self, index: usize) -> Self {
    DecodeError::ArrayError(index, Box::new(self))
  }

  /// Combine the errors from both branches of an alternation.
  pub fn or(self, other: Self) -> Self {
    DecodeError::OrError(Box::new(self), Box::new(other))
  }

  /// The path from the root node to the failure.
  ///
  /// This stops at an `OrError`, as past it there is no single path.
  pub fn path(&self) -> Vec<PathElement> {
    let mut path = Vec::new();
    let mut error = self;
    loop {
      match error {
        DecodeError::FieldError(name, cause) => {
          path.push(PathElement::Field(name.clone()));
          error = cause;
        }
        DecodeError::ArrayError(index, cause) => {
          path.push(PathElement::Index(*index));
          error = cause;
        }
        _ => break path,
      }
    }
  }

  /// The path to the failure as a JSON Pointer (RFC 6901).
  ///
  /// The root is represented by the empty string.
  pub fn pointer(&self) -> String {
    let mut pointer = String::new();
    for element in self.path() {
      pointer.push('/');
      match element {
        PathElement::Field(name) => {
          // `~` must be escaped before `/`
          pointer.push_str(&name.replace('~', "~0").replace('/', "~1"));
        }
        PathElement::Index(index) => pointer.push_str(&index.to_string()),
      }
    }
    pointer
  }

  /// The innermost error, past any field or element context.
  pub fn root_cause(&self) -> &DecodeError {
    match self {
      DecodeError::FieldError(_, cause) | DecodeError::ArrayError(_, cause) => cause.root_cause(),
      _ => self,
    }
  }
}

impl Display for DecodeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DecodeError::FieldError(name, cause) => {
        f.write_str("field ")?;
        write_quoted(f, name)?;
        write!(f, ": {cause}")
      }
      DecodeError::ArrayError(index, cause) => write!(f, "element at index {index}: {cause}"),
      DecodeError::TypeError { expected, context: None } => write!(f, "expected {expected}"),
      DecodeError::TypeError { expected, context: Some(context) } => {
        write!(f, "expected {expected} ({context})")
      }
      DecodeError::OrError(a, b) => write!(f, "either ({a}) or ({b})"),
      DecodeError::NotFound => f.write_str("not found"),
      DecodeError::ValidationError(None) => f.write_str("invalid value"),
      DecodeError::ValidationError(Some(message)) => write!(f, "invalid value: {message}"),
      DecodeError::BackendError(message) => write!(f, "parse error: {message}"),
    }
  }
}

impl core::error::Error for DecodeError {}

// Field names are arbitrary strings, so quote them with the minimal escaping needed to be
// unambiguous.
fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
  f.write_char('"')?;
  for char in name.chars() {
    match char {
      '"' => f.write_str("\\\"")?,
      '\\' => f.write_str("\\\\")?,
      '\n' => f.write_str("\\n")?,
      char if char.is_control() => write!(f, "\\u{{{:x}}}", u32::from(char))?,
      char => f.write_char(char)?,
    }
  }
  f.write_char('"')
}

/// Render an error as a single, path-qualified message.
///
/// This is equivalent to `error.to_string()`.
pub fn error_to_string(error: &DecodeError) -> String {
  error.to_string()
}
