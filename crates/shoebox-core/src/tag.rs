//! Tag — a name/value label attached to a photo.
//!
//! Tags are immutable. Identity is the `(name, value)` pair, compared exactly
//! and case-sensitively, so a tag can serve directly as a set key. Editing a
//! tag on a photo means removing the old one and inserting a new one.

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// A `name=value` label, e.g. `location=Paris` or `person=alice`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
  name:  String,
  value: String,
}

impl Tag {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self { name: name.into(), value: value.into() }
  }

  /// The tag type, e.g. `location`.
  pub fn name(&self) -> &str { &self.name }

  pub fn value(&self) -> &str { &self.value }

  /// A copy of this tag under a different name.
  pub fn with_name(&self, name: impl Into<String>) -> Self {
    Self::new(name, self.value.clone())
  }

  /// A copy of this tag with a different value.
  pub fn with_value(&self, value: impl Into<String>) -> Self {
    Self::new(self.name.clone(), value)
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}", self.name, self.value)
  }
}

/// Parses `name=value`, splitting on the first `=`. Surrounding whitespace on
/// either side is ignored; both sides must be non-empty.
impl FromStr for Tag {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let (name, value) = s
      .split_once('=')
      .ok_or_else(|| Error::InvalidTag(s.to_owned()))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
      return Err(Error::InvalidTag(s.to_owned()));
    }
    Ok(Self::new(name, value))
  }
}
