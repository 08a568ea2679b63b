//! Subject — a tracked animal, identified by its normalised name.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{Error, Result};

/// The grouping key for one animal's feeding history.
///
/// Names are trimmed and stripped of diacritics on construction, so `"Vênus"`
/// and `"Venus"` are the same subject. Comparison is otherwise exact.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
  pub fn new(name: &str) -> Result<Self> {
    let key: String = name
      .trim()
      .nfd()
      .filter(|c| !is_combining_mark(*c))
      .collect();
    if key.is_empty() {
      return Err(Error::EmptySubject);
    }
    Ok(Self(key))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Subject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for Subject {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::new(s) }
}

impl TryFrom<String> for Subject {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(&value) }
}

impl From<Subject> for String {
  fn from(value: Subject) -> Self { value.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_diacritics_and_whitespace() {
    let s = Subject::new("  Vênus ").unwrap();
    assert_eq!(s.as_str(), "Venus");
    assert_eq!(s, Subject::new("Venus").unwrap());
  }

  #[test]
  fn empty_name_is_rejected() {
    assert!(matches!(Subject::new("   "), Err(Error::EmptySubject)));
  }

  #[test]
  fn deserialises_through_normalisation() {
    let v: Subject = serde_json::from_str("\"Vênus\"").unwrap();
    assert_eq!(v.as_str(), "Venus");
    assert!(serde_json::from_str::<Subject>("\"\"").is_err());
  }
}
