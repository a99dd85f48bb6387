//! The raw legacy record data model.
//!
//! A legacy record is an ordered sequence of *segments*; each segment maps a
//! field tag (e.g. `"v880"`) to an ordered sequence of *occurrences*; each
//! occurrence maps sub-keys to values, with a bare scalar stored under the
//! reserved sub-key `"_"`. Segment order is semantically fixed per entity
//! kind — consumers index by position, never by search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The reserved sub-key under which a bare scalar value is stored.
pub const VALUE_KEY: &str = "_";

// ─── Occurrence ──────────────────────────────────────────────────────────────

/// One occurrence of a tagged field: a sub-key → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Occurrence(pub BTreeMap<String, String>);

impl Occurrence {
  /// Build an occurrence holding only a bare scalar.
  pub fn scalar(value: impl Into<String>) -> Self {
    let mut map = BTreeMap::new();
    map.insert(VALUE_KEY.to_string(), value.into());
    Self(map)
  }

  /// The bare scalar value, if present.
  pub fn value(&self) -> Option<&str> {
    self.0.get(VALUE_KEY).map(String::as_str)
  }

  /// The value stored under `sub_key`.
  pub fn get(&self, sub_key: &str) -> Option<&str> {
    self.0.get(sub_key).map(String::as_str)
  }

  /// `true` when the occurrence carries only the reserved scalar sub-key.
  pub fn is_bare(&self) -> bool {
    self.0.len() == 1 && self.0.contains_key(VALUE_KEY)
  }
}

impl<const N: usize> From<[(&str, &str); N]> for Occurrence {
  fn from(pairs: [(&str, &str); N]) -> Self {
    Self(
      pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    )
  }
}

// ─── Segment ─────────────────────────────────────────────────────────────────

/// One record segment: field tag → ordered occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSegment(pub BTreeMap<String, Vec<Occurrence>>);

impl RecordSegment {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a bare scalar occurrence for `tag`. Test and builder helper.
  pub fn push_scalar(&mut self, tag: &str, value: impl Into<String>) {
    self
      .0
      .entry(tag.to_string())
      .or_default()
      .push(Occurrence::scalar(value));
  }

  /// Insert a structured occurrence for `tag`.
  pub fn push(&mut self, tag: &str, occurrence: Occurrence) {
    self.0.entry(tag.to_string()).or_default().push(occurrence);
  }

  /// The bare scalar value of the first occurrence of `tag`, or `None`.
  pub fn first_value(&self, tag: &str) -> Option<&str> {
    self.0.get(tag)?.first()?.value()
  }

  /// All occurrences of `tag`, in order. Lazy, finite and restartable.
  pub fn occurrences(&self, tag: &str) -> impl Iterator<Item = &Occurrence> {
    self.0.get(tag).into_iter().flatten()
  }

  pub fn contains(&self, tag: &str) -> bool {
    self.0.contains_key(tag)
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A legacy record: an identifier plus its ordered segments. Immutable once
/// constructed; owned by the record provider until handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
  pub id:       String,
  pub segments: Vec<RecordSegment>,
}

impl LegacyRecord {
  pub fn new(id: impl Into<String>, segments: Vec<RecordSegment>) -> Self {
    Self {
      id: id.into(),
      segments,
    }
  }

  pub fn segment(&self, index: usize) -> Option<&RecordSegment> {
    self.segments.get(index)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_value_returns_bare_scalar_of_first_occurrence() {
    let mut seg = RecordSegment::new();
    seg.push_scalar("v100", "Revista de Teste");
    seg.push_scalar("v100", "Second occurrence");
    assert_eq!(seg.first_value("v100"), Some("Revista de Teste"));
    assert_eq!(seg.first_value("v999"), None);
  }

  #[test]
  fn occurrences_preserve_order_and_restart() {
    let mut seg = RecordSegment::new();
    seg.push("v010", Occurrence::from([("s", "Silva"), ("n", "Ana")]));
    seg.push("v010", Occurrence::from([("s", "Souza"), ("n", "Bia")]));

    let surnames: Vec<_> =
      seg.occurrences("v010").filter_map(|o| o.get("s")).collect();
    assert_eq!(surnames, ["Silva", "Souza"]);

    // The iterator is restartable: a second pass sees the same items.
    assert_eq!(seg.occurrences("v010").count(), 2);
  }

  #[test]
  fn bare_occurrence_detection() {
    assert!(Occurrence::scalar("x").is_bare());
    assert!(!Occurrence::from([("_", "x"), ("l", "en")]).is_bare());
  }
}
