//! Three-tier ISSN resolution.

use folio_core::record::RecordSegment;

const PRINT: &str = "PRINT";
const ELECTRONIC: &str = "ONLIN";

/// The resolved ISSN pair of a journal record. Callers must not assume
/// completeness: either member may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssnSet {
  pub print:      Option<String>,
  pub electronic: Option<String>,
}

impl IssnSet {
  /// Resolve the ISSN pair from a journal segment.
  ///
  /// Fallback tiers, first non-empty wins:
  /// 1. the explicit multi-ISSN field `v435` (occurrences typed by sub-key
  ///    `t`);
  /// 2. the single legacy ISSN field `v935` typed by `v035`, paired with the
  ///    cross-checked "other kind" field `v400` only when the two values
  ///    differ;
  /// 3. a minimal single entry from `v035` + `v400`.
  pub fn resolve(segment: &RecordSegment) -> Self {
    let mut set = Self::default();

    for occurrence in segment.occurrences("v435") {
      if let (Some(kind), Some(value)) =
        (occurrence.get("t"), occurrence.value())
      {
        set.put(kind, value);
      }
    }
    if set.print.is_some() || set.electronic.is_some() {
      return set;
    }

    let Some(issn_kind) = segment.first_value("v035") else {
      return set;
    };

    if segment.contains("v935") {
      let current = segment.first_value("v935");
      if let Some(current) = current {
        set.put(issn_kind, current);
      }
      let other = segment.first_value("v400");
      if other.is_some() && other != current {
        let other_kind = if issn_kind == PRINT { ELECTRONIC } else { PRINT };
        set.put(other_kind, other.unwrap_or_default());
      }
      return set;
    }

    if let Some(value) = segment.first_value("v400") {
      set.put(issn_kind, value);
    }
    set
  }

  fn put(&mut self, kind: &str, value: &str) {
    match kind {
      PRINT => self.print = Some(value.to_string()),
      ELECTRONIC => self.electronic = Some(value.to_string()),
      // Unknown legacy kind markers are dropped rather than guessed at.
      _ => {}
    }
  }
}
