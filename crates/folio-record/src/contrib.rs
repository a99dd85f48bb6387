//! Contributor groups: role normalization and cross-reference classification.

use folio_core::record::Occurrence;
use serde::{Deserialize, Serialize};

/// The fixed legacy role-code table. Unknown codes normalize to `None`.
const ROLES: &[(&str, &str)] = &[
  ("ND", "author"),
  ("nd", "author"),
  ("coord", "coordinator"),
  ("inventor", "inventor"),
  ("tr", "translator"),
  ("ed", "editor"),
  ("org", "organizer"),
];

/// Normalize a raw legacy role code.
pub fn normalize_role(code: &str) -> Option<&'static str> {
  ROLES
    .iter()
    .find(|(raw, _)| *raw == code)
    .map(|(_, role)| *role)
}

// ─── Cross-references ────────────────────────────────────────────────────────

/// Classification of a contributor cross-reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XrefKind {
  Aff,
  Fn,
  AuthorNotes,
}

impl XrefKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Aff => "aff",
      Self::Fn => "fn",
      Self::AuthorNotes => "author-notes",
    }
  }
}

/// Classify one raw token by prefix: `aff*`/`a0*` are affiliations, `fn*`
/// are footnotes, anything else is an author note.
pub fn classify_xref(token: &str) -> XrefKind {
  if token.starts_with("aff") || token.starts_with("a0") {
    XrefKind::Aff
  } else if token.starts_with("fn") {
    XrefKind::Fn
  } else {
    XrefKind::AuthorNotes
  }
}

/// Classify each whitespace-separated token of a raw cross-reference value,
/// preserving token order.
pub fn parse_xrefs(raw: &str) -> Vec<(XrefKind, String)> {
  raw
    .split_whitespace()
    .map(|token| (classify_xref(token), token.to_string()))
    .collect()
}

// ─── Contributor ─────────────────────────────────────────────────────────────

/// One entry of a record's contributor group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
  pub surname:     Option<String>,
  pub given_names: Option<String>,
  pub role:        Option<String>,
  pub orcid:       Option<String>,
  pub xref:        Vec<(XrefKind, String)>,
}

impl Contributor {
  /// Decode a contributor from one occurrence of the contributor-group tag.
  pub fn from_occurrence(occurrence: &Occurrence) -> Self {
    Self {
      surname:     occurrence.get("s").map(str::to_string),
      given_names: occurrence.get("n").map(str::to_string),
      role:        occurrence
        .get("r")
        .and_then(normalize_role)
        .map(str::to_string),
      orcid:       occurrence.get("k").map(str::to_string),
      xref:        occurrence.get("1").map(parse_xrefs).unwrap_or_default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn xref_classification_by_prefix() {
    assert_eq!(classify_xref("a01"), XrefKind::Aff);
    assert_eq!(classify_xref("aff2"), XrefKind::Aff);
    assert_eq!(classify_xref("fn02"), XrefKind::Fn);
    assert_eq!(classify_xref("xyz"), XrefKind::AuthorNotes);
  }

  #[test]
  fn xref_token_order_is_preserved() {
    let xrefs = parse_xrefs("a01 fn02 xyz");
    assert_eq!(
      xrefs,
      vec![
        (XrefKind::Aff, "a01".to_string()),
        (XrefKind::Fn, "fn02".to_string()),
        (XrefKind::AuthorNotes, "xyz".to_string()),
      ]
    );
  }

  #[test]
  fn role_table() {
    assert_eq!(normalize_role("ND"), Some("author"));
    assert_eq!(normalize_role("nd"), Some("author"));
    assert_eq!(normalize_role("tr"), Some("translator"));
    assert_eq!(normalize_role("??"), None);
  }

  #[test]
  fn contributor_from_occurrence() {
    let occurrence = Occurrence::from([
      ("s", "Silva"),
      ("n", "Ana"),
      ("r", "ND"),
      ("1", "a01 fn01"),
      ("k", "0000-0001-2345-6789"),
    ]);
    let contributor = Contributor::from_occurrence(&occurrence);
    assert_eq!(contributor.surname.as_deref(), Some("Silva"));
    assert_eq!(contributor.role.as_deref(), Some("author"));
    assert_eq!(contributor.xref.len(), 2);
    assert_eq!(contributor.xref[0].0, XrefKind::Aff);
  }
}
