//! Composite bundle/issue identifier derivation.

use crate::entity::EntityKind;

/// Derive the composite identifier that bundles documents into an issue.
///
/// Present-only parts are labelled with the fixed single-character prefixes
/// `v` (volume), `n` (number) and `s` (supplement), in that order, joined by
/// single hyphens. With no parts at all the issue is the ahead-of-print
/// bucket: `{journal_id}-aop`.
pub fn bundle_id(
  journal_id: &str,
  year: i32,
  volume: Option<&str>,
  number: Option<&str>,
  supplement: Option<&str>,
) -> String {
  let parts = [("v", volume), ("n", number), ("s", supplement)];
  let label = parts
    .into_iter()
    .filter_map(|(prefix, value)| {
      value
        .filter(|v| !v.is_empty())
        .map(|v| format!("{prefix}{v}"))
    })
    .collect::<Vec<_>>()
    .join("-");

  if label.is_empty() {
    format!("{journal_id}-aop")
  } else {
    format!("{journal_id}-{year}-{label}")
  }
}

/// Classify a legacy pid by its fixed width: 9 characters for a journal,
/// 17 for an issue, 23 (`S`-prefixed) for a document.
pub fn classify_pid(id: &str) -> Option<EntityKind> {
  match id.len() {
    9 => Some(EntityKind::Journal),
    17 => Some(EntityKind::Issue),
    23 if id.starts_with('S') => Some(EntityKind::Document),
    _ => None,
  }
}
