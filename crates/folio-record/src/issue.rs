//! Friendly view over a legacy issue record.

use std::collections::BTreeMap;

use folio_core::record::{LegacyRecord, RecordSegment};

use crate::remove_leading_zeros;

/// Read-only accessor over an issue record (single segment).
pub struct IssueView<'a> {
  id:      &'a str,
  segment: &'a RecordSegment,
}

impl<'a> IssueView<'a> {
  pub fn new(record: &'a LegacyRecord) -> Option<Self> {
    Some(Self {
      id:      &record.id,
      segment: record.segment(0)?,
    })
  }

  fn value(&self, tag: &str) -> Option<&'a str> {
    self.segment.first_value(tag)
  }

  pub fn id(&self) -> &'a str {
    self.id
  }

  /// The owning journal's pid.
  pub fn journal_pid(&self) -> Option<&'a str> {
    self.value("v035")
  }

  pub fn volume(&self) -> Option<&'a str> {
    self.value("v031")
  }

  pub fn number(&self) -> Option<&'a str> {
    self.value("v032")
  }

  pub fn supplement(&self) -> Option<&'a str> {
    self.value("v131").or_else(|| self.value("v132"))
  }

  /// Lower-cased journal acronym as recorded on the issue.
  pub fn acronym(&self) -> Option<String> {
    self.value("v930").map(str::to_lowercase)
  }

  /// Publication date `YYYYMM[DD]`; the year is its first four digits.
  pub fn publication_date(&self) -> Option<&'a str> {
    self.value("v065")
  }

  pub fn year(&self) -> Option<&'a str> {
    self.publication_date()?.get(..4)
  }

  pub fn start_month(&self) -> Option<&'a str> {
    self.publication_date()?.get(4..6)
  }

  /// The issue folder label: `{year}nahead` for ahead-of-print issues,
  /// otherwise volume/number/supplement with leading zeros removed, e.g.
  /// `v5n2` — names the per-issue storage folders.
  pub fn issue_folder(&self) -> Option<String> {
    if self.number() == Some("ahead") {
      return Some(format!("{}nahead", self.year()?));
    }
    let parts = [
      ("v", self.volume()),
      ("n", self.number()),
      ("s", self.supplement()),
    ];
    let label: String = parts
      .into_iter()
      .filter_map(|(prefix, value)| {
        value
          .map(remove_leading_zeros)
          .filter(|v| !v.is_empty())
          .map(|v| format!("{prefix}{v}"))
      })
      .collect();
    if label.is_empty() { None } else { Some(label) }
  }

  /// Volume with leading zeros removed, for composite bundle identifiers.
  pub fn volume_label(&self) -> Option<String> {
    self
      .volume()
      .map(remove_leading_zeros)
      .filter(|v| !v.is_empty())
  }

  pub fn number_label(&self) -> Option<String> {
    self
      .number()
      .map(remove_leading_zeros)
      .filter(|v| !v.is_empty())
  }

  pub fn supplement_label(&self) -> Option<String> {
    self
      .supplement()
      .map(remove_leading_zeros)
      .filter(|v| !v.is_empty())
  }

  /// Issue order within its journal: `YYYY` + zero-padded 4-digit sequence.
  pub fn order(&self) -> Option<String> {
    let raw = self.value("v036")?;
    let (year, seq) = (raw.get(..4)?, raw.get(4..)?);
    Some(format!("{year}{seq:0>4}"))
  }

  /// The legacy issue pid: journal pid + order.
  pub fn pid(&self) -> Option<String> {
    Some(format!("{}{}", self.journal_pid()?, self.order()?))
  }

  pub fn is_public(&self) -> bool {
    self.value("v042") == Some("1")
  }

  /// Section labels keyed by `(code, language)`.
  pub fn sections(&self) -> BTreeMap<(String, String), String> {
    let mut sections = BTreeMap::new();
    for occurrence in self.segment.occurrences("v049") {
      if let (Some(code), Some(lang), Some(text)) = (
        occurrence.get("c"),
        occurrence.get("l"),
        occurrence.get("t"),
      ) {
        sections.insert((code.to_string(), lang.to_string()), text.to_string());
      }
    }
    sections
  }

  /// The section label for `code` in `lang`, if registered.
  pub fn section(&self, code: &str, lang: &str) -> Option<String> {
    self
      .segment
      .occurrences("v049")
      .find(|o| o.get("c") == Some(code) && o.get("l") == Some(lang))
      .and_then(|o| o.get("t"))
      .map(str::to_string)
  }

  /// Classify the issue for the destination model.
  pub fn issue_type(&self) -> &'static str {
    if self.supplement().is_some() {
      return "supplement";
    }
    match self.number() {
      Some("ahead") => "ahead",
      Some(n) if n.contains("spe") => "special",
      Some(_) => "regular",
      None => "volume_issue",
    }
  }

  /// Raw legacy stamps; issue bases reuse the journal tag pair.
  pub fn isis_created_date(&self) -> Option<&'a str> {
    self.value("v940")
  }

  pub fn isis_updated_date(&self) -> Option<&'a str> {
    self.value("v941")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_records::issue_record;

  #[test]
  fn derived_fields() {
    let record = issue_record();
    let view = IssueView::new(&record).unwrap();

    assert_eq!(view.journal_pid(), Some("0001-0001"));
    assert_eq!(view.volume(), Some("05"));
    assert_eq!(view.number(), Some("2"));
    assert_eq!(view.year(), Some("2020"));
    assert_eq!(view.issue_folder().as_deref(), Some("v5n2"));
    assert_eq!(view.order().as_deref(), Some("20200002"));
    assert_eq!(view.pid().as_deref(), Some("0001-000120200002"));
    assert_eq!(view.issue_type(), "regular");
  }

  #[test]
  fn ahead_of_print_folder() {
    let mut record = issue_record();
    let seg = &mut record.segments[0];
    seg.0.remove("v032");
    seg.push_scalar("v032", "ahead");

    let view = IssueView::new(&record).unwrap();
    assert_eq!(view.issue_folder().as_deref(), Some("2020nahead"));
    assert_eq!(view.issue_type(), "ahead");
  }

  #[test]
  fn section_lookup_by_code_and_language() {
    let record = issue_record();
    let view = IssueView::new(&record).unwrap();

    assert_eq!(view.section("sec01", "en").as_deref(), Some("Articles"));
    assert_eq!(view.section("sec01", "pt").as_deref(), Some("Artigos"));
    assert_eq!(view.section("sec01", "de"), None);
    assert_eq!(view.section("nope", "en"), None);
  }

  #[test]
  fn supplement_classifies_issue_type() {
    let mut record = issue_record();
    record.segments[0].push_scalar("v131", "1");

    let view = IssueView::new(&record).unwrap();
    assert_eq!(view.supplement(), Some("1"));
    assert_eq!(view.issue_type(), "supplement");
    assert_eq!(view.issue_folder().as_deref(), Some("v5n2s1"));
  }
}
