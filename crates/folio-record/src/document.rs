//! Friendly view over a legacy document record set.
//!
//! Document records arrive as multiple segments with fixed positions:
//! segment 0 carries the header (control dates), segment 1 the raw metadata
//! and segment 2 the formatted (rich) metadata. Accessors that exist in both
//! raw and formatted form take the formatted segment when asked.

use std::collections::BTreeMap;

use folio_core::{
  entity::FileKind,
  record::{LegacyRecord, Occurrence, RecordSegment},
};

use crate::contrib::Contributor;

const HEADER: usize = 0;
const RAW: usize = 1;
const FORMATTED: usize = 2;

/// Read-only accessor over a document record set.
pub struct DocumentView<'a> {
  id:     &'a str,
  record: &'a LegacyRecord,
}

impl<'a> DocumentView<'a> {
  pub fn new(record: &'a LegacyRecord) -> Self {
    Self {
      id: &record.id,
      record,
    }
  }

  fn segment(&self, index: usize) -> Option<&'a RecordSegment> {
    self.record.segment(index)
  }

  fn meta_value(&self, tag: &str, formatted: bool) -> Option<&'a str> {
    let index = if formatted { FORMATTED } else { RAW };
    self.segment(index)?.first_value(tag)
  }

  fn meta_items(
    &self,
    tag: &'a str,
    formatted: bool,
  ) -> impl Iterator<Item = &'a Occurrence> {
    let index = if formatted { FORMATTED } else { RAW };
    self
      .segment(index)
      .into_iter()
      .flat_map(move |segment| segment.occurrences(tag))
  }

  pub fn id(&self) -> &'a str {
    self.id
  }

  // ── Identifiers ───────────────────────────────────────────────────────

  /// The owning journal's pid, sliced from the document pid.
  pub fn journal_pid(&self) -> Option<&'a str> {
    self.id.get(1..10)
  }

  /// The owning issue's pid, sliced from the document pid.
  pub fn issue_pid(&self) -> Option<&'a str> {
    self.id.get(1..18)
  }

  pub fn pid_v1(&self) -> Option<&'a str> {
    self.meta_value("v002", false)
  }

  pub fn pid_v2(&self) -> Option<&'a str> {
    self.meta_value("v880", false)
  }

  pub fn pid_v3(&self) -> Option<&'a str> {
    self.meta_value("v885", false)
  }

  pub fn ahead_of_print_pid(&self) -> Option<&'a str> {
    self.meta_value("v881", false)
  }

  pub fn doi(&self) -> Option<&'a str> {
    self.meta_value("v237", false)
  }

  // ── Core metadata ─────────────────────────────────────────────────────

  pub fn language(&self) -> Option<&'a str> {
    self.meta_value("v040", false)
  }

  pub fn document_type(&self) -> Option<&'a str> {
    self.meta_value("v071", false)
  }

  pub fn order(&self) -> Option<&'a str> {
    self.meta_value("v121", false)
  }

  pub fn section_code(&self) -> Option<&'a str> {
    self.meta_value("v049", false)
  }

  /// Titles by language, from the formatted segment.
  pub fn titles(&self) -> BTreeMap<String, String> {
    self.by_language("v012", true)
  }

  pub fn original_title(&self) -> Option<String> {
    let language = self.language()?;
    self.titles().remove(language)
  }

  /// Titles in languages other than the original.
  pub fn translated_titles(&self) -> BTreeMap<String, String> {
    let mut titles = self.titles();
    if let Some(language) = self.language() {
      titles.remove(language);
    }
    titles
  }

  /// Abstracts by language, from the formatted segment.
  pub fn abstracts(&self) -> BTreeMap<String, String> {
    self.by_language("v083", true)
  }

  /// Keyword lists by language, occurrence order preserved per language.
  pub fn keywords(&self) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for occurrence in self.meta_items("v085", false) {
      if let (Some(lang), Some(keyword)) =
        (occurrence.get("l"), occurrence.get("k"))
      {
        let mut text = keyword.to_string();
        if let Some(subkey) = occurrence.get("s") {
          text.push_str(", ");
          text.push_str(subkey);
        }
        groups.entry(lang.to_string()).or_default().push(text);
      }
    }
    groups
  }

  /// The contributor group, in occurrence order.
  pub fn contrib_group(&self) -> Vec<Contributor> {
    self
      .meta_items("v010", false)
      .map(Contributor::from_occurrence)
      .collect()
  }

  // ── Pages ─────────────────────────────────────────────────────────────

  fn page_part(&self, sub_key: &str) -> Option<&'a str> {
    self
      .meta_items("v014", false)
      .next()
      .and_then(|o| o.get(sub_key))
  }

  pub fn fpage(&self) -> Option<&'a str> {
    self.page_part("f")
  }

  pub fn fpage_seq(&self) -> Option<&'a str> {
    self.page_part("s")
  }

  pub fn lpage(&self) -> Option<&'a str> {
    self.page_part("l")
  }

  pub fn elocation(&self) -> Option<&'a str> {
    self.page_part("e")
  }

  // ── Dates ─────────────────────────────────────────────────────────────

  /// Both header control dates, truncated to 8 digits.
  fn header_dates(&self) -> Vec<&'a str> {
    let header = self.segment(HEADER);
    ["v091", "v093"]
      .into_iter()
      .filter_map(|tag| header.and_then(|s| s.first_value(tag)))
      .map(|d| d.get(..8).unwrap_or(d))
      .collect()
  }

  /// The earlier of the two header control dates.
  pub fn isis_created_date(&self) -> Option<&'a str> {
    self.header_dates().into_iter().min()
  }

  /// The later of the two header control dates.
  pub fn isis_updated_date(&self) -> Option<&'a str> {
    self.header_dates().into_iter().max()
  }

  /// The issue's collection publication date (`YYYYMMDD`).
  pub fn collection_pubdate(&self) -> Option<&'a str> {
    self.meta_value("v065", false)
  }

  /// The document's own publication date, falling back to the collection
  /// date for documents published with their issue.
  pub fn document_pubdate(&self) -> Option<&'a str> {
    self
      .meta_value("v223", false)
      .or_else(|| self.collection_pubdate())
  }

  pub fn pub_year(&self) -> Option<&'a str> {
    self.collection_pubdate()?.get(..4)
  }

  // ── Files ─────────────────────────────────────────────────────────────

  /// The raw legacy file code (a relative path).
  pub fn file_code(&self) -> Option<&'a str> {
    self.meta_value("v702", false)
  }

  /// Base file name: the file code's basename with its extension stripped.
  pub fn file_name(&self) -> Option<String> {
    let base = self.file_code()?.rsplit('/').next()?;
    let name = base.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(base);
    if name.is_empty() {
      None
    } else {
      Some(name.to_string())
    }
  }

  /// XML-era documents carry an `.xml` file code; everything older is HTML.
  pub fn file_kind(&self) -> Option<FileKind> {
    let code = self.file_code()?;
    Some(if code.ends_with(".xml") {
      FileKind::Xml
    } else {
      FileKind::Html
    })
  }

  /// Languages of translated full texts, occurrence order preserved.
  pub fn translation_languages(&self) -> Vec<&'a str> {
    self
      .meta_items("v601", false)
      .filter_map(|o| o.value())
      .collect()
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  fn by_language(&self, tag: &'a str, formatted: bool) -> BTreeMap<String, String> {
    self
      .meta_items(tag, formatted)
      .filter_map(|occurrence| {
        let lang = occurrence.get("l")?;
        let text = occurrence.value()?;
        Some((lang.to_string(), text.to_string()))
      })
      .collect()
  }
}
