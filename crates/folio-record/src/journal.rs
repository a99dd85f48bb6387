//! Friendly view over a legacy journal record.

use folio_core::record::{LegacyRecord, RecordSegment};

use crate::issn::IssnSet;

/// Read-only accessor over a journal record (single segment).
pub struct JournalView<'a> {
  segment: &'a RecordSegment,
  issns:   IssnSet,
}

impl<'a> JournalView<'a> {
  /// Journals live in a single record segment; a record without one has no
  /// journal data at all.
  pub fn new(record: &'a LegacyRecord) -> Option<Self> {
    let segment = record.segment(0)?;
    Some(Self {
      segment,
      issns: IssnSet::resolve(segment),
    })
  }

  fn value(&self, tag: &str) -> Option<&'a str> {
    self.segment.first_value(tag)
  }

  pub fn title(&self) -> Option<&'a str> {
    self.value("v100")
  }

  pub fn iso_abbreviated_title(&self) -> Option<&'a str> {
    self.value("v151")
  }

  pub fn abbreviated_title(&self) -> Option<&'a str> {
    self.value("v150")
  }

  /// Lower-cased journal acronym; names the storage folders of all of the
  /// journal's issues.
  pub fn acronym(&self) -> Option<String> {
    self.value("v068").map(str::to_lowercase)
  }

  pub fn print_issn(&self) -> Option<&str> {
    self.issns.print.as_deref()
  }

  pub fn electronic_issn(&self) -> Option<&str> {
    self.issns.electronic.as_deref()
  }

  /// All registered publisher names, joined by `"; "`.
  pub fn publisher_names(&self) -> Option<String> {
    let names: Vec<&str> = self
      .segment
      .occurrences("v480")
      .filter_map(|o| o.value())
      .collect();
    if names.is_empty() {
      None
    } else {
      Some(names.join("; "))
    }
  }

  pub fn publisher_city(&self) -> Option<&'a str> {
    self.value("v490")
  }

  pub fn publisher_state(&self) -> Option<&'a str> {
    self.value("v320")
  }

  pub fn new_title(&self) -> Option<&'a str> {
    self.value("v710")
  }

  pub fn old_title(&self) -> Option<&'a str> {
    self.value("v610")
  }

  /// Raw legacy creation/update stamps, as stored (not yet normalized).
  pub fn isis_created_date(&self) -> Option<&'a str> {
    self.value("v940")
  }

  pub fn isis_updated_date(&self) -> Option<&'a str> {
    self.value("v941")
  }
}
