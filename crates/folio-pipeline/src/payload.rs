//! Destination payload builders.
//!
//! One explicit builder per entity kind, enumerating each destination field
//! and its source expression. Fields that cannot be sourced are reported as
//! typed [`MissingField`] diagnostics for the stage tracker rather than
//! silently left blank.

use folio_core::{
  Error, Result, dates, ids,
  publish::{Author, PublishedDocument, PublishedIssue, PublishedJournal},
};
use folio_record::{Contributor, DocumentView, IssueView, JournalView};

/// A destination field that could not be sourced from the legacy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl std::fmt::Display for MissingField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "missing field `{}`", self.0)
  }
}

fn note<T>(
  missing: &mut Vec<MissingField>,
  field: &'static str,
  value: Option<T>,
) -> Option<T> {
  if value.is_none() {
    missing.push(MissingField(field));
  }
  value
}

/// Assemble the destination journal payload.
pub fn journal(
  id: &str,
  view: &JournalView,
) -> (PublishedJournal, Vec<MissingField>) {
  let mut missing = Vec::new();
  let payload = PublishedJournal {
    id:              id.to_string(),
    title:           note(&mut missing, "title", view.title())
      .map(str::to_string),
    title_iso:       view.iso_abbreviated_title().map(str::to_string),
    short_title:     view.abbreviated_title().map(str::to_string),
    acronym:         note(&mut missing, "acronym", view.acronym()),
    print_issn:      view.print_issn().map(str::to_string),
    electronic_issn: view.electronic_issn().map(str::to_string),
    publisher_name:  note(
      &mut missing,
      "publisher_name",
      view.publisher_names(),
    ),
    publisher_city:  view.publisher_city().map(str::to_string),
    publisher_state: view.publisher_state().map(str::to_string),
  };
  if payload.print_issn.is_none() && payload.electronic_issn.is_none() {
    missing.push(MissingField("issn"));
  }
  (payload, missing)
}

/// Assemble the destination issue payload, keyed by the composite bundle
/// identifier. The bundle identifier cannot exist without a journal pid and
/// a publication year, so their absence is a hard failure.
pub fn issue(view: &IssueView) -> Result<(PublishedIssue, Vec<MissingField>)> {
  let journal_pid = view.journal_pid().ok_or_else(|| {
    Error::Validation(format!("issue {} has no journal pid", view.id()))
  })?;
  let year: i32 = view
    .year()
    .and_then(|y| y.parse().ok())
    .ok_or_else(|| {
      Error::Validation(format!(
        "issue {} has no parseable publication year",
        view.id()
      ))
    })?;

  let volume = view.volume_label();
  let number = view.number_label();
  let supplement = view.supplement_label();
  let bundle = ids::bundle_id(
    journal_pid,
    year,
    volume.as_deref(),
    number.as_deref(),
    supplement.as_deref(),
  );

  let mut missing = Vec::new();
  let payload = PublishedIssue {
    id:         bundle,
    pid:        view.pid(),
    journal_id: Some(journal_pid.to_string()),
    volume,
    number,
    suppl_text: supplement,
    year:       Some(year),
    label:      note(&mut missing, "label", view.issue_folder()),
    order:      note(&mut missing, "order", view.order()),
    issue_type: Some(view.issue_type().to_string()),
  };
  Ok((payload, missing))
}

/// Assemble the destination document payload. The owning issue's view
/// supplies the bundle identifier and the section label table.
pub fn document(
  view: &DocumentView,
  issue_view: &IssueView,
) -> Result<(PublishedDocument, Vec<MissingField>)> {
  let (issue_payload, _) = issue(issue_view)?;

  let mut missing = Vec::new();
  let original_language = view.language();
  let section_code = view.section_code();

  let section = section_code.zip(original_language).and_then(
    |(code, lang)| issue_view.section(code, lang),
  );
  let translated_sections = section_code
    .map(|code| {
      issue_view
        .sections()
        .into_iter()
        .filter(|((c, lang), _)| {
          c == code && Some(lang.as_str()) != original_language
        })
        .map(|((_, lang), text)| (lang, text))
        .collect()
    })
    .unwrap_or_default();

  let payload = PublishedDocument {
    id: view.pid_v3().unwrap_or(view.id()).to_string(),
    pid_v1: view.pid_v1().map(str::to_string),
    pid_v2: view.pid_v2().map(str::to_string),
    pid_v3: view.pid_v3().map(str::to_string),
    aop_pid: view.ahead_of_print_pid().map(str::to_string),
    doi: view.doi().map(str::to_string),
    issue_id: Some(issue_payload.id),
    journal_id: view.journal_pid().map(str::to_string),
    document_type: note(&mut missing, "document_type", view.document_type())
      .map(str::to_string),
    original_language: note(
      &mut missing,
      "original_language",
      original_language,
    )
    .map(str::to_string),
    title: note(&mut missing, "title", view.original_title()),
    translated_titles: view.translated_titles(),
    abstracts: view.abstracts(),
    keywords: view.keywords(),
    authors: view.contrib_group().into_iter().map(author).collect(),
    section: note(&mut missing, "section", section),
    translated_sections,
    fpage: view.fpage().map(str::to_string),
    fpage_seq: view.fpage_seq().map(str::to_string),
    lpage: view.lpage().map(str::to_string),
    elocation: view.elocation().map(str::to_string),
    order: note(&mut missing, "order", view.order()).map(str::to_string),
    publication_date: note(
      &mut missing,
      "publication_date",
      view.document_pubdate(),
    )
    .map(dates::hyphenate_pub_date),
    // Renditions are published by their own stages, after the files moved.
    renditions: Vec::new(),
  };
  Ok((payload, missing))
}

fn author(contributor: Contributor) -> Author {
  Author {
    surname:     contributor.surname,
    given_names: contributor.given_names,
    role:        contributor.role,
    orcid:       contributor.orcid,
    xref:        contributor
      .xref
      .into_iter()
      .map(|(kind, token)| (kind.as_str().to_string(), token))
      .collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fakes::{document_record, issue_record, journal_record};

  #[test]
  fn journal_payload_reports_missing_fields() {
    let mut record = journal_record();
    record.segments[0].0.remove("v480");
    let view = JournalView::new(&record).unwrap();

    let (payload, missing) = journal("0001-0001", &view);
    assert_eq!(payload.title.as_deref(), Some("Revista de Testes"));
    assert!(missing.contains(&MissingField("publisher_name")));
    assert_eq!(payload.publisher_name, None);
  }

  #[test]
  fn issue_payload_is_keyed_by_bundle_id() {
    let record = issue_record();
    let view = IssueView::new(&record).unwrap();

    let (payload, missing) = issue(&view).unwrap();
    assert_eq!(payload.id, "0001-0001-2020-v5-n2");
    assert_eq!(payload.pid.as_deref(), Some("0001-000120200002"));
    assert_eq!(payload.label.as_deref(), Some("v5n2"));
    assert_eq!(payload.issue_type.as_deref(), Some("regular"));
    assert!(missing.is_empty());
  }

  #[test]
  fn issue_without_year_is_a_hard_failure() {
    let mut record = issue_record();
    record.segments[0].0.remove("v065");
    let view = IssueView::new(&record).unwrap();

    let err = issue(&view).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn document_payload_resolves_sections_from_the_issue() {
    let doc = document_record();
    let issue_rec = issue_record();
    let doc_view = DocumentView::new(&doc);
    let issue_view = IssueView::new(&issue_rec).unwrap();

    let (payload, missing) = document(&doc_view, &issue_view).unwrap();
    assert_eq!(payload.issue_id.as_deref(), Some("0001-0001-2020-v5-n2"));
    assert_eq!(payload.section.as_deref(), Some("Articles"));
    assert_eq!(
      payload.translated_sections.get("pt").map(String::as_str),
      Some("Artigos")
    );
    assert_eq!(payload.publication_date.as_deref(), Some("2020-04-15"));
    assert_eq!(payload.authors.len(), 2);
    assert!(missing.is_empty());
  }
}
