//! Destination payload types.
//!
//! These are the field sets the destination content model expects; the model
//! itself (storage, web serving) lives outside this system. Payloads are
//! assembled by explicit builder functions in the pipeline crate, never by
//! reflection over attribute lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, entity::FileKind};

// ─── Shared pieces ───────────────────────────────────────────────────────────

/// A publishable artifact of a document in a specific language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendition {
  pub lang:     Option<String>,
  pub kind:     Option<FileKind>,
  pub filename: Option<String>,
  pub url:      Option<String>,
}

impl Rendition {
  /// Every rendition entry must carry language, kind, filename and url.
  pub fn validate(&self) -> Result<()> {
    for (field, present) in [
      ("lang", self.lang.is_some()),
      ("kind", self.kind.is_some()),
      ("filename", self.filename.is_some()),
      ("url", self.url.is_some()),
    ] {
      if !present {
        return Err(Error::Validation(format!(
          "rendition entry is missing required field `{field}`"
        )));
      }
    }
    Ok(())
  }
}

/// A contributor with normalized role and classified cross-references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  pub surname:     Option<String>,
  pub given_names: Option<String>,
  pub role:        Option<String>,
  pub orcid:       Option<String>,
  /// (classification, token) pairs, in raw token order.
  pub xref:        Vec<(String, String)>,
}

// ─── Payloads ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishedJournal {
  pub id:              String,
  pub title:           Option<String>,
  pub title_iso:       Option<String>,
  pub short_title:     Option<String>,
  pub acronym:         Option<String>,
  pub print_issn:      Option<String>,
  pub electronic_issn: Option<String>,
  pub publisher_name:  Option<String>,
  pub publisher_city:  Option<String>,
  pub publisher_state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishedIssue {
  /// Composite bundle identifier (journal, year, volume/number/supplement).
  pub id:         String,
  /// The legacy issue pid.
  pub pid:        Option<String>,
  pub journal_id: Option<String>,
  pub volume:     Option<String>,
  pub number:     Option<String>,
  pub suppl_text: Option<String>,
  pub year:       Option<i32>,
  pub label:      Option<String>,
  pub order:      Option<String>,
  pub issue_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishedDocument {
  pub id:               String,
  pub pid_v1:           Option<String>,
  pub pid_v2:           Option<String>,
  pub pid_v3:           Option<String>,
  pub aop_pid:          Option<String>,
  pub doi:              Option<String>,
  pub issue_id:         Option<String>,
  pub journal_id:       Option<String>,
  pub document_type:    Option<String>,
  pub original_language: Option<String>,
  pub title:            Option<String>,
  pub translated_titles: BTreeMap<String, String>,
  pub abstracts:        BTreeMap<String, String>,
  pub keywords:         BTreeMap<String, Vec<String>>,
  pub authors:          Vec<Author>,
  pub section:          Option<String>,
  pub translated_sections: BTreeMap<String, String>,
  pub fpage:            Option<String>,
  pub fpage_seq:        Option<String>,
  pub lpage:            Option<String>,
  pub elocation:        Option<String>,
  pub order:            Option<String>,
  /// `YYYY[-MM[-DD]]`, zero parts dropped.
  pub publication_date: Option<String>,
  pub renditions:       Vec<Rendition>,
}

/// What a publish stage hands to the destination, tagged by shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublishedEntity {
  Journal(PublishedJournal),
  Issue(PublishedIssue),
  Document(PublishedDocument),
  /// Renditions of one kind for an already-published document.
  Renditions {
    document_id: String,
    items:       Vec<Rendition>,
  },
}
