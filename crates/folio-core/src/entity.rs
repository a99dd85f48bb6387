//! The migrated entity — the normalized store's record of one legacy item.
//!
//! An entity is created on first encounter and mutated on every successful
//! stage. Its status only moves forward under normal operation; nothing is
//! ever deleted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::LegacyRecord;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The three migratable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Journal,
  Issue,
  Document,
}

impl EntityKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Journal => "journal",
      Self::Issue => "issue",
      Self::Document => "document",
    }
  }
}

impl std::str::FromStr for EntityKind {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "journal" => Ok(Self::Journal),
      "issue" => Ok(Self::Issue),
      "document" => Ok(Self::Document),
      other => Err(crate::Error::Configuration(format!(
        "invalid entity kind {other:?}; expected journal, issue or document"
      ))),
    }
  }
}

/// Logical folder taxonomy of the files storage.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
  Xml,
  Pdf,
  Html,
  Img,
}

impl FileKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Xml => "xml",
      Self::Pdf => "pdf",
      Self::Html => "html",
      Self::Img => "img",
    }
  }
}

/// The storage address for one rendition kind of one issue:
/// `<folder>/<acronym>/<issue-folder>`.
pub fn storage_folder(
  kind: FileKind,
  acronym: &str,
  issue_folder: &str,
) -> String {
  format!("{}/{acronym}/{issue_folder}", kind.as_str())
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Migration lifecycle, strictly forward-moving under normal operation.
///
/// `PublishedIncomplete` is an observable, testable state — an entity whose
/// metadata or renditions were only partially published — not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
  PendingMigration,
  IsisMetadataMigrated,
  MigratedFiles,
  PublishedIncomplete,
  PublishedComplete,
}

impl Status {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::PendingMigration => "PENDING_MIGRATION",
      Self::IsisMetadataMigrated => "ISIS_METADATA_MIGRATED",
      Self::MigratedFiles => "MIGRATED_FILES",
      Self::PublishedIncomplete => "PUBLISHED_INCOMPLETE",
      Self::PublishedComplete => "PUBLISHED_COMPLETE",
    }
  }
}

impl std::str::FromStr for Status {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "PENDING_MIGRATION" => Ok(Self::PendingMigration),
      "ISIS_METADATA_MIGRATED" => Ok(Self::IsisMetadataMigrated),
      "MIGRATED_FILES" => Ok(Self::MigratedFiles),
      "PUBLISHED_INCOMPLETE" => Ok(Self::PublishedIncomplete),
      "PUBLISHED_COMPLETE" => Ok(Self::PublishedComplete),
      other => Err(crate::Error::Configuration(format!(
        "invalid status {other:?}"
      ))),
    }
  }
}

// ─── Entity-specific details ─────────────────────────────────────────────────

/// A file registered in the files storage: remote URI plus local name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
  pub uri:  String,
  pub name: String,
}

/// Fields derived per entity kind during registration and file migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityDetails {
  Journal {
    acronym: Option<String>,
  },
  Issue {
    acronym:      Option<String>,
    issue_folder: Option<String>,
  },
  Document {
    file_name:    Option<String>,
    file_kind:    Option<FileKind>,
    issue_folder: Option<String>,
    acronym:      Option<String>,
    pub_year:     Option<String>,
    doi:          Option<String>,
    /// Language → pdf file name, main language included.
    pdfs:         BTreeMap<String, String>,
    /// Language → translated html file names.
    translations: BTreeMap<String, Vec<String>>,
    /// Files re-registered under the migration area, keyed by name.
    migrated:     BTreeMap<String, StoredFile>,
    /// Destination metadata has been published.
    metadata_published: bool,
    /// Rendition kinds already republished to the destination.
    published_kinds: BTreeSet<FileKind>,
  },
}

impl EntityDetails {
  pub fn empty(kind: EntityKind) -> Self {
    match kind {
      EntityKind::Journal => Self::Journal { acronym: None },
      EntityKind::Issue => Self::Issue {
        acronym:      None,
        issue_folder: None,
      },
      EntityKind::Document => Self::Document {
        file_name:    None,
        file_kind:    None,
        issue_folder: None,
        acronym:      None,
        pub_year:     None,
        doi:          None,
        pdfs:         BTreeMap::new(),
        translations: BTreeMap::new(),
        migrated:     BTreeMap::new(),
        metadata_published: false,
        published_kinds: BTreeSet::new(),
      },
    }
  }

  pub fn kind(&self) -> EntityKind {
    match self {
      Self::Journal { .. } => EntityKind::Journal,
      Self::Issue { .. } => EntityKind::Issue,
      Self::Document { .. } => EntityKind::Document,
    }
  }
}

// ─── MigratedEntity ──────────────────────────────────────────────────────────

/// One journal, issue or document in the normalized store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigratedEntity {
  pub id:      String,
  pub status:  Status,
  /// The raw legacy payload, kept verbatim.
  pub record:  Option<LegacyRecord>,
  /// Normalized legacy timestamps (ISO-8601, `Z`-suffixed).
  pub isis_created: Option<String>,
  pub isis_updated: Option<String>,
  /// Store timestamps: `created` is stamped on first save, `updated` on
  /// every save.
  pub created: Option<DateTime<Utc>>,
  pub updated: Option<DateTime<Utc>>,
  pub details: EntityDetails,
}

impl MigratedEntity {
  /// A blank entity in the initial status.
  pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
    Self {
      id:      id.into(),
      status:  Status::PendingMigration,
      record:  None,
      isis_created: None,
      isis_updated: None,
      created: None,
      updated: None,
      details: EntityDetails::empty(kind),
    }
  }

  pub fn kind(&self) -> EntityKind {
    self.details.kind()
  }

  /// Recompute the publication status of a document entity: complete once
  /// the metadata and every declared rendition kind have been published.
  /// Journals and issues complete on metadata alone.
  pub fn recompute_publication_status(&mut self) {
    match &self.details {
      EntityDetails::Document {
        file_kind,
        pdfs,
        translations,
        metadata_published,
        published_kinds,
        ..
      } => {
        let mut declared = BTreeSet::new();
        if !pdfs.is_empty() {
          declared.insert(FileKind::Pdf);
        }
        if !translations.is_empty() {
          declared.insert(FileKind::Html);
        }
        if *file_kind == Some(FileKind::Xml) {
          declared.insert(FileKind::Xml);
        }
        let complete =
          *metadata_published && declared.is_subset(published_kinds);
        self.status = if complete {
          Status::PublishedComplete
        } else {
          Status::PublishedIncomplete
        };
      }
      EntityDetails::Journal { .. } | EntityDetails::Issue { .. } => {
        self.status = Status::PublishedComplete;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn storage_folder_taxonomy() {
    assert_eq!(storage_folder(FileKind::Pdf, "abc", "v5n2"), "pdf/abc/v5n2");
  }

  #[test]
  fn document_is_incomplete_until_all_declared_kinds_publish() {
    let mut entity = MigratedEntity::new("S0001", EntityKind::Document);
    let EntityDetails::Document {
      pdfs,
      metadata_published,
      ..
    } = &mut entity.details
    else {
      unreachable!()
    };
    pdfs.insert("en".into(), "a01.pdf".into());
    *metadata_published = true;

    entity.recompute_publication_status();
    assert_eq!(entity.status, Status::PublishedIncomplete);

    let EntityDetails::Document {
      published_kinds, ..
    } = &mut entity.details
    else {
      unreachable!()
    };
    published_kinds.insert(FileKind::Pdf);
    entity.recompute_publication_status();
    assert_eq!(entity.status, Status::PublishedComplete);
  }

  #[test]
  fn journal_completes_on_metadata_alone() {
    let mut entity = MigratedEntity::new("0001-0001", EntityKind::Journal);
    entity.recompute_publication_status();
    assert_eq!(entity.status, Status::PublishedComplete);
  }
}
