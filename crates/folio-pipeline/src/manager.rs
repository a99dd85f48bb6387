//! Stage actions: one method per named unit of work in an entity's
//! migration sequence.
//!
//! Every method is independently failing. A returned error is caught by the
//! orchestrator and recorded as an error event; it never aborts the
//! remaining stages of the same identifier.

use std::collections::BTreeMap;

use folio_core::{
  Error, Result, dates,
  entity::{
    EntityDetails, EntityKind, FileKind, Status, StoredFile, storage_folder,
  },
  publish::{PublishedEntity, Rendition},
  record::LegacyRecord,
  store::{FilesStorage, Publisher, Repository},
};
use folio_record::{DocumentView, IssueView, JournalView};

use crate::{event::StageOutcome, payload, tracker::Tracker};

/// Executes individual stages against the three external collaborators.
/// Stateless across identifiers; safe to share behind an `Arc`.
pub struct MigrationManager<R, F, P> {
  pub(crate) repository: R,
  pub(crate) storage:    F,
  pub(crate) publisher:  P,
}

impl<R, F, P> MigrationManager<R, F, P>
where
  R: Repository,
  F: FilesStorage,
  P: Publisher,
{
  pub fn new(repository: R, storage: F, publisher: P) -> Self {
    Self {
      repository,
      storage,
      publisher,
    }
  }

  pub fn repository(&self) -> &R {
    &self.repository
  }

  // ── REGISTER_ISIS ─────────────────────────────────────────────────────

  pub async fn register_journal(
    &self,
    id: &str,
    record: &LegacyRecord,
  ) -> Result<StageOutcome> {
    let view = JournalView::new(record).ok_or_else(|| {
      Error::Validation(format!("journal record {id} has no segments"))
    })?;
    let mut tracker = Tracker::new("REGISTER_ISIS");

    let mut entity =
      self.repository.fetch_or_create(id, EntityKind::Journal).await?;
    entity.isis_created =
      view.isis_created_date().map(dates::normalize).transpose()?;
    entity.isis_updated =
      view.isis_updated_date().map(dates::normalize).transpose()?;

    let acronym = view.acronym();
    if acronym.is_none() {
      tracker.error(format!("journal {id} has no acronym"));
    }
    entity.details = EntityDetails::Journal { acronym };
    entity.record = Some(record.clone());
    entity.status = Status::IsisMetadataMigrated;

    let saved = self.repository.save(entity).await?;
    tracker.info(format!("registered journal {id}"));
    Ok(StageOutcome::Entity { saved, tracker })
  }

  pub async fn register_issue(
    &self,
    id: &str,
    record: &LegacyRecord,
  ) -> Result<StageOutcome> {
    let view = IssueView::new(record).ok_or_else(|| {
      Error::Validation(format!("issue record {id} has no segments"))
    })?;
    let mut tracker = Tracker::new("REGISTER_ISIS");

    let mut entity =
      self.repository.fetch_or_create(id, EntityKind::Issue).await?;
    entity.isis_created =
      view.isis_created_date().map(dates::normalize).transpose()?;
    entity.isis_updated =
      view.isis_updated_date().map(dates::normalize).transpose()?;

    let issue_folder = view.issue_folder();
    if issue_folder.is_none() {
      tracker.error(format!("issue {id} has no volume, number or supplement"));
    }
    entity.details = EntityDetails::Issue {
      acronym: view.acronym(),
      issue_folder,
    };
    entity.record = Some(record.clone());
    entity.status = Status::IsisMetadataMigrated;

    let saved = self.repository.save(entity).await?;
    tracker.info(format!("registered issue {id}"));
    Ok(StageOutcome::Entity { saved, tracker })
  }

  pub async fn register_document(
    &self,
    id: &str,
    record: &LegacyRecord,
  ) -> Result<StageOutcome> {
    let view = DocumentView::new(record);
    let mut tracker = Tracker::new("REGISTER_ISIS");

    let mut entity =
      self.repository.fetch_or_create(id, EntityKind::Document).await?;
    entity.isis_created =
      view.isis_created_date().map(dates::normalize).transpose()?;
    entity.isis_updated =
      view.isis_updated_date().map(dates::normalize).transpose()?;

    // The legacy file code both names the document's files and addresses
    // them: `<kind>/<acronym>/<issue-folder>/<file>`.
    let file_name = view.file_name();
    let (acronym, issue_folder) = match view.file_code() {
      Some(code) => {
        let mut parts = code.split('/').skip(1);
        (
          parts.next().map(str::to_string),
          parts.next().map(str::to_string),
        )
      }
      None => {
        tracker.error(format!("document {id} has no file code"));
        (None, None)
      }
    };

    let mut pdfs = BTreeMap::new();
    let mut translations: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(name) = &file_name {
      if let Some(lang) = view.language() {
        pdfs.insert(lang.to_string(), format!("{name}.pdf"));
      } else {
        tracker.error(format!("document {id} has no original language"));
      }
      for lang in view.translation_languages() {
        pdfs.insert(lang.to_string(), format!("{lang}_{name}.pdf"));
        if view.file_kind() == Some(FileKind::Html) {
          translations
            .entry(lang.to_string())
            .or_default()
            .push(format!("{lang}_{name}.html"));
        }
      }
    }

    entity.details = EntityDetails::Document {
      file_name,
      file_kind: view.file_kind(),
      issue_folder,
      acronym,
      pub_year: view.pub_year().map(str::to_string),
      doi: view.doi().map(str::to_string),
      pdfs,
      translations,
      migrated: BTreeMap::new(),
      metadata_published: false,
      published_kinds: Default::default(),
    };
    entity.record = Some(record.clone());
    entity.status = Status::IsisMetadataMigrated;

    let saved = self.repository.save(entity).await?;
    tracker.info(format!("registered document {id}"));
    Ok(StageOutcome::Entity { saved, tracker })
  }

  // ── MIGRATE_DOCUMENT_FILES ────────────────────────────────────────────

  /// Copy the document's classic-era files into the migration area of the
  /// files storage. Individual file failures are tracked and do not stop
  /// the remaining files.
  pub async fn migrate_document_files(&self, id: &str) -> Result<StageOutcome> {
    let mut entity = self
      .repository
      .fetch(id)
      .await?
      .ok_or_else(|| Error::not_found("document", id))?;
    let EntityDetails::Document {
      file_name,
      file_kind,
      issue_folder,
      acronym,
      pdfs,
      translations,
      ..
    } = &entity.details
    else {
      return Err(Error::Validation(format!("{id} is not a document")));
    };

    let (Some(acronym), Some(issue_folder)) = (acronym, issue_folder) else {
      return Err(Error::Validation(format!(
        "document {id} has no storage address"
      )));
    };
    let journal_pid = id.get(1..10).ok_or_else(|| {
      Error::Validation(format!("document pid {id} is too short"))
    })?;
    let destination = format!("migration/{journal_pid}/{issue_folder}");

    let mut plan: Vec<(FileKind, String)> = Vec::new();
    if *file_kind == Some(FileKind::Xml)
      && let Some(name) = file_name
    {
      plan.push((FileKind::Xml, format!("{name}.xml")));
    }
    plan.extend(pdfs.values().map(|n| (FileKind::Pdf, n.clone())));
    plan.extend(
      translations
        .values()
        .flatten()
        .map(|n| (FileKind::Html, n.clone())),
    );

    let mut tracker = Tracker::new("MIGRATE_DOCUMENT_FILES");
    let mut moved: BTreeMap<String, StoredFile> = BTreeMap::new();
    for (kind, name) in plan {
      let source = storage_folder(kind, acronym, issue_folder);
      match self.copy_file(&source, &destination, &name, id).await {
        Ok(uri) => {
          tracker.info(format!("migrated {source}/{name}"));
          moved.insert(name.clone(), StoredFile { uri, name });
        }
        Err(err) => tracker.error(format!("{source}/{name}: {err}")),
      }
    }

    if let EntityDetails::Document { migrated, .. } = &mut entity.details {
      migrated.extend(moved);
    }
    entity.status = Status::MigratedFiles;
    let saved = self.repository.save(entity).await?;
    Ok(StageOutcome::Entity { saved, tracker })
  }

  /// Retrieve one file and re-register it under the migration area,
  /// spooling through a local temporary file.
  async fn copy_file(
    &self,
    source: &str,
    destination: &str,
    name: &str,
    id: &str,
  ) -> Result<String> {
    let bytes = self.storage.retrieve(source, name).await?;
    let spool = std::env::temp_dir().join(format!("folio-{id}-{name}"));
    tokio::fs::write(&spool, &bytes)
      .await
      .map_err(|e| Error::Store(e.to_string()))?;
    let registered =
      self.storage.register(&spool, destination, name, true).await;
    let _ = tokio::fs::remove_file(&spool).await;
    registered
  }

  // ── PUBLISH ───────────────────────────────────────────────────────────

  pub async fn publish_journal(&self, id: &str) -> Result<StageOutcome> {
    let mut entity = self
      .repository
      .fetch(id)
      .await?
      .ok_or_else(|| Error::not_found("journal", id))?;
    let record = entity
      .record
      .as_ref()
      .ok_or_else(|| Error::not_found("journal record", id))?;
    let view = JournalView::new(record).ok_or_else(|| {
      Error::Validation(format!("journal record {id} has no segments"))
    })?;

    let mut tracker = Tracker::new("PUBLISH");
    let (built, missing) = payload::journal(id, &view);
    for field in missing {
      tracker.error(field.to_string());
    }
    self
      .publisher
      .publish(&PublishedEntity::Journal(built))
      .await?;
    tracker.info(format!("published journal {id}"));

    entity.recompute_publication_status();
    let saved = self.repository.save(entity).await?;
    Ok(StageOutcome::Entity { saved, tracker })
  }

  pub async fn publish_issue(&self, id: &str) -> Result<StageOutcome> {
    let mut entity = self
      .repository
      .fetch(id)
      .await?
      .ok_or_else(|| Error::not_found("issue", id))?;
    let record = entity
      .record
      .as_ref()
      .ok_or_else(|| Error::not_found("issue record", id))?;
    let view = IssueView::new(record).ok_or_else(|| {
      Error::Validation(format!("issue record {id} has no segments"))
    })?;

    let mut tracker = Tracker::new("PUBLISH");
    let (built, missing) = payload::issue(&view)?;
    for field in missing {
      tracker.error(field.to_string());
    }
    self.publisher.publish(&PublishedEntity::Issue(built)).await?;
    tracker.info(format!("published issue {id}"));

    entity.recompute_publication_status();
    let saved = self.repository.save(entity).await?;
    Ok(StageOutcome::Entity { saved, tracker })
  }

  /// Publish the document's destination metadata. The owning issue must
  /// already be registered; its record supplies the bundle identifier and
  /// the section label table.
  pub async fn publish_document(&self, id: &str) -> Result<StageOutcome> {
    let mut entity = self
      .repository
      .fetch(id)
      .await?
      .ok_or_else(|| Error::not_found("document", id))?;
    let record = entity
      .record
      .as_ref()
      .ok_or_else(|| Error::not_found("document record", id))?;
    let view = DocumentView::new(record);

    let issue_pid = view.issue_pid().ok_or_else(|| {
      Error::Validation(format!("document pid {id} is too short"))
    })?;
    let issue_entity = self
      .repository
      .fetch(issue_pid)
      .await?
      .ok_or_else(|| Error::not_found("issue", issue_pid))?;
    let issue_record = issue_entity
      .record
      .as_ref()
      .ok_or_else(|| Error::not_found("issue record", issue_pid))?;
    let issue_view = IssueView::new(issue_record).ok_or_else(|| {
      Error::Validation(format!("issue record {issue_pid} has no segments"))
    })?;

    let mut tracker = Tracker::new("PUBLISH");
    let (built, missing) = payload::document(&view, &issue_view)?;
    for field in missing {
      tracker.error(field.to_string());
    }
    self
      .publisher
      .publish(&PublishedEntity::Document(built))
      .await?;
    tracker.info(format!("published document {id}"));

    if let EntityDetails::Document {
      metadata_published, ..
    } = &mut entity.details
    {
      *metadata_published = true;
    }
    entity.recompute_publication_status();
    let saved = self.repository.save(entity).await?;
    Ok(StageOutcome::Entity { saved, tracker })
  }

  // ── PUBLISH_PDFS / PUBLISH_XMLS / PUBLISH_HTMLS ───────────────────────

  /// Publish the document's renditions of one kind, from the files already
  /// moved into the migration area. Entries that fail validation are
  /// tracked and skipped; the kind only counts as published when every
  /// entry was valid.
  pub async fn publish_document_renditions(
    &self,
    id: &str,
    kind: FileKind,
  ) -> Result<StageOutcome> {
    let stage = match kind {
      FileKind::Pdf => "PUBLISH_PDFS",
      FileKind::Xml => "PUBLISH_XMLS",
      FileKind::Html => "PUBLISH_HTMLS",
      FileKind::Img => "PUBLISH_IMGS",
    };
    let mut tracker = Tracker::new(stage);

    let mut entity = self
      .repository
      .fetch(id)
      .await?
      .ok_or_else(|| Error::not_found("document", id))?;
    let language = entity
      .record
      .as_ref()
      .map(DocumentView::new)
      .and_then(|v| v.language().map(str::to_string));

    let EntityDetails::Document {
      file_name,
      file_kind,
      pdfs,
      translations,
      migrated,
      ..
    } = &entity.details
    else {
      return Err(Error::Validation(format!("{id} is not a document")));
    };

    let mut candidates: Vec<(Option<String>, String)> = Vec::new();
    match kind {
      FileKind::Pdf => {
        candidates.extend(
          pdfs.iter().map(|(lang, name)| (Some(lang.clone()), name.clone())),
        );
      }
      FileKind::Xml => {
        if *file_kind == Some(FileKind::Xml)
          && let Some(name) = file_name
        {
          candidates.push((language.clone(), format!("{name}.xml")));
        }
      }
      FileKind::Html => {
        for (lang, names) in translations {
          candidates.extend(
            names.iter().map(|n| (Some(lang.clone()), n.clone())),
          );
        }
      }
      FileKind::Img => {}
    }

    let mut items = Vec::new();
    let mut all_valid = true;
    for (lang, name) in candidates {
      let rendition = Rendition {
        lang,
        kind: Some(kind),
        filename: Some(name.clone()),
        url: migrated.get(&name).map(|f| f.uri.clone()),
      };
      match rendition.validate() {
        Ok(()) => items.push(rendition),
        Err(err) => {
          all_valid = false;
          tracker.error(format!("{name}: {err}"));
        }
      }
    }

    if items.is_empty() {
      tracker.info(format!("no {} renditions to publish", kind.as_str()));
    } else {
      self
        .publisher
        .publish(&PublishedEntity::Renditions {
          document_id: id.to_string(),
          items,
        })
        .await?;
      tracker.info(format!("published {} renditions", kind.as_str()));
    }

    if all_valid
      && let EntityDetails::Document {
        published_kinds, ..
      } = &mut entity.details
    {
      published_kinds.insert(kind);
    }
    entity.recompute_publication_status();
    let saved = self.repository.save(entity).await?;
    Ok(StageOutcome::Entity { saved, tracker })
  }
}
