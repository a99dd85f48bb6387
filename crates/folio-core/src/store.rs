//! Collaborator traits: the narrow interfaces through which the pipeline
//! reaches the outside world.
//!
//! Backends (SQLite repository, object storage, the destination publisher,
//! the legacy record provider) implement these; the pipeline crate depends on
//! the abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used on
//! multi-threaded async runtimes. External collaborators own their own
//! timeout and retry policy; nothing here blocks indefinitely.

use std::{future::Future, path::Path};

use crate::{
  Result,
  entity::{EntityKind, MigratedEntity, Status},
  publish::PublishedEntity,
  record::LegacyRecord,
};

// ─── Record provider ─────────────────────────────────────────────────────────

/// An identifier with its raw legacy updated timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierStamp {
  pub id:         String,
  /// 8-digit `YYYYMMDD` string as produced by the legacy index.
  pub updated_at: String,
}

/// Access to the legacy database, behind whatever binary-format parsing the
/// provider performs. Date parameters are 8-digit `YYYYMMDD` strings.
pub trait RecordProvider: Send + Sync {
  /// Enumerate identifiers updated in the inclusive `[from, to]` window.
  fn list_identifiers<'a>(
    &'a self,
    from: &'a str,
    to: &'a str,
  ) -> impl Future<Output = Result<Vec<IdentifierStamp>>> + Send + 'a;

  /// Fetch the full record set for one identifier.
  fn fetch_records<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<LegacyRecord>> + Send + 'a;
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// The normalized store of migrated entities.
///
/// `save` must stamp `created` on first save and always stamp `updated`; a
/// transport failure surfaces as [`crate::Error::Store`], never a silently
/// dropped write.
pub trait Repository: Send + Sync {
  fn fetch<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<MigratedEntity>>> + Send + 'a;

  fn save(
    &self,
    entity: MigratedEntity,
  ) -> impl Future<Output = Result<MigratedEntity>> + Send + '_;

  /// Entities currently in `status`, for work enumeration and progress
  /// reporting.
  fn list_by_status(
    &self,
    status: Status,
  ) -> impl Future<Output = Result<Vec<MigratedEntity>>> + Send + '_;

  /// Entities whose normalized legacy updated-timestamp falls in the
  /// inclusive `[from, to]` window. Either bound may be absent.
  fn list_by_updated_range<'a>(
    &'a self,
    from: Option<&'a str>,
    to: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<MigratedEntity>>> + Send + 'a;

  /// Fetch an existing entity or construct a blank one of `kind`.
  fn fetch_or_create<'a>(
    &'a self,
    id: &'a str,
    kind: EntityKind,
  ) -> impl Future<Output = Result<MigratedEntity>> + Send + 'a {
    async move {
      Ok(
        self
          .fetch(id)
          .await?
          .unwrap_or_else(|| MigratedEntity::new(id, kind)),
      )
    }
  }
}

// ─── Files storage ───────────────────────────────────────────────────────────

/// Byte-level object storage, addressed by the fixed logical folder taxonomy
/// `<folder>/<acronym>/<issue-folder>` (see [`crate::entity::storage_folder`]).
pub trait FilesStorage: Send + Sync {
  /// Store the file at `local_path` under `folder` as `name`; returns the
  /// resulting URI. With `preserve_name` the backend must not mangle `name`.
  fn register<'a>(
    &'a self,
    local_path: &'a Path,
    folder: &'a str,
    name: &'a str,
    preserve_name: bool,
  ) -> impl Future<Output = Result<String>> + Send + 'a;

  /// Read back the bytes of `folder`/`name`.
  fn retrieve<'a>(
    &'a self,
    folder: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>>> + Send + 'a;
}

// ─── Publisher ───────────────────────────────────────────────────────────────

/// The destination content model consumed by the public website.
pub trait Publisher: Send + Sync {
  fn publish<'a>(
    &'a self,
    entity: &'a PublishedEntity,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}
