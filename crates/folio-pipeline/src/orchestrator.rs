//! Per-identifier stage sequencing.
//!
//! One state machine per identifier: the stage table is fixed per entity
//! kind, every stage after the first receives only the identifier, and every
//! stage is invoked unconditionally even when an earlier one failed — later
//! stages depend on persisted side effects, not on in-memory results, and a
//! partially-published entity is an observable state, not an error.

use chrono::Utc;
use folio_core::{
  Error, Result,
  entity::{EntityKind, FileKind},
  record::LegacyRecord,
  store::{FilesStorage, Publisher, Repository},
};

use crate::{
  event::{PipelineEvent, PipelineOutcome, PipelineResult, StageOutcome},
  manager::MigrationManager,
};

/// The named units of work an entity's migration sequence is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  RegisterIsis,
  MigrateDocumentFiles,
  Publish,
  PublishPdfs,
  PublishXmls,
  PublishHtmls,
}

impl Stage {
  pub fn name(self) -> &'static str {
    match self {
      Self::RegisterIsis => "REGISTER_ISIS",
      Self::MigrateDocumentFiles => "MIGRATE_DOCUMENT_FILES",
      Self::Publish => "PUBLISH",
      Self::PublishPdfs => "PUBLISH_PDFS",
      Self::PublishXmls => "PUBLISH_XMLS",
      Self::PublishHtmls => "PUBLISH_HTMLS",
    }
  }

  /// Per-kind tag recorded on the stage's event, naming what a successful
  /// run of the stage accomplished for this entity kind.
  pub fn result_tag(self, kind: EntityKind) -> &'static str {
    match (self, kind) {
      (Self::RegisterIsis, EntityKind::Journal) => "REGISTERED_ISIS_JOURNAL",
      (Self::RegisterIsis, EntityKind::Issue) => "REGISTERED_ISIS_ISSUE",
      (Self::RegisterIsis, EntityKind::Document) => "REGISTERED_ISIS_DOCUMENT",
      (Self::MigrateDocumentFiles, _) => "MIGRATED_DOCUMENT_FILES",
      (Self::Publish, EntityKind::Journal) => "PUBLISHED_JOURNAL",
      (Self::Publish, EntityKind::Issue) => "PUBLISHED_ISSUE",
      (Self::Publish, EntityKind::Document) => "PUBLISHED_DOCUMENT",
      (Self::PublishPdfs, _) => "PUBLISHED_PDFS",
      (Self::PublishXmls, _) => "PUBLISHED_XMLS",
      (Self::PublishHtmls, _) => "PUBLISHED_HTMLS",
    }
  }
}

const JOURNAL_STAGES: &[Stage] = &[Stage::RegisterIsis, Stage::Publish];
const ISSUE_STAGES: &[Stage] = &[Stage::RegisterIsis, Stage::Publish];
const DOCUMENT_STAGES: &[Stage] = &[
  Stage::RegisterIsis,
  Stage::MigrateDocumentFiles,
  Stage::Publish,
  Stage::PublishPdfs,
  Stage::PublishXmls,
  Stage::PublishHtmls,
];

/// Runs the ordered stage sequence for one identifier and aggregates the
/// per-stage events. Never fails for an individual identifier's processing;
/// only an undispatchable identifier (unknown kind key) yields a top-level
/// error result.
pub struct MigrationOrchestrator<R, F, P> {
  manager: MigrationManager<R, F, P>,
}

impl<R, F, P> MigrationOrchestrator<R, F, P>
where
  R: Repository,
  F: FilesStorage,
  P: Publisher,
{
  pub fn new(manager: MigrationManager<R, F, P>) -> Self {
    Self { manager }
  }

  pub fn manager(&self) -> &MigrationManager<R, F, P> {
    &self.manager
  }

  /// Run the full stage sequence for `id`. `kind` is the configured entity
  /// kind key; an unknown key or a malformed (segment-less) record set is a
  /// per-identifier dispatch failure — no stage runs and nothing persists.
  pub async fn run(
    &self,
    kind: &str,
    id: &str,
    record: &LegacyRecord,
  ) -> PipelineResult {
    if record.segments.is_empty() {
      return PipelineResult {
        id:      id.to_string(),
        outcome: PipelineOutcome::Error(format!(
          "record set for {id} has no segments"
        )),
      };
    }
    let kind: EntityKind = match kind.parse() {
      Ok(kind) => kind,
      Err(err) => {
        return PipelineResult {
          id:      id.to_string(),
          outcome: PipelineOutcome::Error(err.to_string()),
        };
      }
    };

    // The legacy document base stores issue entries alongside documents: a
    // single-segment record set is an issue entry, not a document.
    let kind = if kind == EntityKind::Document && record.segments.len() == 1 {
      EntityKind::Issue
    } else {
      kind
    };
    let stages = match kind {
      EntityKind::Journal => JOURNAL_STAGES,
      EntityKind::Issue => ISSUE_STAGES,
      EntityKind::Document => DOCUMENT_STAGES,
    };

    let mut events = Vec::with_capacity(stages.len());
    for (index, stage) in stages.iter().copied().enumerate() {
      let outcome = self.execute(kind, stage, id, record).await;
      if let Err(err) = &outcome {
        tracing::warn!(id, stage = stage.name(), %err, "stage failed");
      }
      events.push(build_event(stage, kind, index == 0, outcome));
    }

    PipelineResult {
      id:      id.to_string(),
      outcome: PipelineOutcome::Events(events),
    }
  }

  async fn execute(
    &self,
    kind: EntityKind,
    stage: Stage,
    id: &str,
    record: &LegacyRecord,
  ) -> Result<StageOutcome> {
    match (kind, stage) {
      (EntityKind::Journal, Stage::RegisterIsis) => {
        self.manager.register_journal(id, record).await
      }
      (EntityKind::Journal, Stage::Publish) => {
        self.manager.publish_journal(id).await
      }
      (EntityKind::Issue, Stage::RegisterIsis) => {
        self.manager.register_issue(id, record).await
      }
      (EntityKind::Issue, Stage::Publish) => {
        self.manager.publish_issue(id).await
      }
      (EntityKind::Document, Stage::RegisterIsis) => {
        self.manager.register_document(id, record).await
      }
      (EntityKind::Document, Stage::MigrateDocumentFiles) => {
        self.manager.migrate_document_files(id).await
      }
      (EntityKind::Document, Stage::Publish) => {
        self.manager.publish_document(id).await
      }
      (EntityKind::Document, Stage::PublishPdfs) => {
        self
          .manager
          .publish_document_renditions(id, FileKind::Pdf)
          .await
      }
      (EntityKind::Document, Stage::PublishXmls) => {
        self
          .manager
          .publish_document_renditions(id, FileKind::Xml)
          .await
      }
      (EntityKind::Document, Stage::PublishHtmls) => {
        self
          .manager
          .publish_document_renditions(id, FileKind::Html)
          .await
      }
      (kind, stage) => Err(Error::Configuration(format!(
        "stage {} is not configured for entity kind {}",
        stage.name(),
        kind.as_str()
      ))),
    }
  }
}

fn build_event(
  stage: Stage,
  kind: EntityKind,
  first: bool,
  outcome: Result<StageOutcome>,
) -> PipelineEvent {
  let mut event = PipelineEvent {
    name:    stage.name().to_string(),
    result:  stage.result_tag(kind).to_string(),
    at:      Utc::now(),
    created: None,
    updated: None,
    isis_created: None,
    isis_updated: None,
    detail:  None,
    error:   None,
  };
  match outcome {
    Ok(StageOutcome::Entity { saved, tracker }) => {
      event.created = saved.created;
      event.updated = saved.updated;
      if first {
        event.isis_created = saved.isis_created;
        event.isis_updated = saved.isis_updated;
      }
      event.detail = Some(tracker.into_detail());
    }
    Ok(StageOutcome::NoEntity) => {}
    Err(err) => event.error = Some(err.to_string()),
  }
  event
}
