//! The idempotency gate in front of the orchestrator.

use folio_core::{
  Result, dates,
  entity::{EntityKind, MigratedEntity, Status},
  store::Repository,
};

/// Whether an incoming legacy change needs (re)processing.
#[derive(Debug)]
pub enum GuardDecision {
  /// The stored entity already carries this updated-timestamp; no write
  /// occurred.
  Skip,
  /// The entity was created or reset to `PENDING_MIGRATION` and persisted.
  Done(MigratedEntity),
}

/// Decides, per identifier, whether an incoming legacy change must be
/// (re)processed. This is the sole gate against redundant reprocessing of
/// unchanged records; it is called once per identifier before stage
/// execution and is itself safe to call repeatedly.
pub struct IdempotencyGuard<'a, R> {
  repository: &'a R,
}

impl<'a, R: Repository> IdempotencyGuard<'a, R> {
  pub fn new(repository: &'a R) -> Self {
    Self { repository }
  }

  /// Compare the incoming raw legacy updated-timestamp against the stored
  /// normalized one; equal timestamps skip, anything else resets the entity
  /// to `PENDING_MIGRATION` and persists it.
  pub async fn check(
    &self,
    id: &str,
    kind: EntityKind,
    incoming_updated: &str,
  ) -> Result<GuardDecision> {
    let incoming = dates::normalize(incoming_updated)?;

    let existing = self.repository.fetch(id).await?;
    if let Some(existing) = &existing
      && existing.isis_updated.as_deref() == Some(incoming.as_str())
    {
      tracing::debug!(id, "unchanged since last run, skipping");
      return Ok(GuardDecision::Skip);
    }

    let mut entity =
      existing.unwrap_or_else(|| MigratedEntity::new(id, kind));
    entity.isis_updated = Some(incoming);
    entity.status = Status::PendingMigration;
    let saved = self.repository.save(entity).await?;
    Ok(GuardDecision::Done(saved))
  }
}
