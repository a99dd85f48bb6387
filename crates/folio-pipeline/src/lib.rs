//! The migration pipeline: stage orchestration, idempotency guarding and
//! destination payload assembly.
//!
//! A driver enumerates candidate identifiers from a
//! [`folio_core::store::RecordProvider`], filters them through the
//! [`IdempotencyGuard`], and hands each surviving identifier to the
//! [`MigrationOrchestrator`], which runs the entity kind's ordered stage
//! sequence. Stages fail independently; a whole batch always completes and
//! yields one [`PipelineResult`] per submitted identifier.

pub mod batch;
pub mod event;
pub mod guard;
pub mod manager;
pub mod orchestrator;
pub mod payload;
pub mod tracker;

pub use batch::{BatchItem, run_bounded};
pub use event::{PipelineEvent, PipelineOutcome, PipelineResult, StageOutcome};
pub use guard::{GuardDecision, IdempotencyGuard};
pub use manager::MigrationManager;
pub use orchestrator::{MigrationOrchestrator, Stage};
pub use payload::MissingField;
pub use tracker::{Tracker, TrackerDetail, TrackerEntry};

#[cfg(test)]
pub(crate) mod fakes;
