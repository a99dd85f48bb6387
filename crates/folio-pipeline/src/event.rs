//! Pipeline result shapes.

use chrono::{DateTime, Utc};
use folio_core::entity::MigratedEntity;
use serde::{Deserialize, Serialize};

use crate::tracker::{Tracker, TrackerDetail};

/// What one stage action hands back to the orchestrator.
#[derive(Debug)]
pub enum StageOutcome {
  /// The stage ran but produced no persisted entity.
  NoEntity,
  /// The stage persisted an entity and kept a per-stage audit log.
  Entity {
    saved:   MigratedEntity,
    tracker: Tracker,
  },
}

/// The record of one stage's execution within an identifier's pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
  /// Stage name.
  pub name:    String,
  /// Per-kind tag naming what a successful run of the stage accomplished.
  pub result:  String,
  /// When the stage finished.
  pub at:      DateTime<Utc>,
  /// Persistence timestamps, present when the stage saved an entity.
  pub created: Option<DateTime<Utc>>,
  pub updated: Option<DateTime<Utc>>,
  /// Normalized legacy timestamps; only the first stage surfaces these.
  pub isis_created: Option<String>,
  pub isis_updated: Option<String>,
  pub detail:  Option<TrackerDetail>,
  pub error:   Option<String>,
}

impl PipelineEvent {
  pub fn is_error(&self) -> bool {
    self.error.is_some()
  }
}

/// Either the full per-stage event sequence, or a single top-level error
/// when the identifier could not be dispatched at all. Flattened into
/// [`PipelineResult`], this serializes as an `events` or an `error` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineOutcome {
  Events(Vec<PipelineEvent>),
  Error(String),
}

/// The aggregated result of one identifier's pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
  pub id: String,
  #[serde(flatten)]
  pub outcome: PipelineOutcome,
}

impl PipelineResult {
  pub fn events(&self) -> Option<&[PipelineEvent]> {
    match &self.outcome {
      PipelineOutcome::Events(events) => Some(events),
      PipelineOutcome::Error(_) => None,
    }
  }
}
