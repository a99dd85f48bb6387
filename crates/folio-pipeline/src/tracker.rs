//! Append-only per-operation audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
  pub at:       DateTime<Utc>,
  pub message:  String,
  pub is_error: bool,
}

/// Append-only log scoped to one tracked operation. Entries are never
/// removed; the tracker is owned exclusively by the stage that created it
/// and embedded, read-only, into the resulting pipeline event.
#[derive(Debug, Clone)]
pub struct Tracker {
  name:    String,
  entries: Vec<TrackerEntry>,
}

impl Tracker {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:    name.into(),
      entries: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn info(&mut self, message: impl Into<String>) {
    self.entries.push(TrackerEntry {
      at:       Utc::now(),
      message:  message.into(),
      is_error: false,
    });
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.entries.push(TrackerEntry {
      at:       Utc::now(),
      message:  message.into(),
      is_error: true,
    });
  }

  /// The full ordered entry sequence.
  pub fn detail(&self) -> &[TrackerEntry] {
    &self.entries
  }

  pub fn total_errors(&self) -> usize {
    self.entries.iter().filter(|e| e.is_error).count()
  }

  pub fn status(&self) -> &'static str {
    if self.total_errors() > 0 { "failed" } else { "success" }
  }

  /// Freeze the log into its serializable snapshot.
  pub fn into_detail(self) -> TrackerDetail {
    let total_errors = self.total_errors();
    let status = self.status().to_string();
    TrackerDetail {
      name: self.name,
      entries: self.entries,
      total_errors,
      status,
    }
  }
}

/// The frozen form of a [`Tracker`], carried inside a pipeline event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerDetail {
  pub name:         String,
  pub entries:      Vec<TrackerEntry>,
  pub total_errors: usize,
  pub status:       String,
}
