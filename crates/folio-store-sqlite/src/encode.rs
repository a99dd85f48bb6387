//! Encoding and decoding helpers between the domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; the raw legacy record and the
//! kind-tagged details are stored as compact JSON.

use chrono::{DateTime, Utc};
use folio_core::{
  entity::{EntityDetails, MigratedEntity, Status},
  record::LegacyRecord,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn encode_status(status: Status) -> &'static str { status.as_str() }

pub fn decode_status(id: &str, s: &str) -> Result<Status> {
  match s {
    "PENDING_MIGRATION" => Ok(Status::PendingMigration),
    "ISIS_METADATA_MIGRATED" => Ok(Status::IsisMetadataMigrated),
    "MIGRATED_FILES" => Ok(Status::MigratedFiles),
    "PUBLISHED_INCOMPLETE" => Ok(Status::PublishedIncomplete),
    "PUBLISHED_COMPLETE" => Ok(Status::PublishedComplete),
    other => Err(Error::UnknownColumnValue {
      column: "status",
      id:     id.to_string(),
      value:  other.to_string(),
    }),
  }
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_record(record: &LegacyRecord) -> Result<String> {
  Ok(serde_json::to_string(record)?)
}

pub fn encode_details(details: &EntityDetails) -> Result<String> {
  Ok(serde_json::to_string(details)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from an `entities` row.
pub struct RawEntity {
  pub entity_id:    String,
  pub status:       String,
  pub isis_created: Option<String>,
  pub isis_updated: Option<String>,
  pub created_at:   Option<String>,
  pub updated_at:   Option<String>,
  pub record_json:  Option<String>,
  pub details_json: String,
}

impl RawEntity {
  pub fn into_entity(self) -> Result<MigratedEntity> {
    let status = decode_status(&self.entity_id, &self.status)?;
    let record: Option<LegacyRecord> = self
      .record_json
      .as_deref()
      .map(serde_json::from_str)
      .transpose()?;
    let details: EntityDetails = serde_json::from_str(&self.details_json)?;
    let created = self.created_at.as_deref().map(decode_dt).transpose()?;
    let updated = self.updated_at.as_deref().map(decode_dt).transpose()?;

    Ok(MigratedEntity {
      id: self.entity_id,
      status,
      record,
      isis_created: self.isis_created,
      isis_updated: self.isis_updated,
      created,
      updated,
      details,
    })
  }
}
