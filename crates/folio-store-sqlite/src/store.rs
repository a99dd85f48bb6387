//! [`SqliteStore`] — the SQLite implementation of
//! [`folio_core::store::Repository`].

use std::{future::Future, path::Path};

use chrono::Utc;
use folio_core::{
  entity::{MigratedEntity, Status},
  store::Repository,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{RawEntity, encode_details, encode_dt, encode_record, encode_status},
  schema::SCHEMA,
};

const SELECT_COLUMNS: &str = "entity_id, status, isis_created, isis_updated, \
                              created_at, updated_at, record_json, details_json";

fn raw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntity> {
  Ok(RawEntity {
    entity_id:    row.get(0)?,
    status:       row.get(1)?,
    isis_created: row.get(2)?,
    isis_updated: row.get(3)?,
    created_at:   row.get(4)?,
    updated_at:   row.get(5)?,
    record_json:  row.get(6)?,
    details_json: row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A normalized entity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_raw(&self, id: &str) -> Result<Option<RawEntity>> {
    let id = id.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM entities WHERE entity_id = ?1"),
            rusqlite::params![id],
            raw_from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    Ok(raw)
  }

  async fn upsert(&self, entity: &MigratedEntity) -> Result<()> {
    let entity_id = entity.id.clone();
    let kind = entity.kind().as_str().to_owned();
    let status = encode_status(entity.status).to_owned();
    let isis_created = entity.isis_created.clone();
    let isis_updated = entity.isis_updated.clone();
    let created_at = entity.created.map(encode_dt);
    let updated_at = entity.updated.map(encode_dt);
    let record_json =
      entity.record.as_ref().map(encode_record).transpose()?;
    let details_json = encode_details(&entity.details)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO entities (
             entity_id, kind, status, isis_created, isis_updated,
             created_at, updated_at, record_json, details_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
           ON CONFLICT (entity_id) DO UPDATE SET
             kind         = excluded.kind,
             status       = excluded.status,
             isis_created = excluded.isis_created,
             isis_updated = excluded.isis_updated,
             created_at   = excluded.created_at,
             updated_at   = excluded.updated_at,
             record_json  = excluded.record_json,
             details_json = excluded.details_json",
          rusqlite::params![
            entity_id,
            kind,
            status,
            isis_created,
            isis_updated,
            created_at,
            updated_at,
            record_json,
            details_json,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_raw_by_status(&self, status: String) -> Result<Vec<RawEntity>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SELECT_COLUMNS} FROM entities
           WHERE status = ?1
           ORDER BY entity_id"
        ))?;
        let raws = stmt
          .query_map(rusqlite::params![status], raw_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws)
      })
      .await?;
    Ok(raws)
  }

  async fn list_raw_by_updated_range(
    &self,
    from: Option<String>,
    to: Option<String>,
  ) -> Result<Vec<RawEntity>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SELECT_COLUMNS} FROM entities
           WHERE (?1 IS NULL OR isis_updated >= ?1)
             AND (?2 IS NULL OR isis_updated <= ?2)
             AND isis_updated IS NOT NULL
           ORDER BY isis_updated, entity_id"
        ))?;
        let raws = stmt
          .query_map(rusqlite::params![from, to], raw_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws)
      })
      .await?;
    Ok(raws)
  }
}

// ─── Repository ──────────────────────────────────────────────────────────────

impl Repository for SqliteStore {
  fn fetch<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = folio_core::Result<Option<MigratedEntity>>> + Send + 'a
  {
    async move {
      let raw = self.fetch_raw(id).await?;
      Ok(raw.map(RawEntity::into_entity).transpose()?)
    }
  }

  fn save(
    &self,
    mut entity: MigratedEntity,
  ) -> impl Future<Output = folio_core::Result<MigratedEntity>> + Send + '_ {
    async move {
      let now = Utc::now();
      if entity.created.is_none() {
        entity.created = Some(now);
      }
      entity.updated = Some(now);
      self.upsert(&entity).await?;
      Ok(entity)
    }
  }

  fn list_by_status(
    &self,
    status: Status,
  ) -> impl Future<Output = folio_core::Result<Vec<MigratedEntity>>> + Send + '_
  {
    async move {
      let raws = self
        .list_raw_by_status(encode_status(status).to_owned())
        .await?;
      let mut entities = Vec::with_capacity(raws.len());
      for raw in raws {
        entities.push(raw.into_entity()?);
      }
      Ok(entities)
    }
  }

  fn list_by_updated_range<'a>(
    &'a self,
    from: Option<&'a str>,
    to: Option<&'a str>,
  ) -> impl Future<Output = folio_core::Result<Vec<MigratedEntity>>> + Send + 'a
  {
    async move {
      let raws = self
        .list_raw_by_updated_range(
          from.map(str::to_string),
          to.map(str::to_string),
        )
        .await?;
      let mut entities = Vec::with_capacity(raws.len());
      for raw in raws {
        entities.push(raw.into_entity()?);
      }
      Ok(entities)
    }
  }
}
