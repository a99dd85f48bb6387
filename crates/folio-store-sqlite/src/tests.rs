//! Integration tests for `SqliteStore` against an in-memory database.

use folio_core::{
  entity::{EntityDetails, EntityKind, MigratedEntity, Status},
  record::{LegacyRecord, RecordSegment},
  store::Repository,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn journal_entity(id: &str, isis_updated: &str) -> MigratedEntity {
  let mut entity = MigratedEntity::new(id, EntityKind::Journal);
  entity.isis_updated = Some(isis_updated.to_string());
  entity
}

// ─── Round trips ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_fetch_round_trip() {
  let s = store().await;

  let mut entity = journal_entity("0001-0001", "2020-01-02T00:00:00.000000Z");
  entity.status = Status::IsisMetadataMigrated;
  entity.details = EntityDetails::Journal {
    acronym: Some("rdt".into()),
  };
  let mut segment = RecordSegment::new();
  segment.push_scalar("v100", "Revista de Testes");
  entity.record = Some(LegacyRecord::new("0001-0001", vec![segment]));

  s.save(entity).await.unwrap();

  let fetched = s.fetch("0001-0001").await.unwrap().expect("saved entity");
  assert_eq!(fetched.status, Status::IsisMetadataMigrated);
  assert_eq!(fetched.kind(), EntityKind::Journal);
  assert_eq!(
    fetched.isis_updated.as_deref(),
    Some("2020-01-02T00:00:00.000000Z")
  );
  let record = fetched.record.expect("record kept verbatim");
  assert_eq!(record.segments[0].first_value("v100"), Some("Revista de Testes"));
}

#[tokio::test]
async fn fetch_missing_returns_none() {
  let s = store().await;
  assert!(s.fetch("9999-9999").await.unwrap().is_none());
}

#[tokio::test]
async fn document_details_survive_the_json_column() {
  let s = store().await;

  let mut entity =
    MigratedEntity::new("S0001-00012020000200015", EntityKind::Document);
  let EntityDetails::Document {
    file_name, pdfs, ..
  } = &mut entity.details
  else {
    unreachable!()
  };
  *file_name = Some("a01".into());
  pdfs.insert("en".into(), "a01.pdf".into());
  s.save(entity).await.unwrap();

  let fetched = s
    .fetch("S0001-00012020000200015")
    .await
    .unwrap()
    .expect("saved entity");
  let EntityDetails::Document {
    file_name, pdfs, ..
  } = &fetched.details
  else {
    panic!("document details");
  };
  assert_eq!(file_name.as_deref(), Some("a01"));
  assert_eq!(pdfs.get("en").map(String::as_str), Some("a01.pdf"));
}

// ─── Save stamps ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_is_stamped_once_and_updated_always() {
  let s = store().await;

  let entity = journal_entity("0001-0001", "2020-01-02T00:00:00.000000Z");
  let first = s.save(entity).await.unwrap();
  let created = first.created.expect("created stamped on first save");
  let first_updated = first.updated.expect("updated stamped");

  let second = s.save(first).await.unwrap();
  assert_eq!(second.created, Some(created), "created never restamped");
  assert!(second.updated.expect("updated restamped") >= first_updated);
}

// ─── Status queries ──────────────────────────────────────────────────────────

#[tokio::test]
async fn list_by_status_filters_exactly() {
  let s = store().await;
  s.save(journal_entity("0001-0001", "2020-01-01T00:00:00.000000Z"))
    .await
    .unwrap();
  let mut published = journal_entity("0001-0002", "2020-02-01T00:00:00.000000Z");
  published.status = Status::PublishedComplete;
  s.save(published).await.unwrap();

  let pending = s.list_by_status(Status::PendingMigration).await.unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].id, "0001-0001");

  let complete = s.list_by_status(Status::PublishedComplete).await.unwrap();
  assert_eq!(complete.len(), 1);
  assert_eq!(complete[0].id, "0001-0002");

  assert!(s.list_by_status(Status::MigratedFiles).await.unwrap().is_empty());
}

// ─── Range queries ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_by_updated_range_is_inclusive() {
  let s = store().await;
  s.save(journal_entity("0001-0001", "2020-01-01T00:00:00.000000Z"))
    .await
    .unwrap();
  s.save(journal_entity("0001-0002", "2020-02-01T00:00:00.000000Z"))
    .await
    .unwrap();
  s.save(journal_entity("0001-0003", "2020-03-01T00:00:00.000000Z"))
    .await
    .unwrap();

  let middle = s
    .list_by_updated_range(
      Some("2020-01-15T00:00:00.000000Z"),
      Some("2020-02-01T00:00:00.000000Z"),
    )
    .await
    .unwrap();
  assert_eq!(middle.len(), 1);
  assert_eq!(middle[0].id, "0001-0002");

  let from_feb = s
    .list_by_updated_range(Some("2020-02-01T00:00:00.000000Z"), None)
    .await
    .unwrap();
  assert_eq!(from_feb.len(), 2);

  let all = s.list_by_updated_range(None, None).await.unwrap();
  assert_eq!(all.len(), 3);
}
