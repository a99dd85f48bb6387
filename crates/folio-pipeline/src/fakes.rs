//! In-memory collaborators and record fixtures shared by the pipeline tests.

use std::{
  collections::BTreeMap,
  future::Future,
  path::Path,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use chrono::Utc;
use folio_core::{
  Error, Result,
  entity::{MigratedEntity, Status},
  publish::PublishedEntity,
  record::{LegacyRecord, Occurrence, RecordSegment},
  store::{FilesStorage, Publisher, Repository},
};

// ─── Repository ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRepository {
  entities: Mutex<BTreeMap<String, MigratedEntity>>,
  saves:    AtomicUsize,
}

impl InMemoryRepository {
  pub fn save_count(&self) -> usize {
    self.saves.load(Ordering::SeqCst)
  }

  pub fn get(&self, id: &str) -> Option<MigratedEntity> {
    self.entities.lock().unwrap().get(id).cloned()
  }
}

impl Repository for InMemoryRepository {
  fn fetch<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<MigratedEntity>>> + Send + 'a {
    async move { Ok(self.entities.lock().unwrap().get(id).cloned()) }
  }

  fn save(
    &self,
    mut entity: MigratedEntity,
  ) -> impl Future<Output = Result<MigratedEntity>> + Send + '_ {
    async move {
      let now = Utc::now();
      if entity.created.is_none() {
        entity.created = Some(now);
      }
      entity.updated = Some(now);
      self.saves.fetch_add(1, Ordering::SeqCst);
      self
        .entities
        .lock()
        .unwrap()
        .insert(entity.id.clone(), entity.clone());
      Ok(entity)
    }
  }

  fn list_by_status(
    &self,
    status: Status,
  ) -> impl Future<Output = Result<Vec<MigratedEntity>>> + Send + '_ {
    async move {
      Ok(
        self
          .entities
          .lock()
          .unwrap()
          .values()
          .filter(|e| e.status == status)
          .cloned()
          .collect(),
      )
    }
  }

  fn list_by_updated_range<'a>(
    &'a self,
    from: Option<&'a str>,
    to: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<MigratedEntity>>> + Send + 'a {
    async move {
      Ok(
        self
          .entities
          .lock()
          .unwrap()
          .values()
          .filter(|e| {
            let Some(updated) = e.isis_updated.as_deref() else {
              return false;
            };
            from.is_none_or(|f| updated >= f)
              && to.is_none_or(|t| updated <= t)
          })
          .cloned()
          .collect(),
      )
    }
  }
}

// ─── Files storage ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStorage {
  files: Mutex<BTreeMap<(String, String), Vec<u8>>>,
}

impl InMemoryStorage {
  pub fn seed(&self, folder: &str, name: &str, bytes: &[u8]) {
    self
      .files
      .lock()
      .unwrap()
      .insert((folder.to_string(), name.to_string()), bytes.to_vec());
  }

  pub fn has(&self, folder: &str, name: &str) -> bool {
    self
      .files
      .lock()
      .unwrap()
      .contains_key(&(folder.to_string(), name.to_string()))
  }
}

impl FilesStorage for InMemoryStorage {
  fn register<'a>(
    &'a self,
    local_path: &'a Path,
    folder: &'a str,
    name: &'a str,
    _preserve_name: bool,
  ) -> impl Future<Output = Result<String>> + Send + 'a {
    async move {
      let bytes = tokio::fs::read(local_path)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;
      self
        .files
        .lock()
        .unwrap()
        .insert((folder.to_string(), name.to_string()), bytes);
      Ok(format!("files://{folder}/{name}"))
    }
  }

  fn retrieve<'a>(
    &'a self,
    folder: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>>> + Send + 'a {
    async move {
      self
        .files
        .lock()
        .unwrap()
        .get(&(folder.to_string(), name.to_string()))
        .cloned()
        .ok_or_else(|| Error::Store(format!("no such file {folder}/{name}")))
    }
  }
}

// ─── Publisher ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryPublisher {
  published: Mutex<Vec<PublishedEntity>>,
  fail:      AtomicBool,
}

impl InMemoryPublisher {
  /// Make every subsequent `publish` call fail with a store error.
  pub fn fail_from_now_on(&self) {
    self.fail.store(true, Ordering::SeqCst);
  }

  pub fn published(&self) -> Vec<PublishedEntity> {
    self.published.lock().unwrap().clone()
  }
}

impl Publisher for InMemoryPublisher {
  fn publish<'a>(
    &'a self,
    entity: &'a PublishedEntity,
  ) -> impl Future<Output = Result<()>> + Send + 'a {
    async move {
      if self.fail.load(Ordering::SeqCst) {
        return Err(Error::Store("destination unavailable".into()));
      }
      self.published.lock().unwrap().push(entity.clone());
      Ok(())
    }
  }
}

// ─── Record fixtures ─────────────────────────────────────────────────────────

pub fn journal_record() -> LegacyRecord {
  let mut seg = RecordSegment::new();
  seg.push_scalar("v100", "Revista de Testes");
  seg.push_scalar("v151", "Rev. Test.");
  seg.push_scalar("v150", "Rev. Testes");
  seg.push_scalar("v068", "RDT");
  seg.push("v435", Occurrence::from([("t", "PRINT"), ("_", "0001-0001")]));
  seg.push("v435", Occurrence::from([("t", "ONLIN"), ("_", "1234-5678")]));
  seg.push_scalar("v480", "Sociedade de Testes");
  seg.push_scalar("v490", "São Paulo");
  seg.push_scalar("v320", "SP");
  seg.push_scalar("v940", "19990101");
  seg.push_scalar("v941", "20200102");
  LegacyRecord::new("0001-0001", vec![seg])
}

pub fn issue_record() -> LegacyRecord {
  let mut seg = RecordSegment::new();
  seg.push_scalar("v035", "0001-0001");
  seg.push_scalar("v031", "05");
  seg.push_scalar("v032", "2");
  seg.push_scalar("v930", "RDT");
  seg.push_scalar("v065", "20200400");
  seg.push_scalar("v036", "20202");
  seg.push_scalar("v042", "1");
  seg.push(
    "v049",
    Occurrence::from([("c", "sec01"), ("l", "en"), ("t", "Articles")]),
  );
  seg.push(
    "v049",
    Occurrence::from([("c", "sec01"), ("l", "pt"), ("t", "Artigos")]),
  );
  seg.push_scalar("v940", "20200401");
  seg.push_scalar("v941", "20200402");
  LegacyRecord::new("0001-000120200002", vec![seg])
}

pub fn document_record() -> LegacyRecord {
  let mut header = RecordSegment::new();
  header.push_scalar("v091", "20200301123000");
  header.push_scalar("v093", "20200101090000");

  let mut raw = RecordSegment::new();
  raw.push_scalar("v002", "S0001-0001(20)00200015");
  raw.push_scalar("v880", "S0001-00012020000200015");
  raw.push_scalar("v885", "pidv3xyz");
  raw.push_scalar("v237", "10.1000/test.2020.15");
  raw.push_scalar("v040", "en");
  raw.push_scalar("v071", "oa");
  raw.push_scalar("v121", "00015");
  raw.push_scalar("v049", "sec01");
  raw.push_scalar("v702", "xml/rdt/v5n2/a01.xml");
  raw.push_scalar("v065", "20200400");
  raw.push_scalar("v223", "20200415");
  raw.push_scalar("v601", "pt");
  raw.push("v014", Occurrence::from([("f", "10"), ("l", "25")]));
  raw.push(
    "v010",
    Occurrence::from([("s", "Silva"), ("n", "Ana"), ("r", "ND"), ("1", "a01")]),
  );
  raw.push(
    "v010",
    Occurrence::from([("s", "Souza"), ("n", "Bento"), ("r", "ND")]),
  );
  raw.push("v085", Occurrence::from([("l", "en"), ("k", "testing")]));

  let mut formatted = RecordSegment::new();
  formatted.push(
    "v012",
    Occurrence::from([("l", "en"), ("_", "A study of tests")]),
  );
  formatted.push("v012", Occurrence::from([("l", "pt"), ("_", "Um estudo")]));
  formatted.push(
    "v083",
    Occurrence::from([("l", "en"), ("_", "We study tests.")]),
  );

  LegacyRecord::new("S0001-00012020000200015", vec![header, raw, formatted])
}

/// Seed the classic-era files the document fixture refers to.
pub fn seed_document_files(storage: &InMemoryStorage) {
  storage.seed("xml/rdt/v5n2", "a01.xml", b"<article/>");
  storage.seed("pdf/rdt/v5n2", "a01.pdf", b"%PDF-1.4 main");
  storage.seed("pdf/rdt/v5n2", "pt_a01.pdf", b"%PDF-1.4 pt");
}
