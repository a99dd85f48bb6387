//! A [`RecordProvider`] over a JSON-lines export of the legacy database.
//!
//! Each line carries one identifier with its raw updated stamp and the full
//! record set, as produced by the legacy extraction tooling. The whole file
//! is loaded once at startup; the legacy bases are small enough that this
//! beats re-scanning the file per identifier.

use std::{collections::BTreeMap, future::Future, path::Path};

use folio_core::{
  Error, Result,
  record::LegacyRecord,
  store::{IdentifierStamp, RecordProvider},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SourceLine {
  id:         String,
  /// 8-digit `YYYYMMDD` stamp from the legacy index.
  updated_at: String,
  record:     LegacyRecord,
}

/// In-memory provider backed by one JSON-lines source file.
pub struct JsonlProvider {
  entries: BTreeMap<String, (String, LegacyRecord)>,
}

impl JsonlProvider {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
      Error::Configuration(format!(
        "cannot read source file {}: {e}",
        path.display()
      ))
    })?;

    let mut entries = BTreeMap::new();
    for (number, line) in raw.lines().enumerate() {
      if line.trim().is_empty() {
        continue;
      }
      let parsed: SourceLine = serde_json::from_str(line).map_err(|e| {
        Error::Configuration(format!(
          "malformed source line {} in {}: {e}",
          number + 1,
          path.display()
        ))
      })?;
      entries.insert(parsed.id, (parsed.updated_at, parsed.record));
    }
    Ok(Self { entries })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl RecordProvider for JsonlProvider {
  fn list_identifiers<'a>(
    &'a self,
    from: &'a str,
    to: &'a str,
  ) -> impl Future<Output = Result<Vec<IdentifierStamp>>> + Send + 'a {
    async move {
      Ok(
        self
          .entries
          .iter()
          .filter(|(_, (updated, _))| {
            updated.as_str() >= from && updated.as_str() <= to
          })
          .map(|(id, (updated, _))| IdentifierStamp {
            id:         id.clone(),
            updated_at: updated.clone(),
          })
          .collect(),
      )
    }
  }

  fn fetch_records<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<LegacyRecord>> + Send + 'a {
    async move {
      self
        .entries
        .get(id)
        .map(|(_, record)| record.clone())
        .ok_or_else(|| Error::not_found("legacy record", id))
    }
  }
}

#[cfg(test)]
mod tests {
  use folio_core::record::RecordSegment;

  use super::*;

  fn write_source(dir: &Path) -> std::path::PathBuf {
    let mut segment = RecordSegment::new();
    segment.push_scalar("v100", "Revista de Testes");
    let record = LegacyRecord::new("0001-0001", vec![segment]);
    let line = serde_json::json!({
      "id": "0001-0001",
      "updated_at": "20200102",
      "record": record,
    });
    let path = dir.join("source.jsonl");
    std::fs::write(&path, format!("{line}\n")).unwrap();
    path
  }

  #[tokio::test]
  async fn lists_and_fetches_from_the_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let provider = JsonlProvider::load(&write_source(dir.path())).unwrap();
    assert_eq!(provider.len(), 1);

    let stamps = provider.list_identifiers("20200101", "20200131").await.unwrap();
    assert_eq!(stamps.len(), 1);
    assert_eq!(stamps[0].id, "0001-0001");
    assert_eq!(stamps[0].updated_at, "20200102");

    let outside = provider.list_identifiers("20200201", "20200228").await.unwrap();
    assert!(outside.is_empty());

    let record = provider.fetch_records("0001-0001").await.unwrap();
    assert_eq!(
      record.segments[0].first_value("v100"),
      Some("Revista de Testes")
    );
  }

  #[tokio::test]
  async fn unknown_identifier_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let provider = JsonlProvider::load(&write_source(dir.path())).unwrap();

    let err = provider.fetch_records("9999-9999").await.unwrap_err();
    assert!(matches!(err, Error::RecordNotFound { .. }));
  }
}
