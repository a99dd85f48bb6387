//! A [`Publisher`] that writes destination payloads as JSON documents.
//!
//! Stands in for the destination content platform: each published entity
//! lands as one pretty-printed JSON file under the publication root, which
//! the downstream loader consumes.

use std::{future::Future, path::PathBuf};

use folio_core::{Error, Result, publish::PublishedEntity, store::Publisher};

pub struct JsonPublisher {
  root: PathBuf,
}

impl JsonPublisher {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn file_name(entity: &PublishedEntity) -> String {
    let (prefix, id) = match entity {
      PublishedEntity::Journal(j) => ("journal", j.id.as_str()),
      PublishedEntity::Issue(i) => ("issue", i.id.as_str()),
      PublishedEntity::Document(d) => ("document", d.id.as_str()),
      PublishedEntity::Renditions { document_id, .. } => {
        ("renditions", document_id.as_str())
      }
    };
    // Identifiers may contain path separators; flatten them.
    format!("{prefix}-{}.json", id.replace(['/', '\\'], "_"))
  }
}

impl Publisher for JsonPublisher {
  fn publish<'a>(
    &'a self,
    entity: &'a PublishedEntity,
  ) -> impl Future<Output = Result<()>> + Send + 'a {
    async move {
      let body = serde_json::to_vec_pretty(entity)?;
      tokio::fs::create_dir_all(&self.root)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;
      let path = self.root.join(Self::file_name(entity));
      tokio::fs::write(&path, body)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;
      tracing::debug!(path = %path.display(), "published");
      Ok(())
    }
  }
}
