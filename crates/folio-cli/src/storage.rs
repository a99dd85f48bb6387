//! Filesystem-backed [`FilesStorage`].
//!
//! Lays files out as `<root>/<folder>/<name>` following the fixed logical
//! folder taxonomy and answers `file://` URIs.

use std::{future::Future, path::PathBuf};

use folio_core::{Error, Result, store::FilesStorage};

pub struct FsStorage {
  root: PathBuf,
}

impl FsStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl FilesStorage for FsStorage {
  fn register<'a>(
    &'a self,
    local_path: &'a std::path::Path,
    folder: &'a str,
    name: &'a str,
    _preserve_name: bool,
  ) -> impl Future<Output = Result<String>> + Send + 'a {
    async move {
      let target_dir = self.root.join(folder);
      tokio::fs::create_dir_all(&target_dir)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;
      let target = target_dir.join(name);
      tokio::fs::copy(local_path, &target)
        .await
        .map_err(|e| Error::Store(e.to_string()))?;
      Ok(format!("file://{}", target.display()))
    }
  }

  fn retrieve<'a>(
    &'a self,
    folder: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>>> + Send + 'a {
    async move {
      let path = self.root.join(folder).join(name);
      tokio::fs::read(&path).await.map_err(|e| {
        Error::Store(format!("cannot read {}: {e}", path.display()))
      })
    }
  }
}
