//! Bounded-concurrency batch execution.
//!
//! Per-identifier pipelines share no mutable state, so a batch runs them on
//! a semaphore-bounded set of tasks. In-flight pipelines run to completion;
//! cancellation means no new identifiers are submitted.

use std::sync::Arc;

use folio_core::{
  record::LegacyRecord,
  store::{FilesStorage, Publisher, Repository},
};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{event::PipelineResult, orchestrator::MigrationOrchestrator};

/// One unit of batch work: the configured entity kind key, the identifier
/// and its fetched record set.
#[derive(Debug, Clone)]
pub struct BatchItem {
  pub kind:   String,
  pub id:     String,
  pub record: LegacyRecord,
}

/// Run every item's pipeline with at most `concurrency` in flight, yielding
/// results in input order regardless of completion order.
pub async fn run_bounded<R, F, P>(
  orchestrator: Arc<MigrationOrchestrator<R, F, P>>,
  items: Vec<BatchItem>,
  concurrency: usize,
) -> Vec<PipelineResult>
where
  R: Repository + 'static,
  F: FilesStorage + 'static,
  P: Publisher + 'static,
{
  let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
  let mut tasks = JoinSet::new();

  for (index, item) in items.into_iter().enumerate() {
    let orchestrator = Arc::clone(&orchestrator);
    let semaphore = Arc::clone(&semaphore);
    tasks.spawn(async move {
      // The semaphore is never closed while tasks hold a reference to it.
      let _permit = semaphore.acquire_owned().await.ok();
      let result = orchestrator
        .run(&item.kind, &item.id, &item.record)
        .await;
      (index, result)
    });
  }

  let mut indexed = Vec::new();
  while let Some(joined) = tasks.join_next().await {
    match joined {
      Ok(pair) => indexed.push(pair),
      Err(err) => tracing::error!(%err, "pipeline task aborted"),
    }
  }
  indexed.sort_by_key(|(index, _)| *index);
  indexed.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    fakes::{
      InMemoryPublisher, InMemoryRepository, InMemoryStorage, issue_record,
      journal_record,
    },
    manager::MigrationManager,
  };

  #[tokio::test]
  async fn results_come_back_in_input_order() {
    let orchestrator = Arc::new(MigrationOrchestrator::new(
      MigrationManager::new(
        InMemoryRepository::default(),
        InMemoryStorage::default(),
        InMemoryPublisher::default(),
      ),
    ));
    let items = vec![
      BatchItem {
        kind:   "journal".into(),
        id:     "0001-0001".into(),
        record: journal_record(),
      },
      BatchItem {
        kind:   "bogus".into(),
        id:     "9999-9999".into(),
        record: journal_record(),
      },
      BatchItem {
        kind:   "issue".into(),
        id:     "0001-000120200002".into(),
        record: issue_record(),
      },
    ];

    let results = run_bounded(orchestrator, items, 2).await;
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "0001-0001");
    assert_eq!(results[1].id, "9999-9999");
    assert_eq!(results[2].id, "0001-000120200002");

    assert!(results[0].events().is_some());
    assert!(results[1].events().is_none(), "unknown kind is an error");
    assert!(results[2].events().is_some());
  }
}
