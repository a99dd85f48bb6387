//! `folio` — driver for the legacy record migration pipeline.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite entity store, and runs discovery or migration over a legacy
//! update window. Results are printed as JSON lines on stdout; progress and
//! summaries go to stderr via tracing.

mod provider;
mod publisher;
mod storage;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use folio_core::{
  ids::classify_pid,
  store::{RecordProvider as _, Repository as _},
};
use folio_pipeline::{
  BatchItem, GuardDecision, IdempotencyGuard, MigrationManager,
  MigrationOrchestrator, PipelineOutcome, PipelineResult, run_bounded,
};
use folio_store_sqlite::SqliteStore;
use provider::JsonlProvider;
use publisher::JsonPublisher;
use serde::Deserialize;
use storage::FsStorage;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Legacy bibliographic record migration")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List identifiers changed in the window and mark the changed ones
  /// `PENDING_MIGRATION`, without running any stage.
  Discover {
    /// Window start, 8-digit `YYYYMMDD`.
    #[arg(long)]
    from: String,
    /// Window end, 8-digit `YYYYMMDD` (inclusive).
    #[arg(long)]
    to:   String,
  },
  /// Run the full migration pipeline over the window.
  Migrate {
    #[arg(long)]
    from: String,
    #[arg(long)]
    to:   String,
  },
  /// List the entities currently in one migration status.
  Status {
    /// One of PENDING_MIGRATION, ISIS_METADATA_MIGRATED, MIGRATED_FILES,
    /// PUBLISHED_INCOMPLETE or PUBLISHED_COMPLETE.
    #[arg(long)]
    status: String,
  },
}

/// Shape of the TOML configuration file; every path is required and a
/// missing one aborts the run before any identifier is processed.
#[derive(Debug, Clone, Deserialize)]
struct Settings {
  /// SQLite file of the normalized entity store.
  store_path:   PathBuf,
  /// JSON-lines export of the legacy database.
  source_path:  PathBuf,
  /// Root directory of the files storage.
  storage_root: PathBuf,
  /// Directory the destination payloads are written to.
  publish_root: PathBuf,
  /// Maximum per-identifier pipelines in flight.
  #[serde(default = "default_concurrency")]
  concurrency:  usize,
}

fn default_concurrency() -> usize { 8 }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FOLIO"))
    .build()
    .context("failed to read config file")?;
  let settings: Settings = settings
    .try_deserialize()
    .context("incomplete configuration")?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", settings.store_path)
    })?;
  match cli.command {
    Command::Discover { from, to } => {
      let provider = load_provider(&settings)?;
      discover(&store, &provider, &from, &to).await?;
    }
    Command::Migrate { from, to } => {
      let provider = load_provider(&settings)?;
      migrate(settings, store, provider, &from, &to).await?;
    }
    Command::Status { status } => {
      list_status(&store, &status).await?;
    }
  }
  Ok(())
}

fn load_provider(settings: &Settings) -> anyhow::Result<JsonlProvider> {
  let provider = JsonlProvider::load(&settings.source_path)?;
  tracing::info!(entries = provider.len(), "loaded legacy source");
  Ok(provider)
}

/// One discovery decision, printed per identifier.
#[derive(serde::Serialize)]
struct Discovery<'a> {
  id:       &'a str,
  kind:     Option<&'static str>,
  decision: &'static str,
}

async fn discover(
  store: &SqliteStore,
  provider: &JsonlProvider,
  from: &str,
  to: &str,
) -> anyhow::Result<()> {
  let guard = IdempotencyGuard::new(store);
  let stamps = provider.list_identifiers(from, to).await?;
  let mut marked = 0usize;

  for stamp in &stamps {
    let Some(kind) = classify_pid(&stamp.id) else {
      tracing::warn!(id = %stamp.id, "unclassifiable pid");
      print_line(&Discovery {
        id:       &stamp.id,
        kind:     None,
        decision: "unclassified",
      })?;
      continue;
    };
    let decision = guard.check(&stamp.id, kind, &stamp.updated_at).await?;
    let decision = match decision {
      GuardDecision::Skip => "skip",
      GuardDecision::Done(_) => {
        marked += 1;
        "done"
      }
    };
    print_line(&Discovery {
      id: &stamp.id,
      kind: Some(kind.as_str()),
      decision,
    })?;
  }

  tracing::info!(total = stamps.len(), marked, "discovery finished");
  Ok(())
}

async fn migrate(
  settings: Settings,
  store: SqliteStore,
  provider: JsonlProvider,
  from: &str,
  to: &str,
) -> anyhow::Result<()> {
  let guard = IdempotencyGuard::new(&store);
  let stamps = provider.list_identifiers(from, to).await?;

  let mut items = Vec::new();
  let mut unclassified = 0usize;
  for stamp in stamps {
    let Some(kind) = classify_pid(&stamp.id) else {
      tracing::warn!(id = %stamp.id, "unclassifiable pid");
      print_line(&unclassified_result(stamp.id))?;
      unclassified += 1;
      continue;
    };
    if matches!(
      guard.check(&stamp.id, kind, &stamp.updated_at).await?,
      GuardDecision::Skip
    ) {
      continue;
    }
    let record = provider.fetch_records(&stamp.id).await?;
    items.push(BatchItem {
      kind: kind.as_str().to_string(),
      id: stamp.id,
      record,
    });
  }
  tracing::info!(items = items.len(), "running migration");

  let orchestrator = Arc::new(MigrationOrchestrator::new(
    MigrationManager::new(
      store.clone(),
      FsStorage::new(settings.storage_root),
      JsonPublisher::new(settings.publish_root),
    ),
  ));
  let results =
    run_bounded(orchestrator, items, settings.concurrency).await;

  let mut failed = 0usize;
  for result in &results {
    let stage_errors = match &result.outcome {
      PipelineOutcome::Events(events) => {
        events.iter().filter(|e| e.is_error()).count()
      }
      PipelineOutcome::Error(_) => {
        failed += 1;
        0
      }
    };
    if stage_errors > 0 {
      tracing::warn!(id = %result.id, stage_errors, "pipeline had failures");
    }
    print_line(result)?;
  }
  tracing::info!(
    total = results.len() + unclassified,
    undispatched = failed + unclassified,
    "migration finished"
  );
  Ok(())
}

/// The per-identifier error result emitted for a pid whose width matches no
/// entity kind; it joins the migrate output stream like any other failure.
fn unclassified_result(id: String) -> PipelineResult {
  PipelineResult {
    id,
    outcome: PipelineOutcome::Error("unclassifiable pid".to_string()),
  }
}

async fn list_status(store: &SqliteStore, status: &str) -> anyhow::Result<()> {
  let status: folio_core::entity::Status = status.parse()?;
  let entities = store.list_by_status(status).await?;

  #[derive(serde::Serialize)]
  struct Line<'a> {
    id:   &'a str,
    kind: &'static str,
  }
  for entity in &entities {
    print_line(&Line {
      id:   &entity.id,
      kind: entity.kind().as_str(),
    })?;
  }
  tracing::info!(
    total = entities.len(),
    status = status.as_str(),
    "status listing finished"
  );
  Ok(())
}

fn print_line<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string(value)?);
  Ok(())
}
