//! Ingest command - index one document from disk

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{info, warn};

use crate::api::types::IngestSourceResponse;
use crate::config::{AppConfig, KnowledgeStoreBackend, VectorStoreBackend};
use crate::domain::ingestion::IngestRequest;
use crate::domain::knowledge::{EntryType, ScopeMetadata};

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// UTF-8 text file to index
    pub path: PathBuf,

    /// Source id; defaults to the file name
    #[arg(long)]
    pub source_id: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    /// Scope (entity) id the chunks belong to
    #[arg(long)]
    pub scope: Option<String>,

    #[arg(long = "type", default_value = "file-chunk")]
    pub entry_type: EntryType,
}

/// Ingest the file and print the result as JSON
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    warn_if_ephemeral(&config);

    let text = tokio::fs::read_to_string(&args.path).await?;
    let source_id = match args.source_id {
        Some(id) => id,
        None => default_source_id(&args.path)?,
    };

    let service = crate::build_knowledge_service(&config).await?;

    let mut scope = ScopeMetadata::default();
    scope.scope_id = args.scope;

    let title = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_id.clone());
    let request = IngestRequest::new(&source_id, text)
        .with_owner_opt(args.owner)
        .with_scope(scope)
        .with_entry_type(args.entry_type)
        .with_title(title);

    let result = service.ingest_file(request).await?;
    info!(source_id = %result.source_id, records = result.record_count(), "Ingestion finished");

    println!(
        "{}",
        serde_json::to_string_pretty(&IngestSourceResponse::from(result))?
    );

    Ok(())
}

fn default_source_id(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("cannot derive a source id from {}", path.display()))
}

fn warn_if_ephemeral(config: &AppConfig) {
    if config.vector_store.backend == VectorStoreBackend::InMemory
        || config.knowledge_store.backend == KnowledgeStoreBackend::InMemory
    {
        warn!("In-memory storage configured; ingested data is dropped when this command exits");
    }
}
