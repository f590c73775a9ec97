//! Atomic ingestion pipeline

use std::sync::Arc;

use crate::domain::embedding::Embedder;
use crate::domain::ingestion::{
    Chunk, ChunkingStrategy, IngestRequest, IngestionConfig, IngestionResult,
};
use crate::domain::vector::{VectorRecord, VectorStore};
use crate::domain::DomainError;

/// Chunks, embeds and indexes one source as a single unit
///
/// Prior records for the source are replaced. Batches are embedded and inserted
/// in order; any failure removes everything written for the source and the
/// original error is returned.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    chunker: Arc<dyn ChunkingStrategy>,
    embedder: Embedder,
    store: Arc<dyn VectorStore>,
    config: IngestionConfig,
}

impl IngestionPipeline {
    pub fn new(
        chunker: Arc<dyn ChunkingStrategy>,
        embedder: Embedder,
        store: Arc<dyn VectorStore>,
        config: IngestionConfig,
    ) -> Result<Self, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        Ok(Self {
            chunker,
            embedder,
            store,
            config,
        })
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestionResult, DomainError> {
        request.validate()?;
        let source_id = request.source_id.as_str();

        let chunks = self
            .chunker
            .chunk(&request.text, &self.config.chunking)
            .map_err(|e| DomainError::ingestion(source_id, e.to_string()))?;

        if chunks.is_empty() {
            return Err(DomainError::ingestion(source_id, "no content to index"));
        }

        let replaced = self
            .store
            .delete_by_source(source_id)
            .await
            .map_err(|e| DomainError::ingestion(source_id, e.to_string()))?;

        match self.write_batches(&request, &chunks).await {
            Ok((records, batches)) => {
                tracing::info!(
                    source_id = %source_id,
                    chunker = self.chunker.name(),
                    records = records.len(),
                    batches,
                    replaced,
                    "Ingested source"
                );

                Ok(IngestionResult {
                    source_id: request.source_id.clone(),
                    records_created: records.len(),
                    batches,
                    records,
                })
            }
            Err(e) => {
                tracing::warn!(
                    source_id = %source_id,
                    error = %e,
                    "Ingestion failed, rolling back source"
                );
                self.rollback(source_id).await;
                Err(DomainError::ingestion(source_id, e.to_string()))
            }
        }
    }

    async fn write_batches(
        &self,
        request: &IngestRequest,
        chunks: &[Chunk],
    ) -> Result<(Vec<VectorRecord>, usize), DomainError> {
        let mut written = Vec::with_capacity(chunks.len());
        let mut batches = 0;

        for batch in chunks.chunks(self.config.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;

            let records: Vec<VectorRecord> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| build_record(request, chunk, vector))
                .collect();

            self.store.insert_batch(records.clone()).await?;
            batches += 1;

            tracing::debug!(
                source_id = %request.source_id,
                batch = batches,
                size = records.len(),
                "Committed batch"
            );

            written.extend(records);
        }

        Ok((written, batches))
    }

    /// Best effort; a failure here is logged and never replaces the original error
    async fn rollback(&self, source_id: &str) {
        match self.store.delete_by_source(source_id).await {
            Ok(removed) => {
                tracing::warn!(source_id = %source_id, removed, "Rolled back partial ingestion");
            }
            Err(e) => {
                tracing::error!(
                    source_id = %source_id,
                    error = %e,
                    "Rollback failed; source may be partially indexed"
                );
            }
        }
    }
}

fn build_record(request: &IngestRequest, chunk: &Chunk, embedding: Vec<f32>) -> VectorRecord {
    let mut metadata = request.scope.to_json_map();
    metadata.extend(chunk.metadata.to_json_map());
    metadata.insert("source_id".to_string(), serde_json::json!(request.source_id));

    let title = request
        .title
        .clone()
        .unwrap_or_else(|| request.source_id.clone());

    VectorRecord::new(&request.source_id, chunk.index(), &chunk.content, embedding)
        .with_owner(request.owner_id.clone())
        .with_scope_id(request.scope.scope_id.clone())
        .with_entry_type(request.entry_type)
        .with_title(title)
        .with_metadata(metadata)
}
