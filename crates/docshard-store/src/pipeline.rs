use qdrant_client::qdrant::PointStruct;
use serde_json::json;
use uuid::Uuid;

use docshard_llm::LlmProvider;

use crate::QdrantOps;
use crate::document::loader::LoaderRegistry;
use crate::document::{Chunk, Chunker, Document, DocumentError};
use crate::error::StoreError;
use crate::namespace::{ResourceId, collection_name};

/// Outcome of one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub collection: String,
    pub chunks: usize,
}

/// Splits, embeds, and stores documents into a resource's collection.
///
/// Holds borrowed service objects; construct the Qdrant client and provider
/// once at startup and pass them in.
pub struct IngestionPipeline<'a, P> {
    chunker: Chunker,
    qdrant: &'a QdrantOps,
    provider: &'a P,
    vector_size: u64,
}

impl<'a, P: LlmProvider> IngestionPipeline<'a, P> {
    pub fn new(chunker: Chunker, qdrant: &'a QdrantOps, provider: &'a P, vector_size: u64) -> Self {
        Self {
            chunker,
            qdrant,
            provider,
            vector_size,
        }
    }

    /// Ingest a batch of documents into the resource's collection:
    /// resolve namespace -> chunk -> embed -> ensure collection -> upsert.
    ///
    /// All-or-nothing over the batch: any chunking, embedding, or storage
    /// failure aborts before the upsert, so no partial batch is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if chunking, embedding, collection initialization, or
    /// the upsert fails.
    pub async fn ingest(
        &self,
        resource_id: ResourceId,
        documents: &[Document],
        content_type: crate::document::ContentType,
        language: Option<&str>,
    ) -> Result<IngestReport, StoreError> {
        let collection = collection_name(resource_id);

        let chunks = self.chunker.chunk(documents, content_type, language)?;
        if chunks.is_empty() {
            return Ok(IngestReport {
                collection,
                chunks: 0,
            });
        }

        let mut points = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let vector = self.provider.embed(&chunk.content).await?;
            let payload = QdrantOps::json_to_payload(chunk_payload(chunk, &collection))?;
            points.push(PointStruct::new(
                Uuid::new_v4().to_string(),
                vector,
                payload,
            ));
        }

        self.qdrant
            .ensure_collection(&collection, self.vector_size)
            .await?;

        let count = points.len();
        self.qdrant.upsert(&collection, points).await?;

        tracing::debug!(collection, chunks = count, "ingested documents");
        Ok(IngestReport {
            collection,
            chunks: count,
        })
    }

    /// Load a file through the registry and ingest it with the strategy for
    /// its detected content type.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, chunking, embedding, or storage fails.
    pub async fn load_and_ingest(
        &self,
        registry: &LoaderRegistry,
        path: &std::path::Path,
        resource_id: ResourceId,
        language: Option<&str>,
    ) -> Result<IngestReport, DocumentError> {
        let (content_type, documents) = registry.load(path).await?;
        let report = self
            .ingest(resource_id, &documents, content_type, language)
            .await?;
        Ok(report)
    }
}

fn chunk_payload(chunk: &Chunk, collection: &str) -> serde_json::Value {
    let mut payload = json!({
        "source": chunk.metadata.source,
        "content_type": chunk.metadata.content_type,
        "collection": collection,
        "content": chunk.content,
        "chunk_index": chunk.index,
        "chunk_length": chunk.info.length,
        "chunking_method": chunk.info.method.as_str(),
        "chunk_size": chunk.info.chunk_size,
        "chunk_overlap": chunk.info.chunk_overlap,
        "detected_language": chunk.info.language,
        "language_aware_chunking": chunk.info.language_aware,
    });
    if let Some(map) = payload.as_object_mut() {
        for (k, v) in &chunk.metadata.extra {
            map.entry(k.clone()).or_insert_with(|| json!(v));
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::types::{ChunkInfo, ChunkMethod, DocumentMetadata};
    use crate::document::{ChunkerConfig, ContentType};
    use docshard_llm::mock::MockProvider;

    fn make_document(content: &str) -> Document {
        Document {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source: "test".to_owned(),
                content_type: "text".to_owned(),
                extra: HashMap::new(),
            },
        }
    }

    fn make_chunk(content: &str) -> Chunk {
        Chunk {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source: "test".to_owned(),
                content_type: "text".to_owned(),
                extra: HashMap::from([("origin".to_owned(), "upload".to_owned())]),
            },
            index: 3,
            info: ChunkInfo {
                length: content.chars().count(),
                method: ChunkMethod::RecursiveCharacter,
                chunk_size: 1000,
                chunk_overlap: 200,
                language: "unknown".to_owned(),
                language_aware: false,
            },
        }
    }

    #[test]
    fn payload_carries_provenance() {
        let payload = chunk_payload(&make_chunk("hello"), "resource_x_documents");
        assert_eq!(payload["chunk_index"], 3);
        assert_eq!(payload["chunking_method"], "recursive_character");
        assert_eq!(payload["chunk_length"], 5);
        assert_eq!(payload["detected_language"], "unknown");
        assert_eq!(payload["language_aware_chunking"], false);
        assert_eq!(payload["collection"], "resource_x_documents");
        assert_eq!(payload["origin"], "upload");
    }

    #[test]
    fn payload_extra_does_not_override_core_fields() {
        let mut chunk = make_chunk("hello");
        chunk
            .metadata
            .extra
            .insert("content".to_owned(), "spoofed".to_owned());
        let payload = chunk_payload(&chunk, "c");
        assert_eq!(payload["content"], "hello");
    }

    #[tokio::test]
    async fn embedding_error_aborts_before_upsert() {
        // Unreachable Qdrant; the embed failure must surface first.
        let qdrant = QdrantOps::new("http://127.0.0.1:1").unwrap();
        let provider = MockProvider::failing();
        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, 4);

        let result = pipeline
            .ingest(
                ResourceId::new_v4(),
                &[make_document("some content to embed")],
                ContentType::Text,
                None,
            )
            .await;
        assert!(matches!(result, Err(StoreError::Llm(_))));
    }
}
