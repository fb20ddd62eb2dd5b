#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Qdrant error: {0}")]
    Qdrant(#[from] Box<qdrant_client::QdrantError>),

    #[error("collection initialization failed for '{collection}': {source}")]
    CollectionInit {
        collection: String,
        #[source]
        source: Box<qdrant_client::QdrantError>,
    },

    #[error("chunking failed: {0}")]
    Chunk(#[from] crate::document::chunker::ChunkError),

    #[error("LLM error: {0}")]
    Llm(#[from] docshard_llm::LlmError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
