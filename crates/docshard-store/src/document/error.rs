#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("chunking failed: {0}")]
    Chunk(#[from] super::chunker::ChunkError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] docshard_llm::LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] crate::error::StoreError),
}
