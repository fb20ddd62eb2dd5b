use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub source: String,
    pub content_type: String,
    pub extra: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Provenance recorded on every chunk by the chunker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChunkInfo {
    /// Resultant content length in characters.
    pub length: usize,
    pub method: ChunkMethod,
    /// Configured maximum chunk size the chunker ran with.
    pub chunk_size: usize,
    /// Configured overlap the chunker ran with.
    pub chunk_overlap: usize,
    /// Detected language tag, or "unknown".
    pub language: String,
    /// Whether language-specific separators were applied.
    pub language_aware: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkMethod {
    RecursiveCharacter,
    Paragraph,
}

impl ChunkMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecursiveCharacter => "recursive_character",
            Self::Paragraph => "paragraph",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub content: String,
    /// Metadata inherited from the source document.
    pub metadata: DocumentMetadata,
    /// Zero-based index within the source document.
    pub index: usize,
    pub info: ChunkInfo,
}
