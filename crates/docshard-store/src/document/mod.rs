pub mod chunker;
pub mod error;
pub mod loader;
pub mod types;

pub use chunker::{ChunkError, Chunker, ChunkerConfig};
pub use error::DocumentError;
pub use loader::{CsvLoader, LoaderRegistry, TextLoader};
pub use types::{Chunk, ChunkInfo, ChunkMethod, Document, DocumentMetadata};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Content classification driving chunking strategy and loader selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Pdf,
    Docx,
    Excel,
    Text,
    Csv,
    Markdown,
    Unknown,
}

impl ContentType {
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "xlsx" | "xls" => Self::Excel,
            "txt" => Self::Text,
            "csv" => Self::Csv,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Excel => "excel",
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
            Self::Unknown => "unknown",
        }
    }
}

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(ContentType::from_extension("pdf"), ContentType::Pdf);
        assert_eq!(ContentType::from_extension("PDF"), ContentType::Pdf);
        assert_eq!(ContentType::from_extension("xlsx"), ContentType::Excel);
        assert_eq!(ContentType::from_extension("md"), ContentType::Markdown);
        assert_eq!(ContentType::from_extension("bin"), ContentType::Unknown);
    }
}
