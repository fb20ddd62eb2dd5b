mod csv;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

pub use csv::CsvLoader;
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use text::TextLoader;

use std::collections::HashMap;
use std::path::Path;

use super::{ContentType, Document, DocumentError, DocumentLoader};

/// One dispatch point from content type to extraction implementation.
pub struct LoaderRegistry {
    loaders: HashMap<ContentType, Box<dyn DocumentLoader>>,
}

impl LoaderRegistry {
    /// Registry with the built-in loaders: text/markdown, CSV, and PDF when
    /// the `pdf` feature is enabled.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            loaders: HashMap::new(),
        };
        let text: Box<dyn DocumentLoader> = Box::new(TextLoader::default());
        registry.loaders.insert(ContentType::Text, text);
        registry
            .loaders
            .insert(ContentType::Markdown, Box::new(TextLoader::default()));
        registry
            .loaders
            .insert(ContentType::Csv, Box::new(CsvLoader::default()));
        #[cfg(feature = "pdf")]
        registry
            .loaders
            .insert(ContentType::Pdf, Box::new(PdfLoader::default()));
        registry
    }

    pub fn register(&mut self, content_type: ContentType, loader: Box<dyn DocumentLoader>) {
        self.loaders.insert(content_type, loader);
    }

    #[must_use]
    pub fn get(&self, content_type: ContentType) -> Option<&dyn DocumentLoader> {
        self.loaders.get(&content_type).map(AsRef::as_ref)
    }

    /// Classify a path by its extension.
    #[must_use]
    pub fn content_type_of(path: &Path) -> ContentType {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(ContentType::Unknown, ContentType::from_extension)
    }

    /// Load a file with the loader registered for its extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] when no loader is
    /// registered for the path's content type, or the loader's own error.
    pub async fn load(&self, path: &Path) -> Result<(ContentType, Vec<Document>), DocumentError> {
        let content_type = Self::content_type_of(path);
        let loader = self.get(content_type).ok_or_else(|| {
            DocumentError::UnsupportedFormat(path.display().to_string())
        })?;
        let documents = loader.load(path).await?;
        Ok((content_type, documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_text_markdown_csv() {
        let registry = LoaderRegistry::with_defaults();
        assert!(registry.get(ContentType::Text).is_some());
        assert!(registry.get(ContentType::Markdown).is_some());
        assert!(registry.get(ContentType::Csv).is_some());
        assert!(registry.get(ContentType::Docx).is_none());
    }

    #[tokio::test]
    async fn unsupported_extension_is_explicit_error() {
        let registry = LoaderRegistry::with_defaults();
        let result = registry.load(Path::new("report.docx")).await;
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat(_))));
    }

    #[test]
    fn content_type_of_path() {
        assert_eq!(
            LoaderRegistry::content_type_of(Path::new("a/b/notes.md")),
            ContentType::Markdown
        );
        assert_eq!(
            LoaderRegistry::content_type_of(Path::new("data")),
            ContentType::Unknown
        );
    }
}
