use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;

use super::super::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata,
};

/// Loads a CSV file as one document per record, each rendered as
/// `header: value` lines so row fields stay together through chunking.
pub struct CsvLoader {
    pub max_file_size: u64,
    pub delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            delimiter: b',',
        }
    }
}

impl DocumentLoader for CsvLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        let delimiter = self.delimiter;
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;

            let meta = tokio::fs::metadata(&path).await?;
            if meta.len() > max_size {
                return Err(DocumentError::FileTooLarge(meta.len()));
            }

            let source = path.display().to_string();
            let raw = tokio::fs::read_to_string(&path).await?;

            let mut reader = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .flexible(true)
                .from_reader(raw.as_bytes());
            let headers = reader.headers()?.clone();

            let mut documents = Vec::new();
            for (row, record) in reader.records().enumerate() {
                let record = record?;
                let content: String = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, value)| format!("{header}: {value}"))
                    .collect::<Vec<_>>()
                    .join("\n");

                let mut extra = HashMap::new();
                extra.insert("row".to_owned(), row.to_string());

                documents.push(Document {
                    content,
                    metadata: DocumentMetadata {
                        source: source.clone(),
                        content_type: "csv".to_owned(),
                        extra,
                    },
                });
            }

            Ok(documents)
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }
}
