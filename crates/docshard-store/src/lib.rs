//! Document chunking and namespace-isolated vector storage over Qdrant.

pub mod document;
pub mod error;
pub mod namespace;
pub mod pipeline;
pub mod qdrant_ops;
pub mod retrieval;

pub use error::StoreError;
pub use namespace::{ResourceId, collection_name};
pub use pipeline::{IngestReport, IngestionPipeline};
pub use qdrant_ops::QdrantOps;
pub use retrieval::{RetrievalChain, RetrievalConfig};
