use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docshard_llm::openai::OpenAiProvider;
use docshard_store::document::{Chunker, ChunkerConfig, LoaderRegistry};
use docshard_store::{QdrantOps, ResourceId, RetrievalChain, RetrievalConfig};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docshard", version, about = "Chunk documents into namespace-isolated vector collections and query them")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "docshard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk, embed, and store a file under a resource.
    Ingest {
        /// File to ingest (txt, md, csv; pdf with the `pdf` feature).
        path: PathBuf,
        /// Resource identifier the documents belong to.
        #[arg(long)]
        resource: ResourceId,
        /// Detected language tag for language-aware chunking.
        #[arg(long)]
        language: Option<String>,
    },
    /// Ask a question against a resource's stored documents.
    Ask {
        /// Resource identifier to query.
        #[arg(long)]
        resource: ResourceId,
        question: String,
    },
    /// Delete a resource's collection and everything in it.
    Drop {
        #[arg(long)]
        resource: ResourceId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let qdrant = QdrantOps::new(&config.qdrant.url)
        .map_err(|e| anyhow::anyhow!("failed to connect to Qdrant: {e}"))?;
    let provider = OpenAiProvider::new(
        config.llm.api_key.clone().unwrap_or_default(),
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        Some(config.llm.embedding_model.clone()),
    );

    match cli.command {
        Command::Ingest {
            path,
            resource,
            language,
        } => {
            let chunker = Chunker::new(ChunkerConfig {
                chunk_size: config.chunking.chunk_size,
                chunk_overlap: config.chunking.chunk_overlap,
            })?;
            let pipeline = docshard_store::IngestionPipeline::new(
                chunker,
                &qdrant,
                &provider,
                config.qdrant.vector_size,
            );
            let registry = LoaderRegistry::with_defaults();

            let report = pipeline
                .load_and_ingest(&registry, &path, resource, language.as_deref())
                .await
                .with_context(|| format!("failed to ingest {}", path.display()))?;
            println!(
                "ingested {} chunks into {}",
                report.chunks, report.collection
            );
        }
        Command::Ask { resource, question } => {
            let chain = RetrievalChain::new(
                &qdrant,
                &provider,
                RetrievalConfig {
                    top_k: config.search.top_k,
                },
                config.qdrant.vector_size,
            );
            let answer = chain
                .answer(resource, &question)
                .await
                .context("failed to answer question")?;
            println!("{answer}");
        }
        Command::Drop { resource } => {
            let collection = docshard_store::collection_name(resource);
            qdrant
                .delete_collection(&collection)
                .await
                .map_err(|e| anyhow::anyhow!("failed to drop {collection}: {e}"))?;
            println!("dropped {collection}");
        }
    }

    Ok(())
}
