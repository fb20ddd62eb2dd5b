use std::collections::HashMap;

use testcontainers::GenericImage;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;

use docshard_llm::mock::MockProvider;
use docshard_store::document::types::DocumentMetadata;
use docshard_store::document::{Chunker, ChunkerConfig, ContentType, Document, LoaderRegistry};
use docshard_store::{
    IngestionPipeline, QdrantOps, ResourceId, RetrievalChain, RetrievalConfig, collection_name,
};

const QDRANT_GRPC_PORT: ContainerPort = ContainerPort::Tcp(6334);
const VECTOR_SIZE: u64 = 4;

fn qdrant_image() -> GenericImage {
    GenericImage::new("qdrant/qdrant", "v1.16.0")
        .with_wait_for(WaitFor::message_on_stdout("gRPC listening"))
        .with_exposed_port(QDRANT_GRPC_PORT)
}

async fn qdrant() -> (QdrantOps, testcontainers::ContainerAsync<GenericImage>) {
    let container = qdrant_image().start().await.unwrap();
    let port = container.get_host_port_ipv4(6334).await.unwrap();
    let ops = QdrantOps::new(&format!("http://127.0.0.1:{port}")).unwrap();
    (ops, container)
}

fn provider() -> MockProvider {
    MockProvider::default().with_embedding(vec![0.1, 0.2, 0.3, 0.4])
}

fn make_doc(content: &str) -> Document {
    Document {
        content: content.to_owned(),
        metadata: DocumentMetadata {
            source: "test.txt".to_owned(),
            content_type: "text".to_owned(),
            extra: HashMap::new(),
        },
    }
}

#[tokio::test]
async fn ensure_collection_is_idempotent() {
    let (qdrant, _container) = qdrant().await;
    let collection = collection_name(ResourceId::new_v4());

    qdrant
        .ensure_collection(&collection, VECTOR_SIZE)
        .await
        .unwrap();
    qdrant
        .ensure_collection(&collection, VECTOR_SIZE)
        .await
        .unwrap();
    assert!(qdrant.collection_exists(&collection).await.unwrap());
}

#[tokio::test]
async fn ensure_collection_tolerates_concurrent_callers() {
    let (qdrant, _container) = qdrant().await;
    let collection = collection_name(ResourceId::new_v4());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let qdrant = qdrant.clone();
            let collection = collection.clone();
            tokio::spawn(async move { qdrant.ensure_collection(&collection, VECTOR_SIZE).await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert!(qdrant.collection_exists(&collection).await.unwrap());
}

#[tokio::test]
async fn ingest_and_search_single_document() {
    let (qdrant, _container) = qdrant().await;
    let provider = provider();
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);
    let resource = ResourceId::new_v4();

    let report = pipeline
        .ingest(
            resource,
            &[make_doc("Hello world. This is a test document.")],
            ContentType::Text,
            None,
        )
        .await
        .unwrap();
    assert_eq!(report.chunks, 1);
    assert_eq!(report.collection, collection_name(resource));

    let results = qdrant
        .search(&report.collection, vec![0.1, 0.2, 0.3, 0.4], 10, None)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn ingest_empty_batch_creates_nothing() {
    let (qdrant, _container) = qdrant().await;
    let provider = provider();
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);
    let resource = ResourceId::new_v4();

    let report = pipeline
        .ingest(resource, &[], ContentType::Text, None)
        .await
        .unwrap();
    assert_eq!(report.chunks, 0);
    assert!(!qdrant.collection_exists(&report.collection).await.unwrap());
}

#[tokio::test]
async fn distinct_resources_are_isolated() {
    let (qdrant, _container) = qdrant().await;
    let provider = provider();
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);

    let tenant_a = ResourceId::new_v4();
    let tenant_b = ResourceId::new_v4();

    pipeline
        .ingest(tenant_a, &[make_doc("alpha content")], ContentType::Text, None)
        .await
        .unwrap();
    pipeline
        .ingest(tenant_b, &[make_doc("beta content")], ContentType::Text, None)
        .await
        .unwrap();

    let hits_a = qdrant
        .search(
            &collection_name(tenant_a),
            vec![0.1, 0.2, 0.3, 0.4],
            10,
            None,
        )
        .await
        .unwrap();
    assert_eq!(hits_a.len(), 1);
    assert_eq!(
        hits_a[0].payload.get("content").unwrap().as_str().unwrap(),
        "alpha content"
    );
}

#[tokio::test]
async fn ingested_chunks_carry_provenance_payload() {
    let (qdrant, _container) = qdrant().await;
    let provider = provider();
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);
    let resource = ResourceId::new_v4();

    let report = pipeline
        .ingest(
            resource,
            &[make_doc("Some content for payload verification.")],
            ContentType::Text,
            Some("english"),
        )
        .await
        .unwrap();

    let all = qdrant
        .scroll_all(&report.collection, "source")
        .await
        .unwrap();
    assert_eq!(all.len(), 1);

    let entry = all.values().next().unwrap();
    assert_eq!(entry.get("source").unwrap(), "test.txt");
    assert_eq!(entry.get("chunking_method").unwrap(), "recursive_character");
    assert_eq!(entry.get("detected_language").unwrap(), "english");
    assert!(entry.contains_key("content"));
    // integer/bool payload fields are present too; scroll_all only surfaces strings
}

#[tokio::test]
async fn load_and_ingest_markdown_file() {
    let (qdrant, _container) = qdrant().await;
    let provider = provider();
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);
    let registry = LoaderRegistry::with_defaults();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("readme.md");
    std::fs::write(&file, "# Hello\n\nThis is a test markdown file.").unwrap();

    let report = pipeline
        .load_and_ingest(&registry, &file, ResourceId::new_v4(), None)
        .await
        .unwrap();
    assert_eq!(report.chunks, 1);
}

#[tokio::test]
async fn retrieval_chain_answers_from_context() {
    let (qdrant, _container) = qdrant().await;
    let provider =
        MockProvider::with_responses(vec!["the answer".into()]).with_embedding(vec![
            0.1, 0.2, 0.3, 0.4,
        ]);
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);
    let resource = ResourceId::new_v4();

    pipeline
        .ingest(
            resource,
            &[make_doc("The capital of France is Paris.")],
            ContentType::Text,
            None,
        )
        .await
        .unwrap();

    let chain = RetrievalChain::new(&qdrant, &provider, RetrievalConfig::default(), VECTOR_SIZE);
    let answer = chain
        .answer(resource, "What is the capital of France?")
        .await
        .unwrap();
    assert_eq!(answer, "the answer");
}

#[tokio::test]
async fn drop_collection_removes_resource_data() {
    let (qdrant, _container) = qdrant().await;
    let provider = provider();
    let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
    let pipeline = IngestionPipeline::new(chunker, &qdrant, &provider, VECTOR_SIZE);
    let resource = ResourceId::new_v4();

    let report = pipeline
        .ingest(resource, &[make_doc("ephemeral")], ContentType::Text, None)
        .await
        .unwrap();
    assert!(qdrant.collection_exists(&report.collection).await.unwrap());

    qdrant.delete_collection(&report.collection).await.unwrap();
    assert!(!qdrant.collection_exists(&report.collection).await.unwrap());
}
