//! Question answering over a resource's stored chunks.

use docshard_llm::{LlmProvider, Message};

use crate::QdrantOps;
use crate::error::StoreError;
use crate::namespace::{ResourceId, collection_name};

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Use the following pieces of context \
to answer the question at the end. If you don't know the answer, just say that you don't know, \
don't try to make up an answer.\n----------------\n";

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question.
    pub top_k: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Embeds a question, searches the resource's collection, and asks the LLM
/// to answer from the retrieved context.
pub struct RetrievalChain<'a, P> {
    qdrant: &'a QdrantOps,
    provider: &'a P,
    config: RetrievalConfig,
    vector_size: u64,
}

impl<'a, P: LlmProvider> RetrievalChain<'a, P> {
    pub fn new(
        qdrant: &'a QdrantOps,
        provider: &'a P,
        config: RetrievalConfig,
        vector_size: u64,
    ) -> Self {
        Self {
            qdrant,
            provider,
            config,
            vector_size,
        }
    }

    /// Answer a question from the resource's stored chunks.
    ///
    /// Errors propagate to the caller; rendering them as a user-facing reply
    /// is the presentation layer's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding, search, or the chat call fails.
    pub async fn answer(
        &self,
        resource_id: ResourceId,
        question: &str,
    ) -> Result<String, StoreError> {
        let collection = collection_name(resource_id);
        self.qdrant
            .ensure_collection(&collection, self.vector_size)
            .await?;

        let vector = self.provider.embed(question).await?;
        let results = self
            .qdrant
            .search(&collection, vector, self.config.top_k, None)
            .await?;
        tracing::debug!(
            collection,
            hits = results.len(),
            "retrieved context for question"
        );

        let context: Vec<&str> = results
            .iter()
            .filter_map(|point| point.payload.get("content")?.as_str().map(String::as_str))
            .collect();

        let messages = compose_prompt(&context, question);
        let answer = self.provider.chat(&messages).await?;
        Ok(answer)
    }
}

fn compose_prompt(context: &[&str], question: &str) -> Vec<Message> {
    let system = format!("{SYSTEM_PROMPT}{}", context.join("\n\n"));
    vec![Message::system(system), Message::user(question)]
}
