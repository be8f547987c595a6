//! Vector database registration and RAG document ingestion.

use super::StackClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// A registered vector database, as reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorDbInfo {
    pub identifier: String,
    #[serde(default)]
    pub embedding_model: String,
    #[serde(default)]
    pub embedding_dimension: u32,
    #[serde(default)]
    pub provider_id: String,
}

#[derive(Deserialize)]
struct VectorDbListResponse {
    data: Vec<VectorDbInfo>,
}

#[derive(Serialize)]
struct VectorDbRegisterRequest<'a> {
    vector_db_id: &'a str,
    embedding_model: &'a str,
    embedding_dimension: u32,
    provider_id: &'a str,
}

/// A document handed to the RAG tool for chunking and indexing. The
/// content may be inline text or a URL the server fetches itself.
#[derive(Debug, Clone, Serialize)]
pub struct RagDocument {
    pub document_id: String,
    pub content: String,
    pub mime_type: String,
    pub metadata: Map<String, Value>,
}

impl RagDocument {
    /// Create a document with empty metadata.
    pub fn new(
        document_id: impl Into<String>,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            content: content.into(),
            mime_type: mime_type.into(),
            metadata: Map::new(),
        }
    }
}

#[derive(Serialize)]
struct RagInsertRequest<'a> {
    documents: &'a [RagDocument],
    vector_db_id: &'a str,
    chunk_size_in_tokens: u32,
}

impl StackClient {
    /// List registered vector databases.
    pub async fn list_vector_dbs(&self) -> Result<Vec<VectorDbInfo>> {
        let response = self
            .http()
            .get(self.endpoint("/v1/vector-dbs")?)
            .send()
            .await?;
        let body: VectorDbListResponse = Self::check(response).await?.json().await?;
        Ok(body.data)
    }

    /// Register a vector database backed by the given provider.
    pub async fn register_vector_db(
        &self,
        vector_db_id: &str,
        embedding_model: &str,
        embedding_dimension: u32,
        provider_id: &str,
    ) -> Result<()> {
        info!(vector_db_id, provider_id, "Registering vector database");
        let request = VectorDbRegisterRequest {
            vector_db_id,
            embedding_model,
            embedding_dimension,
            provider_id,
        };
        let response = self
            .http()
            .post(self.endpoint("/v1/vector-dbs")?)
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Unregister a vector database.
    pub async fn unregister_vector_db(&self, vector_db_id: &str) -> Result<()> {
        info!(vector_db_id, "Unregistering vector database");
        let response = self
            .http()
            .delete(self.endpoint(&format!("/v1/vector-dbs/{}", vector_db_id))?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Ingest documents into a vector database via the server's RAG tool.
    pub async fn rag_insert(
        &self,
        documents: &[RagDocument],
        vector_db_id: &str,
        chunk_size_in_tokens: u32,
    ) -> Result<()> {
        info!(
            vector_db_id,
            documents = documents.len(),
            chunk_size_in_tokens,
            "Inserting documents"
        );
        let request = RagInsertRequest {
            documents,
            vector_db_id,
            chunk_size_in_tokens,
        };
        let response = self
            .http()
            .post(self.endpoint("/v1/tool-runtime/rag-tool/insert")?)
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
