/// Elasticsearch integration: client wrapper and transactional outbox.
///
/// The index holds one document per post, carrying only the searchable
/// fields. Writes reach the index exclusively through the outbox worker;
/// request handlers never talk to Elasticsearch directly except to query.
use elasticsearch::{
    http::transport::{BuildError, SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    DeleteParts, Elasticsearch, IndexParts, SearchParts,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::models::Post;

pub mod outbox;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid Elasticsearch URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build transport: {0}")]
    TransportBuild(#[from] BuildError),
    #[error("transport error: {0}")]
    Transport(#[from] elasticsearch::Error),
    #[error("search request failed with status {0}")]
    BadStatus(u16),
}

/// Searchable field payload for a post document
pub fn post_document(post: &Post) -> serde_json::Value {
    json!({ "body": post.body })
}

#[derive(Clone)]
pub struct SearchClient {
    client: Elasticsearch,
    post_index: String,
}

impl SearchClient {
    pub async fn new(url: &str, post_index: &str) -> Result<Self, SearchError> {
        let parsed = Url::parse(url)?;
        let pool = SingleNodeConnectionPool::new(parsed);
        let transport = TransportBuilder::new(pool).build()?;
        let client = Elasticsearch::new(transport);

        let instance = Self {
            client,
            post_index: post_index.to_string(),
        };

        instance.ensure_post_index().await?;

        Ok(instance)
    }

    pub fn post_index(&self) -> &str {
        &self.post_index
    }

    async fn ensure_post_index(&self) -> Result<(), SearchError> {
        let exists_response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.post_index.as_str()]))
            .send()
            .await?;

        if exists_response.status_code().is_success() {
            return Ok(());
        }

        let body = json!({
            "mappings": {
                "properties": {
                    "body": { "type": "text" }
                }
            }
        });

        self.client
            .indices()
            .create(IndicesCreateParts::Index(&self.post_index))
            .body(body)
            .send()
            .await?;

        Ok(())
    }

    /// Index (or re-index) a document under `index`/`id`
    pub async fn index_document(
        &self,
        index: &str,
        id: Uuid,
        payload: &serde_json::Value,
    ) -> Result<(), SearchError> {
        self.client
            .index(IndexParts::IndexId(index, id.to_string().as_str()))
            .body(payload)
            .send()
            .await?;

        Ok(())
    }

    /// Remove a document from `index`
    pub async fn delete_document(&self, index: &str, id: Uuid) -> Result<(), SearchError> {
        self.client
            .delete(DeleteParts::IndexId(index, id.to_string().as_str()))
            .send()
            .await?;

        Ok(())
    }

    /// Full-text search over post bodies.
    ///
    /// Returns document ids in relevance order plus the total hit count;
    /// the caller resolves ids against Postgres.
    pub async fn search_posts(
        &self,
        query: &str,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Uuid>, i64), SearchError> {
        let size = per_page.clamp(1, 100);
        let from = (page.max(1) - 1) * size;

        let response = self
            .client
            .search(SearchParts::Index(&[self.post_index.as_str()]))
            .from(from)
            .size(size)
            .body(json!({
                "query": {
                    "multi_match": { "query": query, "fields": ["*"] }
                }
            }))
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchError::BadStatus(status.as_u16()));
        }

        let search_response: SearchResponse = response.json().await?;
        let ids = search_response
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| Uuid::parse_str(&hit.id).ok())
            .collect();

        Ok((ids, search_response.hits.total.value))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: InnerHits,
}

#[derive(Debug, Deserialize)]
struct InnerHits {
    total: TotalHits,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: i64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_post_document_carries_searchable_fields_only() {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            body: "hello world".to_string(),
            language: Some("eng".to_string()),
            created_at: Utc::now(),
        };

        let doc = post_document(&post);
        assert_eq!(doc, json!({ "body": "hello world" }));
    }

    #[test]
    fn test_search_response_parsing() {
        let raw = json!({
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_id": "7b6c3b3e-0f3a-4df0-9d5c-111111111111", "_score": 1.2 },
                    { "_id": "7b6c3b3e-0f3a-4df0-9d5c-222222222222", "_score": 0.8 }
                ]
            }
        });

        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.hits.total.value, 2);
        assert_eq!(parsed.hits.hits.len(), 2);
    }
}
