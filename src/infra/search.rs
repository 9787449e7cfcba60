//! OpenSearch-backed post index.

use async_trait::async_trait;
use opensearch::http::response::Response;
use opensearch::http::transport::Transport;
use opensearch::indices::{IndicesCreateParts, IndicesExistsParts};
use opensearch::{DeleteParts, IndexParts, OpenSearch, SearchParts};
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::application::search::{FullTextHits, SearchError, SearchIndex};
use crate::domain::entities::SearchDocument;

#[derive(Clone)]
pub struct OpenSearchIndex {
    client: OpenSearch,
    index: String,
}

impl OpenSearchIndex {
    pub fn connect(url: &str, index: impl Into<String>) -> Result<Self, SearchError> {
        let transport = Transport::single_node(url).map_err(SearchError::transport)?;
        Ok(Self {
            client: OpenSearch::new(transport),
            index: index.into(),
        })
    }

    async fn search<S>(&self, body: Value) -> Result<SearchBody<S>, SearchError>
    where
        S: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(body)
            .send()
            .await
            .map_err(SearchError::transport)?;

        ensure_success(response)
            .await?
            .json::<SearchBody<S>>()
            .await
            .map_err(SearchError::decode)
    }
}

#[async_trait]
impl SearchIndex for OpenSearchIndex {
    async fn ensure_index(&self) -> Result<(), SearchError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await
            .map_err(SearchError::transport)?;

        if exists.status_code().is_success() {
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(index_mapping())
            .send()
            .await
            .map_err(SearchError::transport)?;
        ensure_success(response).await?;

        info!(target = "scriven::search", index = %self.index, "search index created");
        Ok(())
    }

    async fn upsert(&self, document: &SearchDocument) -> Result<(), SearchError> {
        let id = document.id.to_string();
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index, &id))
            .body(document)
            .send()
            .await
            .map_err(SearchError::transport)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), SearchError> {
        let id = id.to_string();
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index, &id))
            .send()
            .await
            .map_err(SearchError::transport)?;

        if response.status_code().as_u16() == 404 {
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn full_text(&self, query: &str, limit: usize) -> Result<FullTextHits, SearchError> {
        let body = self
            .search::<SearchDocument>(full_text_query(query, limit))
            .await?;

        let total = body
            .hits
            .total
            .map(TotalHits::value)
            .unwrap_or(body.hits.hits.len() as u64);
        let documents = body
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| hit._source)
            .collect();

        Ok(FullTextHits {
            documents,
            total,
            took_ms: body.took,
        })
    }

    async fn related_ids(
        &self,
        tags: &[&str],
        exclude_id: i64,
        limit: usize,
    ) -> Result<Vec<i64>, SearchError> {
        let body = self
            .search::<IgnoredAny>(related_query(tags, exclude_id, limit))
            .await?;

        let ids = body
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| match hit._id.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(
                        target = "scriven::search",
                        document_id = %hit._id,
                        "ignoring hit with non-numeric document id"
                    );
                    None
                }
            })
            .collect();
        Ok(ids)
    }

    async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(SearchError::transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, SearchError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(SearchError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[derive(Deserialize)]
struct SearchBody<S> {
    #[serde(default)]
    took: u64,
    hits: SearchHits<S>,
}

#[derive(Deserialize)]
struct SearchHits<S> {
    total: Option<TotalHits>,
    hits: Vec<SearchHit<S>>,
}

#[derive(Deserialize)]
struct SearchHit<S> {
    _id: String,
    _source: Option<S>,
}

/// `hits.total` is an object on current servers and a bare number on legacy ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

impl TotalHits {
    fn value(self) -> u64 {
        match self {
            TotalHits::Object { value } | TotalHits::Count(value) => value,
        }
    }
}

pub(crate) fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "integer" },
                "title": { "type": "text", "analyzer": "standard" },
                "content": { "type": "text", "analyzer": "standard" },
                "tags": { "type": "keyword" }
            }
        }
    })
}

pub(crate) fn full_text_query(query: &str, limit: usize) -> Value {
    json!({
        "size": limit,
        "query": {
            "multi_match": {
                "query": query,
                "fields": ["title", "content"],
                "type": "best_fields",
                "fuzziness": "AUTO"
            }
        }
    })
}

pub(crate) fn related_query(tags: &[&str], exclude_id: i64, limit: usize) -> Value {
    let should: Vec<Value> = tags
        .iter()
        .map(|tag| json!({ "term": { "tags": tag } }))
        .collect();

    json!({
        "size": limit,
        "_source": false,
        "query": {
            "bool": {
                "should": should,
                "minimum_should_match": 1,
                "must_not": [
                    { "ids": { "values": [exclude_id.to_string()] } }
                ]
            }
        }
    })
}
