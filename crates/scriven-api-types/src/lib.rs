//! Request and response shapes for the Scriven HTTP API.
//!
//! Response envelopes are generic over their item type so the server can plug in its
//! own records while clients deserialize into whatever mirrors them.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PostUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_tags_patch",
        skip_serializing_if = "TagsPatch::is_unchanged"
    )]
    pub tags: TagsPatch,
}

/// Tag instruction carried by an update.
///
/// On the wire: field absent or `null` keeps the current tags, `[]` clears them, and a
/// non-empty array replaces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagsPatch {
    #[default]
    Unchanged,
    Clear,
    Replace(Vec<String>),
}

impl TagsPatch {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, TagsPatch::Unchanged)
    }

    /// Resolve the patch against the tags currently stored.
    pub fn apply(self, current: Vec<String>) -> Vec<String> {
        match self {
            TagsPatch::Unchanged => current,
            TagsPatch::Clear => Vec::new(),
            TagsPatch::Replace(tags) => tags,
        }
    }
}

impl From<Option<Vec<String>>> for TagsPatch {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            None => TagsPatch::Unchanged,
            Some(tags) if tags.is_empty() => TagsPatch::Clear,
            Some(tags) => TagsPatch::Replace(tags),
        }
    }
}

impl Serialize for TagsPatch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            TagsPatch::Unchanged => serializer.serialize_none(),
            TagsPatch::Clear => Vec::<String>::new().serialize(serializer),
            TagsPatch::Replace(tags) => tags.serialize(serializer),
        }
    }
}

fn deserialize_tags_patch<'de, D>(deserializer: D) -> Result<TagsPatch, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(TagsPatch::from(raw))
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TagQuery {
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostsResponse<P> {
    pub posts: Vec<P>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActivityLogsResponse<L> {
    pub logs: Vec<L>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagSearchResponse<P> {
    pub posts: Vec<P>,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse<D> {
    pub posts: Vec<D>,
    pub total: u64,
    /// Query latency reported by the index, in milliseconds.
    pub took: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostWithRelated<P> {
    pub post: P,
    pub related_posts: Vec<P>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub cache: String,
    pub search: String,
}
