use tracing::warn;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::search::FullTextHits;
use crate::domain::entities::PostRecord;
use crate::domain::posts::{FULL_TEXT_RESULT_LIMIT, ensure_non_empty};

use super::service::PostService;
use super::types::{PostServiceError, TagSearchResult};

impl PostService {
    /// Cache-aside point read.
    pub async fn get_post(&self, id: i64) -> Result<PostRecord, PostServiceError> {
        if let Some(post) = self.snapshots.load(id).await {
            return Ok(post);
        }

        let post = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(PostServiceError::NotFound { id })?;

        self.snapshots.store(&post).await;
        Ok(post)
    }

    pub async fn list_posts(
        &self,
        request: PageRequest,
    ) -> Result<OffsetPage<PostRecord>, PostServiceError> {
        let total = self.reader.count_posts().await?;
        let posts = self.reader.list_posts(request).await?;
        Ok(OffsetPage::new(posts, request, total))
    }

    pub async fn search_by_tag(&self, tag: &str) -> Result<TagSearchResult, PostServiceError> {
        ensure_non_empty(tag, "tag")?;

        let posts = self.reader.find_by_tag(tag).await?;
        if posts.len() > self.settings.tag_search_warn_threshold {
            warn!(
                target = "scriven::posts",
                tag = tag,
                matches = posts.len(),
                threshold = self.settings.tag_search_warn_threshold,
                "tag search returned an unusually large result set"
            );
        }

        let count = posts.len() as u64;
        Ok(TagSearchResult { posts, count })
    }

    pub async fn full_text_search(&self, query: &str) -> Result<FullTextHits, PostServiceError> {
        ensure_non_empty(query, "q")?;
        let hits = self.search.full_text(query, FULL_TEXT_RESULT_LIMIT).await?;
        Ok(hits)
    }
}
