use std::collections::HashMap;

use crate::domain::entities::PostRecord;
use crate::domain::posts::{RELATED_POSTS_LIMIT, distinct_tags};

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    /// Posts sharing at least one tag with `post`, in index ranking order.
    pub async fn related_posts(
        &self,
        post: &PostRecord,
    ) -> Result<Vec<PostRecord>, PostServiceError> {
        let tags = distinct_tags(&post.tags);
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .search
            .related_ids(&tags, post.id, RELATED_POSTS_LIMIT)
            .await?;

        let mut ids: Vec<i64> = Vec::with_capacity(candidates.len());
        for id in candidates {
            if id != post.id && !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids.truncate(RELATED_POSTS_LIMIT);

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.reader.find_by_ids(&ids).await?;
        Ok(in_rank_order(&ids, records))
    }

    pub async fn get_post_with_related(
        &self,
        id: i64,
    ) -> Result<(PostRecord, Vec<PostRecord>), PostServiceError> {
        let post = self.get_post(id).await?;
        let related = self.related_posts(&post).await?;
        Ok((post, related))
    }
}

fn in_rank_order(ids: &[i64], records: Vec<PostRecord>) -> Vec<PostRecord> {
    let mut by_id: HashMap<i64, PostRecord> =
        records.into_iter().map(|record| (record.id, record)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
