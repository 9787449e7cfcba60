use tracing::info;

use crate::application::indexing::IndexTask;
use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::entities::{PostRecord, SearchDocument};
use crate::domain::posts::{ensure_non_empty, ensure_storable, ensure_storable_tags, overlay_text};

use super::service::PostService;
use super::types::{CreatePostCommand, PostServiceError, UpdatePostCommand};

impl PostService {
    pub async fn create_post(
        &self,
        command: CreatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.content, "content")?;
        ensure_storable_tags(&command.tags)?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                title: command.title,
                content: command.content,
                tags: command.tags,
            })
            .await?;

        info!(target = "scriven::posts", post_id = post.id, "post created");

        self.indexer
            .dispatch(IndexTask::Upsert(SearchDocument::from(&post)))
            .await;

        Ok(post)
    }

    pub async fn update_post(
        &self,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        let id = command.id;
        if let Some(title) = &command.title {
            ensure_storable(title, "title")?;
        }
        if let Some(content) = &command.content {
            ensure_storable(content, "content")?;
        }

        let current = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(PostServiceError::NotFound { id })?;

        let params = UpdatePostParams {
            id,
            title: overlay_text(current.title, command.title),
            content: overlay_text(current.content, command.content),
            tags: command.tags.apply(current.tags),
        };
        ensure_storable_tags(&params.tags)?;

        let post = self
            .writer
            .update_post(params)
            .await
            .map_err(|err| PostServiceError::for_post(id, err))?;

        self.snapshots.invalidate(id).await;
        self.indexer
            .dispatch(IndexTask::Upsert(SearchDocument::from(&post)))
            .await;

        info!(target = "scriven::posts", post_id = id, "post updated");
        Ok(post)
    }

    /// Delete a post and its activity trail; returns the removed record.
    pub async fn delete_post(&self, id: i64) -> Result<PostRecord, PostServiceError> {
        let post = self
            .writer
            .delete_post(id)
            .await
            .map_err(|err| PostServiceError::for_post(id, err))?;

        self.snapshots.invalidate(id).await;
        self.indexer.dispatch(IndexTask::Remove(id)).await;

        info!(target = "scriven::posts", post_id = id, "post deleted");
        Ok(post)
    }
}
