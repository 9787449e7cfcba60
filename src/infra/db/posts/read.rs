use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

use crate::application::pagination::PageRequest;
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

use super::super::{PostgresRepositories, map_sqlx_error};
use super::{POST_COLUMNS, PostRow};

const STREAM_ALL_POSTS_SQL: &str = concat!("SELECT ", post_columns!(), " FROM posts ORDER BY id");

impl PostgresRepositories {
    /// Every post in id order, for rebuilding the search index.
    pub fn stream_all_posts(&self) -> BoxStream<'_, Result<PostRecord, RepoError>> {
        let stream = sqlx::query_as::<_, PostRow>(STREAM_ALL_POSTS_SQL)
            .fetch(self.pool())
            .map(|row| match row {
                Ok(record) => Ok(PostRecord::from(record)),
                Err(err) => Err(map_sqlx_error(err)),
            });

        Box::pin(stream)
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<PostRecord>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(ids)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_posts(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_posts(&self, page: PageRequest) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(i64::from(page.limit()))
            .bind(Self::sql_offset(page.offset()))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE tags @> ARRAY[$1]::text[] \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(tag)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }
}
