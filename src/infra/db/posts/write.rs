use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::types::ActivityAction;

use super::super::{PostgresRepositories, map_sqlx_error};
use super::{POST_COLUMNS, PostRow};

async fn record_activity(
    conn: &mut PgConnection,
    action: ActivityAction,
    post_id: Option<i64>,
    logged_at: OffsetDateTime,
) -> Result<(), RepoError> {
    sqlx::query("INSERT INTO activity_logs (action, post_id, logged_at) VALUES ($1, $2, $3)")
        .bind(action.as_str())
        .bind(post_id)
        .bind(logged_at)
        .execute(conn)
        .await
        .map_err(in_transaction)?;
    Ok(())
}

/// Constraint failures inside a multi-statement write abort the whole
/// transaction; callers see them as storage failures.
fn in_transaction(err: sqlx::Error) -> RepoError {
    match map_sqlx_error(err) {
        RepoError::Integrity { message } => RepoError::Persistence(message),
        other => other,
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            content,
            tags,
        } = params;

        let now = OffsetDateTime::now_utc();
        let mut tx = self.begin().await.map_err(in_transaction)?;

        let sql = format!(
            "INSERT INTO posts (title, content, tags, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(title)
            .bind(content)
            .bind(tags)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(in_transaction)?;

        record_activity(&mut tx, ActivityAction::NewPost, Some(row.id), now).await?;

        tx.commit().await.map_err(in_transaction)?;
        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            content,
            tags,
        } = params;

        let sql = format!(
            "UPDATE posts SET title = $2, content = $3, tags = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(title)
            .bind(content)
            .bind(tags)
            .bind(OffsetDateTime::now_utc())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: i64) -> Result<PostRecord, RepoError> {
        let mut tx = self.begin().await.map_err(in_transaction)?;

        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(in_transaction)?
            .ok_or(RepoError::NotFound)?;

        sqlx::query("DELETE FROM activity_logs WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(in_transaction)?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(in_transaction)?;

        record_activity(
            &mut tx,
            ActivityAction::DeletePost,
            None,
            OffsetDateTime::now_utc(),
        )
        .await?;

        tx.commit().await.map_err(in_transaction)?;
        Ok(PostRecord::from(row))
    }
}
