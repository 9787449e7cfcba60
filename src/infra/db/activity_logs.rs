use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::pagination::PageRequest;
use crate::application::repos::{ActivityLogsRepo, RepoError};
use crate::domain::entities::ActivityLogRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ActivityLogRow {
    id: i64,
    action: String,
    post_id: Option<i64>,
    logged_at: OffsetDateTime,
}

impl From<ActivityLogRow> for ActivityLogRecord {
    fn from(row: ActivityLogRow) -> Self {
        Self {
            id: row.id,
            action: row.action,
            post_id: row.post_id,
            logged_at: row.logged_at,
        }
    }
}

#[async_trait]
impl ActivityLogsRepo for PostgresRepositories {
    async fn count_logs(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_logs(&self, page: PageRequest) -> Result<Vec<ActivityLogRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ActivityLogRow>(
            r#"
            SELECT id, action, post_id, logged_at
            FROM activity_logs
            ORDER BY logged_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(Self::sql_offset(page.offset()))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ActivityLogRecord::from).collect())
    }
}
