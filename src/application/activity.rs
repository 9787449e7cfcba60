use std::sync::Arc;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::repos::{ActivityLogsRepo, RepoError};
use crate::domain::entities::ActivityLogRecord;

/// Read side of the activity log. Entries are written by the post repository inside the
/// transaction of the mutation they describe.
#[derive(Clone)]
pub struct ActivityLogService {
    repo: Arc<dyn ActivityLogsRepo>,
}

impl ActivityLogService {
    pub fn new(repo: Arc<dyn ActivityLogsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        request: PageRequest,
    ) -> Result<OffsetPage<ActivityLogRecord>, RepoError> {
        let total = self.repo.count_logs().await?;
        let logs = self.repo.list_logs(request).await?;
        Ok(OffsetPage::new(logs, request, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    use crate::application::pagination::DEFAULT_ACTIVITY_PAGE_SIZE;

    #[derive(Default)]
    struct StubLogsRepo {
        total: u64,
        requests: Mutex<Vec<PageRequest>>,
    }

    #[async_trait]
    impl ActivityLogsRepo for StubLogsRepo {
        async fn count_logs(&self) -> Result<u64, RepoError> {
            Ok(self.total)
        }

        async fn list_logs(
            &self,
            page: PageRequest,
        ) -> Result<Vec<ActivityLogRecord>, RepoError> {
            self.requests.lock().unwrap().push(page);
            Ok(vec![ActivityLogRecord {
                id: 1,
                action: "new_post".into(),
                post_id: Some(1),
                logged_at: OffsetDateTime::now_utc(),
            }])
        }
    }

    #[tokio::test]
    async fn list_combines_slice_and_totals() {
        let repo = Arc::new(StubLogsRepo {
            total: 41,
            ..Default::default()
        });
        let service = ActivityLogService::new(repo.clone());

        let page = service
            .list(PageRequest::new(Some(2), None, DEFAULT_ACTIVITY_PAGE_SIZE))
            .await
            .expect("list logs");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.limit, 20);
        assert!(page.pagination.has_next);
        assert_eq!(repo.requests.lock().unwrap()[0].offset(), 20);
    }
}
