//! Asynchronous, best-effort propagation of post changes to the search index.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, warn};

use crate::application::search::{SearchError, SearchIndex};
use crate::domain::entities::SearchDocument;

pub const METRIC_INDEX_FAILURE: &str = "scriven_index_write_failure_total";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTask {
    Upsert(SearchDocument),
    Remove(i64),
}

impl IndexTask {
    pub fn post_id(&self) -> i64 {
        match self {
            IndexTask::Upsert(document) => document.id,
            IndexTask::Remove(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IndexTask::Upsert(_) => "upsert",
            IndexTask::Remove(_) => "remove",
        }
    }

    async fn apply(&self, index: &dyn SearchIndex) -> Result<(), SearchError> {
        match self {
            IndexTask::Upsert(document) => index.upsert(document).await,
            IndexTask::Remove(id) => index.remove(*id).await,
        }
    }
}

/// Receives index writes after the relational store has committed.
///
/// Implementations never report failure to the caller.
#[async_trait]
pub trait IndexDispatcher: Send + Sync {
    async fn dispatch(&self, task: IndexTask);
}

/// Runs each task on a detached tokio task.
#[derive(Clone)]
pub struct BackgroundIndexDispatcher {
    index: Arc<dyn SearchIndex>,
}

impl BackgroundIndexDispatcher {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl IndexDispatcher for BackgroundIndexDispatcher {
    async fn dispatch(&self, task: IndexTask) {
        let index = self.index.clone();
        tokio::spawn(async move {
            run_task(index.as_ref(), task).await;
        });
    }
}

/// Awaits each task before returning.
#[derive(Clone)]
pub struct InlineIndexDispatcher {
    index: Arc<dyn SearchIndex>,
}

impl InlineIndexDispatcher {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl IndexDispatcher for InlineIndexDispatcher {
    async fn dispatch(&self, task: IndexTask) {
        run_task(self.index.as_ref(), task).await;
    }
}

async fn run_task(index: &dyn SearchIndex, task: IndexTask) {
    match task.apply(index).await {
        Ok(()) => debug!(
            target = "scriven::indexing",
            post_id = task.post_id(),
            kind = task.kind(),
            "search index updated"
        ),
        Err(err) => {
            counter!(METRIC_INDEX_FAILURE).increment(1);
            warn!(
                target = "scriven::indexing",
                post_id = task.post_id(),
                kind = task.kind(),
                error = %err,
                "search index write failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::application::search::FullTextHits;

    #[derive(Default)]
    struct RecordingIndex {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchIndex for RecordingIndex {
        async fn ensure_index(&self) -> Result<(), SearchError> {
            Ok(())
        }

        async fn upsert(&self, document: &SearchDocument) -> Result<(), SearchError> {
            self.calls.lock().unwrap().push(format!("upsert:{}", document.id));
            if self.fail {
                return Err(SearchError::transport("connection refused"));
            }
            Ok(())
        }

        async fn remove(&self, id: i64) -> Result<(), SearchError> {
            self.calls.lock().unwrap().push(format!("remove:{id}"));
            Ok(())
        }

        async fn full_text(&self, _query: &str, _limit: usize) -> Result<FullTextHits, SearchError> {
            unreachable!("not used in these tests")
        }

        async fn related_ids(
            &self,
            _tags: &[&str],
            _exclude_id: i64,
            _limit: usize,
        ) -> Result<Vec<i64>, SearchError> {
            unreachable!("not used in these tests")
        }

        async fn ping(&self) -> Result<(), SearchError> {
            Ok(())
        }
    }

    fn document(id: i64) -> SearchDocument {
        SearchDocument {
            id,
            title: "T".into(),
            content: "C".into(),
            tags: vec!["go".into()],
        }
    }

    #[tokio::test]
    async fn inline_dispatch_applies_tasks_in_order() {
        let index = Arc::new(RecordingIndex::default());
        let dispatcher = InlineIndexDispatcher::new(index.clone());

        dispatcher.dispatch(IndexTask::Upsert(document(3))).await;
        dispatcher.dispatch(IndexTask::Remove(3)).await;

        assert_eq!(
            *index.calls.lock().unwrap(),
            vec!["upsert:3".to_string(), "remove:3".to_string()]
        );
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let index = Arc::new(RecordingIndex {
            fail: true,
            ..Default::default()
        });
        let dispatcher = InlineIndexDispatcher::new(index.clone());

        dispatcher.dispatch(IndexTask::Upsert(document(9))).await;

        assert_eq!(index.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn background_dispatch_eventually_runs() {
        let index = Arc::new(RecordingIndex::default());
        let dispatcher = BackgroundIndexDispatcher::new(index.clone());

        dispatcher.dispatch(IndexTask::Remove(11)).await;

        for _ in 0..50 {
            if !index.calls.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(*index.calls.lock().unwrap(), vec!["remove:11".to_string()]);
    }

    #[test]
    fn task_reports_target_post() {
        assert_eq!(IndexTask::Upsert(document(4)).post_id(), 4);
        assert_eq!(IndexTask::Remove(5).kind(), "remove");
    }
}
