use std::sync::Arc;

use crate::application::activity::ActivityLogService;
use crate::application::cache::SnapshotCache;
use crate::application::posts::PostService;
use crate::application::search::SearchIndex;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    pub activity: Arc<ActivityLogService>,
    pub db: Arc<PostgresRepositories>,
    pub cache: Arc<dyn SnapshotCache>,
    pub search: Arc<dyn SearchIndex>,
}
