use std::sync::Arc;

use crate::application::cache::PostSnapshots;
use crate::application::indexing::IndexDispatcher;
use crate::application::repos::{PostsRepo, PostsWriteRepo};
use crate::application::search::SearchIndex;

pub const DEFAULT_TAG_SEARCH_WARN_THRESHOLD: usize = 500;

#[derive(Debug, Clone, Copy)]
pub struct PostServiceSettings {
    /// Tag searches returning more rows than this are logged as oversized.
    pub tag_search_warn_threshold: usize,
}

impl Default for PostServiceSettings {
    fn default() -> Self {
        Self {
            tag_search_warn_threshold: DEFAULT_TAG_SEARCH_WARN_THRESHOLD,
        }
    }
}

/// Coordinates the relational store, the snapshot cache and the search index.
#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) snapshots: PostSnapshots,
    pub(crate) search: Arc<dyn SearchIndex>,
    pub(crate) indexer: Arc<dyn IndexDispatcher>,
    pub(crate) settings: PostServiceSettings,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        snapshots: PostSnapshots,
        search: Arc<dyn SearchIndex>,
        indexer: Arc<dyn IndexDispatcher>,
        settings: PostServiceSettings,
    ) -> Self {
        Self {
            reader,
            writer,
            snapshots,
            search,
            indexer,
            settings,
        }
    }
}
