use std::sync::Arc;

use crate::application::generate::PostGenerator;
use crate::application::repos::{HistoryRepo, PostsRepo, TaxonomyRepo};
use crate::infra::db::SqliteRepositories;

#[derive(Clone)]
pub struct PostService {
    pub(crate) store: Arc<SqliteRepositories>,
    pub(crate) posts: Arc<dyn PostsRepo>,
    pub(crate) history: Arc<dyn HistoryRepo>,
    pub(crate) taxonomy: Arc<dyn TaxonomyRepo>,
    pub(crate) owner_id: i64,
    pub(crate) generator: Option<Arc<PostGenerator>>,
}

impl PostService {
    pub fn new(
        store: Arc<SqliteRepositories>,
        posts: Arc<dyn PostsRepo>,
        history: Arc<dyn HistoryRepo>,
        taxonomy: Arc<dyn TaxonomyRepo>,
        owner_id: i64,
    ) -> Self {
        Self {
            store,
            posts,
            history,
            taxonomy,
            owner_id,
            generator: None,
        }
    }

    /// Render submitted entries right after they commit.
    pub fn with_generator(mut self, generator: Arc<PostGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }
}
