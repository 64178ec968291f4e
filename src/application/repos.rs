//! Repository traits describing persistence adapters.
//!
//! These cover the read side. Writes go through the transactional store
//! functions in `infra::db` so a save or submit lands atomically.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{PostHistoryRecord, PostRecord, TaxonomyRecord, UserRecord};
use crate::domain::types::TaxonomyKind;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("conflicting write: {message}")]
    Conflict { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    /// Case-insensitive lookup by URL-safe title.
    async fn find_post_by_url_title(
        &self,
        url_title: &str,
    ) -> Result<Option<PostRecord>, RepoError>;

    /// Posts that have not been submitted yet, most recently updated first.
    async fn list_drafts(&self) -> Result<Vec<PostRecord>, RepoError>;
}

#[async_trait]
pub trait HistoryRepo: Send + Sync {
    async fn find_history(&self, id: i64) -> Result<Option<PostHistoryRecord>, RepoError>;

    async fn latest_history(&self, post_id: i64) -> Result<Option<PostHistoryRecord>, RepoError>;

    /// Every revision of a post, newest first.
    async fn list_history(&self, post_id: i64) -> Result<Vec<PostHistoryRecord>, RepoError>;
}

#[async_trait]
pub trait TaxonomyRepo: Send + Sync {
    async fn list_for_history(
        &self,
        kind: TaxonomyKind,
        history_id: i64,
    ) -> Result<Vec<TaxonomyRecord>, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, RepoError>;
}
