use serde::Serialize;
use thiserror::Error;

use crate::{
    application::{error::ErrorKind, generate::GenerateError, repos::RepoError},
    domain::{
        entities::{PostHistoryRecord, PostRecord, TaxonomyRecord},
        error::DomainError,
        posts::PostPayload,
        types::Transport,
    },
};

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl PostServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostServiceError::Domain(DomainError::Validation { .. }) => ErrorKind::BadRequest,
            PostServiceError::Domain(DomainError::NotFound { .. }) => ErrorKind::NotFound,
            PostServiceError::Conflict(_) => ErrorKind::Conflict,
            PostServiceError::Repo(RepoError::Conflict { .. }) => ErrorKind::Conflict,
            PostServiceError::Repo(RepoError::NotFound) => ErrorKind::NotFound,
            PostServiceError::Repo(RepoError::InvalidInput { .. }) => ErrorKind::BadRequest,
            PostServiceError::Repo(_) => ErrorKind::Internal,
            PostServiceError::Generate(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn already_posted(url_title: &str) -> Self {
        Self::Conflict(format!("post `{url_title}` has already been posted"))
    }
}

/// Whether a write keeps the post as a draft or finalises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Save,
    Submit,
}

impl SaveMode {
    pub fn posted(&self) -> bool {
        matches!(self, SaveMode::Submit)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            SaveMode::Save => "post.save",
            SaveMode::Submit => "post.submit",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::Save => "save",
            SaveMode::Submit => "submit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SavePostCommand {
    pub payload: PostPayload,
    pub transport: Transport,
    pub mode: SaveMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedRevision {
    pub post_id: i64,
    pub history_id: i64,
    pub url_title: String,
    pub posted: bool,
}

/// One revision with the taxonomy linked to it.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionDetail {
    pub history: PostHistoryRecord,
    pub categories: Vec<TaxonomyRecord>,
    pub tags: Vec<TaxonomyRecord>,
}

/// A draft with its full revision history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct DraftDetail {
    pub post: PostRecord,
    pub revisions: Vec<RevisionDetail>,
}

/// A single revision together with its post.
#[derive(Debug, Clone, Serialize)]
pub struct PostRevision {
    pub post: PostRecord,
    pub revision: RevisionDetail,
}
