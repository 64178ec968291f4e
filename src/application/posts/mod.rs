mod commands;
mod queries;
mod service;
mod types;

pub use service::PostService;
pub use types::{
    DraftDetail, PostRevision, PostServiceError, RevisionDetail, SaveMode, SavePostCommand,
    SavedRevision,
};
