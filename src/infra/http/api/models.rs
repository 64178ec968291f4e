use serde::{Deserialize, Serialize};

use crate::domain::posts::PostPayload;

/// Body of `POST /api/save` and `POST /api/submit`.
#[derive(Debug, Deserialize, Serialize)]
pub struct PostRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl From<PostRequest> for PostPayload {
    fn from(request: PostRequest) -> Self {
        Self {
            title: request.title,
            body: request.body,
            tags: request.tags,
            categories: request.categories,
        }
    }
}
