use crate::domain::entities::{PostHistoryRecord, PostRecord};
use crate::domain::error::DomainError;
use crate::domain::types::TaxonomyKind;
use crate::domain::url_safe::to_url_safe;

use super::service::PostService;
use super::types::{DraftDetail, PostRevision, PostServiceError, RevisionDetail};

impl PostService {
    /// Posts that are still drafts.
    pub async fn drafts(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        Ok(self.posts.list_drafts().await?)
    }

    /// A draft with every revision, newest first.
    pub async fn draft(&self, post_id: i64) -> Result<DraftDetail, PostServiceError> {
        let post = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post"))?;
        if post.posted {
            return Err(PostServiceError::already_posted(&post.url_title));
        }

        let histories = self.history.list_history(post.id).await?;
        if histories.is_empty() {
            return Err(DomainError::not_found("post_history").into());
        }

        let mut revisions = Vec::with_capacity(histories.len());
        for history in histories {
            revisions.push(self.revision_detail(history).await?);
        }

        Ok(DraftDetail { post, revisions })
    }

    /// One revision of a draft, for editing.
    pub async fn edit(&self, post_history_id: i64) -> Result<PostRevision, PostServiceError> {
        let history = self
            .history
            .find_history(post_history_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post_history"))?;
        let post = self
            .posts
            .find_post(history.post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post"))?;
        if post.posted {
            return Err(PostServiceError::already_posted(&post.url_title));
        }

        let revision = self.revision_detail(history).await?;
        Ok(PostRevision { post, revision })
    }

    /// The latest revision of any post, posted or not.
    pub async fn latest(&self, url_title: &str) -> Result<PostRevision, PostServiceError> {
        let post = self
            .posts
            .find_post_by_url_title(&to_url_safe(url_title))
            .await?
            .ok_or_else(|| DomainError::not_found("post"))?;
        let history = self
            .history
            .latest_history(post.id)
            .await?
            .ok_or_else(|| DomainError::not_found("post_history"))?;

        let revision = self.revision_detail(history).await?;
        Ok(PostRevision { post, revision })
    }

    async fn revision_detail(
        &self,
        history: PostHistoryRecord,
    ) -> Result<RevisionDetail, PostServiceError> {
        let categories = self
            .taxonomy
            .list_for_history(TaxonomyKind::Category, history.id)
            .await?;
        let tags = self
            .taxonomy
            .list_for_history(TaxonomyKind::Tag, history.id)
            .await?;

        Ok(RevisionDetail {
            history,
            categories,
            tags,
        })
    }
}
