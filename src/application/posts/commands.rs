use metrics::counter;
use tracing::{error, info, warn};

use crate::domain::types::TaxonomyKind;
use crate::infra::db::{NewPost, history, now_seconds, posts, taxonomy};

use super::service::PostService;
use super::types::{PostServiceError, SavePostCommand, SavedRevision};

impl PostService {
    /// Save a draft or submit a post in one transaction.
    ///
    /// Validation runs before anything is written. The post row, the new
    /// history row and every taxonomy link commit together or not at all.
    pub async fn save_post(
        &self,
        command: SavePostCommand,
    ) -> Result<SavedRevision, PostServiceError> {
        let SavePostCommand {
            payload,
            transport,
            mode,
        } = command;
        let operation = mode.operation();

        let post = match payload.validate() {
            Ok(post) => post,
            Err(err) => {
                warn!(
                    target = "diary::posts",
                    operation,
                    error = %err,
                    "rejected post payload"
                );
                record_outcome(mode.as_str(), "rejected");
                return Err(err.into());
            }
        };

        let owner_id = self.owner_id;
        let posted = mode.posted();
        let result = self
            .store
            .transaction(operation, move |tx| {
                Box::pin(async move {
                    let now = now_seconds();
                    let post_id = posts::create_or_update(
                        tx.as_mut(),
                        &NewPost {
                            url_title: &post.url_title,
                            title: &post.title,
                            user_id: owner_id,
                            posted,
                        },
                        now,
                    )
                    .await?;

                    let history_id =
                        history::append(tx.as_mut(), post_id, &post.body, transport, now).await?;

                    let tag_ids = taxonomy::get_or_create_all(
                        tx.as_mut(),
                        TaxonomyKind::Tag,
                        owner_id,
                        &post.tags,
                        now,
                    )
                    .await?;
                    let category_ids = taxonomy::get_or_create_all(
                        tx.as_mut(),
                        TaxonomyKind::Category,
                        owner_id,
                        &post.categories,
                        now,
                    )
                    .await?;

                    taxonomy::link_to_history(
                        tx.as_mut(),
                        TaxonomyKind::Tag,
                        history_id,
                        &tag_ids,
                        now,
                    )
                    .await?;
                    taxonomy::link_to_history(
                        tx.as_mut(),
                        TaxonomyKind::Category,
                        history_id,
                        &category_ids,
                        now,
                    )
                    .await?;

                    Ok::<_, PostServiceError>(SavedRevision {
                        post_id,
                        history_id,
                        url_title: post.url_title,
                        posted,
                    })
                })
            })
            .await;

        let saved = match result {
            Ok(saved) => saved,
            Err(err) => {
                let kind = err.kind();
                error!(
                    target = "diary::posts",
                    operation,
                    kind = kind.as_str(),
                    error = %err,
                    "post write failed"
                );
                record_outcome(mode.as_str(), kind.as_str());
                return Err(err);
            }
        };

        record_outcome(mode.as_str(), "ok");
        info!(
            target = "diary::posts",
            operation,
            post_id = saved.post_id,
            history_id = saved.history_id,
            url_title = %saved.url_title,
            method = transport.as_str(),
            "post written"
        );

        if saved.posted
            && let Some(generator) = self.generator.as_ref()
        {
            generator.generate(&saved.url_title).await?;
        }

        Ok(saved)
    }
}

fn record_outcome(mode: &'static str, outcome: &'static str) {
    counter!("diary_post_writes_total", "mode" => mode, "outcome" => outcome).increment(1);
}
