//! Static generation of posted entries through a runtime template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::counter;
use minijinja::{Environment, context};
use thiserror::Error;
use time::UtcOffset;
use tracing::{error, info};

use crate::application::error::ErrorKind;
use crate::application::repos::{HistoryRepo, PostsRepo, RepoError, TaxonomyRepo, UsersRepo};
use crate::domain::entities::{PostHistoryRecord, PostRecord};
use crate::domain::types::TaxonomyKind;
use crate::domain::url_safe::to_url_safe;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no {entity} found for `{url_title}`")]
    NotFound {
        entity: &'static str,
        url_title: String,
    },
    #[error("post `{0}` has not been posted yet")]
    NotPosted(String),
    #[error("post `{url_title}` has no {kind} on its latest revision")]
    MissingTaxonomy {
        kind: TaxonomyKind,
        url_title: String,
    },
    #[error("failed to read template `{path}`")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render template")]
    Render(#[from] minijinja::Error),
    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::NotFound { .. } => ErrorKind::NotFound,
            GenerateError::NotPosted(_) | GenerateError::MissingTaxonomy { .. } => {
                ErrorKind::BadRequest
            }
            GenerateError::TemplateRead { .. }
            | GenerateError::Render(_)
            | GenerateError::Write { .. }
            | GenerateError::Repo(_) => ErrorKind::Internal,
        }
    }
}

/// Renders the latest revision of a posted entry to `<dir>/<y>-<m>-<d>-<url_title>.md`.
pub struct PostGenerator {
    posts: Arc<dyn PostsRepo>,
    history: Arc<dyn HistoryRepo>,
    taxonomy: Arc<dyn TaxonomyRepo>,
    users: Arc<dyn UsersRepo>,
    output_dir: PathBuf,
    template: PathBuf,
}

impl PostGenerator {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        history: Arc<dyn HistoryRepo>,
        taxonomy: Arc<dyn TaxonomyRepo>,
        users: Arc<dyn UsersRepo>,
        output_dir: PathBuf,
        template: PathBuf,
    ) -> Self {
        Self {
            posts,
            history,
            taxonomy,
            users,
            output_dir,
            template,
        }
    }

    pub async fn generate(&self, title: &str) -> Result<PathBuf, GenerateError> {
        let url_title = to_url_safe(title);
        match self.generate_inner(&url_title).await {
            Ok(path) => {
                counter!("diary_posts_generated_total", "outcome" => "ok").increment(1);
                info!(
                    target = "diary::generate",
                    url_title = %url_title,
                    path = %path.display(),
                    "generated post"
                );
                Ok(path)
            }
            Err(err) => {
                counter!("diary_posts_generated_total", "outcome" => err.kind().as_str())
                    .increment(1);
                error!(
                    target = "diary::generate",
                    url_title = %url_title,
                    error = %err,
                    "post generation failed"
                );
                Err(err)
            }
        }
    }

    async fn generate_inner(&self, url_title: &str) -> Result<PathBuf, GenerateError> {
        let not_found = |entity| GenerateError::NotFound {
            entity,
            url_title: url_title.to_string(),
        };

        let post = self
            .posts
            .find_post_by_url_title(url_title)
            .await?
            .ok_or_else(|| not_found("post"))?;
        if !post.posted {
            return Err(GenerateError::NotPosted(post.url_title));
        }

        let user = self
            .users
            .find_user(post.user_id)
            .await?
            .ok_or_else(|| not_found("user"))?;
        let revision = self
            .history
            .latest_history(post.id)
            .await?
            .ok_or_else(|| not_found("post history"))?;

        let categories = self
            .taxonomy
            .list_for_history(TaxonomyKind::Category, revision.id)
            .await?;
        if categories.is_empty() {
            return Err(GenerateError::MissingTaxonomy {
                kind: TaxonomyKind::Category,
                url_title: post.url_title,
            });
        }
        let tags = self
            .taxonomy
            .list_for_history(TaxonomyKind::Tag, revision.id)
            .await?;
        if tags.is_empty() {
            return Err(GenerateError::MissingTaxonomy {
                kind: TaxonomyKind::Tag,
                url_title: post.url_title,
            });
        }

        let source = tokio::fs::read_to_string(&self.template)
            .await
            .map_err(|source| GenerateError::TemplateRead {
                path: self.template.clone(),
                source,
            })?;

        let env = Environment::new();
        let rendered = env.render_str(
            &source,
            context! {
                post => &post,
                user => &user,
                revision => &revision,
                categories => &categories,
                tags => &tags,
            },
        )?;

        let path = self
            .output_dir
            .join(output_file_name(&post, &revision));
        write_output(&self.output_dir, &path, rendered).await?;
        Ok(path)
    }
}

/// `<year>-<month>-<day>-<url_title>.md`, dated by the revision in UTC.
pub fn output_file_name(post: &PostRecord, revision: &PostHistoryRecord) -> String {
    let date = revision.insert_time.to_offset(UtcOffset::UTC);
    format!(
        "{}-{}-{}-{}.md",
        date.year(),
        u8::from(date.month()),
        date.day(),
        post.url_title
    )
}

async fn write_output(dir: &Path, path: &Path, contents: String) -> Result<(), GenerateError> {
    let write_error = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
    tokio::fs::write(path, contents).await.map_err(write_error)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::domain::types::Transport;

    #[test]
    fn file_name_uses_unpadded_utc_date() {
        let post = PostRecord {
            id: 1,
            url_title: "hello-world".to_string(),
            user_id: 1,
            title: "Hello World".to_string(),
            posted: true,
            update_time: datetime!(2024-03-05 23:30 UTC),
            insert_time: datetime!(2024-03-05 23:30 UTC),
        };
        let revision = PostHistoryRecord {
            id: 7,
            post_id: 1,
            body: "first post".to_string(),
            method: Transport::Http,
            insert_time: datetime!(2024-03-06 01:30 +02:00),
        };

        assert_eq!(output_file_name(&post, &revision), "2024-3-5-hello-world.md");
    }
}
