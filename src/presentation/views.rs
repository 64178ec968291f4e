use crate::application::error::HttpError;
use crate::application::posts::{DraftDetail, PostRevision, RevisionDetail};
use crate::domain::entities::{PostRecord, TaxonomyRecord};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

fn format_timestamp(value: OffsetDateTime) -> String {
    value
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

fn join_names(records: &[TaxonomyRecord]) -> String {
    records
        .iter()
        .map(|record| record.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Editor form state; blank for a new entry, prefilled when editing a revision.
pub struct EditorView {
    pub heading: String,
    pub title: String,
    pub body: String,
    pub tags: String,
    pub categories: String,
    pub source_history_id: Option<i64>,
    pub draft_href: Option<String>,
}

impl EditorView {
    pub fn blank() -> Self {
        Self {
            heading: "New entry".to_string(),
            title: String::new(),
            body: String::new(),
            tags: String::new(),
            categories: String::new(),
            source_history_id: None,
            draft_href: None,
        }
    }
}

impl From<PostRevision> for EditorView {
    fn from(value: PostRevision) -> Self {
        let PostRevision { post, revision } = value;
        Self {
            heading: format!("Editing {}", post.title),
            title: post.title,
            body: revision.history.body,
            tags: join_names(&revision.tags),
            categories: join_names(&revision.categories),
            source_history_id: Some(revision.history.id),
            draft_href: Some(format!("/drafts/{}", post.id)),
        }
    }
}

pub struct DraftRowView {
    pub href: String,
    pub title: String,
    pub url_title: String,
    pub updated: String,
}

impl From<PostRecord> for DraftRowView {
    fn from(post: PostRecord) -> Self {
        Self {
            href: format!("/drafts/{}", post.id),
            updated: format_timestamp(post.update_time),
            title: post.title,
            url_title: post.url_title,
        }
    }
}

pub struct RevisionView {
    pub history_id: i64,
    pub edit_href: String,
    pub method: String,
    pub saved_at: String,
    pub body: String,
    pub tags: String,
    pub categories: String,
}

impl From<RevisionDetail> for RevisionView {
    fn from(detail: RevisionDetail) -> Self {
        let RevisionDetail {
            history,
            categories,
            tags,
        } = detail;
        Self {
            history_id: history.id,
            edit_href: format!("/edit/{}", history.id),
            method: history.method.to_string(),
            saved_at: format_timestamp(history.insert_time),
            body: history.body,
            tags: join_names(&tags),
            categories: join_names(&categories),
        }
    }
}

pub struct DraftView {
    pub title: String,
    pub url_title: String,
    pub revisions: Vec<RevisionView>,
}

impl From<DraftDetail> for DraftView {
    fn from(detail: DraftDetail) -> Self {
        Self {
            title: detail.post.title,
            url_title: detail.post.url_title,
            revisions: detail.revisions.into_iter().map(RevisionView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: EditorView,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub view: EditorView,
}

#[derive(Template)]
#[template(path = "drafts.html")]
pub struct DraftsTemplate {
    pub drafts: Vec<DraftRowView>,
}

#[derive(Template)]
#[template(path = "draft.html")]
pub struct DraftTemplate {
    pub view: DraftView,
}
