use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

use super::SqliteRepositories;
use super::types::PostRow;
use super::util::map_sqlx_error;

const POST_COLUMNS: &str = "id, url_title, user_id, title, posted, update_time, insert_time";

/// Values for a post row that may not exist yet.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub url_title: &'a str,
    pub title: &'a str,
    pub user_id: i64,
    pub posted: bool,
}

pub(crate) async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<PostRecord>, RepoError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM post WHERE id = ?");
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?
        .map(PostRecord::try_from)
        .transpose()
}

pub(crate) async fn find_by_url_title(
    conn: &mut SqliteConnection,
    url_title: &str,
) -> Result<Option<PostRecord>, RepoError> {
    let sql = format!("SELECT {POST_COLUMNS} FROM post WHERE url_title = ? COLLATE NOCASE");
    sqlx::query_as::<_, PostRow>(&sql)
        .bind(url_title)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?
        .map(PostRecord::try_from)
        .transpose()
}

pub(crate) async fn list_drafts(conn: &mut SqliteConnection) -> Result<Vec<PostRecord>, RepoError> {
    let sql = format!(
        "SELECT {POST_COLUMNS} FROM post WHERE posted = 0 ORDER BY update_time DESC, id DESC"
    );
    sqlx::query_as::<_, PostRow>(&sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?
        .into_iter()
        .map(PostRecord::try_from)
        .collect()
}

/// Insert the post, or flip `posted` on the existing draft with the same URL title.
///
/// Posted rows are never touched: both the lookup and the guarded update
/// report [`RepoError::Conflict`] for them, as does losing an insert race.
pub(crate) async fn create_or_update(
    conn: &mut SqliteConnection,
    post: &NewPost<'_>,
    now: i64,
) -> Result<i64, RepoError> {
    if let Some(existing) = find_by_url_title(&mut *conn, post.url_title).await? {
        if existing.posted {
            return Err(already_posted(post.url_title));
        }

        let result = sqlx::query(
            "UPDATE post SET posted = ?, update_time = ? WHERE id = ? AND posted = 0",
        )
        .bind(post.posted)
        .bind(now)
        .bind(existing.id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(already_posted(post.url_title));
        }
        return Ok(existing.id);
    }

    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO post (url_title, user_id, title, posted, update_time, insert_time)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(post.url_title)
    .bind(post.user_id)
    .bind(post.title)
    .bind(post.posted)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| match map_sqlx_error(err) {
        RepoError::Duplicate { .. } => RepoError::conflict(format!(
            "post `{}` was created concurrently",
            post.url_title
        )),
        other => other,
    })
}

fn already_posted(url_title: &str) -> RepoError {
    RepoError::conflict(format!("post `{url_title}` has already been posted"))
}

#[async_trait]
impl PostsRepo for SqliteRepositories {
    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        find_by_id(&mut conn, id).await
    }

    async fn find_post_by_url_title(
        &self,
        url_title: &str,
    ) -> Result<Option<PostRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        find_by_url_title(&mut conn, url_title).await
    }

    async fn list_drafts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        list_drafts(&mut conn).await
    }
}
