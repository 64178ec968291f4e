use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::application::repos::{HistoryRepo, RepoError};
use crate::domain::entities::PostHistoryRecord;
use crate::domain::types::Transport;

use super::SqliteRepositories;
use super::types::HistoryRow;
use super::util::map_sqlx_error;

/// Append a revision. History rows are never updated or deleted.
pub(crate) async fn append(
    conn: &mut SqliteConnection,
    post_id: i64,
    body: &str,
    method: Transport,
    now: i64,
) -> Result<i64, RepoError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO post_history (post_id, body, method, insert_time)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(body)
    .bind(method.as_str())
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)
}

pub(crate) async fn find(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<PostHistoryRecord>, RepoError> {
    sqlx::query_as::<_, HistoryRow>(
        "SELECT id, post_id, body, method, insert_time FROM post_history WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?
    .map(PostHistoryRecord::try_from)
    .transpose()
}

pub(crate) async fn latest(
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<Option<PostHistoryRecord>, RepoError> {
    sqlx::query_as::<_, HistoryRow>(
        r#"
        SELECT id, post_id, body, method, insert_time
        FROM post_history
        WHERE post_id = ?
        ORDER BY insert_time DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(post_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?
    .map(PostHistoryRecord::try_from)
    .transpose()
}

pub(crate) async fn list(
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<Vec<PostHistoryRecord>, RepoError> {
    sqlx::query_as::<_, HistoryRow>(
        r#"
        SELECT id, post_id, body, method, insert_time
        FROM post_history
        WHERE post_id = ?
        ORDER BY insert_time DESC, id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?
    .into_iter()
    .map(PostHistoryRecord::try_from)
    .collect()
}

#[async_trait]
impl HistoryRepo for SqliteRepositories {
    async fn find_history(&self, id: i64) -> Result<Option<PostHistoryRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        find(&mut conn, id).await
    }

    async fn latest_history(&self, post_id: i64) -> Result<Option<PostHistoryRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        latest(&mut conn, post_id).await
    }

    async fn list_history(&self, post_id: i64) -> Result<Vec<PostHistoryRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        list(&mut conn, post_id).await
    }
}
