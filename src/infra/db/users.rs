use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::UserRecord;

use super::SqliteRepositories;
use super::types::UserRow;
use super::util::map_sqlx_error;

pub(crate) async fn find(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<UserRecord>, RepoError> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, user_name, first_name, last_name, update_time, insert_time
        FROM user
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?
    .map(UserRecord::try_from)
    .transpose()
}

#[async_trait]
impl UsersRepo for SqliteRepositories {
    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        find(&mut conn, id).await
    }
}
