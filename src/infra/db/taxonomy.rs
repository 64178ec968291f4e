use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::application::repos::{RepoError, TaxonomyRepo};
use crate::domain::entities::TaxonomyRecord;
use crate::domain::types::TaxonomyKind;

use super::SqliteRepositories;
use super::types::TaxonomyRow;
use super::util::map_sqlx_error;

/// Lookup/insert rounds before a get-or-create gives up.
const GET_OR_CREATE_ATTEMPTS: usize = 3;

pub(crate) async fn find_id_by_name(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    owner_id: i64,
    name: &str,
) -> Result<Option<i64>, RepoError> {
    let sql = format!(
        "SELECT id FROM {} WHERE user_id = ? AND name = ? COLLATE NOCASE",
        kind.table()
    );
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)
}

/// Return the id of `name` for `owner_id`, inserting it when absent.
///
/// A unique violation on insert means another writer created the row
/// between our lookup and insert, so the lookup is retried.
pub(crate) async fn get_or_create(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    owner_id: i64,
    name: &str,
    now: i64,
) -> Result<i64, RepoError> {
    let insert = format!(
        "INSERT INTO {} (name, user_id, insert_time) VALUES (?, ?, ?) RETURNING id",
        kind.table()
    );

    for attempt in 1..=GET_OR_CREATE_ATTEMPTS {
        if let Some(id) = find_id_by_name(&mut *conn, kind, owner_id, name).await? {
            return Ok(id);
        }

        let inserted = sqlx::query_scalar::<_, i64>(&insert)
            .bind(name)
            .bind(owner_id)
            .bind(now)
            .fetch_one(&mut *conn)
            .await
            .map_err(map_sqlx_error);

        match inserted {
            Ok(id) => return Ok(id),
            Err(RepoError::Duplicate { .. }) => {
                debug!(
                    target = "diary::db::taxonomy",
                    kind = kind.as_str(),
                    taxonomy = name,
                    attempt,
                    "lost insert race, retrying lookup"
                );
            }
            Err(other) => return Err(other),
        }
    }

    Err(RepoError::integrity(format!(
        "{kind} `{name}` could not be resolved after {GET_OR_CREATE_ATTEMPTS} attempts"
    )))
}

pub(crate) async fn get_or_create_all(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    owner_id: i64,
    names: &[String],
    now: i64,
) -> Result<Vec<i64>, RepoError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id = get_or_create(&mut *conn, kind, owner_id, name, now).await?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

pub(crate) async fn link_to_history(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    history_id: i64,
    ids: &[i64],
    now: i64,
) -> Result<(), RepoError> {
    let sql = format!(
        "INSERT INTO {} (post_history_id, {}, insert_time) VALUES (?, ?, ?)",
        kind.link_table(),
        kind.link_column()
    );

    for &id in ids {
        sqlx::query(&sql)
            .bind(history_id)
            .bind(id)
            .bind(now)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
    }

    Ok(())
}

pub(crate) async fn list_for_history(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    history_id: i64,
) -> Result<Vec<TaxonomyRecord>, RepoError> {
    let sql = format!(
        r#"
        SELECT t.id, t.name, t.user_id, t.insert_time
        FROM {table} t
        INNER JOIN {link} l ON l.{column} = t.id
        WHERE l.post_history_id = ?
        ORDER BY t.name COLLATE NOCASE, t.id
        "#,
        table = kind.table(),
        link = kind.link_table(),
        column = kind.link_column()
    );

    sqlx::query_as::<_, TaxonomyRow>(&sql)
        .bind(history_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?
        .into_iter()
        .map(TaxonomyRecord::try_from)
        .collect()
}

#[async_trait]
impl TaxonomyRepo for SqliteRepositories {
    async fn list_for_history(
        &self,
        kind: TaxonomyKind,
        history_id: i64,
    ) -> Result<Vec<TaxonomyRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        list_for_history(&mut conn, kind, history_id).await
    }
}
