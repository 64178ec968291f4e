use crate::application::repos::RepoError;
use crate::domain::entities::{PostHistoryRecord, PostRecord, TaxonomyRecord, UserRecord};
use crate::domain::types::Transport;

use super::util::from_seconds;

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: i64,
    pub(crate) url_title: String,
    pub(crate) user_id: i64,
    pub(crate) title: String,
    pub(crate) posted: bool,
    pub(crate) update_time: i64,
    pub(crate) insert_time: i64,
}

impl TryFrom<PostRow> for PostRecord {
    type Error = RepoError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            url_title: row.url_title,
            user_id: row.user_id,
            title: row.title,
            posted: row.posted,
            update_time: from_seconds(row.update_time, "post.update_time")?,
            insert_time: from_seconds(row.insert_time, "post.insert_time")?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct HistoryRow {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) body: String,
    pub(crate) method: String,
    pub(crate) insert_time: i64,
}

impl TryFrom<HistoryRow> for PostHistoryRecord {
    type Error = RepoError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let method = row
            .method
            .parse::<Transport>()
            .map_err(|reason| RepoError::integrity(format!("post_history.method: {reason}")))?;

        Ok(Self {
            id: row.id,
            post_id: row.post_id,
            body: row.body,
            method,
            insert_time: from_seconds(row.insert_time, "post_history.insert_time")?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TaxonomyRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) user_id: i64,
    pub(crate) insert_time: i64,
}

impl TryFrom<TaxonomyRow> for TaxonomyRecord {
    type Error = RepoError;

    fn try_from(row: TaxonomyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            insert_time: from_seconds(row.insert_time, "taxonomy.insert_time")?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub(crate) id: i64,
    pub(crate) user_name: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) update_time: i64,
    pub(crate) insert_time: i64,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_name: row.user_name,
            first_name: row.first_name,
            last_name: row.last_name,
            update_time: from_seconds(row.update_time, "user.update_time")?,
            insert_time: from_seconds(row.insert_time, "user.insert_time")?,
        })
    }
}
