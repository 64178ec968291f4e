//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::types::Transport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub update_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub insert_time: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub url_title: String,
    pub user_id: i64,
    pub title: String,
    pub posted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub update_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub insert_time: OffsetDateTime,
}

/// One append-only revision of a post body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostHistoryRecord {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    pub method: Transport,
    #[serde(with = "time::serde::rfc3339")]
    pub insert_time: OffsetDateTime,
}

/// A category or tag row; the kind is implied by where it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyRecord {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub insert_time: OffsetDateTime,
}
