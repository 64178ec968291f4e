use time::OffsetDateTime;

use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate {
            constraint: db
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db.message().to_string()),
        },
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => RepoError::InvalidInput {
            message: db.message().to_string(),
        },
        sqlx::Error::Database(db) if db.is_check_violation() => RepoError::Integrity {
            message: db.message().to_string(),
        },
        sqlx::Error::Database(db)
            if db.message().contains("database is locked")
                || db.message().contains("database is busy") =>
        {
            RepoError::Timeout
        }
        other => RepoError::from_persistence(other),
    }
}

pub(crate) fn now_seconds() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

pub(crate) fn from_seconds(value: i64, column: &'static str) -> Result<OffsetDateTime, RepoError> {
    OffsetDateTime::from_unix_timestamp(value)
        .map_err(|err| RepoError::integrity(format!("`{column}` out of range: {err}")))
}
