//! SQLite-backed repository implementations.

pub(crate) mod history;
pub(crate) mod posts;
pub(crate) mod taxonomy;
mod types;
pub(crate) mod users;
mod util;

pub use posts::NewPost;
pub use util::map_sqlx_error;
pub(crate) use util::now_seconds;

use std::{path::Path, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use sqlx::{
    Sqlite, Transaction,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use tracing::{debug, error, warn};

use crate::application::repos::RepoError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteRepositories {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write transaction holding the SQLite write lock from its first
    /// statement. Other writers wait on the busy timeout.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin_with("BEGIN IMMEDIATE").await
    }

    /// Open (creating if missing) the database file at `path`.
    pub async fn connect(path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
    }

    pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
    }

    /// Run `work` inside one transaction.
    ///
    /// Commits when `work` succeeds and rolls back when it fails. A panic
    /// inside `work` drops the transaction, which sqlx rolls back.
    pub async fn transaction<T, E, F>(&self, operation: &'static str, work: F) -> Result<T, E>
    where
        F: for<'t> FnOnce(&'t mut Transaction<'static, Sqlite>) -> BoxFuture<'t, Result<T, E>>
            + Send,
        T: Send,
        E: From<RepoError> + std::fmt::Display + Send,
    {
        let mut tx = self
            .begin()
            .await
            .map_err(|err| E::from(map_sqlx_error(err)))?;

        match work(&mut tx).await {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|err| E::from(map_sqlx_error(err)))?;
                debug!(target = "diary::db::transaction", operation, "committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    error!(
                        target = "diary::db::transaction",
                        operation,
                        error = %rollback,
                        "rollback failed"
                    );
                }
                warn!(
                    target = "diary::db::transaction",
                    operation,
                    error = %err,
                    "rolled back"
                );
                Err(err)
            }
        }
    }
}
