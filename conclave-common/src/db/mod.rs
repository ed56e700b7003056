//! Database access layer
//!
//! SQLite-backed storage for conferences, sessions and profiles, plus the
//! explicit transaction helper used by registration and update operations.

use crate::{Error, Result};
use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};

mod init;
pub mod models;

pub use init::{init_database, init_memory_database};

/// Default retry bound for write-conflict retries
pub const TX_MAX_RETRIES: u32 = 3;

/// Run a closure inside a database transaction, retrying the whole unit
/// on SQLITE_BUSY up to `max_retries` times.
///
/// The closure receives the transaction connection and must route every
/// read and write through it. On any error the transaction is rolled back,
/// so the unit is never left partially applied.
pub async fn with_transaction<T, F>(pool: &SqlitePool, max_retries: u32, op: F) -> Result<T>
where
    F: for<'c> Fn(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        let mut tx = pool.begin().await?;
        match op(&mut tx).await {
            Ok(value) => match tx.commit().await {
                Ok(()) => return Ok(value),
                Err(err) if attempt < max_retries && is_busy(&err) => {
                    attempt += 1;
                    tracing::warn!("Transaction commit conflict, retrying (attempt {})", attempt);
                }
                Err(err) => return Err(err.into()),
            },
            Err(err) => {
                tx.rollback().await.ok();
                if attempt < max_retries && is_busy_error(&err) {
                    attempt += 1;
                    tracing::warn!("Transaction write conflict, retrying (attempt {})", attempt);
                    continue;
                }
                return Err(err);
            }
        }
    }
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6) are the retryable conflict codes
fn is_busy(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.code().as_deref(), Some("5") | Some("6"))
        }
        _ => false,
    }
}

fn is_busy_error(err: &Error) -> bool {
    match err {
        Error::Database(db_err) => is_busy(db_err),
        _ => false,
    }
}
