//! Database initialization
//!
//! Creates the database file and schema on first run; all CREATE statements
//! are idempotent so startup is safe against an existing database.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_pragmas(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Create an in-memory database with the full schema (test support)
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    configure_pragmas(&pool).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_profiles_table(pool).await?;
    create_conferences_table(pool).await?;
    create_sessions_table(pool).await?;
    create_attendance_table(pool).await?;
    create_wishlist_table(pool).await?;
    Ok(())
}

async fn create_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            main_email TEXT NOT NULL,
            tee_shirt_size TEXT NOT NULL DEFAULT 'NOT_SPECIFIED'
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_conferences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS conferences (
            id TEXT PRIMARY KEY,
            organizer_user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            city TEXT NOT NULL,
            topics TEXT NOT NULL DEFAULT '[]',
            start_date TEXT,
            end_date TEXT,
            month INTEGER NOT NULL DEFAULT 0,
            max_attendees INTEGER NOT NULL DEFAULT 0,
            seats_available INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_conferences_organizer
         ON conferences(organizer_user_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            conference_id TEXT NOT NULL REFERENCES conferences(id),
            name TEXT NOT NULL,
            highlights TEXT,
            speaker TEXT NOT NULL DEFAULT 'Unknown',
            duration INTEGER NOT NULL DEFAULT 60,
            type_of_session TEXT NOT NULL DEFAULT 'LECTURE',
            date_time TEXT,
            start_time TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_sessions_conference
         ON sessions(conference_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

// Composite primary keys enforce at-most-once membership
async fn create_attendance_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS attendance (
            user_id TEXT NOT NULL REFERENCES profiles(user_id),
            conference_id TEXT NOT NULL REFERENCES conferences(id),
            PRIMARY KEY (user_id, conference_id)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_wishlist_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS wishlist (
            user_id TEXT NOT NULL REFERENCES profiles(user_id),
            session_id TEXT NOT NULL REFERENCES sessions(id),
            PRIMARY KEY (user_id, session_id)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
