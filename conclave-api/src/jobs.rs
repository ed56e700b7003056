//! Background jobs
//!
//! Fire-and-forget work items dispatched off the request path: confirmation
//! emails, featured-speaker detection and the periodic announcement refresh.
//! Failures are logged and never fail the triggering request.

use sqlx::SqlitePool;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cache::{Cache, ANNOUNCEMENTS_KEY, FEATURED_SPEAKER_KEY};

const ANNOUNCEMENT_TPL: &str =
    "Last chance to attend! The following conferences are nearly sold out: ";

/// Refresh the nearly-sold-out announcement this often
pub const ANNOUNCEMENT_REFRESH_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Background work items with their key-value parameter sets
#[derive(Debug)]
pub enum Job {
    /// Confirmation email for a newly created conference
    ConfirmationEmail { email: String, conference_info: String },
    /// Re-evaluate the featured speaker for a conference
    FeaturedSpeaker { conference_id: String, speaker: String },
    /// Rebuild the nearly-sold-out announcement
    RefreshAnnouncement,
}

/// Handle for enqueuing background jobs (best-effort, at-least-once
/// within the process lifetime)
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl JobQueue {
    /// Enqueue a job; failures are logged and swallowed so the caller's
    /// request never fails on enqueue
    pub fn enqueue(&self, job: Job) {
        if let Err(err) = self.tx.send(job) {
            warn!("Failed to enqueue background job: {}", err);
        }
    }
}

/// Spawn the worker task that drains the job queue
pub fn spawn_worker(db: SqlitePool, cache: Cache) -> JobQueue {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            if let Err(err) = run_job(&db, &cache, job).await {
                warn!("Background job failed: {}", err);
            }
        }
    });
    JobQueue { tx }
}

/// Spawn the periodic announcement refresh (cron replacement)
pub fn spawn_announcement_refresher(db: SqlitePool, cache: Cache, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(err) = refresh_announcement(&db, &cache).await {
                warn!("Announcement refresh failed: {}", err);
            }
        }
    });
}

async fn run_job(db: &SqlitePool, cache: &Cache, job: Job) -> conclave_common::Result<()> {
    match job {
        Job::ConfirmationEmail {
            email,
            conference_info,
        } => {
            // No mail transport in scope; the delivery is the log line
            info!(
                "Sending confirmation email to {}: conference created ({})",
                email, conference_info
            );
            Ok(())
        }
        Job::FeaturedSpeaker {
            conference_id,
            speaker,
        } => update_featured_speaker(db, cache, &conference_id, &speaker).await,
        Job::RefreshAnnouncement => refresh_announcement(db, cache).await.map(|_| ()),
    }
}

/// Rebuild the nearly-sold-out announcement (0 < seats <= 5).
/// An empty result deletes the cache entry.
pub async fn refresh_announcement(db: &SqlitePool, cache: &Cache) -> conclave_common::Result<String> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM conferences
         WHERE seats_available <= 5 AND seats_available > 0
         ORDER BY name",
    )
    .fetch_all(db)
    .await?;

    if names.is_empty() {
        cache.delete(ANNOUNCEMENTS_KEY);
        return Ok(String::new());
    }

    let announcement = format!("{}{}", ANNOUNCEMENT_TPL, names.join(", "));
    cache.set(ANNOUNCEMENTS_KEY, announcement.clone());
    Ok(announcement)
}

/// A speaker with more than one session in a conference becomes the
/// featured speaker, summarized with their session names
async fn update_featured_speaker(
    db: &SqlitePool,
    cache: &Cache,
    conference_id: &str,
    speaker: &str,
) -> conclave_common::Result<()> {
    let session_names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sessions
         WHERE conference_id = ? AND speaker = ?
         ORDER BY created_at",
    )
    .bind(conference_id)
    .bind(speaker)
    .fetch_all(db)
    .await?;

    if session_names.len() > 1 {
        cache.set(
            FEATURED_SPEAKER_KEY,
            format!("{}: {}", speaker, session_names.join(", ")),
        );
    }
    Ok(())
}
