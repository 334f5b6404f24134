//! Upload directory housekeeping.
//!
//! Each session stores its files under `{uploads}/{session}/`.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use esi_model::SessionId;

/// Result of a cleanup pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Session directories removed.
    pub removed: Vec<PathBuf>,
    /// Session directories kept.
    pub kept: usize,
}

/// A session id with no directory under `uploads` yet.
#[must_use]
pub fn fresh_session(uploads: &Path) -> SessionId {
    loop {
        let session = SessionId::new();
        if !uploads.join(session.to_string()).exists() {
            return session;
        }
    }
}

/// Directory of `session` under `uploads`.
#[must_use]
pub fn session_dir(uploads: &Path, session: &SessionId) -> PathBuf {
    uploads.join(session.to_string())
}

/// Remove session directories last modified more than `max_age` before `now`.
///
/// A missing uploads directory is treated as empty. Plain files are left
/// alone.
pub fn clean_stale(
    uploads: &Path,
    max_age: Duration,
    now: DateTime<Utc>,
) -> io::Result<CleanReport> {
    let mut report = CleanReport::default();
    let entries = match std::fs::read_dir(uploads) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(report),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_dir() {
            continue;
        }

        let modified: DateTime<Utc> = metadata.modified()?.into();
        let age = now.signed_duration_since(modified);
        if age > max_age {
            let path = entry.path();
            std::fs::remove_dir_all(&path)?;
            tracing::info!(
                path = %path.display(),
                age_hours = age.num_hours(),
                "Removed stale session"
            );
            report.removed.push(path);
        } else {
            report.kept += 1;
        }
    }

    report.removed.sort();
    Ok(report)
}
