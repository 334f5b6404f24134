//! Export job bookkeeping.

use std::path::PathBuf;

use serde::Serialize;

/// What an export job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobKind {
    /// Hand a locator to the navigator (downloads and DOI publication).
    DirectDownload,
    /// Package viewer snapshots into a ZIP.
    ArchiveBuild,
    /// Copy the report region to the clipboard.
    ClipboardCopy,
    /// Render the report region to PDF.
    PdfRender,
}

impl JobKind {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DirectDownload => "Download",
            Self::ArchiveBuild => "Image archive",
            Self::ClipboardCopy => "Copy to clipboard",
            Self::PdfRender => "PDF",
        }
    }
}

/// Lifecycle of an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobState {
    /// Created but not started (or declined by the user).
    Idle,
    /// In progress.
    Running,
    /// Finished with its output.
    Succeeded,
    /// Gave up; see [`ExportJob::error`].
    Failed,
}

/// One user-triggered export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportJob {
    /// What the job does.
    pub kind: JobKind,
    /// Where the job stands.
    pub state: JobState,
    /// Automatic retries performed.
    pub retries: u32,
    /// Locator or file produced, if any.
    pub output: Option<String>,
    /// Failure description.
    pub error: Option<String>,
}

impl ExportJob {
    /// Create an idle job.
    #[must_use]
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            state: JobState::Idle,
            retries: 0,
            output: None,
            error: None,
        }
    }

    /// Mark the job running.
    pub fn start(&mut self) {
        self.state = JobState::Running;
    }

    /// Mark the job succeeded with an optional output.
    pub fn succeed(&mut self, output: Option<String>) {
        self.state = JobState::Succeeded;
        self.output = output;
    }

    /// Mark the job failed.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = JobState::Failed;
        self.error = Some(error.into());
    }

    /// Count one automatic retry.
    pub fn record_retry(&mut self) {
        self.retries += 1;
    }

    /// Path of the saved file, when the output is one.
    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        match self.kind {
            JobKind::ArchiveBuild => self.output.as_ref().map(PathBuf::from),
            _ => None,
        }
    }

    /// Whether the job reached `Succeeded` or `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Succeeded | JobState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut job = ExportJob::new(JobKind::PdfRender);
        assert_eq!(job.state, JobState::Idle);
        assert!(!job.is_terminal());

        job.start();
        job.record_retry();
        job.fail("engine error");

        assert!(job.is_terminal());
        assert_eq!(job.retries, 1);
        assert_eq!(job.error.as_deref(), Some("engine error"));
    }

    #[test]
    fn test_output_path_only_for_archives() {
        let mut job = ExportJob::new(JobKind::DirectDownload);
        job.succeed(Some("https://si.example.org/reports/x/txt".to_string()));
        assert!(job.output_path().is_none());

        let mut job = ExportJob::new(JobKind::ArchiveBuild);
        job.succeed(Some("/tmp/x_images.zip".to_string()));
        assert_eq!(job.output_path(), Some(PathBuf::from("/tmp/x_images.zip")));
    }
}
