//! Export actions for a rendered Supporting Information page.
//!
//! [`ExportOrchestrator`] dispatches user-triggered actions:
//!
//! - direct downloads and DOI publication, handed to a [`Navigator`]
//! - the image archive, built from [`esi_viewer::ViewerRegistry::snapshot_all`]
//! - copying the report region to the [`Clipboard`]
//! - PDF rendering through a [`PdfEngine`], with one automatic retry
//!
//! Long-running actions toggle a shared [`BusyIndicator`].

pub mod archive;
pub mod busy;
pub mod clipboard;
pub mod error;
pub mod job;
pub mod navigator;
pub mod orchestrator;
pub mod pdf;
pub mod routes;
pub mod save;

pub use archive::{archive_filename, build_archive, entry_names};
pub use busy::BusyIndicator;
pub use clipboard::Clipboard;
pub use error::{ExportError, Result};
pub use job::{ExportJob, JobKind, JobState};
pub use navigator::{Navigator, OpenNavigator};
pub use orchestrator::{ExportAction, ExportOrchestrator, ExportSettings};
pub use pdf::{
    Confirm, PDF_WARNING, PdfEffect, PdfEngine, PdfEvent, PdfRequest, PdfSettings, PdfStatus,
    RetryPolicy, pdf_filename, transition,
};
pub use routes::{DoiFlags, DoiTarget, DownloadTarget, ReportRoutes};
pub use save::{DirectorySaver, FileSaver};
