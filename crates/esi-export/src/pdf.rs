//! PDF rendering state machine.
//!
//! A render is driven by the status stream of a [`PdfEngine`]. Each event is
//! fed through [`transition`], which yields the next [`PdfStatus`] and the
//! [`PdfEffect`] the orchestrator must apply. [`RetryPolicy`] bounds how many
//! times an errored render is re-issued.

use std::time::Duration;

use esi_model::SessionId;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Shown before rendering; declining aborts the export.
pub const PDF_WARNING: &str = "PDF output is meant for reading, not for reproducing \
results. Keep the plain-text or archive download alongside it.";

/// Filename of the PDF for a session.
#[must_use]
pub fn pdf_filename(session: &SessionId) -> String {
    format!("{session}.pdf")
}

/// Page and quality settings for PDF output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Page width in millimetres.
    pub page_width_mm: f64,
    /// Page height in millimetres.
    pub page_height_mm: f64,
    /// Raster resolution in dots per inch.
    pub resolution_dpi: u32,
    /// Whether viewer images are embedded.
    pub embed_images: bool,
    /// Delay before the automatic retry, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            resolution_dpi: 300,
            embed_images: true,
            retry_delay_ms: 1000,
        }
    }
}

/// One render request issued to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfRequest {
    /// Id of the content region to render.
    pub target_region: String,
    /// Name of the delivered file.
    pub filename: String,
    /// Embed images instead of linking them.
    pub embed_images: bool,
    /// Raster resolution in dots per inch.
    pub resolution_dpi: u32,
    /// Page width in millimetres.
    pub page_width_mm: f64,
    /// Page height in millimetres.
    pub page_height_mm: f64,
}

impl PdfRequest {
    /// Build a request for `target_region` from settings.
    pub fn new(
        target_region: impl Into<String>,
        filename: impl Into<String>,
        settings: &PdfSettings,
    ) -> Self {
        Self {
            target_region: target_region.into(),
            filename: filename.into(),
            embed_images: settings.embed_images,
            resolution_dpi: settings.resolution_dpi,
            page_width_mm: settings.page_width_mm,
            page_height_mm: settings.page_height_mm,
        }
    }
}

/// Status reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfEvent {
    /// Formatting began.
    Started,
    /// The file was produced.
    Finished,
    /// Formatting failed with a message.
    Errored(String),
}

/// Where a single render attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfStatus {
    /// Issued, no event received yet.
    Idle,
    /// The engine is formatting.
    Started,
    /// The file was delivered.
    Finished,
    /// The attempt failed.
    Errored,
}

impl PdfStatus {
    /// Whether the attempt is over.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Errored)
    }
}

/// Side effect of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfEffect {
    /// Nothing to do.
    None,
    /// Show the busy indicator.
    ShowBusy,
    /// Hide the busy indicator; the engine delivers the file.
    HideBusy,
    /// Hide the busy indicator and consider a retry.
    HideBusyAndRetry,
}

/// Transition table of a render attempt.
///
/// An engine may error before it reports `Started`; that attempt is retried
/// like any other. Events that do not apply to the current status leave it
/// unchanged.
#[must_use]
pub fn transition(status: PdfStatus, event: &PdfEvent) -> (PdfStatus, PdfEffect) {
    match (status, event) {
        (PdfStatus::Idle, PdfEvent::Started) => (PdfStatus::Started, PdfEffect::ShowBusy),
        (PdfStatus::Started, PdfEvent::Finished) => (PdfStatus::Finished, PdfEffect::HideBusy),
        (PdfStatus::Idle | PdfStatus::Started, PdfEvent::Errored(_)) => {
            (PdfStatus::Errored, PdfEffect::HideBusyAndRetry)
        }
        (status, event) => {
            tracing::debug!(?status, ?event, "Ignoring PDF event");
            (status, PdfEffect::None)
        }
    }
}

/// Bounded automatic retry of errored renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// One retry after `delay`.
    #[must_use]
    pub const fn single(delay: Duration) -> Self {
        Self {
            max_retries: 1,
            delay,
        }
    }

    /// Whether another attempt is allowed after `retries` retries.
    #[must_use]
    pub const fn allows(&self, retries: u32) -> bool {
        retries < self.max_retries
    }

    /// Wait before re-issuing.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Renders a page region to PDF, reporting progress as a stream.
pub trait PdfEngine: Send + Sync {
    /// Issue `request`. The stream ends after a terminal event.
    fn render(&self, request: &PdfRequest) -> BoxStream<'static, PdfEvent>;
}

/// Asks the user to acknowledge a warning.
pub trait Confirm: Send + Sync {
    /// Returns `true` to proceed.
    fn confirm(&self, message: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(
            transition(PdfStatus::Idle, &PdfEvent::Started),
            (PdfStatus::Started, PdfEffect::ShowBusy)
        );
        assert_eq!(
            transition(PdfStatus::Started, &PdfEvent::Finished),
            (PdfStatus::Finished, PdfEffect::HideBusy)
        );
        assert_eq!(
            transition(PdfStatus::Started, &PdfEvent::Errored("timeout".into())),
            (PdfStatus::Errored, PdfEffect::HideBusyAndRetry)
        );
        assert_eq!(
            transition(PdfStatus::Idle, &PdfEvent::Errored("no printer".into())),
            (PdfStatus::Errored, PdfEffect::HideBusyAndRetry)
        );
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        assert_eq!(
            transition(PdfStatus::Idle, &PdfEvent::Finished),
            (PdfStatus::Idle, PdfEffect::None)
        );
        assert_eq!(
            transition(PdfStatus::Finished, &PdfEvent::Errored(String::new())),
            (PdfStatus::Finished, PdfEffect::None)
        );
        assert_eq!(
            transition(PdfStatus::Started, &PdfEvent::Started),
            (PdfStatus::Started, PdfEffect::None)
        );
    }

    #[test]
    fn test_single_retry_policy() {
        let policy = RetryPolicy::single(Duration::from_secs(1));
        assert!(policy.allows(0));
        assert!(!policy.allows(1));
    }

    #[test]
    fn test_request_from_settings() {
        let session: SessionId = "0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70".parse().unwrap();
        let request = PdfRequest::new("reports", pdf_filename(&session), &PdfSettings::default());
        assert_eq!(request.filename, "0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70.pdf");
        assert_eq!(request.resolution_dpi, 300);
        assert!(request.embed_images);
    }
}
