//! Dispatch of user-triggered export actions.

use std::sync::Arc;
use std::time::Duration;

use esi_model::SessionId;
use esi_report::CONTENT_REGION_ID;
use esi_viewer::ViewerRegistry;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::archive::{archive_filename, build_archive};
use crate::busy::BusyIndicator;
use crate::clipboard::Clipboard;
use crate::error::{ExportError, Result};
use crate::job::{ExportJob, JobKind};
use crate::navigator::{Navigator, OpenNavigator};
use crate::pdf::{
    Confirm, PDF_WARNING, PdfEffect, PdfEngine, PdfRequest, PdfSettings, PdfStatus, RetryPolicy,
    pdf_filename, transition,
};
use crate::routes::{DoiFlags, DoiTarget, DownloadTarget, ReportRoutes};
use crate::save::{DirectorySaver, FileSaver};

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Origin serving the report endpoints.
    pub base_url: String,
    /// Minimum time the busy indicator stays visible, in milliseconds.
    pub min_busy_ms: u64,
    /// PDF page layout, quality and retry delay.
    pub pdf: PdfSettings,
    /// Which DOI targets are offered.
    pub doi: DoiFlags,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/".to_string(),
            min_busy_ms: 500,
            pdf: PdfSettings::default(),
            doi: DoiFlags::default(),
        }
    }
}

impl ExportSettings {
    /// Minimum busy-indicator visibility.
    #[must_use]
    pub fn min_busy(&self) -> Duration {
        Duration::from_millis(self.min_busy_ms)
    }

    /// Delay before the automatic PDF retry.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.pdf.retry_delay_ms)
    }
}

/// A user-triggerable export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportAction {
    /// Fetch one of the report download formats.
    Download(DownloadTarget),
    /// Publish the reports to a DOI provider.
    Publish(DoiTarget),
    /// Save every loaded viewer as a PNG inside one ZIP.
    ImageArchive,
    /// Copy the report region to the clipboard.
    CopyReports,
    /// Render the report region to PDF.
    Pdf,
}

impl ExportAction {
    /// Get a human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Download(target) => target.label(),
            Self::Publish(target) => target.label(),
            Self::ImageArchive => "Images (ZIP)",
            Self::CopyReports => "Copy to clipboard",
            Self::Pdf => "PDF",
        }
    }

    /// Kind of job the action runs as.
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        match self {
            Self::Download(_) | Self::Publish(_) => JobKind::DirectDownload,
            Self::ImageArchive => JobKind::ArchiveBuild,
            Self::CopyReports => JobKind::ClipboardCopy,
            Self::Pdf => JobKind::PdfRender,
        }
    }
}

/// Runs export actions for one page session.
///
/// Actions are independent and may run in any order. Those that take time
/// drive the shared [`BusyIndicator`].
pub struct ExportOrchestrator {
    registry: Arc<ViewerRegistry>,
    session: SessionId,
    routes: ReportRoutes,
    settings: ExportSettings,
    template: Option<String>,
    busy: BusyIndicator,
    navigator: Arc<dyn Navigator>,
    saver: Arc<dyn FileSaver>,
    clipboard: Option<Arc<dyn Clipboard>>,
    pdf: Option<(Arc<dyn PdfEngine>, Arc<dyn Confirm>)>,
}

impl ExportOrchestrator {
    /// Create an orchestrator that opens locators with the default handler
    /// and saves files into the working directory.
    pub fn new(
        registry: Arc<ViewerRegistry>,
        session: SessionId,
        settings: ExportSettings,
    ) -> Result<Self> {
        let routes = ReportRoutes::new(&settings.base_url, &session)?;
        Ok(Self {
            registry,
            session,
            routes,
            settings,
            template: None,
            busy: BusyIndicator::new(),
            navigator: Arc::new(OpenNavigator),
            saver: Arc::new(DirectorySaver::new(".")),
            clipboard: None,
            pdf: None,
        })
    }

    /// Use `template` for endpoints that render through one.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    #[must_use]
    pub fn with_saver(mut self, saver: Arc<dyn FileSaver>) -> Self {
        self.saver = saver;
        self
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Enable PDF output, gated by `confirm`.
    #[must_use]
    pub fn with_pdf_engine(
        mut self,
        engine: Arc<dyn PdfEngine>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        self.pdf = Some((engine, confirm));
        self
    }

    /// Share an existing busy indicator.
    #[must_use]
    pub fn with_busy_indicator(mut self, busy: BusyIndicator) -> Self {
        self.busy = busy;
        self
    }

    /// The busy indicator driven by this orchestrator.
    #[must_use]
    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    /// Endpoint routes of the session.
    #[must_use]
    pub fn routes(&self) -> &ReportRoutes {
        &self.routes
    }

    /// Actions offered for this session, in menu order.
    ///
    /// Disabled DOI targets are left out, as are clipboard and PDF when no
    /// backend is configured.
    #[must_use]
    pub fn available_actions(&self) -> Vec<ExportAction> {
        let mut actions: Vec<ExportAction> = DownloadTarget::ALL
            .into_iter()
            .map(ExportAction::Download)
            .collect();
        actions.extend(self.settings.doi.enabled().map(ExportAction::Publish));
        actions.push(ExportAction::ImageArchive);
        if self.clipboard.is_some() {
            actions.push(ExportAction::CopyReports);
        }
        if self.pdf.is_some() {
            actions.push(ExportAction::Pdf);
        }
        actions
    }

    /// Run one action to completion.
    pub async fn run(&self, action: ExportAction) -> Result<ExportJob> {
        tracing::info!(action = action.label(), session = %self.session, "Export requested");
        match action {
            ExportAction::Download(target) => self.download(target),
            ExportAction::Publish(target) => self.publish(target),
            ExportAction::ImageArchive => self.build_image_archive().await,
            ExportAction::CopyReports => self.copy_to_clipboard().await,
            ExportAction::Pdf => self.render_pdf().await,
        }
    }

    /// Hand a download locator to the navigator.
    pub fn download(&self, target: DownloadTarget) -> Result<ExportJob> {
        let url = self.routes.download(target, self.template.as_deref())?;
        Ok(self.navigate(url))
    }

    /// Hand a DOI publication locator to the navigator.
    pub fn publish(&self, target: DoiTarget) -> Result<ExportJob> {
        if !self.settings.doi.is_enabled(target) {
            return Err(ExportError::TargetDisabled(target.slug()));
        }
        let url = self.routes.doi(target, self.template.as_deref())?;
        Ok(self.navigate(url))
    }

    fn navigate(&self, url: reqwest::Url) -> ExportJob {
        let mut job = ExportJob::new(JobKind::DirectDownload);
        job.start();
        self.navigator.navigate(&url);
        job.succeed(Some(url.into()));
        job
    }

    /// Package every loaded viewer's snapshot into one ZIP and save it.
    ///
    /// Viewers that failed or never loaded are left out; with none loaded the
    /// archive is empty.
    pub async fn build_image_archive(&self) -> Result<ExportJob> {
        let mut job = ExportJob::new(JobKind::ArchiveBuild);
        job.start();
        self.busy.show();

        let result = self.write_image_archive().await;
        match result {
            Ok((path, entries)) => {
                self.busy.clear_after(self.settings.min_busy()).await;
                tracing::info!(path = %path, entries, "Image archive saved");
                job.succeed(Some(path));
                Ok(job)
            }
            Err(e) => {
                self.busy.hide();
                tracing::warn!(error = %e, "Image archive failed");
                Err(e)
            }
        }
    }

    async fn write_image_archive(&self) -> Result<(String, usize)> {
        let snapshots = self.registry.snapshot_all();
        let entries = snapshots.len();
        let bytes = tokio::task::spawn_blocking(move || build_archive(&snapshots)).await??;
        let path = self
            .saver
            .save(&archive_filename(&self.session), bytes)
            .await?;
        Ok((path.display().to_string(), entries))
    }

    /// Copy the report region to the clipboard.
    ///
    /// A failed copy is not retried and leaves the busy indicator shown.
    pub async fn copy_to_clipboard(&self) -> Result<ExportJob> {
        let clipboard = self
            .clipboard
            .as_ref()
            .ok_or(ExportError::Unavailable("clipboard"))?;

        let mut job = ExportJob::new(JobKind::ClipboardCopy);
        job.start();
        self.busy.show();

        match clipboard.copy_region(CONTENT_REGION_ID).await {
            Ok(()) => {
                clipboard.clear_selection();
                self.busy.clear_after(self.settings.min_busy()).await;
                tracing::info!(region = CONTENT_REGION_ID, "Reports copied to clipboard");
                job.succeed(None);
            }
            Err(e) => {
                tracing::warn!(region = CONTENT_REGION_ID, error = %e, "Clipboard copy failed");
                job.fail(e.to_string());
            }
        }
        Ok(job)
    }

    /// Render the report region to PDF after the user confirms.
    ///
    /// Declining returns the job untouched in `Idle`. An errored render is
    /// re-issued once after the configured delay.
    pub async fn render_pdf(&self) -> Result<ExportJob> {
        let (engine, confirm) = self
            .pdf
            .as_ref()
            .ok_or(ExportError::Unavailable("PDF rendering"))?;

        let mut job = ExportJob::new(JobKind::PdfRender);
        if !confirm.confirm(PDF_WARNING) {
            tracing::info!("PDF export declined");
            return Ok(job);
        }

        let policy = RetryPolicy::single(self.settings.retry_delay());
        let request = PdfRequest::new(
            CONTENT_REGION_ID,
            pdf_filename(&self.session),
            &self.settings.pdf,
        );
        job.start();

        loop {
            match self.render_attempt(engine.as_ref(), &request).await {
                PdfStatus::Finished => {
                    tracing::info!(
                        filename = %request.filename,
                        retries = job.retries,
                        "PDF rendered"
                    );
                    job.succeed(Some(request.filename.clone()));
                    return Ok(job);
                }
                PdfStatus::Errored if policy.allows(job.retries) => {
                    job.record_retry();
                    tracing::warn!(delay = ?policy.delay(), "PDF render errored, retrying");
                    tokio::time::sleep(policy.delay()).await;
                }
                PdfStatus::Errored => {
                    tracing::warn!(retries = job.retries, "PDF render failed");
                    job.fail("PDF rendering failed");
                    return Ok(job);
                }
                status @ (PdfStatus::Idle | PdfStatus::Started) => {
                    self.busy.hide();
                    tracing::warn!(?status, "PDF engine stopped before finishing");
                    job.fail("PDF engine stopped before finishing");
                    return Ok(job);
                }
            }
        }
    }

    async fn render_attempt(&self, engine: &dyn PdfEngine, request: &PdfRequest) -> PdfStatus {
        let mut status = PdfStatus::Idle;
        let mut events = engine.render(request);

        while let Some(event) = events.next().await {
            let (next, effect) = transition(status, &event);
            match effect {
                PdfEffect::ShowBusy => self.busy.show(),
                PdfEffect::HideBusy | PdfEffect::HideBusyAndRetry => self.busy.hide(),
                PdfEffect::None => {}
            }
            status = next;
            if status.is_terminal() {
                break;
            }
        }
        status
    }
}

impl std::fmt::Debug for ExportOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportOrchestrator")
            .field("session", &self.session)
            .field("settings", &self.settings)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: ExportSettings = serde_json::from_str(r#"{"min_busy_ms": 250}"#).unwrap();
        assert_eq!(settings.min_busy(), Duration::from_millis(250));
        assert_eq!(settings.base_url, "http://localhost:5000/");
        assert_eq!(settings.pdf, PdfSettings::default());
        assert!(!settings.doi.gist);
    }

    #[test]
    fn test_action_kinds() {
        assert_eq!(
            ExportAction::Publish(DoiTarget::Zenodo).kind(),
            JobKind::DirectDownload
        );
        assert_eq!(ExportAction::ImageArchive.kind(), JobKind::ArchiveBuild);
        assert_eq!(ExportAction::Download(DownloadTarget::Cml).label(), "CML");
    }
}
