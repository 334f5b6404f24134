//! Page rendering pipeline behind `esi render`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use esi_export::{DirectorySaver, ExportOrchestrator};
use esi_model::{Molecule, Report, SessionId};
use esi_report::{PageSession, PlaceholderResolver, Resolution, compose_page};
use esi_viewer::{DefaultLoader, LoadState, RasterStageFactory, ViewerRegistry};
use tracing::{Instrument, info, info_span};

use crate::settings::Settings;

/// Inputs of one render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Report markup files, in page order.
    pub reports: Vec<PathBuf>,
    /// Directory holding `{stem}.pdb` for every report.
    pub structures: PathBuf,
    /// Where the composed page is written.
    pub output: PathBuf,
    pub session: SessionId,
    /// Also load every viewer headlessly and save the image archive.
    pub images: bool,
}

/// One row of the render summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerRow {
    pub index: usize,
    pub molecule: String,
    /// Mount point, or `None` when the report has no viewer placeholder.
    pub mount_id: Option<String>,
    /// Load state, when viewers were loaded.
    pub state: Option<LoadState>,
    pub atoms: Option<usize>,
}

/// What a render produced.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub session: SessionId,
    pub page: PathBuf,
    pub archive: Option<PathBuf>,
    pub viewers: Vec<ViewerRow>,
}

/// Pair each report file with the structure named after its stem.
pub fn load_reports(paths: &[PathBuf], structures: &Path) -> Result<Vec<Report>> {
    paths
        .iter()
        .map(|path| {
            let markup = std::fs::read_to_string(path)
                .with_context(|| format!("read report {}", path.display()))?;
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| anyhow!("report path has no file name: {}", path.display()))?;
            let locator = structures.join(format!("{stem}.pdb"));
            Ok(Report::new(
                Molecule::new(stem, locator.display().to_string()),
                markup,
            ))
        })
        .collect()
}

/// Resolve placeholders, write the page and, when asked, the image archive.
pub async fn render(options: &RenderOptions, settings: &Settings) -> Result<RenderOutcome> {
    let span = info_span!("render", session = %options.session);
    render_page(options, settings).instrument(span).await
}

async fn render_page(options: &RenderOptions, settings: &Settings) -> Result<RenderOutcome> {
    let reports = load_reports(&options.reports, &options.structures)?;
    let resolution = PlaceholderResolver::new(settings.report.sentinel.clone()).resolve(reports);
    info!(
        reports = resolution.len(),
        viewers = resolution.intents().count(),
        "Resolved viewer placeholders"
    );

    let page = compose_page(&resolution);
    if let Some(parent) = options.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    std::fs::write(&options.output, page)
        .with_context(|| format!("write page {}", options.output.display()))?;

    let mut outcome = RenderOutcome {
        session: options.session,
        page: options.output.clone(),
        archive: None,
        viewers: rows(&resolution, None),
    };

    if options.images {
        let registry = Arc::new(ViewerRegistry::new(
            Arc::new(DefaultLoader::new()),
            Arc::new(RasterStageFactory::default()),
        ));
        let mut page_session = PageSession::new(Arc::clone(&registry));
        page_session.mount(&resolution);
        page_session.document_ready().await;

        let output_dir = options
            .output
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let orchestrator = ExportOrchestrator::new(
            Arc::clone(&registry),
            options.session,
            settings.export.clone(),
        )
        .context("configure exports")?
        .with_saver(Arc::new(DirectorySaver::new(output_dir)));

        let job = orchestrator
            .build_image_archive()
            .await
            .context("build image archive")?;
        outcome.archive = job.output_path();
        outcome.viewers = rows(&resolution, Some(registry.as_ref()));
    }

    Ok(outcome)
}

fn rows(resolution: &Resolution, registry: Option<&ViewerRegistry>) -> Vec<ViewerRow> {
    resolution
        .reports
        .iter()
        .map(|report| {
            let instance = registry
                .zip(report.intent.as_ref())
                .and_then(|(registry, intent)| registry.get(intent.index));
            ViewerRow {
                index: report.index,
                molecule: report.molecule.name.clone(),
                mount_id: report.intent.as_ref().map(|intent| intent.mount_id.clone()),
                state: instance.as_ref().map(|instance| instance.state()),
                atoms: instance
                    .as_ref()
                    .and_then(|instance| instance.structure().map(|s| s.len())),
            }
        })
        .collect()
}
