//! Integration tests for export actions.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use esi_export::{
    Clipboard, Confirm, DirectorySaver, DoiFlags, DoiTarget, DownloadTarget, ExportAction,
    ExportError, ExportOrchestrator, ExportSettings, JobState, Navigator, PdfEngine, PdfEvent,
    PdfRequest,
};
use esi_model::{Atom, ElementSymbol, SessionId, Structure};
use esi_viewer::{RepresentationRequest, Stage, StageFactory, StructureLoader, ViewerRegistry};
use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use reqwest::Url;
use tokio::time::Instant;

const SESSION: &str = "0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70";

struct Loader;

#[async_trait]
impl StructureLoader for Loader {
    async fn load(&self, locator: &str) -> esi_viewer::Result<Structure> {
        if locator.starts_with("missing") {
            return Err(esi_viewer::ViewerError::fetch(locator, "404 Not Found"));
        }
        Ok(Structure::new(vec![Atom::new(
            ElementSymbol::new("O").unwrap(),
            [0.0, 0.0, 0.0],
        )]))
    }
}

struct TagStage(String);

impl Stage for TagStage {
    fn add_representation(&mut self, _: &Arc<Structure>, _: &RepresentationRequest) {}

    fn auto_view(&mut self) {}

    fn snapshot(&self) -> esi_viewer::Result<Vec<u8>> {
        Ok(self.0.as_bytes().to_vec())
    }
}

struct TagFactory;

impl StageFactory for TagFactory {
    fn create(&self, mount_id: &str) -> Box<dyn Stage> {
        Box::new(TagStage(mount_id.to_string()))
    }
}

#[derive(Default)]
struct RecordingNavigator {
    visited: Mutex<Vec<Url>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &Url) {
        self.visited.lock().unwrap().push(url.clone());
    }
}

struct FakeClipboard {
    fail: bool,
    copied: Mutex<Vec<String>>,
    selection_cleared: AtomicBool,
}

impl FakeClipboard {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            copied: Mutex::new(Vec::new()),
            selection_cleared: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn copy_region(&self, region_id: &str) -> esi_export::Result<()> {
        if self.fail {
            return Err(ExportError::Clipboard("copy command unsupported".to_string()));
        }
        self.copied.lock().unwrap().push(region_id.to_string());
        Ok(())
    }

    fn clear_selection(&self) {
        self.selection_cleared.store(true, Ordering::SeqCst);
    }
}

/// Engine replaying one scripted event list per render call.
struct ScriptedEngine {
    attempts: Mutex<VecDeque<Vec<PdfEvent>>>,
    requests: Mutex<Vec<PdfRequest>>,
}

impl ScriptedEngine {
    fn new(attempts: Vec<Vec<PdfEvent>>) -> Self {
        Self {
            attempts: Mutex::new(attempts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl PdfEngine for ScriptedEngine {
    fn render(&self, request: &PdfRequest) -> BoxStream<'static, PdfEvent> {
        self.requests.lock().unwrap().push(request.clone());
        let events = self.attempts.lock().unwrap().pop_front().unwrap_or_default();
        stream::iter(events).boxed()
    }
}

struct Answer {
    accept: bool,
    asked: AtomicUsize,
}

impl Answer {
    fn new(accept: bool) -> Self {
        Self {
            accept,
            asked: AtomicUsize::new(0),
        }
    }
}

impl Confirm for Answer {
    fn confirm(&self, _message: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.accept
    }
}

fn session() -> SessionId {
    SESSION.parse().unwrap()
}

fn registry() -> Arc<ViewerRegistry> {
    Arc::new(ViewerRegistry::new(Arc::new(Loader), Arc::new(TagFactory)))
}

fn orchestrator(registry: Arc<ViewerRegistry>) -> ExportOrchestrator {
    ExportOrchestrator::new(registry, session(), ExportSettings::default()).unwrap()
}

fn zip_entries(path: &std::path::Path) -> Vec<(String, Vec<u8>)> {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

fn scripted(
    attempts: Vec<Vec<PdfEvent>>,
) -> (ExportOrchestrator, Arc<ScriptedEngine>, Arc<Answer>) {
    let engine = Arc::new(ScriptedEngine::new(attempts));
    let answer = Arc::new(Answer::new(true));
    let orchestrator = orchestrator(registry()).with_pdf_engine(engine.clone(), answer.clone());
    (orchestrator, engine, answer)
}

#[tokio::test]
async fn test_archive_skips_failed_viewers() {
    let registry = registry();
    registry.get_or_create(0, "benzene.pdb", "benzene").await;
    registry.get_or_create(1, "missing.pdb", "broken").await;
    registry.get_or_create(2, "water.pdb", "water").await;

    let temp = tempfile::tempdir().unwrap();
    let orchestrator =
        orchestrator(registry).with_saver(Arc::new(DirectorySaver::new(temp.path())));

    let job = orchestrator.run(ExportAction::ImageArchive).await.unwrap();

    assert_eq!(job.state, JobState::Succeeded);
    let path = job.output_path().unwrap();
    assert_eq!(path, temp.path().join(format!("{SESSION}_images.zip")));
    assert_eq!(
        zip_entries(&path),
        vec![
            ("benzene.png".to_string(), b"viewport0".to_vec()),
            ("water.png".to_string(), b"viewport2".to_vec()),
        ]
    );
    assert!(!orchestrator.busy().is_shown());
}

#[tokio::test]
async fn test_archive_without_viewers_is_empty() {
    let temp = tempfile::tempdir().unwrap();
    let orchestrator =
        orchestrator(registry()).with_saver(Arc::new(DirectorySaver::new(temp.path())));

    let job = orchestrator.build_image_archive().await.unwrap();

    assert!(zip_entries(&job.output_path().unwrap()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pdf_retries_once_then_finishes() {
    let (orchestrator, engine, _) = scripted(vec![
        vec![PdfEvent::Started, PdfEvent::Errored("timeout".to_string())],
        vec![PdfEvent::Started, PdfEvent::Finished],
    ]);
    let rx = orchestrator.busy().subscribe();

    let start = Instant::now();
    let job = orchestrator.run(ExportAction::Pdf).await.unwrap();

    assert_eq!(job.state, JobState::Succeeded);
    assert_eq!(job.retries, 1);
    assert_eq!(engine.calls(), 2);
    assert!(!*rx.borrow());
    assert!(start.elapsed() >= Duration::from_millis(1000));

    let requests = engine.requests.lock().unwrap();
    assert_eq!(requests[0], requests[1]);
    assert_eq!(requests[0].target_region, "reports");
    assert_eq!(requests[0].filename, format!("{SESSION}.pdf"));
}

#[tokio::test(start_paused = true)]
async fn test_pdf_gives_up_after_one_retry() {
    let errored = || vec![PdfEvent::Started, PdfEvent::Errored("crash".to_string())];
    let (orchestrator, engine, _) = scripted(vec![errored(), errored(), errored()]);

    let job = orchestrator.render_pdf().await.unwrap();

    assert_eq!(job.state, JobState::Failed);
    assert_eq!(job.retries, 1);
    assert_eq!(engine.calls(), 2);
    assert!(!orchestrator.busy().is_shown());
}

#[tokio::test(start_paused = true)]
async fn test_pdf_error_before_start_is_retried() {
    let (orchestrator, engine, _) = scripted(vec![
        vec![PdfEvent::Errored("engine not ready".to_string())],
        vec![PdfEvent::Started, PdfEvent::Finished],
    ]);

    let job = orchestrator.render_pdf().await.unwrap();

    assert_eq!(job.state, JobState::Succeeded);
    assert_eq!(job.retries, 1);
    assert_eq!(engine.calls(), 2);
    assert!(!orchestrator.busy().is_shown());
}

#[tokio::test]
async fn test_pdf_declined_has_no_effect() {
    let engine = Arc::new(ScriptedEngine::new(Vec::new()));
    let answer = Arc::new(Answer::new(false));
    let orchestrator = orchestrator(registry()).with_pdf_engine(engine.clone(), answer.clone());

    let job = orchestrator.render_pdf().await.unwrap();

    assert_eq!(job.state, JobState::Idle);
    assert_eq!(answer.asked.load(Ordering::SeqCst), 1);
    assert_eq!(engine.calls(), 0);
    assert!(!orchestrator.busy().is_shown());
}

#[tokio::test]
async fn test_pdf_stream_ending_early_fails() {
    let (orchestrator, _, _) = scripted(vec![vec![PdfEvent::Started]]);

    let job = orchestrator.render_pdf().await.unwrap();

    assert_eq!(job.state, JobState::Failed);
    assert_eq!(job.retries, 0);
    assert!(!orchestrator.busy().is_shown());
}

#[tokio::test(start_paused = true)]
async fn test_clipboard_success_clears_selection_and_busy() {
    let clipboard = Arc::new(FakeClipboard::new(false));
    let orchestrator = orchestrator(registry()).with_clipboard(clipboard.clone());
    let min_busy = ExportSettings::default().min_busy();

    let start = Instant::now();
    let job = orchestrator.run(ExportAction::CopyReports).await.unwrap();

    assert_eq!(job.state, JobState::Succeeded);
    assert_eq!(*clipboard.copied.lock().unwrap(), vec!["reports".to_string()]);
    assert!(clipboard.selection_cleared.load(Ordering::SeqCst));
    assert!(!orchestrator.busy().is_shown());
    assert!(start.elapsed() >= min_busy);
    assert!(start.elapsed() < min_busy + Duration::from_millis(10));
}

#[tokio::test]
async fn test_clipboard_failure_keeps_busy_shown() {
    let clipboard = Arc::new(FakeClipboard::new(true));
    let orchestrator = orchestrator(registry()).with_clipboard(clipboard.clone());

    let job = orchestrator.copy_to_clipboard().await.unwrap();

    assert_eq!(job.state, JobState::Failed);
    assert!(job.error.unwrap().contains("unsupported"));
    assert!(!clipboard.selection_cleared.load(Ordering::SeqCst));
    assert!(orchestrator.busy().is_shown());
}

#[tokio::test]
async fn test_clipboard_unavailable() {
    let err = orchestrator(registry()).copy_to_clipboard().await.unwrap_err();
    assert!(matches!(err, ExportError::Unavailable(_)));
}

#[tokio::test]
async fn test_downloads_and_doi_targets() {
    let settings = ExportSettings {
        base_url: "https://si.example.org/".to_string(),
        doi: DoiFlags {
            zenodo: true,
            ..DoiFlags::default()
        },
        ..ExportSettings::default()
    };
    let navigator = Arc::new(RecordingNavigator::default());
    let orchestrator = ExportOrchestrator::new(registry(), session(), settings)
        .unwrap()
        .with_template("default")
        .with_navigator(navigator.clone());

    orchestrator
        .run(ExportAction::Download(DownloadTarget::Archive))
        .await
        .unwrap();
    orchestrator
        .run(ExportAction::Publish(DoiTarget::Zenodo))
        .await
        .unwrap();
    let err = orchestrator
        .run(ExportAction::Publish(DoiTarget::Gist))
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::TargetDisabled("gist")));
    let visited: Vec<String> = navigator
        .visited
        .lock()
        .unwrap()
        .iter()
        .map(|url| url.to_string())
        .collect();
    assert_eq!(
        visited,
        vec![
            format!("https://si.example.org/reports/{SESSION}/zip?template=default"),
            format!("https://si.example.org/reports/{SESSION}/zenodo?template=default"),
        ]
    );
}

#[test]
fn test_available_actions_follow_flags() {
    let orchestrator = orchestrator(registry());
    let actions = orchestrator.available_actions();

    assert_eq!(actions.len(), DownloadTarget::ALL.len() + 1);
    assert!(!actions.iter().any(|a| matches!(a, ExportAction::Publish(_))));
    assert!(!actions.contains(&ExportAction::Pdf));
    assert_eq!(actions.last(), Some(&ExportAction::ImageArchive));
}
