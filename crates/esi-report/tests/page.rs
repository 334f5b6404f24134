//! Integration tests for page sessions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use esi_model::{Atom, ElementSymbol, Molecule, Report, Structure};
use esi_report::{PageSession, PlaceholderResolver};
use esi_viewer::{
    LoadState, RepresentationRequest, Result, Stage, StageFactory, StructureLoader, ViewerError,
    ViewerRegistry,
};

struct PathLoader;

#[async_trait]
impl StructureLoader for PathLoader {
    async fn load(&self, locator: &str) -> Result<Structure> {
        if locator.contains("missing") {
            return Err(ViewerError::fetch(locator, "404 Not Found"));
        }
        Ok(Structure::new(vec![Atom::new(
            ElementSymbol::new("C").unwrap(),
            [0.0, 0.0, 0.0],
        )]))
    }
}

struct NullStage;

impl Stage for NullStage {
    fn add_representation(&mut self, _: &Arc<Structure>, _: &RepresentationRequest) {}

    fn auto_view(&mut self) {}

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct CountingFactory {
    created: Mutex<Vec<String>>,
}

impl StageFactory for CountingFactory {
    fn create(&self, mount_id: &str) -> Box<dyn Stage> {
        self.created.lock().unwrap().push(mount_id.to_string());
        Box::new(NullStage)
    }
}

fn report(name: &str, markup: &str) -> Report {
    Report::new(Molecule::new(name, format!("{name}.pdb")), markup)
}

#[tokio::test]
async fn test_document_ready_registers_in_report_order() {
    let factory = Arc::new(CountingFactory::default());
    let registry = Arc::new(ViewerRegistry::new(Arc::new(PathLoader), factory.clone()));
    let resolution = PlaceholderResolver::default().resolve(vec![
        report("a", "{{ viewer3d }}"),
        report("plain", "no viewer"),
        report("missing", "{{ viewer3d }}"),
        report("c", "{{ viewer3d }}"),
    ]);

    let mut session = PageSession::new(Arc::clone(&registry));
    session.mount(&resolution);
    assert_eq!(session.pending(), 3);
    assert!(registry.is_empty());

    let instances = session.document_ready().await;

    assert_eq!(session.pending(), 0);
    let ids: Vec<&str> = instances.iter().map(|i| i.mount_id()).collect();
    assert_eq!(ids, vec!["viewport0", "viewport2", "viewport3"]);
    assert_eq!(
        *factory.created.lock().unwrap(),
        vec!["viewport0", "viewport2", "viewport3"]
    );
    assert_eq!(registry.count_in_state(LoadState::Loaded), 2);
    assert_eq!(registry.count_in_state(LoadState::Failed), 1);
}

#[tokio::test]
async fn test_document_ready_twice_reuses_instances() {
    let registry = Arc::new(ViewerRegistry::new(
        Arc::new(PathLoader),
        Arc::new(CountingFactory::default()),
    ));
    let resolution = PlaceholderResolver::default().resolve(vec![report("a", "{{ viewer3d }}")]);

    let mut session = PageSession::new(Arc::clone(&registry));
    session.mount(&resolution);
    let first = session.document_ready().await;
    session.mount(&resolution);
    let second = session.document_ready().await;

    assert!(Arc::ptr_eq(&first[0], &second[0]));
    assert_eq!(registry.len(), 1);
}
