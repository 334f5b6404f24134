//! A single molecule viewer and its load lifecycle.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use esi_model::{Molecule, Structure, viewport_id};
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::loader::StructureLoader;
use crate::policy;
use crate::stage::Stage;

/// Load lifecycle of a viewer.
///
/// Moves `Unloaded -> Loading -> Loaded | Failed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Created, fetch not started.
    Unloaded,
    /// Fetch in flight.
    Loading,
    /// Structure loaded and representations applied.
    Loaded,
    /// Fetch or parse failed; nothing was rendered.
    Failed,
}

impl LoadState {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unloaded => "Unloaded",
            Self::Loading => "Loading",
            Self::Loaded => "Loaded",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One molecule viewer bound to a mount point.
pub struct ViewerInstance {
    index: usize,
    mount_id: String,
    molecule: Molecule,
    state: Mutex<LoadState>,
    stage: Mutex<Box<dyn Stage>>,
    structure: OnceLock<Arc<Structure>>,
    load: OnceCell<()>,
}

impl ViewerInstance {
    pub(crate) fn new(index: usize, molecule: Molecule, stage: Box<dyn Stage>) -> Self {
        Self {
            index,
            mount_id: viewport_id(index),
            molecule,
            state: Mutex::new(LoadState::Unloaded),
            stage: Mutex::new(stage),
            structure: OnceLock::new(),
            load: OnceCell::new(),
        }
    }

    /// Position of the molecule's report on the page.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the mount-point element.
    #[must_use]
    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// The molecule shown.
    #[must_use]
    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    /// Display name of the molecule.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.molecule.name
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        *lock(&self.state)
    }

    /// The loaded structure, once `Loaded`.
    #[must_use]
    pub fn structure(&self) -> Option<&Arc<Structure>> {
        self.structure.get()
    }

    /// Capture the stage, or `None` unless `Loaded`.
    pub fn snapshot(&self) -> Option<Result<Vec<u8>>> {
        if self.state() != LoadState::Loaded {
            return None;
        }
        Some(lock(&self.stage).snapshot())
    }

    /// Run the load exactly once; concurrent callers await the same load.
    pub(crate) async fn ensure_loaded(&self, loader: &dyn StructureLoader) {
        self.load
            .get_or_init(|| async {
                self.set_state(LoadState::Loading);
                match loader.load(&self.molecule.locator).await {
                    Ok(structure) => self.apply(Arc::new(structure)),
                    Err(e) => {
                        tracing::warn!(
                            viewer = %self.mount_id,
                            molecule = %self.molecule.name,
                            error = %e,
                            "Structure load failed"
                        );
                        self.set_state(LoadState::Failed);
                    }
                }
            })
            .await;
    }

    fn apply(&self, structure: Arc<Structure>) {
        let requests = policy::representations(&structure);
        {
            let mut stage = lock(&self.stage);
            for request in &requests {
                stage.add_representation(&structure, request);
            }
            stage.auto_view();
        }
        tracing::info!(
            viewer = %self.mount_id,
            molecule = %self.molecule.name,
            atoms = structure.len(),
            "Viewer loaded"
        );
        if self.structure.set(structure).is_err() {
            tracing::warn!(viewer = %self.mount_id, "Structure already set");
        }
        self.set_state(LoadState::Loaded);
    }

    fn set_state(&self, state: LoadState) {
        *lock(&self.state) = state;
    }
}

impl std::fmt::Debug for ViewerInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerInstance")
            .field("index", &self.index)
            .field("mount_id", &self.mount_id)
            .field("molecule", &self.molecule)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
