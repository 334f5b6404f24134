//! Page-scoped registry of viewer instances.

use std::sync::{Arc, Mutex, PoisonError};

use esi_model::{Molecule, viewport_id};
use indexmap::IndexMap;

use crate::instance::{LoadState, ViewerInstance};
use crate::loader::StructureLoader;
use crate::stage::StageFactory;

/// A still image of one loaded viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Display name of the molecule.
    pub display_name: String,
    /// PNG bytes.
    pub png: Vec<u8>,
}

/// Keyed cache of viewer instances for one page session.
///
/// Instances are created on first request for an index and kept for the life
/// of the registry. Index equality is the only identity criterion: a second
/// request for a known index returns the existing instance, whatever locator
/// or name it carries.
pub struct ViewerRegistry {
    loader: Arc<dyn StructureLoader>,
    stages: Arc<dyn StageFactory>,
    instances: Mutex<IndexMap<usize, Arc<ViewerInstance>>>,
}

impl ViewerRegistry {
    /// Create an empty registry.
    pub fn new(loader: Arc<dyn StructureLoader>, stages: Arc<dyn StageFactory>) -> Self {
        Self {
            loader,
            stages,
            instances: Mutex::new(IndexMap::new()),
        }
    }

    /// Get the viewer for `index`, creating and loading it on first request.
    ///
    /// The returned future resolves once the instance has reached `Loaded` or
    /// `Failed`. Callers racing on an index that is still loading await the
    /// same in-flight fetch.
    pub async fn get_or_create(
        &self,
        index: usize,
        source_url: &str,
        display_name: &str,
    ) -> Arc<ViewerInstance> {
        let instance = {
            let mut instances = self
                .instances
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(instances.entry(index).or_insert_with(|| {
                tracing::debug!(index, molecule = display_name, "Registering viewer");
                let stage = self.stages.create(&viewport_id(index));
                Arc::new(ViewerInstance::new(
                    index,
                    Molecule::new(display_name, source_url),
                    stage,
                ))
            }))
        };

        instance.ensure_loaded(self.loader.as_ref()).await;
        instance
    }

    /// Instance registered for `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arc<ViewerInstance>> {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&index)
            .cloned()
    }

    /// All instances in registration order.
    #[must_use]
    pub fn instances(&self) -> Vec<Arc<ViewerInstance>> {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of registered instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no instance has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capture every `Loaded` instance in registration order.
    ///
    /// Instances in any other state are skipped, as are stages whose capture
    /// fails.
    #[must_use]
    pub fn snapshot_all(&self) -> Vec<Snapshot> {
        let mut snapshots = Vec::new();
        for instance in self.instances() {
            match instance.snapshot() {
                Some(Ok(png)) => snapshots.push(Snapshot {
                    display_name: instance.display_name().to_string(),
                    png,
                }),
                Some(Err(e)) => tracing::warn!(
                    viewer = instance.mount_id(),
                    error = %e,
                    "Skipping viewer whose snapshot failed"
                ),
                None => tracing::debug!(
                    viewer = instance.mount_id(),
                    state = %instance.state(),
                    "Skipping viewer that is not loaded"
                ),
            }
        }
        snapshots
    }

    /// Count instances in a given state.
    #[must_use]
    pub fn count_in_state(&self, state: LoadState) -> usize {
        self.instances()
            .iter()
            .filter(|instance| instance.state() == state)
            .count()
    }
}

impl std::fmt::Debug for ViewerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerRegistry")
            .field("instances", &self.len())
            .finish_non_exhaustive()
    }
}
