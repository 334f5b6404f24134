//! Backing stage of a viewer.
//!
//! A stage is the rendering surface bound to one mount point. Browser pages
//! back it with a WebGL engine; headless exports use [`crate::RasterStage`].

use std::sync::Arc;

use esi_model::Structure;

use crate::error::Result;
use crate::policy::RepresentationRequest;

/// Rendering surface bound to one viewer mount point.
pub trait Stage: Send {
    /// Add a representation of `structure`.
    fn add_representation(&mut self, structure: &Arc<Structure>, request: &RepresentationRequest);

    /// Fit the camera to the current content.
    fn auto_view(&mut self);

    /// Capture the current rendering as PNG bytes.
    fn snapshot(&self) -> Result<Vec<u8>>;
}

/// Creates stages for mount points.
pub trait StageFactory: Send + Sync {
    /// Create a stage bound to the element with id `mount_id`.
    fn create(&self, mount_id: &str) -> Box<dyn Stage>;
}
