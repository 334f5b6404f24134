//! Per-molecule 3D viewers for Supporting Information reports.
//!
//! Every molecule shown on a report page gets one [`ViewerInstance`], created
//! lazily through [`ViewerRegistry::get_or_create`] and addressed by the
//! position of its report in the page. Loading fetches the structure through a
//! [`StructureLoader`], applies the fixed representation sequence from
//! [`policy`], and fits the camera.
//!
//! Rendering is delegated to a [`Stage`]. [`RasterStage`] is a headless stage
//! that draws an orthographic projection to PNG, which is enough for image
//! exports without a browser.

pub mod error;
pub mod instance;
pub mod loader;
pub mod policy;
pub mod raster;
pub mod registry;
pub mod stage;

pub use error::{Result, ViewerError};
pub use instance::{LoadState, ViewerInstance};
pub use loader::{DefaultLoader, StructureLoader};
pub use policy::{
    GeometryKind, RepresentationRequest, RepresentationRule, Selection, Selector, Style,
    representations,
};
pub use raster::{RasterStage, RasterStageFactory};
pub use registry::{Snapshot, ViewerRegistry};
pub use stage::{Stage, StageFactory};
