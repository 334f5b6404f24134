//! Data model for Supporting Information reports.
//!
//! A report session holds one sub-report per molecule. Each sub-report carries
//! the markup produced by the report generator and a locator for the molecule's
//! 3D structure, which the viewer crate fetches and renders.
//!
//! # Modules
//!
//! - `element` - element symbols and the CHON classification
//! - `structure` - atoms, structures, and the XYZ/PDB text blocks
//! - `pdb` - minimal PDB coordinate reader
//! - `report` - reports, molecules, and viewport identifiers
//! - `session` - session identifiers

pub mod element;
pub mod error;
pub mod pdb;
pub mod report;
pub mod session;
pub mod structure;

pub use element::{AtomClass, ElementSymbol, is_known_symbol, normalize_symbol};
pub use error::{ModelError, Result};
pub use report::{Molecule, Report, viewport_id};
pub use session::SessionId;
pub use structure::{Atom, Bounds, Structure};
