//! Reports and the molecules they describe.

use serde::{Deserialize, Serialize};

/// Identifier of the viewer mount point for the report at `index`.
#[must_use]
pub fn viewport_id(index: usize) -> String {
    format!("viewport{index}")
}

/// A molecule shown in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Molecule {
    /// Display name, usually the input file stem.
    pub name: String,
    /// URL or filesystem path of the structure file.
    pub locator: String,
}

impl Molecule {
    /// Create a new molecule.
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
        }
    }
}

/// One per-molecule sub-report as produced by the report generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The molecule this report describes.
    pub molecule: Molecule,
    /// Rendered report markup, possibly containing the viewer sentinel.
    pub markup: String,
}

impl Report {
    /// Create a new report.
    pub fn new(molecule: Molecule, markup: impl Into<String>) -> Self {
        Self {
            molecule,
            markup: markup.into(),
        }
    }
}
