//! Representation policy applied to every loaded structure.
//!
//! The rule set is fixed and ordered:
//!
//! 1. cartoon over everything (a no-op for structures without a backbone)
//! 2. licorice over everything, multiple bonds drawn symmetrically
//! 3. ball+stick over non-CHON atoms, with enlarged spheres
//! 4. element labels over non-CHON atoms
//!
//! Applying it is a pure function of the structure, so the same structure
//! always yields the same request sequence.

use esi_model::{Atom, AtomClass, Structure, normalize_symbol};
use serde::Serialize;

/// Geometry drawn by a representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryKind {
    /// Secondary-structure backbone.
    Cartoon,
    /// Bonds as sticks.
    Licorice,
    /// Atoms as spheres joined by sticks.
    BallAndStick,
    /// Text labels anchored on atoms.
    Label,
}

/// Atom predicate of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selector {
    /// Every atom.
    All,
    /// Atoms that are not C, H, N, or O.
    NonChon,
}

impl Selector {
    /// Whether an atom is selected.
    #[must_use]
    pub fn matches(&self, atom: &Atom) -> bool {
        match self {
            Self::All => true,
            Self::NonChon => atom.class() == AtomClass::NonChon,
        }
    }

    /// Resolve against a structure into atom indices.
    #[must_use]
    pub fn resolve(&self, structure: &Structure) -> Selection {
        Selection(
            structure
                .atoms()
                .iter()
                .enumerate()
                .filter(|(_, atom)| self.matches(atom))
                .map(|(i, _)| i)
                .collect(),
        )
    }
}

/// Indices of the atoms a representation covers, in structure order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// Selected atom indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Styling parameters of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Style {
    /// Default cartoon styling.
    Cartoon,
    /// Sticks; `multiple_bond_symmetric` draws double/triple bonds side by side.
    Licorice {
        /// Draw multiple bonds symmetrically around the bond axis.
        multiple_bond_symmetric: bool,
    },
    /// Spheres and sticks.
    BallAndStick {
        /// Sphere radius relative to the stick radius.
        aspect_ratio: f32,
        /// Draw multiple bonds symmetrically around the bond axis.
        multiple_bond_symmetric: bool,
    },
    /// Text labels.
    Label {
        /// Label offset from the atom center, in Angstrom.
        offset: [f32; 3],
        /// Draw a border around the label.
        show_border: bool,
        /// Border width in pixels.
        border_width: f32,
        /// Background opacity (0 to 1).
        background_opacity: f32,
    },
}

/// One entry of the fixed rule set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepresentationRule {
    /// Atoms the rule applies to.
    pub selector: Selector,
    /// Geometry drawn.
    pub kind: GeometryKind,
    /// Styling parameters.
    pub style: Style,
}

/// Sphere-to-stick ratio used to emphasize heteroatoms and metals.
pub const HETERO_ASPECT_RATIO: f32 = 2.5;

/// The ordered rule set applied to every structure.
pub const RULES: [RepresentationRule; 4] = [
    RepresentationRule {
        selector: Selector::All,
        kind: GeometryKind::Cartoon,
        style: Style::Cartoon,
    },
    RepresentationRule {
        selector: Selector::All,
        kind: GeometryKind::Licorice,
        style: Style::Licorice {
            multiple_bond_symmetric: true,
        },
    },
    RepresentationRule {
        selector: Selector::NonChon,
        kind: GeometryKind::BallAndStick,
        style: Style::BallAndStick {
            aspect_ratio: HETERO_ASPECT_RATIO,
            multiple_bond_symmetric: true,
        },
    },
    RepresentationRule {
        selector: Selector::NonChon,
        kind: GeometryKind::Label,
        style: Style::Label {
            offset: [0.0, 0.0, 2.0],
            show_border: true,
            border_width: 0.5,
            background_opacity: 0.5,
        },
    },
];

/// A rule resolved against one structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepresentationRequest {
    /// Geometry drawn.
    pub kind: GeometryKind,
    /// Selected atoms.
    pub selection: Selection,
    /// Styling parameters.
    pub style: Style,
    /// Label text per selected atom (label requests only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Label text for an atom: its element symbol in title case.
#[must_use]
pub fn label_text(atom: &Atom) -> String {
    normalize_symbol(atom.element.as_str())
}

/// Resolve the rule set against a structure.
#[must_use]
pub fn representations(structure: &Structure) -> Vec<RepresentationRequest> {
    RULES
        .iter()
        .map(|rule| {
            let selection = rule.selector.resolve(structure);
            let labels = if rule.kind == GeometryKind::Label {
                selection
                    .indices()
                    .iter()
                    .map(|&i| label_text(&structure.atoms()[i]))
                    .collect()
            } else {
                Vec::new()
            };
            RepresentationRequest {
                kind: rule.kind,
                selection,
                style: rule.style,
                labels,
            }
        })
        .collect()
}
