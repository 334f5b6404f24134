//! Molecular structures as loaded by the viewer.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::element::{AtomClass, ElementSymbol};

/// A single atom: element and cartesian position in Angstrom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Element symbol.
    pub element: ElementSymbol,
    /// Cartesian coordinates.
    pub position: [f64; 3],
}

impl Atom {
    /// Create a new atom.
    pub fn new(element: ElementSymbol, position: [f64; 3]) -> Self {
        Self { element, position }
    }

    /// CHON classification of this atom.
    #[must_use]
    pub fn class(&self) -> AtomClass {
        self.element.class()
    }
}

/// Axis-aligned bounding box of a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl Bounds {
    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Largest extent along any axis.
    #[must_use]
    pub fn extent(&self) -> f64 {
        (0..3)
            .map(|axis| self.max[axis] - self.min[axis])
            .fold(0.0, f64::max)
    }
}

/// An ordered collection of atoms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    atoms: Vec<Atom>,
}

impl Structure {
    /// Create a structure from atoms in file order.
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Atoms in file order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Number of atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the structure has no atoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Bounding box, or `None` for an empty structure.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.atoms.first()?;
        let mut bounds = Bounds {
            min: first.position,
            max: first.position,
        };
        for atom in &self.atoms[1..] {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(atom.position[axis]);
                bounds.max[axis] = bounds.max[axis].max(atom.position[axis]);
            }
        }
        Some(bounds)
    }

    /// Cartesian block: one `symbol x y z` line per atom.
    #[must_use]
    pub fn xyz_block(&self) -> String {
        self.atoms
            .iter()
            .map(|atom| {
                let [x, y, z] = atom.position;
                format!(
                    "{:6} {} {} {}",
                    atom.element.as_str(),
                    space_signed(x),
                    space_signed(y),
                    space_signed(z)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// PDB block with one fixed-column record per atom.
    ///
    /// Atoms of C, H, O, N, P, S are written as `ATOM`, everything else as
    /// `HETATM`. Atom names are the element followed by a per-element counter.
    #[must_use]
    pub fn pdb_block(&self) -> String {
        let mut out = String::from("TITLE unknown\nMODEL 1\n");
        let mut counter: HashMap<&str, usize> = HashMap::new();

        for (i, atom) in self.atoms.iter().enumerate() {
            let symbol = atom.element.as_str();
            let field = if atom.element.is_standard_residue_element() {
                "ATOM"
            } else {
                "HETATM"
            };
            let count = counter.entry(symbol).or_insert(0);
            *count += 1;
            let name = format!("{symbol}{count}");
            let [x, y, z] = atom.position;

            let _ = writeln!(
                out,
                "{:<6}{:>5} {:^4}{:<1}{:<3} {:<1}{:>4}{:<1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:>2}",
                field,
                i + 1,
                name,
                "",
                "UNK",
                "",
                1,
                "",
                x,
                y,
                z,
                1.0,
                0.0,
                symbol,
                ""
            );
        }

        out.push_str("ENDMDL\nEND\n");
        out
    }
}

/// Fixed-point with a leading space for non-negative values, width 10.
fn space_signed(value: f64) -> String {
    let body = if value.is_sign_negative() {
        format!("{value:.6}")
    } else {
        format!(" {value:.6}")
    };
    format!("{body:>10}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(symbol: &str, position: [f64; 3]) -> Atom {
        Atom::new(ElementSymbol::new(symbol).unwrap(), position)
    }

    #[test]
    fn test_xyz_block() {
        let structure = Structure::new(vec![
            atom("C", [0.0, 1.5, -2.25]),
            atom("Fe", [123.456789, 0.0, 0.0]),
        ]);
        let block = structure.xyz_block();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "C        0.000000   1.500000  -2.250000");
        assert_eq!(lines[1], "Fe      123.456789   0.000000   0.000000");
    }

    #[test]
    fn test_pdb_block_records() {
        let structure = Structure::new(vec![
            atom("C", [0.0, 0.0, 0.0]),
            atom("Fe", [1.0, -2.5, 3.25]),
            atom("C", [1.5, 0.0, 0.0]),
        ]);
        let block = structure.pdb_block();
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "TITLE unknown");
        assert_eq!(lines[1], "MODEL 1");
        assert!(lines[2].starts_with("ATOM      1  C1 "));
        assert!(lines[3].starts_with("HETATM    2 Fe1 "));
        assert!(lines[4].starts_with("ATOM      3  C2 "));
        assert_eq!(&lines[3][30..54], "   1.000  -2.500   3.250");
        assert_eq!(lines[3][76..78].trim(), "Fe");
        assert_eq!(lines[5], "ENDMDL");
        assert_eq!(lines[6], "END");
        assert!(block.ends_with("END\n"));
    }

    #[test]
    fn test_bounds() {
        assert!(Structure::default().bounds().is_none());
        let structure = Structure::new(vec![
            atom("C", [-1.0, 0.0, 2.0]),
            atom("O", [3.0, 4.0, -2.0]),
        ]);
        let bounds = structure.bounds().unwrap();
        assert_eq!(bounds.min, [-1.0, 0.0, -2.0]);
        assert_eq!(bounds.max, [3.0, 4.0, 2.0]);
        assert_eq!(bounds.center(), [1.0, 2.0, 0.0]);
        assert_eq!(bounds.extent(), 4.0);
    }
}
