//! Minimal PDB coordinate reader.
//!
//! Only `ATOM` and `HETATM` records are read, and only the element and the
//! coordinates are kept. That is all the viewer needs to classify atoms and
//! place them; residues, bonds, and alternate locations are ignored.

use crate::element::{ElementSymbol, is_known_symbol};
use crate::error::{ModelError, Result};
use crate::structure::{Atom, Structure};

const ATOM_NAME: std::ops::Range<usize> = 12..16;
const COORD_X: std::ops::Range<usize> = 30..38;
const COORD_Y: std::ops::Range<usize> = 38..46;
const COORD_Z: std::ops::Range<usize> = 46..54;
const ELEMENT: std::ops::Range<usize> = 76..78;

/// Parse PDB text into a structure.
///
/// Returns [`ModelError::EmptyStructure`] when no atom records are present.
pub fn parse(text: &str) -> Result<Structure> {
    let mut atoms = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if !(line.starts_with("ATOM") || line.starts_with("HETATM")) {
            continue;
        }
        let line_no = i + 1;
        let position = [
            coordinate(line, COORD_X, line_no)?,
            coordinate(line, COORD_Y, line_no)?,
            coordinate(line, COORD_Z, line_no)?,
        ];
        atoms.push(Atom::new(element(line)?, position));
    }

    if atoms.is_empty() {
        return Err(ModelError::EmptyStructure);
    }
    Ok(Structure::new(atoms))
}

fn coordinate(line: &str, range: std::ops::Range<usize>, line_no: usize) -> Result<f64> {
    let field = line.get(range).unwrap_or_default().trim();
    field.parse().map_err(|_| ModelError::InvalidCoordinate {
        line: line_no,
        value: field.to_string(),
    })
}

/// Element from columns 77-78, or inferred from the atom name.
fn element(line: &str) -> Result<ElementSymbol> {
    let column = line.get(ELEMENT).map(str::trim).unwrap_or_default();
    if !column.is_empty() {
        return ElementSymbol::new(column);
    }

    let name = line.get(ATOM_NAME).unwrap_or_default();
    ElementSymbol::new(&element_from_name(name))
}

/// Atom names that read as two-letter elements but name protein atoms
/// (`CA` is the alpha carbon, not calcium).
const PROTEIN_ATOM_NAMES: [&str; 16] = [
    "CA", "CB", "CG", "CD", "CE", "CZ", "CH", "NE", "NH", "NZ", "OG", "OH", "OE", "OD", "SD", "SG",
];

/// Leading element letters of an atom name.
///
/// A leading digit is skipped (`1HB` is hydrogen). Two letters naming a
/// known element win over one, so `CL1` is chlorine and `FE1` is iron.
fn element_from_name(name: &str) -> String {
    let name = name.trim();
    let letters: String = name
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .take(2)
        .collect();

    if letters.len() == 2
        && is_known_symbol(&letters)
        && !PROTEIN_ATOM_NAMES.contains(&name.to_ascii_uppercase().as_str())
    {
        return letters;
    }
    letters.chars().take(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
TITLE unknown
MODEL 1
ATOM      1  C1  UNK     1       0.000   0.000   0.000  1.00  0.00           C
HETATM    2 Fe1  UNK     1       1.000  -2.500   3.250  1.00  0.00          FE
ATOM      3  O1  UNK     1      -1.200   0.400   0.000
ENDMDL
END
";

    #[test]
    fn test_parse_sample() {
        let structure = parse(SAMPLE).unwrap();
        assert_eq!(structure.len(), 3);

        let atoms = structure.atoms();
        assert_eq!(atoms[0].element.as_str(), "C");
        assert_eq!(atoms[1].element.as_str(), "Fe");
        assert_eq!(atoms[1].position, [1.0, -2.5, 3.25]);
        // Element column missing: falls back to the atom name
        assert_eq!(atoms[2].element.as_str(), "O");
    }

    #[test]
    fn test_element_from_name() {
        assert_eq!(element_from_name("CL1 "), "CL");
        assert_eq!(element_from_name("FE1 "), "FE");
        assert_eq!(element_from_name("1H  "), "H");
        assert_eq!(element_from_name(" CA "), "C");
        assert_eq!(element_from_name(" O1 "), "O");
        assert_eq!(element_from_name("    "), "");
    }

    #[test]
    fn test_parse_without_element_column() {
        let text = "\
HETATM    1 CL1  UNK     1       0.000   0.000   0.000
HETATM    2 FE1  UNK     1       1.000   0.000   0.000
ATOM      3 1H   UNK     1       2.000   0.000   0.000
ATOM      4  CA  UNK     1       3.000   0.000   0.000
";
        let structure = parse(text).unwrap();
        let symbols: Vec<&str> = structure
            .atoms()
            .iter()
            .map(|atom| atom.element.as_str())
            .collect();
        assert_eq!(symbols, ["Cl", "Fe", "H", "C"]);
        assert!(!structure.atoms()[0].element.is_chon());
        assert!(!structure.atoms()[1].element.is_chon());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            parse("TITLE nothing\nEND\n"),
            Err(ModelError::EmptyStructure)
        ));
    }

    #[test]
    fn test_parse_bad_coordinate() {
        let text = "ATOM      1  C1  UNK     1       x.000   0.000   0.000  1.00  0.00           C";
        assert!(matches!(
            parse(text),
            Err(ModelError::InvalidCoordinate { line: 1, .. })
        ));
    }

    #[test]
    fn test_round_trip_through_pdb_block() {
        let structure = parse(SAMPLE).unwrap();
        let reparsed = parse(&structure.pdb_block()).unwrap();
        assert_eq!(structure, reparsed);
    }
}
