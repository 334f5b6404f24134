//! Element symbols and atom classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Longest element symbol accepted (systematic names such as "Uuo").
const MAX_SYMBOL_LEN: usize = 3;

/// Symbols of the known elements, in atomic-number order.
const KNOWN_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Whether `raw`, once normalized, is the symbol of a known element.
#[must_use]
pub fn is_known_symbol(raw: &str) -> bool {
    let symbol = normalize_symbol(raw);
    KNOWN_SYMBOLS.contains(&symbol.as_str())
}

/// Normalize an element symbol to title case.
///
/// The first character is upper-cased and the remainder lower-cased, so
/// `"FE"` becomes `"Fe"` and `"cl"` becomes `"Cl"`. Surrounding whitespace is
/// trimmed.
#[must_use]
pub fn normalize_symbol(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Classification used by the visualization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomClass {
    /// Carbon, hydrogen, nitrogen, or oxygen.
    Chon,
    /// Any other element (heteroatoms, metals, halogens).
    NonChon,
}

/// A validated, title-cased element symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementSymbol(String);

impl ElementSymbol {
    /// Parse and normalize an element symbol.
    pub fn new(raw: &str) -> Result<Self> {
        let symbol = normalize_symbol(raw);
        if symbol.is_empty()
            || symbol.chars().count() > MAX_SYMBOL_LEN
            || !symbol.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ModelError::InvalidElement(raw.to_string()));
        }
        Ok(Self(symbol))
    }

    /// The normalized symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of C, H, N, O.
    #[must_use]
    pub fn is_chon(&self) -> bool {
        matches!(self.0.as_str(), "C" | "H" | "N" | "O")
    }

    /// Classify for representation selection.
    #[must_use]
    pub fn class(&self) -> AtomClass {
        if self.is_chon() {
            AtomClass::Chon
        } else {
            AtomClass::NonChon
        }
    }

    /// Whether a PDB writer should emit this atom as a standard `ATOM` record.
    #[must_use]
    pub fn is_standard_residue_element(&self) -> bool {
        matches!(self.0.as_str(), "C" | "H" | "O" | "N" | "P" | "S")
    }
}

impl fmt::Display for ElementSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ElementSymbol {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<ElementSymbol> for String {
    fn from(value: ElementSymbol) -> Self {
        value.0
    }
}
