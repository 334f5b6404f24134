//! Viewer placeholder resolution.

use esi_model::{Molecule, Report, viewport_id};
use serde::Serialize;

use crate::html::{escape_attribute, script_string};
use crate::token::{Token, tokenize};

/// Sentinel emitted by the report templates where the 3D viewer belongs.
pub const DEFAULT_SENTINEL: &str = "{{ viewer3d }}";

/// Request to bind a mount point to a viewer once the document is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationIntent {
    /// Registry index (the report position).
    pub index: usize,
    /// Id of the mount-point element.
    pub mount_id: String,
    /// Structure locator.
    pub locator: String,
    /// Molecule display name.
    pub display_name: String,
}

impl RegistrationIntent {
    fn new(index: usize, molecule: &Molecule) -> Self {
        Self {
            index,
            mount_id: viewport_id(index),
            locator: molecule.locator.clone(),
            display_name: molecule.name.clone(),
        }
    }

    /// Markup replacing one sentinel: the mount point and a deferred
    /// registration call.
    #[must_use]
    pub fn fragment(&self) -> String {
        format!(
            concat!(
                "<div id=\"{id}\" class=\"viewport\" data-molecule=\"{name_attr}\"></div>\n",
                "<script>\n",
                "document.addEventListener(\"DOMContentLoaded\", function () {{\n",
                "  esi.viewers.getOrCreate({index}, {locator}, {name});\n",
                "}});\n",
                "</script>",
            ),
            id = self.mount_id,
            name_attr = escape_attribute(&self.display_name),
            index = self.index,
            locator = script_string(&self.locator),
            name = script_string(&self.display_name),
        )
    }
}

/// One report after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReport {
    /// Position in the input sequence.
    pub index: usize,
    /// Molecule of the report.
    pub molecule: Molecule,
    /// Markup with every sentinel replaced.
    pub markup: String,
    /// Number of sentinels replaced.
    pub occurrences: usize,
    /// Registration for this report's viewer, if it has a sentinel.
    pub intent: Option<RegistrationIntent>,
}

/// Result of resolving a report sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved reports in input order.
    pub reports: Vec<ResolvedReport>,
}

impl Resolution {
    /// Registration intents in report order.
    pub fn intents(&self) -> impl Iterator<Item = &RegistrationIntent> {
        self.reports.iter().filter_map(|report| report.intent.as_ref())
    }

    /// Number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no report was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Replaces the viewer sentinel in report markup.
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    sentinel: String,
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL)
    }
}

impl PlaceholderResolver {
    /// Create a resolver for a sentinel token.
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// The sentinel this resolver replaces.
    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Resolve reports in order.
    ///
    /// The report at position `i` binds to `viewport{i}` whether or not it has
    /// a sentinel, so identifiers follow report positions and are never
    /// reused. Every occurrence in a report gets the same mount point; the
    /// report yields one intent. Reports without a sentinel pass through
    /// unchanged.
    #[must_use]
    pub fn resolve(&self, reports: Vec<Report>) -> Resolution {
        let reports = reports
            .into_iter()
            .enumerate()
            .map(|(index, report)| self.resolve_one(index, report))
            .collect();
        Resolution { reports }
    }

    fn resolve_one(&self, index: usize, report: Report) -> ResolvedReport {
        let tokens = tokenize(&report.markup, &self.sentinel);
        let occurrences = tokens.iter().filter(|t| **t == Token::Sentinel).count();

        if occurrences == 0 {
            tracing::debug!(index, molecule = %report.molecule.name, "No viewer placeholder");
            return ResolvedReport {
                index,
                molecule: report.molecule,
                markup: report.markup,
                occurrences,
                intent: None,
            };
        }

        let intent = RegistrationIntent::new(index, &report.molecule);
        let fragment = intent.fragment();
        let mut markup = String::with_capacity(report.markup.len() + occurrences * fragment.len());
        for token in &tokens {
            match token {
                Token::Text(text) => markup.push_str(text),
                Token::Sentinel => markup.push_str(&fragment),
            }
        }

        tracing::debug!(
            index,
            molecule = %report.molecule.name,
            occurrences,
            "Resolved viewer placeholder"
        );

        ResolvedReport {
            index,
            molecule: report.molecule,
            markup,
            occurrences,
            intent: Some(intent),
        }
    }
}
