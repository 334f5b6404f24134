//! Same-origin export endpoints of a report session.

use esi_model::SessionId;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Formats served for direct download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadTarget {
    /// Plain-text report.
    Text,
    /// Every generated file in one archive.
    Archive,
    /// XYZ coordinates.
    Xyz,
    /// Chemical Markup Language.
    Cml,
    /// Raw parsed data as JSON.
    Json,
    /// Chemical JSON.
    ChemicalJson,
}

impl DownloadTarget {
    /// All targets in menu order.
    pub const ALL: [Self; 6] = [
        Self::Text,
        Self::Archive,
        Self::Xyz,
        Self::Cml,
        Self::Json,
        Self::ChemicalJson,
    ];

    /// Last path segment of the endpoint.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Archive => "zip",
            Self::Xyz => "xyz",
            Self::Cml => "cml",
            Self::Json => "json",
            Self::ChemicalJson => "cjson",
        }
    }

    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text => "Plain text",
            Self::Archive => "All files (ZIP)",
            Self::Xyz => "XYZ",
            Self::Cml => "CML",
            Self::Json => "Raw JSON",
            Self::ChemicalJson => "Chemical JSON",
        }
    }

    /// Whether the endpoint renders through a report template.
    #[must_use]
    pub const fn accepts_template(&self) -> bool {
        matches!(self, Self::Text | Self::Archive)
    }
}

/// Services that mint a DOI for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoiTarget {
    /// GitHub gist.
    Gist,
    /// Figshare.
    Figshare,
    /// Zenodo.
    Zenodo,
}

impl DoiTarget {
    /// All targets in menu order.
    pub const ALL: [Self; 3] = [Self::Gist, Self::Figshare, Self::Zenodo];

    /// Last path segment of the endpoint.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Gist => "gist",
            Self::Figshare => "figshare",
            Self::Zenodo => "zenodo",
        }
    }

    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Gist => "GitHub Gist",
            Self::Figshare => "Figshare",
            Self::Zenodo => "Zenodo",
        }
    }
}

/// Per-target publication switches. All off unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoiFlags {
    pub gist: bool,
    pub figshare: bool,
    pub zenodo: bool,
}

impl DoiFlags {
    /// Whether `target` is enabled.
    #[must_use]
    pub const fn is_enabled(&self, target: DoiTarget) -> bool {
        match target {
            DoiTarget::Gist => self.gist,
            DoiTarget::Figshare => self.figshare,
            DoiTarget::Zenodo => self.zenodo,
        }
    }

    /// Enabled targets in menu order.
    pub fn enabled(&self) -> impl Iterator<Item = DoiTarget> + '_ {
        DoiTarget::ALL
            .into_iter()
            .filter(|target| self.is_enabled(*target))
    }
}

/// Builds endpoint URLs under `{base}/reports/{session}/`.
#[derive(Debug, Clone)]
pub struct ReportRoutes {
    session_root: Url,
}

impl ReportRoutes {
    /// Create routes for a session on the server at `base_url`.
    pub fn new(base_url: &str, session: &SessionId) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ExportError::Route(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ExportError::Route(format!("{base_url}: not a base URL")));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let session_root = base
            .join(&format!("reports/{session}/"))
            .map_err(|e| ExportError::Route(e.to_string()))?;
        Ok(Self { session_root })
    }

    /// Page URL of the session.
    #[must_use]
    pub fn page(&self) -> &Url {
        &self.session_root
    }

    /// Download URL for `target`; `template` is only sent where it applies.
    pub fn download(&self, target: DownloadTarget, template: Option<&str>) -> Result<Url> {
        let template = template.filter(|_| target.accepts_template());
        self.endpoint(target.slug(), template)
    }

    /// Publication URL for `target`.
    pub fn doi(&self, target: DoiTarget, template: Option<&str>) -> Result<Url> {
        self.endpoint(target.slug(), template)
    }

    fn endpoint(&self, slug: &str, template: Option<&str>) -> Result<Url> {
        let mut url = self
            .session_root
            .join(slug)
            .map_err(|e| ExportError::Route(e.to_string()))?;
        if let Some(template) = template {
            url.query_pairs_mut().append_pair("template", template);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionId {
        "0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70".parse().unwrap()
    }

    #[test]
    fn test_download_routes() {
        let routes = ReportRoutes::new("https://si.example.org", &session()).unwrap();
        assert_eq!(
            routes.download(DownloadTarget::Xyz, Some("default")).unwrap().as_str(),
            "https://si.example.org/reports/0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70/xyz"
        );
        assert_eq!(
            routes.download(DownloadTarget::Text, Some("my template")).unwrap().as_str(),
            "https://si.example.org/reports/0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70/txt?template=my+template"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let routes = ReportRoutes::new("http://localhost:5000/si", &session()).unwrap();
        assert_eq!(
            routes.doi(DoiTarget::Zenodo, None).unwrap().as_str(),
            "http://localhost:5000/si/reports/0b4e7a0e-5b1c-4a5e-9f1a-2d3c4b5a6f70/zenodo"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            ReportRoutes::new("not a url", &session()),
            Err(ExportError::Route(_))
        ));
        assert!(ReportRoutes::new("mailto:a@b.c", &session()).is_err());
    }

    #[test]
    fn test_doi_flags() {
        let flags = DoiFlags {
            figshare: true,
            ..DoiFlags::default()
        };
        assert_eq!(flags.enabled().collect::<Vec<_>>(), vec![DoiTarget::Figshare]);
        assert!(DoiFlags::default().enabled().next().is_none());
    }
}
