//! Page assembly and the deferred viewer registration it schedules.

use std::sync::Arc;

use esi_viewer::{ViewerInstance, ViewerRegistry};
use futures_util::future::join_all;

use crate::resolver::{RegistrationIntent, Resolution};

/// Id of the element wrapping every report; the PDF renderer captures it.
pub const CONTENT_REGION_ID: &str = "reports";

/// Join resolved reports into one document body.
#[must_use]
pub fn compose_page(resolution: &Resolution) -> String {
    let mut page = format!("<div id=\"{CONTENT_REGION_ID}\">\n");
    for report in &resolution.reports {
        page.push_str("<section class=\"report\">\n");
        page.push_str(&report.markup);
        if !report.markup.ends_with('\n') {
            page.push('\n');
        }
        page.push_str("</section>\n");
    }
    page.push_str("</div>\n");
    page
}

/// One rendered page: the registry plus the registrations waiting for the
/// document to become ready.
#[derive(Debug)]
pub struct PageSession {
    registry: Arc<ViewerRegistry>,
    pending: Vec<RegistrationIntent>,
}

impl PageSession {
    /// Create a session over a registry.
    pub fn new(registry: Arc<ViewerRegistry>) -> Self {
        Self {
            registry,
            pending: Vec::new(),
        }
    }

    /// The session's registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ViewerRegistry> {
        &self.registry
    }

    /// Queue the registrations of a resolution.
    pub fn mount(&mut self, resolution: &Resolution) {
        self.pending.extend(resolution.intents().cloned());
    }

    /// Number of registrations still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run every queued registration.
    ///
    /// Instances are registered in queue order; loads proceed concurrently.
    /// Returns once every viewer is `Loaded` or `Failed`.
    pub async fn document_ready(&mut self) -> Vec<Arc<ViewerInstance>> {
        let intents = std::mem::take(&mut self.pending);
        tracing::debug!(viewers = intents.len(), "Document ready");

        let registry = &self.registry;
        join_all(intents.iter().map(|intent| {
            registry.get_or_create(intent.index, &intent.locator, &intent.display_name)
        }))
        .await
    }
}
