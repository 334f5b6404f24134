//! Hand-off of export locators to the browser.

use reqwest::Url;

/// Opens export locators. Fire-and-forget: the transport owns failures.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url);
}

/// Opens locators with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenNavigator;

impl Navigator for OpenNavigator {
    fn navigate(&self, url: &Url) {
        tracing::debug!(url = %url, "Opening export locator");
        if let Err(e) = open::that_detached(url.as_str()) {
            tracing::warn!(url = %url, error = %e, "Could not open export locator");
        }
    }
}
